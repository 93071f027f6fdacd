//! Client model descriptors
//!
//! The mobile client mirrors the DTO: the same fields with client types, a
//! provider calling the controller routes, and a selector per foreign key so
//! forms can pick the related record.

use serde::Serialize;

use crate::core::{field_name, to_snake_case, DescriptorKind};
use super::{ClassDescriptor, CrudOperation, RelationMeta};

/// Client type for a backend type
pub fn client_type(backend_type: &str) -> String {
    match backend_type {
        "String" | "Character" | "UUID" => "String".to_string(),
        "Integer" | "Long" => "int".to_string(),
        "Double" | "Float" | "BigDecimal" => "double".to_string(),
        "Boolean" => "bool".to_string(),
        "LocalDate" | "LocalDateTime" | "LocalTime" => "DateTime".to_string(),
        other => other.to_string(),
    }
}

/// A field of the client model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientField {
    pub name: String,
    pub type_name: String,
    /// Backend type the field is read from
    pub backend_type: String,
    pub required: bool,
    pub relation: Option<RelationMeta>,
}

/// One provider operation against the backend controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderCall {
    pub name: String,
    pub operation: CrudOperation,
    pub http_method: String,
    pub path: String,
}

impl ProviderCall {
    /// Provider method name for a CRUD operation
    pub fn method_name(operation: CrudOperation) -> &'static str {
        match operation {
            CrudOperation::FindAll => "fetchAll",
            CrudOperation::FindById => "fetchById",
            CrudOperation::Save => "create",
            CrudOperation::Update => "update",
            CrudOperation::DeleteById => "delete",
        }
    }

    pub fn new(operation: CrudOperation, resource: &str) -> Self {
        let path = if operation.takes_id() {
            format!("{}/{{id}}", resource)
        } else {
            resource.to_string()
        };
        Self {
            name: Self::method_name(operation).to_string(),
            operation,
            http_method: operation.http_method().to_string(),
            path,
        }
    }
}

/// Picker for a foreign key field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeySelector {
    /// Model field holding the id, e.g. `customerId`
    pub field: String,
    pub related_class: String,
    /// Provider listing the candidates, e.g. `CustomerProvider`
    pub provider: String,
    /// Field of the related model shown in the picker
    pub display_field: String,
    pub required: bool,
}

/// Client-side mapping of one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientModelDescriptor {
    pub name: String,
    pub package: String,
    pub fields: Vec<ClientField>,
    pub provider: String,
    pub resource: String,
    pub calls: Vec<ProviderCall>,
    pub selectors: Vec<ForeignKeySelector>,
}

impl ClientModelDescriptor {
    /// Start a model from the class's DTO descriptor
    pub fn from_dto(name: &str, package: String, resource: String, dto: &ClassDescriptor) -> Self {
        debug_assert_eq!(dto.kind, DescriptorKind::Dto);
        let fields = dto
            .fields
            .iter()
            .map(|field| ClientField {
                name: field.name.clone(),
                type_name: client_type(&field.type_name),
                backend_type: field.type_name.clone(),
                required: field.relation.as_ref().map(|r| r.required).unwrap_or(false),
                relation: field.relation.clone(),
            })
            .collect();
        let calls = CrudOperation::ALL
            .iter()
            .map(|&operation| ProviderCall::new(operation, &resource))
            .collect();

        Self {
            name: name.to_string(),
            package,
            fields,
            provider: provider_name(name),
            resource,
            calls,
            selectors: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&ClientField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn call(&self, name: &str) -> Option<&ProviderCall> {
        self.calls.iter().find(|c| c.name == name)
    }

    /// e.g. `lib/models/order_item.dart`
    pub fn model_path(&self, extension: &str) -> String {
        format!("lib/models/{}.{}", to_snake_case(&self.name), extension)
    }

    /// e.g. `lib/providers/order_item_provider.dart`
    pub fn provider_path(&self, extension: &str) -> String {
        format!("lib/providers/{}.{}", to_snake_case(&self.provider), extension)
    }
}

/// Provider class name, e.g. `Customer` → `CustomerProvider`
pub fn provider_name(class: &str) -> String {
    format!("{}Provider", class)
}

/// Display field of a related model: first String attribute, else `id`
pub fn display_field<'a>(attributes: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    attributes
        .into_iter()
        .find(|(_, backend_type)| *backend_type == "String")
        .map(|(name, _)| field_name(name))
        .unwrap_or_else(|| "id".to_string())
}
