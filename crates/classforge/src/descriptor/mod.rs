//! Class descriptors
//!
//! Language-neutral description of a generated class: its fields, methods,
//! annotations and hierarchy. Builders produce descriptors, emitters turn them
//! into text. A descriptor is never modified once handed to an emitter.

mod client;

pub use client::{
    client_type, display_field, provider_name, ClientField, ClientModelDescriptor,
    ForeignKeySelector, ProviderCall,
};

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::{Cardinality, Containment, DescriptorKind};

/// An annotation such as `@OneToMany(mappedBy = "customer")`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub name: String,
    /// Arguments in declaration order; values are already source literals
    pub arguments: IndexMap<String, String>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: IndexMap::new(),
        }
    }

    /// Add a `key = value` argument
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Add a quoted string argument
    pub fn with_str(self, key: impl Into<String>, value: &str) -> Self {
        self.with_arg(key, format!("\"{}\"", value))
    }

    /// Single unnamed argument, rendered as `@Name(value)`
    pub fn with_value(self, value: impl Into<String>) -> Self {
        self.with_arg("value", value)
    }

    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).map(String::as_str)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if self.arguments.is_empty() {
            return Ok(());
        }
        if self.arguments.len() == 1 {
            if let Some(value) = self.arguments.get("value") {
                return write!(f, "({})", value);
            }
        }
        let args: Vec<String> = self
            .arguments
            .iter()
            .map(|(key, value)| format!("{} = {}", key, value))
            .collect();
        write!(f, "({})", args.join(", "))
    }
}

/// Relationship metadata carried by a relationship-derived field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationMeta {
    pub related_class: String,
    pub cardinality: Cardinality,
    pub owning_side: bool,
    pub containment: Containment,
    pub mapped_by: Option<String>,
    pub required: bool,
    /// False for dependency references, which are never stored
    pub persisted: bool,
}

/// A field of a generated class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_name: String,
    pub annotations: Vec<Annotation>,
    pub is_static: bool,
    pub is_final: bool,
    pub initializer: Option<String>,
    pub relation: Option<RelationMeta>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            annotations: Vec::new(),
            is_static: false,
            is_final: false,
            initializer: None,
            relation: None,
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_relation(mut self, relation: RelationMeta) -> Self {
        self.relation = Some(relation);
        self
    }

    pub fn with_initializer(mut self, initializer: impl Into<String>) -> Self {
        self.initializer = Some(initializer.into());
        self
    }

    /// Mark as a `static final` constant
    pub fn constant(mut self) -> Self {
        self.is_static = true;
        self.is_final = true;
        self
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    pub fn is_relation(&self) -> bool {
        self.relation.is_some()
    }
}

/// A method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub type_name: String,
    pub annotations: Vec<Annotation>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// CRUD operations shared by services, controllers and client providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CrudOperation {
    FindAll,
    FindById,
    Save,
    Update,
    DeleteById,
}

impl CrudOperation {
    pub const ALL: [CrudOperation; 5] = [
        CrudOperation::FindAll,
        CrudOperation::FindById,
        CrudOperation::Save,
        CrudOperation::Update,
        CrudOperation::DeleteById,
    ];

    /// Service method name
    pub fn method_name(self) -> &'static str {
        match self {
            CrudOperation::FindAll => "findAll",
            CrudOperation::FindById => "findById",
            CrudOperation::Save => "save",
            CrudOperation::Update => "update",
            CrudOperation::DeleteById => "deleteById",
        }
    }

    pub fn http_method(self) -> &'static str {
        match self {
            CrudOperation::FindAll | CrudOperation::FindById => "GET",
            CrudOperation::Save => "POST",
            CrudOperation::Update => "PUT",
            CrudOperation::DeleteById => "DELETE",
        }
    }

    /// Returns true when the operation addresses one entity by id
    pub fn takes_id(self) -> bool {
        matches!(
            self,
            CrudOperation::FindById | CrudOperation::Update | CrudOperation::DeleteById
        )
    }

    /// Returns true when the operation reads a DTO body
    pub fn takes_body(self) -> bool {
        matches!(self, CrudOperation::Save | CrudOperation::Update)
    }
}

impl fmt::Display for CrudOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Conversion of a DTO foreign key id into an entity reference
///
/// The generated service looks the id up through `lookup` and fails with
/// `not_found` when it does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyResolution {
    /// DTO field holding the id, e.g. `customerId`
    pub dto_field: String,
    /// Entity field receiving the reference, e.g. `customer`
    pub entity_field: String,
    pub related_class: String,
    /// Injected repository field, e.g. `customerRepository`
    pub lookup: String,
    /// Not-found message; the unresolved id is appended to it
    pub not_found: String,
    pub required: bool,
}

/// A method of a generated class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<ParameterDescriptor>,
    pub annotations: Vec<Annotation>,
    pub is_abstract: bool,
    pub is_static: bool,
    pub operation: Option<CrudOperation>,
    pub resolutions: Vec<ForeignKeyResolution>,
    /// Not-found message raised when the managed entity id does not resolve
    pub not_found: Option<String>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            parameters: Vec::new(),
            annotations: Vec::new(),
            is_abstract: false,
            is_static: false,
            operation: None,
            resolutions: Vec::new(),
            not_found: None,
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_operation(mut self, operation: CrudOperation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn signature_only(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.name == name)
    }

    /// `name(Type a, Type b)` without return type
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.type_name, p.name))
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

/// A generated class, interface or enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDescriptor {
    pub name: String,
    pub package: String,
    pub kind: DescriptorKind,
    pub is_abstract: bool,
    pub fields: Vec<FieldDescriptor>,
    pub methods: Vec<MethodDescriptor>,
    pub annotations: Vec<Annotation>,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>, package: impl Into<String>, kind: DescriptorKind) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            kind,
            is_abstract: false,
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    /// Package-qualified name, e.g. `com.example.shop.entity.Order`
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    /// Source path of this class, e.g. `src/main/java/com/example/shop/entity/Order.java`
    pub fn file_path(&self, extension: &str) -> String {
        let package_path = self.package.replace('.', "/");
        if package_path.is_empty() {
            format!("src/main/java/{}.{}", self.name, extension)
        } else {
            format!("src/main/java/{}/{}.{}", package_path, self.name, extension)
        }
    }
}
