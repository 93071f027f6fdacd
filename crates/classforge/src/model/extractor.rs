//! Graph model extractor
//!
//! Turns the loosely-shaped JSON payload sent by the diagram editor into a
//! typed [`DiagramDatabase`]. Extraction is best-effort: unreadable nodes become
//! empty classes, unreadable edges are skipped, and both are reported as
//! diagnostics. Only a payload that is not a diagram at all is an error.
//!
//! Both flat nodes and editor nodes that nest their content under `data` are
//! accepted:
//!
//! ```json
//! { "id": "n1", "type": "class", "data": { "label": "Order", "attributes": [] } }
//! ```

use serde_json::{Map, Value};
use tracing::{debug, info, span, trace, Level};

use super::diagram::{Attribute, DiagramDatabase, Edge, EdgeId, Method, Node, NodeId, Parameter};
use crate::core::{
    DiagnosticCode, Diagnostics, GenerationError, GraphStore, NodeKind, ProjectConfig,
    RelationshipType, Visibility,
};

/// Result of extracting a diagram payload
#[derive(Debug, Clone)]
pub struct Extraction {
    pub database: DiagramDatabase,
    pub diagnostics: Diagnostics,
}

/// Extracts typed graph data from editor payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphExtractor;

impl GraphExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract nodes and edges from a diagram document
    ///
    /// The document must be a JSON object; `nodes` and `edges`, when present,
    /// must be arrays.
    pub fn extract(&self, document: &Value) -> Result<Extraction, GenerationError> {
        let extract_span = span!(Level::INFO, "extract");
        let _enter = extract_span.enter();

        let root = document
            .as_object()
            .ok_or_else(|| GenerationError::malformed_payload("diagram must be a JSON object"))?;
        let nodes = array_entry(root, "nodes")?;
        let edges = array_entry(root, "edges")?;

        let mut database = DiagramDatabase::new();
        let mut diagnostics = Diagnostics::new();

        for (index, raw) in nodes.iter().enumerate() {
            let node = self.extract_node(index, raw, &mut diagnostics);
            if let Err(e) = database.insert_node(node) {
                diagnostics.push(
                    DiagnosticCode::MalformedNode,
                    format!("node-{}", index),
                    format!("{}; later declaration ignored", e),
                );
            }
        }

        for (index, raw) in edges.iter().enumerate() {
            if let Some(edge) = self.extract_edge(index, raw, &mut diagnostics) {
                database.push_edge(edge);
            }
        }

        info!(
            node_count = database.node_count(),
            edge_count = database.edge_count(),
            diagnostics = diagnostics.len(),
            "Extraction completed"
        );
        Ok(Extraction {
            database,
            diagnostics,
        })
    }

    /// Extract the project configuration carried under `config`
    ///
    /// A missing `config` yields the defaults; a present but unreadable or
    /// invalid one aborts the run.
    pub fn extract_config(&self, document: &Value) -> Result<ProjectConfig, GenerationError> {
        let config = match document.get("config") {
            None | Some(Value::Null) => ProjectConfig::default(),
            Some(raw) => serde_json::from_value::<ProjectConfig>(raw.clone())
                .map_err(|e| GenerationError::invalid_config(e.to_string()))?,
        };
        config.validate()?;
        debug!(base_package = %config.base_package(), "Configuration loaded");
        Ok(config)
    }

    fn extract_node(&self, index: usize, raw: &Value, diagnostics: &mut Diagnostics) -> Node {
        let fallback_id = format!("node-{}", index);
        let Some(obj) = raw.as_object() else {
            diagnostics.push(
                DiagnosticCode::MalformedNode,
                &fallback_id,
                "node is not an object; treated as an empty class",
            );
            return Node::class(fallback_id.clone(), fallback_id);
        };

        let id = match lookup_string(obj, &["id"]) {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                diagnostics.push(
                    DiagnosticCode::MalformedNode,
                    &fallback_id,
                    "node has no id; a positional id was assigned",
                );
                fallback_id
            }
        };

        let kind = match lookup_string(obj, &["kind", "nodeType", "classType", "type"]) {
            Some(token) => NodeKind::parse(&token).unwrap_or_else(|| {
                trace!(node = %id, token = %token, "Unknown node kind, using class");
                NodeKind::Class
            }),
            None => NodeKind::Class,
        };
        let label = lookup_string(obj, &["label", "name", "className"]).unwrap_or_else(|| id.clone());

        let mut node = Node::new(id.clone(), kind, label);

        if let Some(values) = lookup(obj, &["attributes"]).and_then(Value::as_array) {
            for (i, value) in values.iter().enumerate() {
                match parse_attribute(value) {
                    Some(attribute) => node.attributes.push(attribute),
                    None => diagnostics.push(
                        DiagnosticCode::MalformedNode,
                        &id,
                        format!("attribute #{} could not be read and was skipped", i),
                    ),
                }
            }
        }

        if let Some(values) = lookup(obj, &["methods", "operations"]).and_then(Value::as_array) {
            for (i, value) in values.iter().enumerate() {
                match parse_method(value) {
                    Some(method) => node.methods.push(method),
                    None => diagnostics.push(
                        DiagnosticCode::MalformedNode,
                        &id,
                        format!("method #{} could not be read and was skipped", i),
                    ),
                }
            }
        }

        if kind == NodeKind::Enum {
            if let Some(values) = lookup(obj, &["enumValues", "values", "literals"]).and_then(Value::as_array) {
                node.enum_values = values
                    .iter()
                    .filter_map(|v| match v {
                        Value::Object(o) => lookup_string(o, &["name", "value"]),
                        other => scalar_string(other),
                    })
                    .filter(|v| !v.trim().is_empty())
                    .collect();
            }
        }

        trace!(
            node = %node.id,
            kind = %node.kind,
            attributes = node.attributes.len(),
            methods = node.methods.len(),
            "Extracted node"
        );
        node
    }

    fn extract_edge(&self, index: usize, raw: &Value, diagnostics: &mut Diagnostics) -> Option<Edge> {
        let fallback_id = format!("edge-{}", index);
        let Some(obj) = raw.as_object() else {
            diagnostics.push(DiagnosticCode::MalformedEdge, &fallback_id, "edge is not an object; skipped");
            return None;
        };

        let id = lookup_string(obj, &["id"])
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(fallback_id);

        let source = lookup_string(obj, &["sourceNodeId", "source", "from"]);
        let target = lookup_string(obj, &["targetNodeId", "target", "to"]);
        let (Some(source), Some(target)) = (source, target) else {
            diagnostics.push(DiagnosticCode::MalformedEdge, &id, "edge is missing an endpoint; skipped");
            return None;
        };

        let relationship_type = match lookup_string(obj, &["relationshipType", "relationType", "kind", "type"]) {
            Some(token) => match RelationshipType::parse(&token) {
                Some(t) => t,
                None => {
                    diagnostics.push(
                        DiagnosticCode::MalformedEdge,
                        &id,
                        format!("unknown relationship type `{}`; skipped", token),
                    );
                    return None;
                }
            },
            None => {
                diagnostics.push(
                    DiagnosticCode::MalformedEdge,
                    &id,
                    "edge has no relationship type; treated as an association",
                );
                RelationshipType::Association
            }
        };

        let source_multiplicity =
            lookup_string(obj, &["sourceMultiplicity", "sourceCardinality"]).unwrap_or_default();
        let target_multiplicity =
            lookup_string(obj, &["targetMultiplicity", "targetCardinality"]).unwrap_or_default();
        let label = lookup_string(obj, &["label", "name", "role"]).filter(|l| !l.trim().is_empty());

        Some(Edge {
            id: EdgeId::new(id),
            source: NodeId::new(source),
            target: NodeId::new(target),
            relationship_type,
            source_multiplicity: source_multiplicity.trim().to_string(),
            target_multiplicity: target_multiplicity.trim().to_string(),
            label,
        })
    }
}

fn array_entry<'a>(root: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], GenerationError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(GenerationError::malformed_payload(format!(
            "`{}` must be an array",
            key
        ))),
    }
}

/// Look up the first present key, on the object itself or under `data`
fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    let nested = obj.get("data").and_then(Value::as_object);
    keys.iter().find_map(|key| {
        obj.get(*key)
            .filter(|v| !v.is_null())
            .or_else(|| nested.and_then(|d| d.get(*key)).filter(|v| !v.is_null()))
    })
}

fn lookup_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    lookup(obj, keys).and_then(scalar_string)
}

fn lookup_bool(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    match lookup(obj, keys) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Split `name: Type` shorthand; a missing type defaults to `String`
fn split_typed(text: &str) -> (String, String) {
    match text.split_once(':') {
        Some((name, ty)) if !ty.trim().is_empty() => (name.trim().to_string(), ty.trim().to_string()),
        Some((name, _)) => (name.trim().to_string(), "String".to_string()),
        None => (text.trim().to_string(), "String".to_string()),
    }
}

fn parse_attribute(value: &Value) -> Option<Attribute> {
    match value {
        Value::String(text) => {
            let text = text.trim();
            let (visibility, rest) = match text.chars().next().and_then(|c| Visibility::parse(&c.to_string())) {
                Some(v) => (v, &text[1..]),
                None => (Visibility::Private, text),
            };
            let (name, type_name) = split_typed(rest);
            (!name.is_empty()).then(|| Attribute::new(name, type_name).with_visibility(visibility))
        }
        Value::Object(obj) => {
            let name = lookup_string(obj, &["name"]).filter(|n| !n.trim().is_empty())?;
            let type_name = lookup_string(obj, &["type", "dataType", "typeName"])
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "String".to_string());
            let mut attribute = Attribute::new(name.trim(), type_name.trim());
            if let Some(id) = lookup_string(obj, &["id"]) {
                attribute.id = id;
            }
            attribute.visibility = lookup_string(obj, &["visibility"])
                .and_then(|v| Visibility::parse(&v))
                .unwrap_or_default();
            attribute.is_static = lookup_bool(obj, &["isStatic", "static"]);
            attribute.is_final = lookup_bool(obj, &["isFinal", "final"]);
            attribute.default_value = lookup_string(obj, &["defaultValue", "default"])
                .filter(|d| !d.is_empty());
            Some(attribute)
        }
        _ => None,
    }
}

fn parse_parameters(value: Option<&Value>) -> Vec<Parameter> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(o) => {
                    let name = lookup_string(o, &["name"])?;
                    let ty = lookup_string(o, &["type", "typeName"]).unwrap_or_else(|| "Object".to_string());
                    Some(Parameter::new(name, ty))
                }
                Value::String(s) => {
                    let (name, ty) = split_typed(s);
                    (!name.is_empty()).then(|| Parameter::new(name, ty))
                }
                _ => None,
            })
            .collect(),
        Some(Value::String(list)) => list
            .split(',')
            .map(split_typed)
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, ty)| Parameter::new(name, ty))
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_method(value: &Value) -> Option<Method> {
    match value {
        Value::String(text) => {
            // name(a: int, b: String): ReturnType
            let open = text.find('(')?;
            let close = text.rfind(')')?;
            if close < open {
                return None;
            }
            let name = text[..open].trim().trim_start_matches(['+', '-', '#']).trim();
            if name.is_empty() {
                return None;
            }
            let params = parse_parameters(Some(&Value::String(text[open + 1..close].to_string())));
            let return_type = text[close + 1..]
                .trim()
                .trim_start_matches(':')
                .trim();
            let mut method = Method::new(name, if return_type.is_empty() { "void" } else { return_type });
            method.parameters = params;
            Some(method)
        }
        Value::Object(obj) => {
            let name = lookup_string(obj, &["name"]).filter(|n| !n.trim().is_empty())?;
            let return_type = lookup_string(obj, &["returnType", "type"])
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "void".to_string());
            let mut method = Method::new(name.trim(), return_type.trim());
            if let Some(id) = lookup_string(obj, &["id"]) {
                method.id = id;
            }
            method.parameters = parse_parameters(lookup(obj, &["parameters", "params"]));
            method.visibility = lookup_string(obj, &["visibility"])
                .and_then(|v| Visibility::parse(&v))
                .unwrap_or(Visibility::Public);
            method.is_static = lookup_bool(obj, &["isStatic", "static"]);
            method.is_abstract = lookup_bool(obj, &["isAbstract", "abstract"]);
            Some(method)
        }
        _ => None,
    }
}
