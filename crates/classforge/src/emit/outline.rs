//! Outline emitter
//!
//! Prints a source-like skeleton of each descriptor: annotations, aligned
//! member declarations and method signatures with the service's foreign key
//! resolution steps as comments. Column alignment uses display width so
//! non-ASCII identifiers line up.

use std::fmt::Write as _;

use anyhow::Result;
use unicode_width::UnicodeWidthStr;

use crate::core::{DescriptorKind, Emitter};
use crate::descriptor::{ClassDescriptor, ClientModelDescriptor, FieldDescriptor, MethodDescriptor};

const INDENT: &str = "    ";

/// Renders descriptors as aligned text outlines
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineEmitter;

impl OutlineEmitter {
    pub fn new() -> Self {
        Self
    }
}

/// Pad `text` with spaces to `width` display columns
fn pad(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(used)))
}

fn column_width<'a>(items: impl Iterator<Item = &'a str>) -> usize {
    items.map(UnicodeWidthStr::width).max().unwrap_or(0)
}

fn declaration(descriptor: &ClassDescriptor) -> String {
    let mut line = String::from("public ");
    match descriptor.kind {
        DescriptorKind::Interface | DescriptorKind::Repository => {
            line.push_str("interface ");
            line.push_str(&descriptor.name);
            if !descriptor.interfaces.is_empty() {
                let _ = write!(line, " extends {}", descriptor.interfaces.join(", "));
            }
        }
        DescriptorKind::Enum => {
            line.push_str("enum ");
            line.push_str(&descriptor.name);
        }
        _ => {
            if descriptor.is_abstract {
                line.push_str("abstract ");
            }
            line.push_str("class ");
            line.push_str(&descriptor.name);
            if let Some(superclass) = &descriptor.superclass {
                let _ = write!(line, " extends {}", superclass);
            }
            if !descriptor.interfaces.is_empty() {
                let _ = write!(line, " implements {}", descriptor.interfaces.join(", "));
            }
        }
    }
    line.push_str(" {");
    line
}

fn modifiers(kind: DescriptorKind, field: &FieldDescriptor) -> String {
    let mut words: Vec<&str> = Vec::new();
    if kind != DescriptorKind::Interface {
        words.push("private");
    }
    if field.is_static {
        words.push("static");
    }
    if field.is_final {
        words.push("final");
    }
    words.join(" ")
}

fn write_fields(out: &mut String, descriptor: &ClassDescriptor) {
    if descriptor.kind == DescriptorKind::Enum {
        let count = descriptor.fields.len();
        for (index, field) in descriptor.fields.iter().enumerate() {
            let terminator = if index + 1 == count { ";" } else { "," };
            let _ = writeln!(out, "{}{}{}", INDENT, field.name, terminator);
        }
        return;
    }

    let prefixes: Vec<String> = descriptor
        .fields
        .iter()
        .map(|field| {
            let modifiers = modifiers(descriptor.kind, field);
            if modifiers.is_empty() {
                field.type_name.clone()
            } else {
                format!("{} {}", modifiers, field.type_name)
            }
        })
        .collect();
    let width = column_width(prefixes.iter().map(String::as_str));

    for (field, prefix) in descriptor.fields.iter().zip(&prefixes) {
        for annotation in &field.annotations {
            let _ = writeln!(out, "{}{}", INDENT, annotation);
        }
        let _ = write!(out, "{}{} {}", INDENT, pad(prefix, width), field.name);
        if let Some(initializer) = &field.initializer {
            let _ = write!(out, " = {}", initializer);
        }
        out.push_str(";\n");
    }
}

fn write_method(out: &mut String, method: &MethodDescriptor) {
    for annotation in &method.annotations {
        let _ = writeln!(out, "{}{}", INDENT, annotation);
    }
    let params: Vec<String> = method
        .parameters
        .iter()
        .map(|p| {
            let mut rendered = String::new();
            for annotation in &p.annotations {
                let _ = write!(rendered, "{} ", annotation);
            }
            let _ = write!(rendered, "{} {}", p.type_name, p.name);
            rendered
        })
        .collect();
    let static_kw = if method.is_static { "static " } else { "" };
    let _ = write!(
        out,
        "{}public {}{} {}({})",
        INDENT,
        static_kw,
        method.return_type,
        method.name,
        params.join(", ")
    );

    if method.is_abstract {
        out.push_str(";\n");
        return;
    }

    let mut notes = Vec::new();
    for resolution in &method.resolutions {
        notes.push(format!(
            "{} -> {} via {}.findById, else \"{}\" + id{}",
            resolution.dto_field,
            resolution.entity_field,
            resolution.lookup,
            resolution.not_found,
            if resolution.required { "" } else { " (optional)" }
        ));
    }
    if let Some(message) = &method.not_found {
        notes.push(format!("not found: \"{}\" + id", message));
    }

    if notes.is_empty() {
        out.push_str(" { ... }\n");
    } else {
        out.push_str(" {\n");
        for note in notes {
            let _ = writeln!(out, "{}{}// {}", INDENT, INDENT, note);
        }
        let _ = writeln!(out, "{}}}", INDENT);
    }
}

impl Emitter for OutlineEmitter {
    fn emit_class(&self, descriptor: &ClassDescriptor) -> Result<String> {
        let mut out = String::new();
        if !descriptor.package.is_empty() {
            let _ = writeln!(out, "package {};\n", descriptor.package);
        }
        for annotation in &descriptor.annotations {
            let _ = writeln!(out, "{}", annotation);
        }
        let _ = writeln!(out, "{}", declaration(descriptor));

        write_fields(&mut out, descriptor);
        for method in &descriptor.methods {
            out.push('\n');
            write_method(&mut out, method);
        }

        out.push_str("}\n");
        Ok(out)
    }

    fn emit_client_model(&self, model: &ClientModelDescriptor) -> Result<String> {
        let mut out = String::new();
        let _ = writeln!(out, "// package {}\n", model.package);

        let _ = writeln!(out, "class {} {{", model.name);
        let width = column_width(model.fields.iter().map(|f| f.type_name.as_str()));
        for field in &model.fields {
            let optional = if field.required || field.name == "id" { "" } else { "?" };
            let type_name = format!("{}{}", field.type_name, optional);
            let _ = writeln!(out, "  {} {}", pad(&type_name, width + 1), field.name);
        }
        out.push_str("}\n");
        Ok(out)
    }

    fn emit_provider(&self, model: &ClientModelDescriptor) -> Result<String> {
        let mut out = String::new();
        let _ = writeln!(out, "// {} at {}\n", model.name, model.resource);
        let _ = writeln!(out, "class {} {{", model.provider);
        let name_width = column_width(model.calls.iter().map(|c| c.name.as_str()));
        let verb_width = column_width(model.calls.iter().map(|c| c.http_method.as_str()));
        for call in &model.calls {
            let _ = writeln!(
                out,
                "  {} {} {}",
                pad(&call.name, name_width),
                pad(&call.http_method, verb_width),
                call.path
            );
        }
        for selector in &model.selectors {
            let _ = writeln!(
                out,
                "  // {} picks a {} from {} by {}",
                selector.field, selector.related_class, selector.provider, selector.display_field
            );
        }
        out.push_str("}\n");
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "outline"
    }

    fn extension(&self) -> &'static str {
        "java.txt"
    }

    fn client_extension(&self) -> &'static str {
        "dart.txt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Annotation, CrudOperation, ForeignKeyResolution, ParameterDescriptor};

    fn entity() -> ClassDescriptor {
        let mut descriptor =
            ClassDescriptor::new("Order", "com.example.shop.entity", DescriptorKind::Entity)
                .with_annotation(Annotation::new("Entity"))
                .with_annotation(Annotation::new("Table").with_str("name", "orders"));
        descriptor
            .fields
            .push(FieldDescriptor::new("id", "Long").with_annotation(Annotation::new("Id")));
        descriptor.fields.push(
            FieldDescriptor::new("lines", "List<OrderLine>").with_initializer("new ArrayList<>()"),
        );
        descriptor
    }

    #[test]
    fn test_entity_outline() {
        let output = OutlineEmitter::new().emit_class(&entity()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "package com.example.shop.entity;");
        assert_eq!(lines[2], "@Entity");
        assert_eq!(lines[3], "@Table(name = \"orders\")");
        assert_eq!(lines[4], "public class Order {");
        assert_eq!(lines[5], "    @Id");
        assert_eq!(lines[6], "    private Long            id;");
        assert_eq!(lines[7], "    private List<OrderLine> lines = new ArrayList<>();");
        assert_eq!(lines.last(), Some(&"}"));
    }

    #[test]
    fn test_enum_outline() {
        let mut descriptor = ClassDescriptor::new("Status", "", DescriptorKind::Enum);
        descriptor.fields.push(FieldDescriptor::new("OPEN", "Status").constant());
        descriptor.fields.push(FieldDescriptor::new("CLOSED", "Status").constant());

        let output = OutlineEmitter::new().emit_class(&descriptor).unwrap();
        assert_eq!(output, "public enum Status {\n    OPEN,\n    CLOSED;\n}\n");
    }

    #[test]
    fn test_service_method_notes() {
        let mut descriptor = ClassDescriptor::new("OrderService", "", DescriptorKind::Service);
        let mut save = MethodDescriptor::new("save", "Order")
            .with_operation(CrudOperation::Save)
            .with_parameter(ParameterDescriptor::new("dto", "OrderDTO"));
        save.resolutions.push(ForeignKeyResolution {
            dto_field: "customerId".to_string(),
            entity_field: "customer".to_string(),
            related_class: "Customer".to_string(),
            lookup: "customerRepository".to_string(),
            not_found: "Customer not found with id: ".to_string(),
            required: true,
        });
        descriptor.methods.push(save);
        descriptor.methods.push(MethodDescriptor::new("findAll", "List<Order>"));

        let output = OutlineEmitter::new().emit_class(&descriptor).unwrap();
        assert!(output.contains("    public Order save(OrderDTO dto) {\n"));
        assert!(output.contains(
            "        // customerId -> customer via customerRepository.findById, else \"Customer not found with id: \" + id\n"
        ));
        assert!(output.contains("    public List<Order> findAll() { ... }\n"));
    }

    #[test]
    fn test_pad_uses_display_width() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("日本", 5), "日本 ");
        assert_eq!(pad("toolong", 3), "toolong");
    }
}
