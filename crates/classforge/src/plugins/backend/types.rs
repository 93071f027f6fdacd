//! Semantic type tokens to backend types

use crate::core::class_name;

/// Backend type for a semantic attribute type token
///
/// Known scalar tokens map to their boxed JVM types; anything else is taken
/// as the name of a generated class or enum. Generic tokens such as
/// `List<String>` are passed through untouched.
pub fn java_type(token: &str) -> String {
    let token = token.trim();
    if token.contains('<') {
        return token.to_string();
    }
    match token.to_ascii_lowercase().as_str() {
        "" | "string" | "text" | "str" => "String".to_string(),
        "char" | "character" => "Character".to_string(),
        "int" | "integer" | "short" => "Integer".to_string(),
        "long" => "Long".to_string(),
        "double" | "number" => "Double".to_string(),
        "float" => "Float".to_string(),
        "bool" | "boolean" => "Boolean".to_string(),
        "date" | "localdate" => "LocalDate".to_string(),
        "datetime" | "timestamp" | "localdatetime" | "instant" => "LocalDateTime".to_string(),
        "time" | "localtime" => "LocalTime".to_string(),
        "decimal" | "bigdecimal" | "money" => "BigDecimal".to_string(),
        "uuid" => "UUID".to_string(),
        "byte[]" | "bytes" | "blob" => "byte[]".to_string(),
        "void" => "void".to_string(),
        _ => class_name(token),
    }
}

/// Returns true for types that map to a scalar column
pub fn is_scalar(java_type: &str) -> bool {
    matches!(
        java_type,
        "String"
            | "Character"
            | "Integer"
            | "Long"
            | "Double"
            | "Float"
            | "Boolean"
            | "LocalDate"
            | "LocalDateTime"
            | "LocalTime"
            | "BigDecimal"
            | "UUID"
            | "byte[]"
    )
}

/// Source literal for a default value of the given backend type
pub fn literal(java_type: &str, raw: &str) -> String {
    let raw = raw.trim();
    match java_type {
        "String" if !raw.starts_with('"') => format!("\"{}\"", raw.replace('"', "\\\"")),
        "Character" if !raw.starts_with('\'') => format!("'{}'", raw),
        "Long" if !raw.ends_with(['L', 'l']) => format!("{}L", raw),
        "Float" if !raw.ends_with(['F', 'f']) => format!("{}f", raw),
        _ => raw.to_string(),
    }
}
