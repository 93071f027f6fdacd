//! Identifier utilities shared by the analysis passes and builders
//!
//! Labels typed into the diagram editor are free text; everything that ends up
//! in a descriptor goes through these helpers first.

/// Java keywords and literals that cannot be used as identifiers
const RESERVED_WORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

/// Returns true if `word` is a Java keyword or literal
pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// Returns true if `segment` is usable as a Java identifier or package segment
pub fn is_java_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') && !is_reserved_word(segment)
}

/// Split free text into words on separators and case boundaries
///
/// # Example
/// ```
/// use classforge::core::split_words;
///
/// assert_eq!(split_words("order_item"), vec!["order", "item"]);
/// assert_eq!(split_words("URLMapping"), vec!["URL", "Mapping"]);
/// ```
pub fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let lower_to_upper = (prev.is_lowercase() || prev.is_ascii_digit()) && c.is_uppercase();
            let acronym_end = prev.is_uppercase()
                && c.is_uppercase()
                && next.map(|n| n.is_lowercase()).unwrap_or(false);
            if lower_to_upper || acronym_end {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `order item` → `OrderItem`; inner capitals are preserved
pub fn to_pascal_case(text: &str) -> String {
    split_words(text).iter().map(|w| capitalize(w)).collect()
}

/// `Order Item` → `orderItem`
pub fn to_camel_case(text: &str) -> String {
    let words = split_words(text);
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

/// `OrderItem` → `order_item`
pub fn to_snake_case(text: &str) -> String {
    split_words(text)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// `OrderItem` → `order-item`
pub fn to_kebab_case(text: &str) -> String {
    split_words(text)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// English plural of an identifier's last word
///
/// # Example
/// ```
/// use classforge::core::pluralize;
///
/// assert_eq!(pluralize("order"), "orders");
/// assert_eq!(pluralize("category"), "categories");
/// assert_eq!(pluralize("address"), "addresses");
/// ```
pub fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.is_empty() {
        return String::new();
    }
    if lower.ends_with('y') {
        let before = lower.chars().rev().nth(1);
        if before.map(|c| !"aeiou".contains(c)).unwrap_or(false) {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{}es", word);
    }
    format!("{}s", word)
}

/// Class name for a node label
///
/// Empty labels become `Unnamed`; a leading digit gets a `_` prefix.
pub fn class_name(label: &str) -> String {
    let name = to_pascal_case(label);
    if name.is_empty() {
        "Unnamed".to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else {
        name
    }
}

/// Field name for an attribute name or related class name
pub fn field_name(text: &str) -> String {
    let name = to_camel_case(text);
    if name.is_empty() {
        "value".to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else if is_reserved_word(&name) {
        format!("{}_", name)
    } else {
        name
    }
}

/// Collection field name for a related class, e.g. `OrderItem` → `orderItems`
pub fn collection_field_name(class_name: &str) -> String {
    field_name(&pluralize(&to_camel_case(class_name)))
}

/// Name used for collision checks: lower-cased with underscores removed
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Table name for a class, e.g. `OrderItem` → `order_items`
pub fn table_name(class_name: &str) -> String {
    pluralize(&to_snake_case(class_name))
}

/// REST resource path for a class, e.g. `OrderItem` → `/api/order-items`
pub fn resource_path(class_name: &str) -> String {
    format!("/api/{}", pluralize(&to_kebab_case(class_name)))
}

/// Enum constant for a literal, e.g. `in progress` → `IN_PROGRESS`
pub fn constant_name(literal: &str) -> String {
    let name = to_snake_case(literal).to_uppercase();
    if name.is_empty() {
        "UNKNOWN".to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else {
        name
    }
}
