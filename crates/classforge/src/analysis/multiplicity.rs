//! Multiplicity interpretation
//!
//! The only place multiplicity tokens (`1`, `0..1`, `*`, `1..*`, `2..5`) are
//! parsed. Everything else reasons about cardinality through these two
//! predicates.

fn is_unbounded(bound: &str) -> bool {
    matches!(bound, "*" | "n" | "N")
}

/// Returns true if the token allows more than one element
///
/// True for `*`, `0..*`, `1..*`, and any range whose upper bound is unbounded
/// or a number greater than one.
///
/// # Example
/// ```
/// use classforge::analysis::is_many;
///
/// assert!(is_many("*"));
/// assert!(is_many("0..*"));
/// assert!(is_many("2..5"));
/// assert!(!is_many("0..1"));
/// assert!(!is_many("1"));
/// ```
pub fn is_many(token: &str) -> bool {
    let token = token.trim();
    if is_unbounded(token) {
        return true;
    }
    match token.split_once("..") {
        Some((_, upper)) => {
            let upper = upper.trim();
            is_unbounded(upper) || upper.parse::<u64>().map(|n| n > 1).unwrap_or(false)
        }
        None => false,
    }
}

/// Returns true if the token's lower bound is at least one
///
/// # Example
/// ```
/// use classforge::analysis::is_required;
///
/// assert!(is_required("1"));
/// assert!(is_required("1..*"));
/// assert!(!is_required("0..1"));
/// assert!(!is_required("*"));
/// ```
pub fn is_required(token: &str) -> bool {
    let token = token.trim();
    let lower = match token.split_once("..") {
        Some((lower, _)) => lower.trim(),
        None => token,
    };
    lower.parse::<u64>().map(|n| n >= 1).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_many_tokens() {
        for token in ["*", "0..*", "1..*", "n", "0..n", "2..5", " 1..* "] {
            assert!(is_many(token), "{} should be many", token);
        }
    }

    #[test]
    fn test_single_tokens() {
        for token in ["1", "0..1", "1..1", "", "abc", "0..", "5"] {
            assert!(!is_many(token), "{} should be single", token);
        }
    }

    #[test]
    fn test_required_tokens() {
        assert!(is_required("1"));
        assert!(is_required("1..1"));
        assert!(is_required("1..*"));
        assert!(is_required("2..4"));
        assert!(!is_required("0..1"));
        assert!(!is_required("0..*"));
        assert!(!is_required("*"));
        assert!(!is_required(""));
    }

    proptest! {
        #[test]
        fn prop_upper_bound_decides_many(lower in 0u64..10, upper in 0u64..10) {
            let token = format!("{}..{}", lower, upper);
            prop_assert_eq!(is_many(&token), upper > 1);
        }

        #[test]
        fn prop_lower_bound_decides_required(lower in 0u64..10) {
            let token = format!("{}..*", lower);
            prop_assert_eq!(is_required(&token), lower >= 1);
            prop_assert!(is_many(&token));
        }
    }
}
