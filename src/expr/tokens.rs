//! Identifier extraction for mode gating.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches identifier tokens: function names and named constants.
    static ref IDENTIFIER: Regex = Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap();
}

/// Collect the distinct identifier tokens of an expression.
///
/// Digits, operators, and parentheses are ignored; `pi` and `e` come back
/// just like function names and it is the mode gate's job to decide what is
/// allowed.
pub fn function_tokens(expr: &str) -> BTreeSet<String> {
    IDENTIFIER
        .find_iter(expr)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_function_names() {
        let tokens = function_tokens("sin(90)+log10(100)*pi");
        assert!(tokens.contains("sin"));
        assert!(tokens.contains("log10"));
        assert!(tokens.contains("pi"));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_plain_arithmetic_has_no_tokens() {
        assert!(function_tokens("2*(3+4)/5.5").is_empty());
    }

    #[test]
    fn test_duplicates_deduplicated() {
        assert_eq!(function_tokens("sin(1)+sin(2)").len(), 1);
    }
}
