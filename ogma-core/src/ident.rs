
//! Identifier validation and escaping for generated Cypher.
//!
//! Property keys supplied through the query surface are caller-controlled
//! strings; they are validated against the plain Cypher identifier grammar
//! before they are ever interpolated into statement text. Labels, which may
//! legitimately contain unusual characters, are backtick-escaped instead.

use crate::error::OgmaError;

/// Check if a string is a plain Cypher identifier.
///
/// Plain identifiers start with a letter or underscore and contain only
/// letters, digits, and underscores.
pub fn is_valid_identifier(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }

    let mut chars = s.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };

    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate a property key used in a filter or update expression.
///
/// Anything that is not a plain identifier is rejected with
/// [`OgmaError::Expression`] — the key would otherwise be interpolated into
/// statement text, which is the injection boundary.
pub fn validate_property(s: &str) -> Result<&str, OgmaError> {
    if is_valid_identifier(s) {
        Ok(s)
    } else {
        Err(OgmaError::Expression(format!(
            "'{s}' is not a plain property identifier"
        )))
    }
}

/// Render a label for use in a node pattern, backtick-escaped when needed.
pub fn pattern_label(s: &str) -> String {
    if is_valid_identifier(s) {
        s.to_string()
    } else {
        format!("`{}`", s.replace('`', "``"))
    }
}

/// Convert an arbitrary label into a parameter-name-safe identifier.
///
/// Replaces invalid characters with underscores and ensures the first
/// character is valid.
pub fn param_ident(s: &str) -> String {
    if s.is_empty() {
        return "_".to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    let first = match chars.next() {
        Some(c) => c,
        None => return "_".to_string(),
    };

    if first.is_ascii_alphabetic() || first == '_' {
        result.push(first);
    } else if first.is_ascii_digit() {
        result.push('_');
        result.push(first);
    } else {
        result.push('_');
    }

    for c in chars {
        if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
        } else {
            result.push('_');
        }
    }

    result
}
