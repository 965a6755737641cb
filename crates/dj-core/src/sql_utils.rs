//! SQL identifier normalization
//!
//! Generated SQL and `sql_table_name` declarations quote identifiers in
//! whatever style the warehouse dialect uses. Both sides of a comparison are
//! run through [`normalize_table_reference`] so that quoting never decides
//! whether two references match.

/// Characters used to quote identifiers across the supported dialects.
const QUOTE_CHARS: [char; 4] = ['`', '"', '[', ']'];

/// Normalize a raw table reference for comparison.
///
/// Strips identifier quoting, surrounding whitespace and trailing statement
/// punctuation. Dots are preserved, so qualification survives.
///
/// # Examples
/// ```
/// use dj_core::sql_utils::normalize_table_reference;
/// assert_eq!(normalize_table_reference("`proj.ecomm.users`"), "proj.ecomm.users");
/// assert_eq!(normalize_table_reference(r#""public"."users""#), "public.users");
/// assert_eq!(normalize_table_reference(" users ;"), "users");
/// ```
pub fn normalize_table_reference(raw: &str) -> String {
    raw.trim()
        .trim_end_matches([',', ';'])
        .chars()
        .filter(|c| !QUOTE_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Whether a reference is schema-qualified (physical) rather than a bare
/// logical name.
///
/// # Examples
/// ```
/// use dj_core::sql_utils::is_qualified;
/// assert!(is_qualified("public.users"));
/// assert!(!is_qualified("users"));
/// ```
pub fn is_qualified(name: &str) -> bool {
    name.contains('.')
}

/// Whether a normalized reference is a plain identifier path.
///
/// Accepts letters, digits, `_`, `$`, `-` and `.` separators; rejects
/// anything carrying whitespace, parentheses or operators.
pub fn is_identifier_path(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.ends_with('.')
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '-' | '.'))
}

#[cfg(test)]
#[path = "sql_utils_test.rs"]
mod tests;
