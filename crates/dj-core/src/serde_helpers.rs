//! Shared serde helpers for loosely-typed feed fields.
//!
//! BI service exports are inconsistent about ids: the same column arrives as
//! a JSON number in one export and a string in another.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::String(s) => s,
            StringOrNumber::Unsigned(n) => n.to_string(),
            StringOrNumber::Signed(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

/// Deserialize an optional id that may be a string, a number or null.
///
/// Blank strings map to `None`.
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(raw
        .map(StringOrNumber::into_string)
        .filter(|s| !s.trim().is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldList {
    List(Vec<String>),
    Encoded(String),
}

/// Deserialize a field list given either as an array or as a JSON-encoded
/// array inside a string (`"[\"a.b\", \"a.c\"]"`).
pub fn field_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<FieldList>::deserialize(deserializer)?;
    Ok(match raw {
        None => Vec::new(),
        Some(FieldList::List(list)) => list,
        Some(FieldList::Encoded(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<Vec<String>>(trimmed).unwrap_or_else(|_| {
                    trimmed
                        .split(',')
                        .map(|f| f.trim().to_string())
                        .filter(|f| !f.is_empty())
                        .collect()
                })
            }
        }
    })
}
