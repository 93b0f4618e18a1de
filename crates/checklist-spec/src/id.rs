use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Derives a camel-cased identifier from display text.
///
/// Only ASCII `a-z` survive lower-casing; every other character (digits,
/// punctuation, whitespace, non-ASCII letters) is dropped and makes the next
/// kept letter upper-case. `"JOI, SI"` becomes `"joiSi"`.
pub fn derive_id(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut new_word = false;
    for ch in input.to_lowercase().chars() {
        if ch.is_ascii_lowercase() {
            if new_word {
                out.push(ch.to_ascii_uppercase());
            } else {
                out.push(ch);
            }
            new_word = false;
        } else {
            new_word = true;
        }
    }
    out
}

/// Language-independent identity of one (category, item, field) cell.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct StableKey {
    pub category: String,
    pub item: String,
    pub field: String,
}

impl StableKey {
    pub fn new(
        category: impl Into<String>,
        item: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            item: item.into(),
            field: field.into(),
        }
    }
}
