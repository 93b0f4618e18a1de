use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::{StableKey, derive_id};
use crate::levels::RatingScale;
use crate::model::{Category, Dialect, Template};

/// Rating state of one (category, item, field) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SelectionEntry {
    pub category: String,
    pub item: String,
    pub field: String,
    pub rating: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Whether the UI labels the field; false for single-field categories.
    #[serde(default)]
    pub show_field: bool,
    /// Missing on entries imported from exports that predate stable keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stable: Option<StableKey>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no selection entry at index {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unknown rating level '{0}'")]
    UnknownLevel(String),
}

/// Stable identity of a cell.
///
/// Multilingual templates use the category key plus item and field positions,
/// so switching display language never changes it. Plain templates use the
/// derived ids of the display names.
pub fn stable_key(
    dialect: Dialect,
    category_key: &str,
    category: &Category,
    item_idx: usize,
    field_idx: usize,
) -> StableKey {
    match dialect {
        Dialect::Multilingual => {
            StableKey::new(category_key, item_idx.to_string(), field_idx.to_string())
        }
        Dialect::Plain => StableKey::new(
            derive_id(category.name.default_text()),
            category
                .items
                .get(item_idx)
                .map(|item| derive_id(item.name.default_text()))
                .unwrap_or_default(),
            category
                .fields
                .get(field_idx)
                .map(|field| derive_id(field.default_text()))
                .unwrap_or_default(),
        ),
    }
}

/// Builds the flat selection list in base-language display names.
pub fn resolve_selection(
    template: &Template,
    scale: &RatingScale,
    previous: Option<&[SelectionEntry]>,
) -> Vec<SelectionEntry> {
    resolve_selection_with_lang(template, scale, previous, None)
}

/// Builds the flat selection list, ordered by category, then field, then item.
///
/// Ratings and comments carry over from `previous` entries with the same
/// stable key; previous entries without a key are matched by display names.
/// Everything else starts at the scale's default level.
pub fn resolve_selection_with_lang(
    template: &Template,
    scale: &RatingScale,
    previous: Option<&[SelectionEntry]>,
    lang: Option<&str>,
) -> Vec<SelectionEntry> {
    let mut index = PreviousIndex::new(previous.unwrap_or_default());
    let default_rating = &scale.default_level().name;
    let mut entries = Vec::with_capacity(template.cell_count());

    for (key, category) in template.iter() {
        let category_name = category.name.resolve(lang);
        let show_field = category.shows_fields();
        for (field_idx, field) in category.fields.iter().enumerate() {
            let field_name = field.resolve(lang);
            for (item_idx, item) in category.items.iter().enumerate() {
                let item_name = item.name.resolve(lang);
                let stable = stable_key(template.dialect, key, category, item_idx, field_idx);
                let carried = index.find(&stable, &category_name, &item_name, &field_name);

                let rating = carried
                    .map(|prev| prev.rating.as_str())
                    .filter(|rating| scale.contains(rating))
                    .unwrap_or(default_rating)
                    .to_string();
                entries.push(SelectionEntry {
                    category: category_name.clone(),
                    item: item_name,
                    field: field_name.clone(),
                    rating,
                    comment: carried.and_then(|prev| prev.comment.clone()),
                    show_field,
                    stable: Some(stable),
                });
            }
        }
    }
    entries
}

struct PreviousIndex<'a> {
    by_key: HashMap<&'a StableKey, Vec<&'a SelectionEntry>>,
    by_name: HashMap<(String, String, String), &'a SelectionEntry>,
    // How often each key has been looked up; plain-dialect keys can collide.
    claimed: HashMap<&'a StableKey, usize>,
}

impl<'a> PreviousIndex<'a> {
    fn new(previous: &'a [SelectionEntry]) -> Self {
        let mut by_key: HashMap<&'a StableKey, Vec<&'a SelectionEntry>> = HashMap::new();
        let mut by_name = HashMap::new();
        for entry in previous {
            match &entry.stable {
                Some(key) => by_key.entry(key).or_default().push(entry),
                None => {
                    by_name
                        .entry((
                            entry.category.clone(),
                            entry.item.clone(),
                            entry.field.clone(),
                        ))
                        .or_insert(entry);
                }
            }
        }
        Self {
            by_key,
            by_name,
            claimed: HashMap::new(),
        }
    }

    /// Entry for `key`. Among entries sharing the key, the one with the same
    /// display names wins, then the one at the same occurrence position.
    fn find(
        &mut self,
        key: &StableKey,
        category: &str,
        item: &str,
        field: &str,
    ) -> Option<&'a SelectionEntry> {
        if let Some((stored, candidates)) = self.by_key.get_key_value(key) {
            let occurrence = self.claimed.entry(*stored).or_insert(0);
            let nth = *occurrence;
            *occurrence += 1;
            if let [only] = candidates.as_slice() {
                return Some(*only);
            }
            return candidates
                .iter()
                .find(|entry| {
                    entry.category == category && entry.item == item && entry.field == field
                })
                .or_else(|| candidates.get(nth))
                .or(candidates.first())
                .copied();
        }
        if self.by_name.is_empty() {
            return None;
        }
        self.by_name
            .get(&(category.to_string(), item.to_string(), field.to_string()))
            .copied()
    }
}

/// Rating of every entry as its position in the scale; unknown names map to 0.
pub fn level_indices(entries: &[SelectionEntry], scale: &RatingScale) -> Vec<usize> {
    entries
        .iter()
        .map(|entry| scale.index_of(&entry.rating).unwrap_or(0))
        .collect()
}

/// Re-attaches decoded level indices to entries in flat order.
///
/// Only the first `min(indices, entries)` entries are touched; an index
/// outside the scale leaves its entry unchanged.
pub fn apply_level_indices(entries: &mut [SelectionEntry], indices: &[usize], scale: &RatingScale) {
    if indices.len() != entries.len() {
        tracing::debug!(
            decoded = indices.len(),
            entries = entries.len(),
            "selection length differs from template, clipping"
        );
    }
    for (entry, idx) in entries.iter_mut().zip(indices) {
        if let Some(level) = scale.get(*idx) {
            entry.rating = level.name.clone();
        }
    }
}

pub fn set_rating(
    entries: &mut [SelectionEntry],
    index: usize,
    level: &str,
    scale: &RatingScale,
) -> Result<(), SelectionError> {
    if !scale.contains(level) {
        return Err(SelectionError::UnknownLevel(level.to_string()));
    }
    let len = entries.len();
    let entry = entries
        .get_mut(index)
        .ok_or(SelectionError::IndexOutOfRange { index, len })?;
    entry.rating = level.to_string();
    Ok(())
}

/// Position of the entry with the given display names.
pub fn find_entry(
    entries: &[SelectionEntry],
    category: &str,
    item: &str,
    field: &str,
) -> Option<usize> {
    entries.iter().position(|entry| {
        entry.category == category && entry.item == item && entry.field == field
    })
}
