use tracing::debug;

use crate::codec::{self, ChunkLayout, CodecError};
use crate::levels::RatingScale;
use crate::model::Template;
use crate::selection::{
    SelectionEntry, apply_level_indices, level_indices, resolve_selection_with_lang,
};

/// Persistence port between a selection and its serialized form.
pub trait SelectionStore {
    fn save(&self, entries: &[SelectionEntry]) -> Result<String, CodecError>;
    fn load(&self, text: &str, template: &Template) -> Vec<SelectionEntry>;
}

/// Stores the rating vector in a URL fragment using the positional codec.
#[derive(Debug, Clone)]
pub struct FragmentStore {
    scale: RatingScale,
    lang: Option<String>,
}

impl FragmentStore {
    pub fn new(scale: RatingScale) -> Self {
        Self { scale, lang: None }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn scale(&self) -> &RatingScale {
        &self.scale
    }

    /// Shorter fragments cannot hold a chunk and count as "no saved selection".
    pub fn min_len(&self) -> usize {
        ChunkLayout::for_radix(self.scale.len())
            .map(|layout| layout.chars_per_chunk)
            .unwrap_or(usize::MAX)
    }

    /// Decodes a fragment to level indices; `None` when it is absent or unusable.
    pub fn decode_indices(&self, text: &str) -> Option<Vec<usize>> {
        let text = text.trim().trim_start_matches('#');
        if text.chars().count() < self.min_len() {
            debug!(len = text.len(), "fragment too short, ignoring");
            return None;
        }
        match codec::decode(self.scale.len(), text) {
            Ok(indices) => Some(indices),
            Err(err) => {
                debug!(error = %err, "fragment rejected");
                None
            }
        }
    }
}

impl SelectionStore for FragmentStore {
    fn save(&self, entries: &[SelectionEntry]) -> Result<String, CodecError> {
        codec::encode(self.scale.len(), &level_indices(entries, &self.scale))
    }

    fn load(&self, text: &str, template: &Template) -> Vec<SelectionEntry> {
        let mut entries =
            resolve_selection_with_lang(template, &self.scale, None, self.lang.as_deref());
        if let Some(indices) = self.decode_indices(text) {
            apply_level_indices(&mut entries, &indices, &self.scale);
        }
        entries
    }
}
