#![allow(missing_docs)]

pub mod codec;
pub mod fragment;
pub mod i18n;
pub mod id;
pub mod levels;
pub mod model;
pub mod progress;
pub mod selection;
pub mod template;

pub use codec::{ALPHABET, ChunkLayout, CodecError, decode, encode};
pub use fragment::{FragmentStore, SelectionStore};
pub use i18n::{base_lang, normalize_lang, resolve_display};
pub use id::{StableKey, derive_id};
pub use levels::{RatingLevel, RatingScale, ScaleError};
pub use model::{Category, Dialect, DisplayValue, Item, Template};
pub use progress::{Direction, Progress, next_unrated, step};
pub use selection::{
    SelectionEntry, SelectionError, apply_level_indices, find_entry, level_indices,
    resolve_selection, resolve_selection_with_lang, set_rating, stable_key,
};
pub use template::{
    ParseReport, ParseWarning, TemplateError, WarningKind, parse, parse_multilingual,
    parse_plain, parse_report, parse_strict, serialize,
};
