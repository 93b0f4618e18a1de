use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::derive_id;

/// One step of the rating scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RatingLevel {
    pub name: String,
    pub color: String,
    /// CSS-safe class; derived from `name` when left empty.
    #[serde(default)]
    pub style_class: String,
}

impl RatingLevel {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            style_class: derive_id(&name),
            name,
            color: color.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScaleError {
    #[error("rating scale needs at least one level")]
    Empty,
    #[error("duplicate rating level '{name}'")]
    DuplicateLevel { name: String },
}

/// Ordered rating levels. The first level is the default (unset) rating and
/// the level count is the radix of the fragment codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RatingLevel>", into = "Vec<RatingLevel>")]
pub struct RatingScale {
    levels: Vec<RatingLevel>,
}

impl RatingScale {
    pub fn new(levels: Vec<RatingLevel>) -> Result<Self, ScaleError> {
        if levels.is_empty() {
            return Err(ScaleError::Empty);
        }
        let mut seen = BTreeSet::new();
        let mut levels = levels;
        for level in &mut levels {
            if !seen.insert(level.name.clone()) {
                return Err(ScaleError::DuplicateLevel {
                    name: level.name.clone(),
                });
            }
            if level.style_class.is_empty() {
                level.style_class = derive_id(&level.name);
            }
        }
        Ok(Self { levels })
    }

    /// The stock scale: Not Entered, Favorite, Like, Okay, Maybe, No.
    pub fn builtin() -> Self {
        Self {
            levels: vec![
                RatingLevel::new("Not Entered", "#FFFFFF"),
                RatingLevel::new("Favorite", "#6DB5FE"),
                RatingLevel::new("Like", "#23FD22"),
                RatingLevel::new("Okay", "#FDFD6B"),
                RatingLevel::new("Maybe", "#DB6C00"),
                RatingLevel::new("No", "#920000"),
            ],
        }
    }

    pub fn default_level(&self) -> &RatingLevel {
        &self.levels[0]
    }

    pub fn is_default(&self, name: &str) -> bool {
        self.default_level().name == name
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.levels.iter().position(|level| level.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn get(&self, index: usize) -> Option<&RatingLevel> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RatingLevel> {
        self.levels.iter()
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<RatingLevel>> for RatingScale {
    type Error = ScaleError;

    fn try_from(levels: Vec<RatingLevel>) -> Result<Self, Self::Error> {
        Self::new(levels)
    }
}

impl From<RatingScale> for Vec<RatingLevel> {
    fn from(scale: RatingScale) -> Self {
        scale.levels
    }
}
