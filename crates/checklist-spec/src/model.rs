use std::collections::BTreeMap;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::i18n::{lookup_translation, normalize_lang, resolve_display};
use crate::template::TemplateError;

/// Display text: either a single string or a default plus per-language overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DisplayValue {
    Plain(String),
    Translated {
        default: String,
        #[serde(default)]
        translations: BTreeMap<String, String>,
    },
}

impl DisplayValue {
    /// Text in the template's base language.
    pub fn default_text(&self) -> &str {
        match self {
            DisplayValue::Plain(text) => text,
            DisplayValue::Translated { default, .. } => default,
        }
    }

    pub fn translation(&self, lang: &str) -> Option<&str> {
        match self {
            DisplayValue::Plain(_) => None,
            DisplayValue::Translated { translations, .. } => {
                lookup_translation(translations, &normalize_lang(lang))
            }
        }
    }

    pub fn translations(&self) -> impl Iterator<Item = (&str, &str)> {
        let map = match self {
            DisplayValue::Plain(_) => None,
            DisplayValue::Translated { translations, .. } => Some(translations),
        };
        map.into_iter()
            .flatten()
            .map(|(lang, text)| (lang.as_str(), text.as_str()))
    }

    pub fn has_translations(&self) -> bool {
        self.translations().next().is_some()
    }

    /// Attaches an override for `lang`, promoting a plain value when needed.
    pub fn add_translation(&mut self, lang: &str, text: impl Into<String>) {
        if let DisplayValue::Plain(default) = self {
            *self = DisplayValue::Translated {
                default: std::mem::take(default),
                translations: BTreeMap::new(),
            };
        }
        if let DisplayValue::Translated { translations, .. } = self {
            translations.insert(normalize_lang(lang), text.into());
        }
    }

    pub fn resolve(&self, lang: Option<&str>) -> String {
        resolve_display(self, lang)
    }
}

impl From<&str> for DisplayValue {
    fn from(value: &str) -> Self {
        DisplayValue::Plain(value.to_string())
    }
}

impl From<String> for DisplayValue {
    fn from(value: String) -> Self {
        DisplayValue::Plain(value)
    }
}

/// A single checklist entry inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Item {
    pub name: DisplayValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<DisplayValue>,
}

impl Item {
    pub fn new(name: impl Into<DisplayValue>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<DisplayValue>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Description text for `lang`, or `None` when it resolves to nothing.
    pub fn description_text(&self, lang: Option<&str>) -> Option<String> {
        self.description
            .as_ref()
            .map(|description| description.resolve(lang))
            .filter(|text| !text.is_empty())
    }
}

/// A named group of items sharing one list of rating columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Category {
    pub name: DisplayValue,
    pub fields: Vec<DisplayValue>,
    pub items: Vec<Item>,
}

impl Category {
    /// Whether the rating UI has to label each field: only categories with two or more.
    pub fn shows_fields(&self) -> bool {
        self.fields.len() >= 2
    }
}

/// The two template dialects. Multilingual accepts `+ [XX]` overlay lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    Plain,
    #[default]
    Multilingual,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Plain => "plain",
            Dialect::Multilingual => "multilingual",
        }
    }
}

/// Parsed template: categories in order of appearance, keyed by category key.
///
/// For the plain dialect the key is the display name; for the multilingual
/// dialect it is the parser-assigned unique key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Template {
    #[serde(default)]
    pub dialect: Dialect,
    pub categories: IndexMap<String, Category>,
}

impl Template {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            categories: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.categories.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Category)> {
        self.categories
            .iter()
            .map(|(key, category)| (key.as_str(), category))
    }

    /// Number of (category, item, field) cells, i.e. the length of a resolved selection.
    pub fn cell_count(&self) -> usize {
        self.categories
            .values()
            .map(|category| category.fields.len() * category.items.len())
            .sum()
    }

    /// Rejects a template that produced no usable category.
    pub fn ensure_non_empty(self) -> Result<Self, TemplateError> {
        if self.is_empty() {
            return Err(TemplateError::Empty);
        }
        Ok(self)
    }
}
