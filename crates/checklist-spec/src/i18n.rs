use std::collections::BTreeMap;

use crate::model::DisplayValue;

/// Canonical form of a language code for lookups: trimmed, `_` as `-`, lower-case.
pub fn normalize_lang(raw: &str) -> String {
    raw.trim().replace('_', "-").to_ascii_lowercase()
}

/// Language part of a code with its region/script subtags stripped (`pt-BR` -> `pt`).
pub fn base_lang(lang: &str) -> &str {
    lang.split(['-', '_']).next().unwrap_or(lang)
}

/// Resolves a display value for `lang`: exact code, then base language, then default.
pub fn resolve_display(value: &DisplayValue, lang: Option<&str>) -> String {
    let DisplayValue::Translated {
        default,
        translations,
    } = value
    else {
        return value.default_text().to_string();
    };
    let Some(requested) = lang.map(normalize_lang).filter(|lang| !lang.is_empty()) else {
        return default.clone();
    };

    lookup_translation(translations, &requested)
        .or_else(|| {
            let base = base_lang(&requested);
            (base != requested)
                .then(|| lookup_translation(translations, base))
                .flatten()
        })
        .unwrap_or(default)
        .to_string()
}

pub(crate) fn lookup_translation<'a>(
    translations: &'a BTreeMap<String, String>,
    lang: &str,
) -> Option<&'a str> {
    if let Some(text) = translations.get(lang) {
        return Some(text);
    }
    // Maps deserialized from outside the parser may carry non-canonical codes.
    translations
        .iter()
        .find(|(code, _)| normalize_lang(code) == lang)
        .map(|(_, text)| text.as_str())
}
