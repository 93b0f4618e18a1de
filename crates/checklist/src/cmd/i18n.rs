use std::env;

use unic_langid::LanguageIdentifier;

const FALLBACK_LANG: &str = "en";

fn detect_env_locale() -> Option<String> {
    for key in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(val) = env::var(key) {
            let trimmed = val.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

fn detect_system_locale() -> Option<String> {
    sys_locale::get_locale()
}

/// Cleans a POSIX or BCP 47 locale into a language tag (`de_AT.UTF-8` -> `de-AT`).
pub fn normalize_locale(raw: &str) -> Option<String> {
    let mut cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Some((head, _)) = cleaned.split_once('.') {
        cleaned = head;
    }
    if let Some((head, _)) = cleaned.split_once('@') {
        cleaned = head;
    }
    // POSIX "C"/"POSIX" locales carry no language.
    if cleaned.eq_ignore_ascii_case("c") || cleaned.eq_ignore_ascii_case("posix") {
        return None;
    }
    let cleaned = cleaned.replace('_', "-");
    cleaned
        .parse::<LanguageIdentifier>()
        .ok()
        .map(|lid| lid.to_string())
}

/// Display language: CLI flag, then config, then environment, then system, then `en`.
pub fn select_lang(cli_lang: Option<&str>, config_lang: Option<&str>) -> String {
    for candidate in [cli_lang, config_lang].into_iter().flatten() {
        if let Some(found) = normalize_locale(candidate) {
            return found;
        }
        tracing::debug!(candidate, "ignoring invalid language");
    }
    if let Some(found) = detect_env_locale().as_deref().and_then(normalize_locale) {
        return found;
    }
    if let Some(found) = detect_system_locale().as_deref().and_then(normalize_locale) {
        return found;
    }
    FALLBACK_LANG.to_string()
}
