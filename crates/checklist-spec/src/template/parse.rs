use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use super::{ParseReport, ParseWarning, TemplateError, WarningKind};
use crate::model::{Category, Dialect, DisplayValue, Item, Template};

static OVERLAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+\s*\[([A-Za-z]{2})\]\s*(.*)$").expect("valid overlay pattern"));

/// Parses template text with the given dialect. Never fails: unusable lines
/// and incomplete categories are dropped.
pub fn parse(text: &str, dialect: Dialect) -> Template {
    parse_report(text, dialect).template
}

pub fn parse_plain(text: &str) -> Template {
    parse(text, Dialect::Plain)
}

pub fn parse_multilingual(text: &str) -> Template {
    parse(text, Dialect::Multilingual)
}

/// Parses and keeps a record of every dropped line and discarded category.
/// A leading byte order mark is ignored.
pub fn parse_report(text: &str, dialect: Dialect) -> ParseReport {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut builder = Builder::new(dialect);
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        builder.line(idx + 1, line);
    }
    builder.finish()
}

/// Like [`parse`], but any dropped line or discarded category is an error.
pub fn parse_strict(text: &str, dialect: Dialect) -> Result<Template, TemplateError> {
    let report = parse_report(text, dialect);
    if report.is_clean() {
        return Ok(report.template);
    }
    Err(TemplateError::Strict {
        count: report.warnings.len(),
        first: report
            .warnings
            .first()
            .map(ToString::to_string)
            .unwrap_or_default(),
    })
}

enum Line<'a> {
    Category(&'a str),
    Fields(Vec<&'a str>),
    Item(&'a str),
    Description(&'a str),
    Unknown,
}

fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix('#') {
        Line::Category(rest.trim())
    } else if let Some(rest) = line.strip_prefix('(') {
        let rest = rest.strip_suffix(')').unwrap_or(rest);
        Line::Fields(rest.split(',').map(str::trim).collect())
    } else if let Some(rest) = line.strip_prefix('*') {
        Line::Item(rest.trim())
    } else if let Some(rest) = line.strip_prefix('?') {
        Line::Description(rest.trim())
    } else {
        Line::Unknown
    }
}

struct OpenCategory {
    name: DisplayValue,
    fields: Vec<DisplayValue>,
    items: Vec<Item>,
    line: usize,
}

struct Builder {
    dialect: Dialect,
    categories: IndexMap<String, Category>,
    current: Option<OpenCategory>,
    warnings: Vec<ParseWarning>,
}

impl Builder {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            categories: IndexMap::new(),
            current: None,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, line: usize, kind: WarningKind) {
        trace!(line, %kind, "template line dropped");
        self.warnings.push(ParseWarning { line, kind });
    }

    fn line(&mut self, number: usize, line: &str) {
        if self.dialect == Dialect::Multilingual
            && let Some(caps) = OVERLAY.captures(line)
        {
            let lang = caps[1].to_ascii_lowercase();
            let rest = caps.get(2).map_or("", |m| m.as_str());
            self.overlay(number, &lang, rest);
            return;
        }

        match classify(line) {
            Line::Category(name) => {
                self.close_category();
                self.current = Some(OpenCategory {
                    name: DisplayValue::from(name),
                    fields: Vec::new(),
                    items: Vec::new(),
                    line: number,
                });
            }
            Line::Fields(fields) => match self.current.as_mut() {
                Some(current) => {
                    current.fields = fields.into_iter().map(DisplayValue::from).collect();
                }
                None => self.warn(number, WarningKind::OutOfContext),
            },
            Line::Item(name) => match self.current.as_mut() {
                Some(current) => current.items.push(Item::new(name)),
                None => self.warn(number, WarningKind::OutOfContext),
            },
            Line::Description(text) => {
                match self
                    .current
                    .as_mut()
                    .and_then(|current| current.items.last_mut())
                {
                    Some(item) => {
                        item.description = (!text.is_empty()).then(|| DisplayValue::from(text));
                    }
                    None => self.warn(number, WarningKind::OutOfContext),
                }
            }
            Line::Unknown => self.warn(number, WarningKind::UnknownLine),
        }
    }

    fn overlay(&mut self, number: usize, lang: &str, rest: &str) {
        let orphan = || WarningKind::OrphanOverlay {
            lang: lang.to_string(),
        };
        let Some(current) = self.current.as_mut() else {
            let kind = match classify(rest) {
                Line::Unknown => WarningKind::UnknownLine,
                _ => orphan(),
            };
            self.warn(number, kind);
            return;
        };

        match classify(rest) {
            Line::Category(name) => current.name.add_translation(lang, name),
            Line::Fields(fields) => {
                if fields.len() != current.fields.len() {
                    debug!(
                        line = number,
                        lang,
                        expected = current.fields.len(),
                        found = fields.len(),
                        "field translation ignored"
                    );
                    let expected = current.fields.len();
                    self.warn(
                        number,
                        WarningKind::FieldCountMismatch {
                            lang: lang.to_string(),
                            expected,
                            found: fields.len(),
                        },
                    );
                    return;
                }
                for (field, text) in current.fields.iter_mut().zip(fields) {
                    field.add_translation(lang, text);
                }
            }
            Line::Item(name) => match current.items.last_mut() {
                Some(item) => item.name.add_translation(lang, name),
                None => self.warn(number, orphan()),
            },
            Line::Description(text) => match current.items.last_mut() {
                Some(item) => item
                    .description
                    .get_or_insert_with(|| DisplayValue::from(""))
                    .add_translation(lang, text),
                None => self.warn(number, orphan()),
            },
            Line::Unknown => self.warn(number, WarningKind::UnknownLine),
        }
    }

    fn close_category(&mut self) {
        let Some(open) = self.current.take() else {
            return;
        };
        if open.fields.is_empty() || open.items.is_empty() {
            debug!(
                name = open.name.default_text(),
                fields = open.fields.len(),
                items = open.items.len(),
                "discarding incomplete category"
            );
            self.warn(
                open.line,
                WarningKind::DiscardedCategory {
                    name: open.name.default_text().to_string(),
                    fields: open.fields.len(),
                    items: open.items.len(),
                },
            );
            return;
        }

        let key = match self.dialect {
            Dialect::Plain => open.name.default_text().to_string(),
            Dialect::Multilingual => self.unique_key(open.name.default_text()),
        };
        self.categories.insert(
            key,
            Category {
                name: open.name,
                fields: open.fields,
                items: open.items,
            },
        );
    }

    fn unique_key(&self, name: &str) -> String {
        if !self.categories.contains_key(name) {
            return name.to_string();
        }
        (2..)
            .map(|n| format!("{name}#{n}"))
            .find(|candidate| !self.categories.contains_key(candidate))
            .unwrap_or_else(|| name.to_string())
    }

    fn finish(mut self) -> ParseReport {
        self.close_category();
        self.warnings.sort_by_key(|warning| warning.line);
        ParseReport {
            template: Template {
                dialect: self.dialect,
                categories: self.categories,
            },
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_strips_single_parenthesis() {
        match classify("(a, b))") {
            Line::Fields(fields) => assert_eq!(fields, vec!["a", "b)"]),
            _ => panic!("expected fields line"),
        }
    }

    #[test]
    fn overlay_pattern_requires_two_letter_code() {
        assert!(OVERLAY.is_match("+ [DE] #Name"));
        assert!(OVERLAY.is_match("+[de]* Name"));
        assert!(!OVERLAY.is_match("+ [DEU] #Name"));
        assert!(!OVERLAY.is_match("+ DE #Name"));
    }

    #[test]
    fn repeated_names_get_suffixed_keys() {
        let template = parse_multilingual("#A\n(x)\n* 1\n#A\n(x)\n* 2\n#A\n(x)\n* 3\n");
        let keys: Vec<_> = template.categories.keys().cloned().collect();
        assert_eq!(keys, vec!["A", "A#2", "A#3"]);
    }
}
