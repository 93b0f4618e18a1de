mod parse;
mod serialize;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub use parse::{parse, parse_multilingual, parse_plain, parse_report, parse_strict};
pub use serialize::serialize;

use crate::model::Template;

/// Errors a host raises on top of the forgiving parser.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template contains no category with at least one field and one item")]
    Empty,
    #[error("{count} template line(s) were dropped; first: {first}")]
    Strict { count: usize, first: String },
}

/// Something the parser skipped, tagged with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    pub line: usize,
    #[serde(flatten)]
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    /// Line with no recognized prefix.
    UnknownLine,
    /// Fields, item or description line with nothing to attach to.
    OutOfContext,
    /// Translation overlay whose target construct has not appeared yet.
    OrphanOverlay { lang: String },
    FieldCountMismatch {
        lang: String,
        expected: usize,
        found: usize,
    },
    DiscardedCategory {
        name: String,
        fields: usize,
        items: usize,
    },
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::UnknownLine => write!(f, "unrecognized line"),
            WarningKind::OutOfContext => write!(f, "line has no category or item to attach to"),
            WarningKind::OrphanOverlay { lang } => {
                write!(f, "[{lang}] translation has no target yet")
            }
            WarningKind::FieldCountMismatch {
                lang,
                expected,
                found,
            } => write!(
                f,
                "[{lang}] field translation has {found} field(s), category has {expected}"
            ),
            WarningKind::DiscardedCategory {
                name,
                fields,
                items,
            } => write!(
                f,
                "category '{name}' discarded ({fields} field(s), {items} item(s))"
            ),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// Template plus everything the parser dropped while building it.
#[derive(Debug, Clone)]
pub struct ParseReport {
    pub template: Template,
    pub warnings: Vec<ParseWarning>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
