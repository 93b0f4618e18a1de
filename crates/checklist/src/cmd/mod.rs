pub mod fmt;
pub mod i18n;
pub mod levels;
pub mod parse;
pub mod rate;
pub mod schema;
pub mod select;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use checklist_spec::{
    Dialect, FragmentStore, ParseReport, RatingScale, SelectionEntry, Template, TemplateError,
    apply_level_indices, parse_report, resolve_selection_with_lang,
};
use clap::{Args, ValueEnum};

use crate::config::ChecklistConfig;

/// Settings shared by every command: config, rating scale, display language.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: ChecklistConfig,
    pub scale: RatingScale,
    pub lang: String,
}

impl Session {
    pub fn new(config: ChecklistConfig, cli_lang: Option<&str>) -> Result<Self> {
        let scale = config.scale()?;
        let lang = i18n::select_lang(cli_lang, config.language.as_deref());
        tracing::debug!(lang = %lang, levels = scale.len(), "session ready");
        Ok(Self {
            config,
            scale,
            lang,
        })
    }

    pub fn dialect(&self, requested: Option<DialectArg>) -> Dialect {
        requested.map_or_else(|| self.config.dialect(), Dialect::from)
    }

    pub fn fragment_store(&self) -> FragmentStore {
        FragmentStore::new(self.scale.clone()).with_lang(self.lang.clone())
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialectArg {
    Plain,
    Multilingual,
}

impl From<DialectArg> for Dialect {
    fn from(value: DialectArg) -> Self {
        match value {
            DialectArg::Plain => Dialect::Plain,
            DialectArg::Multilingual => Dialect::Multilingual,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct TemplateArgs {
    /// Template file, or `-` for stdin
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,
    /// Template dialect (defaults to the configured one)
    #[arg(long, value_enum)]
    pub dialect: Option<DialectArg>,
}

pub fn read_source(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read template from stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Parses the template, failing when nothing usable is left.
pub fn load_report(args: &TemplateArgs, session: &Session) -> Result<ParseReport> {
    let text = read_source(&args.template)?;
    let dialect = session.dialect(args.dialect);
    let report = parse_report(&text, dialect);
    for warning in &report.warnings {
        tracing::debug!(%warning, "template line dropped");
    }
    if report.template.is_empty() {
        return Err(TemplateError::Empty).with_context(|| {
            format!(
                "{}: no usable category (dialect {})",
                args.template.display(),
                dialect.as_str()
            )
        });
    }
    Ok(report)
}

pub fn load_template(args: &TemplateArgs, session: &Session) -> Result<Template> {
    load_report(args, session).map(|report| report.template)
}

/// Resolves the selection for `template`, seeded from a previous JSON export
/// and then from a fragment. Either source may be absent.
pub fn resolve_entries(
    template: &Template,
    session: &Session,
    previous: Option<&Path>,
    fragment: Option<&str>,
) -> Result<Vec<SelectionEntry>> {
    let previous = previous.map(read_previous).transpose()?;
    let mut entries = resolve_selection_with_lang(
        template,
        &session.scale,
        previous.as_deref(),
        Some(&session.lang),
    );
    if let Some(fragment) = fragment {
        match session.fragment_store().decode_indices(fragment) {
            Some(indices) => apply_level_indices(&mut entries, &indices, &session.scale),
            None => tracing::warn!("fragment ignored, starting from defaults"),
        }
    }
    Ok(entries)
}

fn read_previous(path: &Path) -> Result<Vec<SelectionEntry>> {
    let raw = read_source(path)?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a selection export", path.display()))
}
