use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use checklist_spec::{Dialect, RatingLevel, RatingScale};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "CHECKLIST_CONFIG";

/// User settings read from `config.toml`.
///
/// ```toml
/// language = "de"
/// dialect = "plain"
///
/// [[levels]]
/// name = "Not Entered"
/// color = "#FFFFFF"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChecklistConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Dialect>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<RatingLevel>,
}

impl ChecklistConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("invalid checklist config")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("in {}", path.display()))
    }

    /// Explicit path, then `$CHECKLIST_CONFIG`, then the per-user config file if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        if let Some(path) = env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
            return Self::from_path(Path::new(&path));
        }
        match default_path() {
            Some(path) if path.is_file() => Self::from_path(&path),
            _ => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Configured levels, or the built-in scale when none are listed.
    pub fn scale(&self) -> Result<RatingScale> {
        if self.levels.is_empty() {
            return Ok(RatingScale::builtin());
        }
        RatingScale::new(self.levels.clone()).context("invalid [[levels]] in config")
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect.unwrap_or_default()
    }
}

pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "checklist").map(|dirs| dirs.config_dir().join("config.toml"))
}
