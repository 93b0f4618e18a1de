use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use checklist_spec::{SelectionEntry, SelectionStore, set_rating};
use clap::Args;

use super::{Session, TemplateArgs, load_template, resolve_entries};

#[derive(Args, Debug, Clone)]
pub struct RateArgs {
    #[command(flatten)]
    pub template: TemplateArgs,
    /// Fragment to start from (defaults to an empty selection)
    #[arg(long, value_name = "FRAGMENT", allow_hyphen_values = true)]
    pub fragment: Option<String>,
    /// Selection previously exported with `select --json`
    #[arg(long, value_name = "PATH")]
    pub previous: Option<PathBuf>,
    /// `CATEGORY::ITEM[::FIELD]=LEVEL`; without a field every field of the item is rated
    #[arg(long = "set", value_name = "ASSIGNMENT", required = true)]
    pub set: Vec<String>,
}

/// One parsed `--set` value. Names are display names in the session language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub category: String,
    pub item: String,
    pub field: Option<String>,
    pub level: String,
}

impl Assignment {
    pub fn parse(raw: &str) -> Result<Self> {
        let (target, level) = raw
            .rsplit_once('=')
            .ok_or_else(|| anyhow!("`{raw}`: expected CATEGORY::ITEM[::FIELD]=LEVEL"))?;
        let parts: Vec<&str> = target.split("::").map(str::trim).collect();
        let (category, item, field) = match parts.as_slice() {
            [category, item] => (*category, *item, None),
            [category, item, field] => (*category, *item, Some(field.to_string())),
            _ => bail!("`{raw}`: expected CATEGORY::ITEM[::FIELD]=LEVEL"),
        };
        Ok(Self {
            category: category.to_string(),
            item: item.to_string(),
            field,
            level: level.trim().to_string(),
        })
    }

    fn matches(&self, entry: &SelectionEntry) -> bool {
        entry.category == self.category
            && entry.item == self.item
            && self.field.as_ref().is_none_or(|field| *field == entry.field)
    }
}

pub fn run(args: &RateArgs, session: &Session) -> Result<()> {
    let template = load_template(&args.template, session)?;
    let mut entries = resolve_entries(
        &template,
        session,
        args.previous.as_deref(),
        args.fragment.as_deref(),
    )?;
    for raw in &args.set {
        let assignment = Assignment::parse(raw)?;
        let count = apply(&mut entries, &assignment, session)?;
        tracing::debug!(assignment = raw.as_str(), count, "rating applied");
    }
    let fragment = session.fragment_store().save(&entries)?;
    println!("#{fragment}");
    Ok(())
}

/// Rates every entry the assignment names; returns how many changed.
pub fn apply(
    entries: &mut [SelectionEntry],
    assignment: &Assignment,
    session: &Session,
) -> Result<usize> {
    let targets: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| assignment.matches(entry))
        .map(|(idx, _)| idx)
        .collect();
    if targets.is_empty() {
        bail!(
            "no cell named {}::{}{}",
            assignment.category,
            assignment.item,
            assignment
                .field
                .as_deref()
                .map(|field| format!("::{field}"))
                .unwrap_or_default()
        );
    }
    for idx in &targets {
        set_rating(entries, *idx, &assignment.level, &session.scale)
            .with_context(|| format!("cannot rate {}", assignment.item))?;
    }
    Ok(targets.len())
}
