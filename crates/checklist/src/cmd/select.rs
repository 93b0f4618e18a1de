use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use checklist_spec::{Progress, RatingScale, SelectionEntry, SelectionStore, next_unrated};
use clap::Args;

use super::{Session, TemplateArgs, load_template, resolve_entries};

#[derive(Args, Debug, Clone)]
pub struct SelectArgs {
    #[command(flatten)]
    pub template: TemplateArgs,
    /// Saved fragment (with or without the leading `#`)
    #[arg(long, value_name = "FRAGMENT", allow_hyphen_values = true)]
    pub fragment: Option<String>,
    /// Selection previously exported with `--json`
    #[arg(long, value_name = "PATH")]
    pub previous: Option<PathBuf>,
    /// Print the entries as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &SelectArgs, session: &Session) -> Result<()> {
    let template = load_template(&args.template, session)?;
    let entries = resolve_entries(
        &template,
        session,
        args.previous.as_deref(),
        args.fragment.as_deref(),
    )?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    print!("{}", render_entries(&entries, &session.scale));
    let fragment = session.fragment_store().save(&entries)?;
    println!("fragment: #{fragment}");
    Ok(())
}

pub fn render_entries(entries: &[SelectionEntry], scale: &RatingScale) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = write!(out, "[{}] {}", entry.category, entry.item);
        if entry.show_field {
            let _ = write!(out, " ({})", entry.field);
        }
        let _ = write!(out, ": {}", entry.rating);
        if let Some(comment) = &entry.comment {
            let _ = write!(out, " // {comment}");
        }
        out.push('\n');
    }
    let progress = Progress::of(entries, scale);
    let _ = write!(out, "progress: {}/{} rated", progress.rated, progress.total);
    if let Some(idx) = next_unrated(entries, scale, None) {
        let entry = &entries[idx];
        let _ = write!(out, ", next: [{}] {}", entry.category, entry.item);
    }
    out.push('\n');
    out
}
