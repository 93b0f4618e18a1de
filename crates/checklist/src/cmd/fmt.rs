use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use checklist_spec::serialize;
use clap::Args;

use super::{Session, TemplateArgs, load_template};

#[derive(Args, Debug, Clone)]
pub struct FmtArgs {
    #[command(flatten)]
    pub template: TemplateArgs,
    /// Keep `+ [XX]` translation overlays in the output
    #[arg(long)]
    pub translations: bool,
    /// Write to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

pub fn run(args: &FmtArgs, session: &Session) -> Result<()> {
    let template = load_template(&args.template, session)?;
    let text = serialize(&template, args.translations);
    match &args.out {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "template written");
        }
        None => print!("{text}"),
    }
    Ok(())
}
