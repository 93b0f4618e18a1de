use std::fmt::Write as _;

use anyhow::Result;
use checklist_spec::RatingScale;
use clap::Args;

use super::Session;

#[derive(Args, Debug, Clone, Default)]
pub struct LevelsArgs {
    /// Print the scale as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &LevelsArgs, session: &Session) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&session.scale)?);
    } else {
        print!("{}", render_table(&session.scale));
    }
    Ok(())
}

pub fn render_table(scale: &RatingScale) -> String {
    let width = scale.iter().map(|level| level.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (idx, level) in scale.iter().enumerate() {
        let _ = writeln!(
            out,
            "{idx}  {:<width$}  {}  {}",
            level.name, level.color, level.style_class
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_lists_every_level() {
        let table = render_table(&RatingScale::builtin());
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "0  Not Entered  #FFFFFF  notEntered");
        assert!(lines[5].starts_with("5  No  "));
    }
}
