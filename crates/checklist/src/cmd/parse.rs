use std::fmt::Write as _;

use anyhow::{Result, bail};
use checklist_spec::{ParseWarning, Template};
use clap::Args;

use super::{Session, TemplateArgs, load_report};

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    #[command(flatten)]
    pub template: TemplateArgs,
    /// Treat dropped lines and discarded categories as errors
    #[arg(long)]
    pub strict: bool,
    /// Print the parsed template as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &ParseArgs, session: &Session) -> Result<()> {
    let report = load_report(&args.template, session)?;
    emit_warnings(&report.warnings);
    if args.strict && !report.is_clean() {
        bail!(
            "checklist-parse: {} warning(s) treated as errors (--strict)",
            report.warnings.len()
        );
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.template)?);
    } else {
        print!("{}", render_summary(&report.template, Some(&session.lang)));
    }
    Ok(())
}

pub fn emit_warnings(warnings: &[ParseWarning]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

/// Human-readable outline of a template in the given language.
pub fn render_summary(template: &Template, lang: Option<&str>) -> String {
    let mut out = String::new();
    for (key, category) in template.iter() {
        let _ = writeln!(
            out,
            "{} [{}] ({} field(s), {} item(s))",
            category.name.resolve(lang),
            key,
            category.fields.len(),
            category.items.len()
        );
        let fields: Vec<String> = category.fields.iter().map(|f| f.resolve(lang)).collect();
        let _ = writeln!(out, "  fields: {}", fields.join(", "));
        for item in &category.items {
            match item.description_text(lang) {
                Some(description) => {
                    let _ = writeln!(out, "  - {}: {}", item.name.resolve(lang), description);
                }
                None => {
                    let _ = writeln!(out, "  - {}", item.name.resolve(lang));
                }
            }
        }
    }
    let _ = writeln!(
        out,
        "{} categories, {} cells",
        template.len(),
        template.cell_count()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use checklist_spec::parse_multilingual;

    #[test]
    fn summary_resolves_language() {
        let template = parse_multilingual(
            "#Basics\n+ [DE] #Grundlagen\n(General)\n* Kissing\n? lips\n+ [DE] ? Lippen\n",
        );
        let summary = render_summary(&template, Some("de-AT"));
        assert!(summary.starts_with("Grundlagen [Basics] (1 field(s), 1 item(s))\n"));
        assert!(summary.contains("  - Kissing: Lippen\n"));
        assert!(summary.ends_with("1 categories, 1 cells\n"));
    }
}
