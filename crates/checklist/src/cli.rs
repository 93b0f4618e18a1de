use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{
    self, Session, fmt::FmtArgs, levels::LevelsArgs, parse::ParseArgs, rate::RateArgs,
    schema::SchemaArgs, select::SelectArgs,
};
use crate::config::ChecklistConfig;

#[derive(Parser, Debug)]
#[command(
    name = "checklist",
    about = "Parse checklist templates and manage rating selections",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file (overrides $CHECKLIST_CONFIG and the per-user default)
    #[arg(long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Display language for translated templates
    #[arg(long = "lang", value_name = "LANG", global = true)]
    lang: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a template and print its outline
    Parse(ParseArgs),
    /// Rewrite a template in canonical form
    Fmt(FmtArgs),
    /// Resolve the selection for a template
    Select(SelectArgs),
    /// Set ratings and print the resulting fragment
    Rate(RateArgs),
    /// Show the active rating scale
    Levels(LevelsArgs),
    /// Print the JSON schema of templates or selections
    Schema(SchemaArgs),
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ChecklistConfig::load(cli.config.as_deref())?;
    let session = Session::new(config, cli.lang.as_deref())?;
    match cli.command {
        Commands::Parse(args) => cmd::parse::run(&args, &session),
        Commands::Fmt(args) => cmd::fmt::run(&args, &session),
        Commands::Select(args) => cmd::select::run(&args, &session),
        Commands::Rate(args) => cmd::rate::run(&args, &session),
        Commands::Levels(args) => cmd::levels::run(&args, &session),
        Commands::Schema(args) => cmd::schema::run(&args),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::DialectArg;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "checklist",
            "parse",
            "list.txt",
            "--strict",
            "--lang",
            "de",
            "-v",
        ])
        .expect("expected CLI to parse");
        assert_eq!(cli.lang.as_deref(), Some("de"));
        assert!(cli.verbose);
        match cli.command {
            Commands::Parse(args) => {
                assert!(args.strict);
                assert!(!args.json);
                assert_eq!(args.template.template, PathBuf::from("list.txt"));
                assert_eq!(args.template.dialect, None);
            }
            _ => panic!("expected parse args"),
        }
    }

    #[test]
    fn parses_rate_assignments() {
        let cli = Cli::try_parse_from([
            "checklist",
            "--config",
            "cfg.toml",
            "rate",
            "list.txt",
            "--dialect",
            "plain",
            "--fragment",
            "#aaaaaaab",
            "--set",
            "Basics::Kissing=Like",
            "--set",
            "Fluids::Blood::General=No",
        ])
        .expect("expected CLI to parse");
        assert_eq!(cli.config, Some(PathBuf::from("cfg.toml")));
        match cli.command {
            Commands::Rate(args) => {
                assert_eq!(args.template.dialect, Some(DialectArg::Plain));
                assert_eq!(args.fragment.as_deref(), Some("#aaaaaaab"));
                assert_eq!(args.set.len(), 2);
            }
            _ => panic!("expected rate args"),
        }
    }

    #[test]
    fn rate_requires_an_assignment() {
        assert!(Cli::try_parse_from(["checklist", "rate", "list.txt"]).is_err());
    }

    #[test]
    fn schema_defaults_to_template() {
        let cli = Cli::try_parse_from(["checklist", "schema"]).expect("expected CLI to parse");
        match cli.command {
            Commands::Schema(args) => {
                assert_eq!(args.kind, cmd::schema::SchemaKind::Template)
            }
            _ => panic!("expected schema args"),
        }
    }
}
