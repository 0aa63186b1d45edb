//! CLI interface using clap
//!
//! Provides the command-line interface for docl10n

mod commands;

pub use commands::*;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// docl10n - Translation workflow for generated API documentation
#[derive(Parser, Debug)]
#[command(name = "docl10n")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the project root (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    pub path: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a docl10n.toml with the default settings
    Init(InitArgs),

    /// Extract translatable text and update the staging snapshot
    Generate(GenerateArgs),

    /// Apply the staging snapshot to a documentation tree
    Inject(InjectArgs),

    /// Remove translatable tags from a documentation tree
    Strip(StripArgs),

    /// Run the mode named by --mode or the settings file
    Run(RunArgs),

    /// Show translation progress for a language
    Status(StatusArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Which snapshots to work on
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Target language code (overrides l10n_code from docl10n.toml)
    #[arg(short, long, env = "DOCL10N_LANG")]
    pub lang: Option<String>,

    /// Translations directory (overrides translations_dir from docl10n.toml)
    #[arg(long, env = "DOCL10N_TRANSLATIONS_DIR")]
    pub translations_dir: Option<PathBuf>,
}

/// The documentation tree to read and where to write it
#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    /// Project JSON produced by the documentation tool
    pub project: PathBuf,

    /// Write the resulting tree here instead of in place
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite an existing docl10n.toml
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Arguments for generate command
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Arguments for inject command
#[derive(Parser, Debug)]
pub struct InjectArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Print the word diff of every stale entry
    #[arg(short, long)]
    pub diff: bool,
}

/// Arguments for strip command
#[derive(Parser, Debug)]
pub struct StripArgs {
    #[command(flatten)]
    pub tree: TreeArgs,
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Mode: generate, inject, strip or default; anything else generates
    #[arg(short, long, env = "DOCL10N_MODE")]
    pub mode: Option<String>,
}

/// Arguments for status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_accepts_unknown_mode() {
        let cli = Cli::try_parse_from([
            "docl10n", "run", "docs.json", "--mode", "whatever", "--lang", "fr",
        ])
        .unwrap();

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.mode.as_deref(), Some("whatever"));
                assert_eq!(args.target.lang.as_deref(), Some("fr"));
                assert_eq!(args.tree.project, PathBuf::from("docs.json"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_format_after_subcommand() {
        let cli = Cli::try_parse_from(["docl10n", "status", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(!cli.verbose);
    }
}
