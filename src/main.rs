//! docl10n - Translation workflow for generated API documentation
//!
//! Extracts translatable text into staging snapshots and injects approved
//! translations back into the documentation tree.

use anyhow::Result;
use docl10n::cli::{
    generate, init, inject, print_generate_text, print_injection_text, print_json,
    print_outcome_text, print_status_text, run, status, strip, Cli, Commands, OutputFormat,
};
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let project_root = Path::new(&cli.path);

    match cli.command {
        Commands::Init(args) => {
            let path = init(project_root, &args.target, args.force)?;
            println!("✓ Wrote {:?}", path);
        }

        Commands::Generate(args) => {
            let report = generate(project_root, &args.tree, &args.target)?;

            match cli.format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Text => print_generate_text(&report),
            }
        }

        Commands::Inject(args) => {
            let report = inject(project_root, &args.tree, &args.target)?;

            match cli.format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Text => print_injection_text(&report, args.diff),
            }
        }

        Commands::Strip(args) => {
            strip(project_root, &args.tree)?;

            if cli.format == OutputFormat::Text {
                println!("✓ Stripped translatable tags");
            }
        }

        Commands::Run(args) => {
            let outcome = run(project_root, &args.tree, &args.target, args.mode.as_deref())?;

            match cli.format {
                OutputFormat::Json => print_json(&outcome)?,
                OutputFormat::Text => print_outcome_text(&outcome),
            }
        }

        Commands::Status(args) => {
            let report = status(project_root, &args.target)?;

            match cli.format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Text => print_status_text(&report),
            }
        }
    }

    Ok(())
}
