//! Command implementations

use super::{TargetArgs, TreeArgs};
use crate::config::{Settings, SETTINGS_FILE};
use crate::extract::Walker;
use crate::inject::{InjectionReport, WarningKind, REGENERATE_HINT};
use crate::model::Reflection;
use crate::pipeline::{self, GenerateReport, Mode, Outcome, StatusReport};
use crate::snapshot::SnapshotStore;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings and collaborators resolved for one invocation
pub struct Project {
    pub root: PathBuf,
    pub settings: Settings,
    pub lang: String,
    pub store: SnapshotStore,
    pub walker: Walker,
}

impl Project {
    /// Load `docl10n.toml` from `root` and apply the command line overrides
    pub fn open(root: &Path, target: &TargetArgs) -> Result<Self> {
        let mut settings = Settings::load_or_default(root)?;
        apply_overrides(&mut settings, target);

        let store = SnapshotStore::new(
            settings.translations_root(root),
            settings.readme_path(root),
        );
        let walker = Walker::new(settings.tags.clone()).with_max_depth(settings.max_depth);

        debug!("Using settings {:?}", settings);

        Ok(Self {
            root: root.to_path_buf(),
            lang: settings.l10n_code.clone(),
            settings,
            store,
            walker,
        })
    }
}

fn apply_overrides(settings: &mut Settings, target: &TargetArgs) {
    if let Some(ref lang) = target.lang {
        settings.l10n_code = lang.clone();
    }
    if let Some(ref dir) = target.translations_dir {
        settings.translations_dir = dir.clone();
    }
}

/// Write default settings plus any command line overrides
pub fn init(root: &Path, target: &TargetArgs, force: bool) -> Result<PathBuf> {
    let settings_path = root.join(SETTINGS_FILE);
    if settings_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            SETTINGS_FILE
        );
    }

    let mut settings = Settings::default();
    apply_overrides(&mut settings, target);
    settings.save(root)?;

    Ok(settings_path)
}

fn load_tree(tree: &TreeArgs) -> Result<Reflection> {
    Reflection::load(&tree.project)
}

fn write_tree(project: &Reflection, tree: &TreeArgs) -> Result<PathBuf> {
    let target = tree.output.clone().unwrap_or_else(|| tree.project.clone());
    project
        .save(&target)
        .with_context(|| format!("Failed to write documentation tree: {:?}", target))?;
    Ok(target)
}

/// Extract and update the staging snapshot
///
/// The stripped tree is only written when `--output` is given.
pub fn generate(root: &Path, tree: &TreeArgs, target: &TargetArgs) -> Result<GenerateReport> {
    let project = Project::open(root, target)?;
    let mut docs = load_tree(tree)?;

    let report = pipeline::generate(&mut docs, &project.store, &project.lang, &project.walker)?;

    if tree.output.is_some() {
        write_tree(&docs, tree)?;
    }

    Ok(report)
}

/// Apply the staging snapshot and write the tree
pub fn inject(root: &Path, tree: &TreeArgs, target: &TargetArgs) -> Result<InjectionReport> {
    let project = Project::open(root, target)?;
    let mut docs = load_tree(tree)?;

    let report = pipeline::inject(&mut docs, &project.store, &project.lang, &project.walker)?;
    write_tree(&docs, tree)?;

    Ok(report)
}

/// Strip translatable tags and write the tree
pub fn strip(root: &Path, tree: &TreeArgs) -> Result<()> {
    let project = Project::open(root, &TargetArgs::default())?;
    let mut docs = load_tree(tree)?;

    pipeline::strip(&mut docs, &project.walker)?;
    write_tree(&docs, tree)?;

    Ok(())
}

/// Run the mode from `--mode`, falling back to the settings file
pub fn run(
    root: &Path,
    tree: &TreeArgs,
    target: &TargetArgs,
    mode: Option<&str>,
) -> Result<Outcome> {
    let project = Project::open(root, target)?;
    let mode = mode.map(Mode::parse_lenient).unwrap_or_else(|| project.settings.mode());

    let mut docs = load_tree(tree)?;
    let outcome = pipeline::run(mode, &mut docs, &project.store, &project.lang, &project.walker)?;

    if mode != Mode::Generate || tree.output.is_some() {
        write_tree(&docs, tree)?;
    }

    Ok(outcome)
}

/// Summarize the snapshots of the target language
pub fn status(root: &Path, target: &TargetArgs) -> Result<StatusReport> {
    let project = Project::open(root, target)?;
    pipeline::status(&project.store, &project.lang)
}

/// Print any report in JSON format
pub fn print_json<T: Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

/// Print a generate report in text format
pub fn print_generate_text(report: &GenerateReport) {
    println!("✓ Wrote staging snapshot for {}", report.lang);
    println!("  File: {:?}", report.snapshot_path);
    println!("  Entries: {}", report.stats.total);
    println!("  Translated: {}", report.stats.translated);
    println!("  Untranslated: {}", report.stats.untranslated);

    if !report.unresolved.is_empty() {
        println!("\n⚠ {} path(s) do not resolve:", report.unresolved.len());
        for path in &report.unresolved {
            println!("   {}", path.project_path.join("/"));
            println!("   Error: {}", path.error);
        }
    }
}

/// Print an injection report in text format
pub fn print_injection_text(report: &InjectionReport, show_diff: bool) {
    println!("✓ Applied {} translation(s)", report.applied);
    println!("  Untranslated: {}", report.untranslated);

    if report.is_clean() {
        println!("\nNo discrepancy found.");
        return;
    }

    println!("\nWarnings:");
    println!("---------\n");

    for warning in &report.warnings {
        let icon = match warning.kind {
            WarningKind::Stale => "🟡",
            WarningKind::PathNotFound => "🔴",
        };

        println!("{} [{}] {}", icon, warning.kind, warning.project_path.join("/"));
        if let Some(ref human) = warning.human_readable_path {
            println!("   At: {}", human);
        }
        println!("   Key: {}", warning.translation_key);

        if show_diff {
            if let Some(diff) = warning.diff() {
                println!("   Diff: {}", diff);
            }
        }
        println!();
    }

    println!("{}", REGENERATE_HINT);
}

/// Print the outcome of `run` in text format
pub fn print_outcome_text(outcome: &Outcome) {
    match outcome {
        Outcome::Generate(report) => print_generate_text(report),
        Outcome::Inject(report) => print_injection_text(report, true),
        Outcome::Strip => println!("✓ Stripped translatable tags"),
    }
}

/// Print a status report in text format
pub fn print_status_text(report: &StatusReport) {
    println!("docl10n Status");
    println!("==============\n");
    println!("Language: {}", report.lang);

    let channels = [("Production", report.production), ("Staging", report.staging)];
    for (label, stats) in channels {
        match stats {
            Some(stats) => println!(
                "{}: {} entries, {} translated, {} untranslated",
                label, stats.total, stats.translated, stats.untranslated
            ),
            None => println!("{}: no snapshot", label),
        }
    }
}
