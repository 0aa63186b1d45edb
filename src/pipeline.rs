//! Operational pipeline
//!
//! Ties extraction, reconciliation, persistence and injection together into
//! the three modes a documentation build can run in:
//! - `generate`: extract, carry translations forward and write staging
//! - `inject`: apply the staging snapshot to the tree
//! - `strip`: only remove the translatable tags

use crate::extract::{commit, Walker};
use crate::inject::{InjectError, InjectionReport};
use crate::model::{resolve_text, Reflection};
use crate::snapshot::{reconcile, Channel, Snapshot, SnapshotStats, SnapshotStore};
use anyhow::Result;
use serde::Serialize;
use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{error, info};

/// What a run does with the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Generate,
    Inject,
    Strip,
}

impl Mode {
    /// Parse a mode name; anything unrecognized falls back to `Generate`
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "inject" => Mode::Inject,
            "strip" | "default" => Mode::Strip,
            _ => Mode::Generate,
        }
    }
}

impl FromStr for Mode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Generate => write!(f, "generate"),
            Mode::Inject => write!(f, "inject"),
            Mode::Strip => write!(f, "strip"),
        }
    }
}

/// A generated project path that does not lead back to its text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedPath {
    pub translation_key: String,
    pub project_path: Vec<String>,
    pub error: String,
}

/// Outcome of a generate run
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub lang: String,
    pub snapshot_path: PathBuf,
    pub stats: SnapshotStats,
    /// Paths that failed validation; advisory only
    pub unresolved: Vec<UnresolvedPath>,
}

/// Outcome of any mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Outcome {
    Generate(GenerateReport),
    Inject(InjectionReport),
    Strip,
}

/// Progress of one language
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub lang: String,
    pub production: Option<SnapshotStats>,
    pub staging: Option<SnapshotStats>,
}

/// Run the pipeline in the given mode
pub fn run(
    mode: Mode,
    tree: &mut Reflection,
    store: &SnapshotStore,
    lang: &str,
    walker: &Walker,
) -> Result<Outcome> {
    info!("Running {} for language {:?}", mode, lang);

    match mode {
        Mode::Generate => generate(tree, store, lang, walker).map(Outcome::Generate),
        Mode::Inject => inject(tree, store, lang, walker).map(Outcome::Inject),
        Mode::Strip => {
            strip(tree, walker)?;
            Ok(Outcome::Strip)
        }
    }
}

/// Extract, reconcile against production then staging, and write staging
///
/// The tree is left stripped. Extraction errors abort before anything is
/// written.
pub fn generate(
    tree: &mut Reflection,
    store: &SnapshotStore,
    lang: &str,
    walker: &Walker,
) -> Result<GenerateReport> {
    let walk = walker.walk(tree)?;
    commit(tree, walk.rewrites)?;

    let production = store.load(Channel::Production, lang)?;
    let staging = store.load(Channel::Staging, lang)?;
    let older: Vec<&Snapshot> = production.iter().chain(staging.iter()).collect();

    let merged = reconcile(walk.fragments, &older);
    let snapshot = Snapshot::from_extraction(&merged);
    let snapshot_path = store.save_staging(lang, &snapshot)?;

    let unresolved = validate(tree, &snapshot);
    let stats = snapshot.stats();
    info!(
        "Generated {} entries for {:?} ({} translated)",
        stats.total, lang, stats.translated
    );

    Ok(GenerateReport {
        lang: lang.to_string(),
        snapshot_path,
        stats,
        unresolved,
    })
}

/// Check that every entry's project path resolves in the stripped tree
fn validate(tree: &Reflection, snapshot: &Snapshot) -> Vec<UnresolvedPath> {
    let mut unresolved = Vec::new();

    for entry in snapshot.entries() {
        if let Err(err) = resolve_text(tree, &entry.project_path) {
            error!(
                "Generated path does not resolve: {} ({})",
                entry.project_path.join("/"),
                err
            );
            unresolved.push(UnresolvedPath {
                translation_key: entry.translation_key.clone(),
                project_path: entry.project_path.clone(),
                error: err.to_string(),
            });
        }
    }

    unresolved
}

/// Apply the staging snapshot
///
/// Fails without touching the tree when no staging snapshot exists.
pub fn inject(
    tree: &mut Reflection,
    store: &SnapshotStore,
    lang: &str,
    walker: &Walker,
) -> Result<InjectionReport> {
    let Some(staging) = store.load(Channel::Staging, lang)? else {
        let path = store.snapshot_path(Channel::Staging, lang)?;
        error!("Translation file not found: {:?}", path);
        return Err(InjectError::SnapshotMissing(path).into());
    };

    Ok(crate::inject::inject(tree, &staging, walker)?)
}

/// Remove translatable tags without recording anything
pub fn strip(tree: &mut Reflection, walker: &Walker) -> Result<()> {
    walker.strip(tree)?;
    Ok(())
}

/// Summarize the production and staging snapshots of a language
pub fn status(store: &SnapshotStore, lang: &str) -> Result<StatusReport> {
    let production = store.load(Channel::Production, lang)?;
    let staging = store.load(Channel::Staging, lang)?;

    Ok(StatusReport {
        lang: lang.to_string(),
        production: production.as_ref().map(Snapshot::stats),
        staging: staging.as_ref().map(Snapshot::stats),
    })
}
