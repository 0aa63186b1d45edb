//! Translation injection
//!
//! Writes approved translations back into the tree at their recorded
//! project paths. An entry is only applied when the text currently at the
//! path still equals the text the translation was made from.

use crate::extract::{ExtractError, Walker};
use crate::model::{resolve_text_mut, Reflection, ResolveError};
use crate::snapshot::{Snapshot, SnapshotEntry};
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Hint attached to every injection warning
pub const REGENERATE_HINT: &str = "The original documentation probably has changed since the translation was generated. Please regenerate the translation file.";

/// Fatal injection failure; nothing has been written to the tree
#[derive(Debug, Error)]
pub enum InjectError {
    #[error("translation file not found: {0:?}")]
    SnapshotMissing(PathBuf),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Why an entry was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The recorded path no longer leads to a container
    PathNotFound,
    /// The text at the path differs from the recorded original
    Stale,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::PathNotFound => write!(f, "path not found"),
            WarningKind::Stale => write!(f, "stale"),
        }
    }
}

/// An entry left untouched during injection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectionWarning {
    pub kind: WarningKind,
    pub translation_key: String,
    pub project_path: Vec<String>,
    pub human_readable_path: Option<String>,
    /// Original text recorded in the snapshot
    pub recorded: String,
    /// Text found in the tree, if the slot exists
    pub current: Option<String>,
}

impl InjectionWarning {
    fn new(kind: WarningKind, entry: &SnapshotEntry, current: Option<String>) -> Self {
        Self {
            kind,
            translation_key: entry.translation_key.clone(),
            project_path: entry.project_path.clone(),
            human_readable_path: entry.human_readable_path.clone(),
            recorded: entry.original_text.clone(),
            current,
        }
    }

    /// Word diff of recorded against current text, `[-old-]{+new+}` style
    pub fn diff(&self) -> Option<String> {
        let current = self.current.as_deref()?;
        let diff = TextDiff::from_words(self.recorded.as_str(), current);

        let mut rendered = String::new();
        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Equal => rendered.push_str(change.value()),
                ChangeTag::Delete => rendered.push_str(&format!("[-{}-]", change.value())),
                ChangeTag::Insert => rendered.push_str(&format!("{{+{}+}}", change.value())),
            }
        }
        Some(rendered)
    }
}

/// Outcome of an injection run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InjectionReport {
    /// Entries written into the tree
    pub applied: usize,
    /// Entries skipped because they have no translation
    pub untranslated: usize,
    pub warnings: Vec<InjectionWarning>,
}

impl InjectionReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn stale(&self) -> impl Iterator<Item = &InjectionWarning> {
        self.warnings.iter().filter(|w| w.kind == WarningKind::Stale)
    }
}

/// Strip leftover translatable tags, then apply the snapshot
pub fn inject(
    tree: &mut Reflection,
    snapshot: &Snapshot,
    walker: &Walker,
) -> Result<InjectionReport, InjectError> {
    walker.strip(tree)?;
    Ok(apply(tree, snapshot))
}

/// Apply every translated snapshot entry whose original text still matches
pub fn apply(tree: &mut Reflection, snapshot: &Snapshot) -> InjectionReport {
    let mut report = InjectionReport::default();

    for entry in snapshot.entries() {
        if !entry.is_translated() {
            report.untranslated += 1;
            continue;
        }

        match resolve_text_mut(tree, &entry.project_path) {
            Ok(slot) if *slot == entry.original_text => {
                *slot = entry.translation.clone();
                report.applied += 1;
            }
            Ok(slot) => {
                let current = slot.clone();
                warn!(
                    "Stale translation at {}: expected {:?}, found {:?}",
                    entry.project_path.join("/"),
                    entry.original_text,
                    current
                );
                warn!("{}", REGENERATE_HINT);
                report
                    .warnings
                    .push(InjectionWarning::new(WarningKind::Stale, entry, Some(current)));
            }
            Err(ResolveError::FieldNotFound { field }) => {
                warn!(
                    "No text field {:?} at {}",
                    field,
                    entry.project_path.join("/")
                );
                warn!("{}", REGENERATE_HINT);
                report
                    .warnings
                    .push(InjectionWarning::new(WarningKind::Stale, entry, None));
            }
            Err(err) => {
                warn!("Path not found: {} ({})", entry.project_path.join("/"), err);
                warn!("{}", REGENERATE_HINT);
                report
                    .warnings
                    .push(InjectionWarning::new(WarningKind::PathNotFound, entry, None));
            }
        }
    }

    debug!(
        applied = report.applied,
        untranslated = report.untranslated,
        warnings = report.warnings.len(),
        "Injection finished"
    );
    if report.is_clean() {
        info!("No discrepancy found in the translation file");
    }

    report
}
