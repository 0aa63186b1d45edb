//! Translation snapshots
//!
//! A snapshot is the persisted, trimmed form of an extraction: everything
//! needed to re-apply a translation, keyed by translation key. Production
//! snapshots hold approved translations, staging snapshots work in progress.

mod store;

pub use store::{Channel, SnapshotStore};

use crate::extract::{Extraction, Fragment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One persisted fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub original_text: String,
    pub translation: String,
    pub project_path: Vec<String>,
    pub translation_key: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_readable_path: Option<String>,
}

impl From<&Fragment> for SnapshotEntry {
    fn from(fragment: &Fragment) -> Self {
        Self {
            original_text: fragment.original_text.clone(),
            translation: fragment.translation.clone(),
            project_path: fragment.project_path.clone(),
            translation_key: fragment.translation_key.clone(),
            kind: fragment.kind.clone(),
            human_readable_path: fragment.human_readable_path.clone(),
        }
    }
}

impl SnapshotEntry {
    pub fn is_translated(&self) -> bool {
        !self.translation.is_empty()
    }
}

/// Snapshot entries keyed by translation key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<String, SnapshotEntry>,
}

impl Snapshot {
    /// Trim an extraction down to its persisted form
    pub fn from_extraction(extraction: &Extraction) -> Self {
        let entries = extraction
            .iter()
            .map(|(key, fragment)| (key.clone(), SnapshotEntry::from(fragment)))
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&SnapshotEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut SnapshotEntry> {
        self.entries.get_mut(key)
    }

    pub fn insert(&mut self, entry: SnapshotEntry) {
        self.entries.insert(entry.translation_key.clone(), entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &SnapshotEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count translated and untranslated entries
    pub fn stats(&self) -> SnapshotStats {
        let translated = self.entries().filter(|e| e.is_translated()).count();
        SnapshotStats {
            total: self.len(),
            translated,
            untranslated: self.len() - translated,
        }
    }
}

/// Progress summary of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapshotStats {
    pub total: usize,
    pub translated: usize,
    pub untranslated: usize,
}

/// Carry translations from older snapshots into a fresh extraction
///
/// Snapshots are applied in order, so a later snapshot wins over an earlier
/// one. An entry is carried only when its key exists in `fresh`, its
/// recorded original text equals the fresh text and its translation is
/// not empty. Entries are never added to `fresh`.
pub fn reconcile(mut fresh: Extraction, older: &[&Snapshot]) -> Extraction {
    for snapshot in older {
        let mut carried = 0;
        let mut discarded = 0;

        for entry in snapshot.entries().filter(|e| e.is_translated()) {
            match fresh.get_mut(&entry.translation_key) {
                Some(fragment) if fragment.original_text == entry.original_text => {
                    fragment.translation = entry.translation.clone();
                    carried += 1;
                }
                _ => discarded += 1,
            }
        }

        debug!(carried, discarded, "Reconciled snapshot");
    }

    fresh
}
