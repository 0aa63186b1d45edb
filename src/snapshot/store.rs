//! On-disk snapshot layout
//!
//! ```text
//! <translations>/prod/<lang>/translation.json
//! <translations>/prod/<lang>/README.md
//! <translations>/staging/<lang>/translation.json
//! <translations>/staging/<lang>/README.md
//! ```

use super::Snapshot;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const SNAPSHOT_FILE: &str = "translation.json";
const README_FILE: &str = "README.md";

/// Which copy of a language's snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Approved translations
    Production,
    /// Work in progress, written by generate
    Staging,
}

impl Channel {
    fn dir_name(&self) -> &'static str {
        match self {
            Channel::Production => "prod",
            Channel::Staging => "staging",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Production => write!(f, "production"),
            Channel::Staging => write!(f, "staging"),
        }
    }
}

/// Reads and writes snapshots under a translations directory
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
    default_readme: PathBuf,
}

impl SnapshotStore {
    /// Create a store rooted at `root`; `default_readme` seeds new staging
    /// directories when production has no README
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(root: P, default_readme: Q) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            default_readme: default_readme.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one channel's files for a language
    pub fn language_dir(&self, channel: Channel, lang: &str) -> Result<PathBuf> {
        validate_lang(lang)?;
        Ok(self.root.join(channel.dir_name()).join(lang))
    }

    pub fn snapshot_path(&self, channel: Channel, lang: &str) -> Result<PathBuf> {
        Ok(self.language_dir(channel, lang)?.join(SNAPSHOT_FILE))
    }

    pub fn readme_path(&self, channel: Channel, lang: &str) -> Result<PathBuf> {
        Ok(self.language_dir(channel, lang)?.join(README_FILE))
    }

    /// Load a snapshot, `None` if the file does not exist
    pub fn load(&self, channel: Channel, lang: &str) -> Result<Option<Snapshot>> {
        let path = self.snapshot_path(channel, lang)?;
        if !path.exists() {
            debug!("No {} snapshot at {:?}", channel, path);
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot: {:?}", path))?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: {:?}", path))?;

        debug!("Loaded {} snapshot with {} entries", channel, snapshot.len());
        Ok(Some(snapshot))
    }

    /// Write the staging snapshot, seeding its README on first write
    pub fn save_staging(&self, lang: &str, snapshot: &Snapshot) -> Result<PathBuf> {
        let dir = self.language_dir(Channel::Staging, lang)?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {:?}", dir))?;

        self.ensure_staging_readme(lang)?;

        let path = dir.join(SNAPSHOT_FILE);
        write_atomic(&dir, &path, snapshot)?;

        info!("Wrote {} entries to {:?}", snapshot.len(), path);
        Ok(path)
    }

    fn ensure_staging_readme(&self, lang: &str) -> Result<()> {
        let target = self.readme_path(Channel::Staging, lang)?;
        if target.exists() {
            return Ok(());
        }

        let production = self.readme_path(Channel::Production, lang)?;
        let source = if production.exists() {
            production
        } else if self.default_readme.exists() {
            self.default_readme.clone()
        } else {
            warn!(
                "No README to copy into {:?}; neither {:?} nor {:?} exists",
                target, production, self.default_readme
            );
            return Ok(());
        };

        std::fs::copy(&source, &target)
            .with_context(|| format!("Failed to copy {:?} to {:?}", source, target))?;
        debug!("Copied {:?} to {:?}", source, target);
        Ok(())
    }
}

/// Serialize next to the destination, then rename over it
fn write_atomic(dir: &Path, path: &Path, snapshot: &Snapshot) -> Result<()> {
    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;

    serde_json::to_writer_pretty(&mut file, snapshot).context("Failed to serialize snapshot")?;
    file.write_all(b"\n")?;
    file.flush()?;

    file.persist(path)
        .with_context(|| format!("Failed to write snapshot: {:?}", path))?;
    Ok(())
}

/// Language codes become directory names
fn validate_lang(lang: &str) -> Result<()> {
    let valid = !lang.is_empty()
        && lang != "."
        && lang != ".."
        && !lang.contains(['/', '\\']);
    if !valid {
        anyhow::bail!("Invalid language code: {:?}", lang);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotEntry;
    use tempfile::tempdir;

    fn entry(key: &str, text: &str, translation: &str) -> SnapshotEntry {
        SnapshotEntry {
            original_text: text.to_string(),
            translation: translation.to_string(),
            project_path: vec!["groups".into(), "index-0".into(), "title".into()],
            translation_key: key.to_string(),
            kind: "group".to_string(),
            human_readable_path: None,
        }
    }

    #[test]
    fn test_missing_snapshot_loads_as_none() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("translations"), dir.path().join("README.md"));

        assert!(store.load(Channel::Production, "fr").unwrap().is_none());
        assert!(store.load(Channel::Staging, "fr").unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_staging() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("translations"), dir.path().join("README.md"));

        let mut snapshot = Snapshot::default();
        snapshot.insert(entry("abc", "Helpers", "Assistants"));

        let path = store.save_staging("fr", &snapshot).unwrap();
        assert_eq!(path, dir.path().join("translations/staging/fr/translation.json"));

        let loaded = store.load(Channel::Staging, "fr").unwrap().unwrap();
        assert_eq!(loaded, snapshot);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"abc\": {"));
        assert!(!raw.contains("humanReadablePath"));
    }

    #[test]
    fn test_readme_prefers_production_copy() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("README.md"), "root readme").unwrap();
        let store = SnapshotStore::new(dir.path().join("translations"), dir.path().join("README.md"));

        let prod_dir = store.language_dir(Channel::Production, "de").unwrap();
        std::fs::create_dir_all(&prod_dir).unwrap();
        std::fs::write(prod_dir.join("README.md"), "prod readme").unwrap();

        store.save_staging("de", &Snapshot::default()).unwrap();
        store.save_staging("ja", &Snapshot::default()).unwrap();

        let read = |lang: &str| {
            std::fs::read_to_string(store.readme_path(Channel::Staging, lang).unwrap()).unwrap()
        };
        assert_eq!(read("de"), "prod readme");
        assert_eq!(read("ja"), "root readme");
    }

    #[test]
    fn test_existing_readme_is_kept() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("README.md"), "root readme").unwrap();
        let store = SnapshotStore::new(dir.path().join("translations"), dir.path().join("README.md"));

        let staging = store.language_dir(Channel::Staging, "fr").unwrap();
        std::fs::create_dir_all(&staging).unwrap();
        std::fs::write(staging.join("README.md"), "edited").unwrap();

        store.save_staging("fr", &Snapshot::default()).unwrap();
        assert_eq!(std::fs::read_to_string(staging.join("README.md")).unwrap(), "edited");
    }

    #[test]
    fn test_missing_readme_sources_do_not_fail() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("translations"), dir.path().join("README.md"));

        store.save_staging("fr", &Snapshot::default()).unwrap();
        assert!(!store.readme_path(Channel::Staging, "fr").unwrap().exists());
    }

    #[test]
    fn test_malformed_snapshot_is_an_error() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path(), dir.path().join("README.md"));
        let path = store.snapshot_path(Channel::Production, "fr").unwrap();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let err = store.load(Channel::Production, "fr").unwrap_err();
        assert!(err.to_string().contains("Failed to parse snapshot"));
    }

    #[test]
    fn test_language_codes_are_validated() {
        let store = SnapshotStore::new("translations", "README.md");
        assert!(store.snapshot_path(Channel::Staging, "../etc").is_err());
        assert!(store.snapshot_path(Channel::Staging, "").is_err());
        assert!(store.snapshot_path(Channel::Staging, "pt-BR").is_ok());
    }
}
