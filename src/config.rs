//! Project settings for docl10n
//!
//! Settings are read from an optional `docl10n.toml` at the project root.
//! Every field has a default, so an absent file or a partial one is fine.

use crate::extract::{Tags, DEFAULT_MAX_DEPTH};
use crate::pipeline::Mode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the settings file looked up at the project root
pub const SETTINGS_FILE: &str = "docl10n.toml";

/// Settings for a documentation project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Target language code, used as the snapshot subdirectory
    #[serde(default = "default_l10n_code")]
    pub l10n_code: String,

    /// Pipeline mode; unknown values behave as `generate`
    #[serde(default = "default_translation_mode")]
    pub translation_mode: String,

    /// Root of the `prod/` and `staging/` snapshot trees
    #[serde(default = "default_translations_dir")]
    pub translations_dir: PathBuf,

    /// Document copied next to a new staging snapshot
    #[serde(default = "default_readme")]
    pub readme: PathBuf,

    /// Maximum tree nesting before extraction gives up
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Comment tags marking translatable text
    #[serde(default)]
    pub tags: Tags,
}

fn default_l10n_code() -> String {
    "en".to_string()
}

fn default_translation_mode() -> String {
    "generate".to_string()
}

fn default_translations_dir() -> PathBuf {
    PathBuf::from("translations")
}

fn default_readme() -> PathBuf {
    PathBuf::from("README.md")
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            l10n_code: default_l10n_code(),
            translation_mode: default_translation_mode(),
            translations_dir: default_translations_dir(),
            readme: default_readme(),
            max_depth: default_max_depth(),
            tags: Tags::default(),
        }
    }
}

impl Settings {
    /// Load settings from the project root or return defaults
    pub fn load_or_default(project_root: &Path) -> Result<Self> {
        let settings_path = project_root.join(SETTINGS_FILE);

        if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read settings file: {:?}", settings_path))?;
            let settings: Settings = toml::from_str(&content)
                .with_context(|| format!("Failed to parse settings file: {:?}", settings_path))?;
            Ok(settings)
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to the project root
    pub fn save(&self, project_root: &Path) -> Result<()> {
        let settings_path = project_root.join(SETTINGS_FILE);
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;

        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write settings file: {:?}", settings_path))?;

        Ok(())
    }

    /// The configured mode, with the `generate` fallback applied
    pub fn mode(&self) -> Mode {
        Mode::parse_lenient(&self.translation_mode)
    }

    /// Translations root, relative paths taken from the project root
    pub fn translations_root(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.translations_dir)
    }

    /// Default README, relative paths taken from the project root
    pub fn readme_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.readme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.l10n_code, "en");
        assert_eq!(settings.mode(), Mode::Generate);
        assert_eq!(settings.tags.inline, "@description");
        assert_eq!(settings.max_depth, 512);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_or_default(dir.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            "l10n_code = \"fr\"\ntranslation_mode = \"inject\"\n\n[tags]\nblock = \"@l10n\"\n",
        )
        .unwrap();

        let settings = Settings::load_or_default(dir.path()).unwrap();
        assert_eq!(settings.l10n_code, "fr");
        assert_eq!(settings.mode(), Mode::Inject);
        assert_eq!(settings.tags.block, "@l10n");
        assert_eq!(settings.tags.accessor, "@accessorDescription");
        assert_eq!(settings.translations_dir, PathBuf::from("translations"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            l10n_code: "ja".to_string(),
            max_depth: 64,
            ..Settings::default()
        };
        settings.save(dir.path()).unwrap();

        assert_eq!(Settings::load_or_default(dir.path()).unwrap(), settings);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "max_depth = \"deep\"").unwrap();

        let err = Settings::load_or_default(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings file"));
    }
}
