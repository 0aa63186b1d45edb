//! Translatable fragment extraction
//!
//! This module turns a documentation tree into a flat map of fragments:
//! - key derivation (translation key and location identifier)
//! - per-shape extractors for labels and tagged comments
//! - the tree walker that runs them and plans the comment rewrites

mod extractors;
mod walker;

pub use extractors::{
    AccessorCommentExtractor, BlockCommentExtractor, CategoryExtractor, FragmentExtractor,
    GroupExtractor, InlineCommentExtractor, NodeContext,
};
pub use walker::{commit, Rewrite, Walk, Walker, DEFAULT_MAX_DEPTH};

use crate::model::ResolveError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use thiserror::Error;

/// Fragments keyed by translation key
pub type Extraction = BTreeMap<String, Fragment>;

/// Separator of the human readable breadcrumb
pub const HUMAN_PATH_SEPARATOR: &str = " > ";

/// Group titles generated by the documentation tool itself
pub const DEFAULT_GROUP_TITLES: [&str; 9] = [
    "Constructors",
    "Properties",
    "Methods",
    "Accessors",
    "Namespaces",
    "Classes",
    "Interfaces",
    "Type Aliases",
    "Functions",
];

/// Derive a content-addressed key from a path, a text and a kind
///
/// The tokens, the text and the kind are concatenated without separators
/// before hashing, so `["ab", "c"]` and `["a", "bc"]` hash alike.
pub fn derive_key<S: AsRef<str>>(tokens: &[S], text: &str, kind: &str) -> String {
    let mut hasher = Sha256::new();
    for token in tokens {
        hasher.update(token.as_ref().as_bytes());
    }
    hasher.update(text.as_bytes());
    hasher.update(kind.as_bytes());
    hex::encode(hasher.finalize())
}

/// Comment tags that mark translatable text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    /// Inline text spliced into the owning node's summary
    #[serde(default = "default_inline_tag")]
    pub inline: String,
    /// Accessor text spliced into the parent's summary
    #[serde(default = "default_accessor_tag")]
    pub accessor: String,
    /// Block sections translated in place
    #[serde(default = "default_block_tag")]
    pub block: String,
}

fn default_inline_tag() -> String {
    "@description".to_string()
}

fn default_accessor_tag() -> String {
    "@accessorDescription".to_string()
}

fn default_block_tag() -> String {
    "@translationBlock".to_string()
}

impl Default for Tags {
    fn default() -> Self {
        Self {
            inline: default_inline_tag(),
            accessor: default_accessor_tag(),
            block: default_block_tag(),
        }
    }
}

/// One unit of translatable text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    /// Source text as present in the tree
    pub original_text: String,
    /// Localized text; empty until translated
    pub translation: String,
    /// Structural tokens hashed into the location identifier
    pub flat_path: Vec<String>,
    /// Navigation route from the root to the text slot
    pub project_path: Vec<String>,
    pub location_identifier: String,
    pub translation_key: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_readable_path: Option<String>,
}

impl Fragment {
    /// Create an untranslated fragment and derive both keys
    pub fn new(
        flat_path: Vec<String>,
        project_path: Vec<String>,
        original_text: &str,
        kind: &str,
        human_path: &[String],
    ) -> Self {
        let location_identifier = derive_key(&flat_path, original_text, kind);
        let translation_key = derive_key(&project_path, original_text, kind);

        Self {
            original_text: original_text.to_string(),
            translation: String::new(),
            flat_path,
            project_path,
            location_identifier,
            translation_key,
            kind: kind.to_string(),
            human_readable_path: Some(human_path.join(HUMAN_PATH_SEPARATOR)),
        }
    }

    /// Append a token to the flat path and recompute the location identifier
    pub fn extend_flat_path(&mut self, token: String) {
        self.flat_path.push(token);
        self.location_identifier = derive_key(&self.flat_path, &self.original_text, &self.kind);
    }

    pub fn is_translated(&self) -> bool {
        !self.translation.is_empty()
    }
}

/// Extraction step, named in fatal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Categories,
    Groups,
    Comment,
    BlockComment,
    Children,
    Signatures,
    Accessor,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Categories => write!(f, "categories"),
            Phase::Groups => write!(f, "groups"),
            Phase::Comment => write!(f, "comment"),
            Phase::BlockComment => write!(f, "block-comment"),
            Phase::Children => write!(f, "children"),
            Phase::Signatures => write!(f, "signatures"),
            Phase::Accessor => write!(f, "accessor"),
        }
    }
}

/// Fatal extraction failure
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("error parsing {phase} at `{location}`: {source}")]
    Phase {
        phase: Phase,
        location: String,
        source: Box<ExtractError>,
    },

    #[error("tree nesting exceeds the maximum depth of {limit}")]
    DepthExceeded { limit: usize },

    #[error("failed to apply comment rewrite: {0}")]
    Commit(#[from] ResolveError),
}

impl ExtractError {
    /// Attach the failing phase, keeping the innermost one if already set
    pub fn in_phase(self, phase: Phase, human_path: &[String]) -> Self {
        match self {
            err @ ExtractError::Phase { .. } => err,
            other => ExtractError::Phase {
                phase,
                location: human_path.join(HUMAN_PATH_SEPARATOR),
                source: Box::new(other),
            },
        }
    }

    /// The phase that failed, if known
    pub fn phase(&self) -> Option<Phase> {
        match self {
            ExtractError::Phase { phase, .. } => Some(*phase),
            ExtractError::DepthExceeded { .. } | ExtractError::Commit(_) => None,
        }
    }
}
