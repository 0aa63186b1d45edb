//! Documentation tree model
//!
//! A typed view of the reflection tree a documentation generator emits
//! (TypeDoc's `--json` output). Only the capabilities the translation
//! pipeline needs are modelled as fields:
//! - child collections (`children`, `signatures`, accessor signatures)
//! - labels (`categories`, `groups`)
//! - free-text annotation blocks (`comment`)
//!
//! Every other field is carried through `extra` so a load/save round-trip
//! does not lose data.

mod comment;
pub mod path;

pub use comment::{BlockTag, Comment, ContentRun, RunKind};
pub use path::{resolve_text, resolve_text_mut, PathStep, ResolveError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Semantic kind of a reflection, stored as TypeDoc's numeric bit value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum ReflectionKind {
    Project,
    Module,
    Namespace,
    Enum,
    EnumMember,
    Variable,
    Function,
    Class,
    Interface,
    Constructor,
    Property,
    Method,
    CallSignature,
    IndexSignature,
    ConstructorSignature,
    Parameter,
    TypeLiteral,
    TypeParameter,
    Accessor,
    GetSignature,
    SetSignature,
    TypeAlias,
    Reference,
    /// A bit value this crate does not know about
    Other(u32),
}

impl From<u32> for ReflectionKind {
    fn from(bits: u32) -> Self {
        match bits {
            0x1 => Self::Project,
            0x2 => Self::Module,
            0x4 => Self::Namespace,
            0x8 => Self::Enum,
            0x10 => Self::EnumMember,
            0x20 => Self::Variable,
            0x40 => Self::Function,
            0x80 => Self::Class,
            0x100 => Self::Interface,
            0x200 => Self::Constructor,
            0x400 => Self::Property,
            0x800 => Self::Method,
            0x1000 => Self::CallSignature,
            0x2000 => Self::IndexSignature,
            0x4000 => Self::ConstructorSignature,
            0x8000 => Self::Parameter,
            0x10000 => Self::TypeLiteral,
            0x20000 => Self::TypeParameter,
            0x40000 => Self::Accessor,
            0x80000 => Self::GetSignature,
            0x100000 => Self::SetSignature,
            0x200000 => Self::TypeAlias,
            0x400000 => Self::Reference,
            other => Self::Other(other),
        }
    }
}

impl From<ReflectionKind> for u32 {
    fn from(kind: ReflectionKind) -> Self {
        match kind {
            ReflectionKind::Project => 0x1,
            ReflectionKind::Module => 0x2,
            ReflectionKind::Namespace => 0x4,
            ReflectionKind::Enum => 0x8,
            ReflectionKind::EnumMember => 0x10,
            ReflectionKind::Variable => 0x20,
            ReflectionKind::Function => 0x40,
            ReflectionKind::Class => 0x80,
            ReflectionKind::Interface => 0x100,
            ReflectionKind::Constructor => 0x200,
            ReflectionKind::Property => 0x400,
            ReflectionKind::Method => 0x800,
            ReflectionKind::CallSignature => 0x1000,
            ReflectionKind::IndexSignature => 0x2000,
            ReflectionKind::ConstructorSignature => 0x4000,
            ReflectionKind::Parameter => 0x8000,
            ReflectionKind::TypeLiteral => 0x10000,
            ReflectionKind::TypeParameter => 0x20000,
            ReflectionKind::Accessor => 0x40000,
            ReflectionKind::GetSignature => 0x80000,
            ReflectionKind::SetSignature => 0x100000,
            ReflectionKind::TypeAlias => 0x200000,
            ReflectionKind::Reference => 0x400000,
            ReflectionKind::Other(bits) => bits,
        }
    }
}

impl ReflectionKind {
    /// The label recorded in a fragment's `kind` field
    pub fn label(&self) -> &'static str {
        match self {
            ReflectionKind::Project => "project",
            ReflectionKind::Module => "module",
            ReflectionKind::Namespace => "namespace",
            ReflectionKind::Enum => "enum",
            ReflectionKind::EnumMember => "enumMember",
            ReflectionKind::Variable => "variable",
            ReflectionKind::Function => "function",
            ReflectionKind::Class => "class",
            ReflectionKind::Interface => "interface",
            ReflectionKind::Constructor => "constructor",
            ReflectionKind::Property => "property",
            ReflectionKind::Method => "method",
            ReflectionKind::CallSignature => "callSignature",
            ReflectionKind::IndexSignature => "indexSignature",
            ReflectionKind::ConstructorSignature => "constructorSignature",
            ReflectionKind::Parameter => "parameter",
            ReflectionKind::TypeLiteral => "typeLiteral",
            ReflectionKind::TypeParameter => "typeParameter",
            ReflectionKind::Accessor => "accessor",
            ReflectionKind::GetSignature => "getSignature",
            ReflectionKind::SetSignature => "setSignature",
            ReflectionKind::TypeAlias => "typeAlias",
            ReflectionKind::Reference => "reference",
            ReflectionKind::Other(_) => "unknown",
        }
    }
}

impl std::fmt::Display for ReflectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Reflection flags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flags {
    /// Declared outside the documented project
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_external: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A labeled category attached to a reflection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A labeled group attached to a reflection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One node of the documentation tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReflectionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Flags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Reflection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signatures: Option<Vec<Reflection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_signature: Option<Box<Reflection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_signature: Option<Box<Reflection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<Group>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Reflection {
    /// Create a bare reflection
    pub fn new(id: u64, name: &str, kind: ReflectionKind) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Label for the fragment `kind` field; "unknown" when the kind is absent
    pub fn kind_label(&self) -> &'static str {
        self.kind.map(|k| k.label()).unwrap_or("unknown")
    }

    /// Whether the reflection was declared outside the documented project
    pub fn is_external(&self) -> bool {
        self.flags.as_ref().is_some_and(|f| f.is_external)
    }

    /// Name shown in human readable breadcrumbs
    pub fn display_name(&self) -> &str {
        &self.name
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comment = Some(comment);
        self
    }

    pub fn with_child(mut self, child: Reflection) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    pub fn with_signature(mut self, signature: Reflection) -> Self {
        self.signatures.get_or_insert_with(Vec::new).push(signature);
        self
    }

    pub fn with_group(mut self, title: &str) -> Self {
        self.groups.get_or_insert_with(Vec::new).push(Group {
            title: title.to_string(),
            extra: Map::new(),
        });
        self
    }

    pub fn with_category(mut self, title: &str) -> Self {
        self.categories.get_or_insert_with(Vec::new).push(Category {
            title: title.to_string(),
            extra: Map::new(),
        });
        self
    }

    /// Load a project tree from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read project file: {:?}", path))?;
        let project: Reflection = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse project file: {:?}", path))?;
        Ok(project)
    }

    /// Write the tree back as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize project tree")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write project file: {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_labels() {
        assert_eq!(ReflectionKind::from(0x800).label(), "method");
        assert_eq!(ReflectionKind::from(0x80000).label(), "getSignature");
        assert_eq!(ReflectionKind::from(0x800000).label(), "unknown");

        let node = Reflection::default();
        assert_eq!(node.kind_label(), "unknown");
    }

    #[test]
    fn test_roundtrip_preserves_unknown_fields() {
        let raw = json!({
            "id": 3,
            "name": "Point",
            "variant": "declaration",
            "kind": 128,
            "flags": { "isExported": true },
            "sources": [{ "fileName": "src/point.ts", "line": 4 }],
            "comment": {
                "summary": [{ "kind": "text", "text": "A point." }],
                "modifierTags": ["@alpha"]
            }
        });

        let node: Reflection = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(node.kind, Some(ReflectionKind::Class));
        assert!(!node.is_external());

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["sources"], raw["sources"]);
        assert_eq!(back["flags"]["isExported"], json!(true));
        assert_eq!(back["kind"], json!(128));
        assert_eq!(back["comment"]["modifierTags"], raw["comment"]["modifierTags"]);
    }

    #[test]
    fn test_roundtrip_is_verbatim() {
        let raw = json!({
            "id": 0,
            "name": "demo",
            "variant": "container",
            "kind": 1,
            "children": [{ "id": 1, "kind": 2, "name": "x" }]
        });

        let node: Reflection = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&node).unwrap(), raw);
    }

    #[test]
    fn test_external_flag() {
        let node: Reflection =
            serde_json::from_value(json!({ "id": 1, "name": "x", "flags": { "isExternal": true } }))
                .unwrap();
        assert!(node.is_external());
    }
}
