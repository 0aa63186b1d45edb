//! Free-text annotation blocks attached to reflections

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of a content run inside a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunKind {
    Text,
    Code,
    InlineTag,
    RelativeLink,
}

/// One run of comment content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRun {
    pub kind: RunKind,
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentRun {
    /// A plain text run
    pub fn text(text: &str) -> Self {
        Self {
            kind: RunKind::Text,
            text: text.to_string(),
            extra: Map::new(),
        }
    }

    /// An inline code run
    pub fn code(text: &str) -> Self {
        Self {
            kind: RunKind::Code,
            text: text.to_string(),
            extra: Map::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == RunKind::Text
    }
}

/// A labeled block section such as `@remarks` or `@translationBlock`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTag {
    pub tag: String,
    #[serde(default)]
    pub content: Vec<ContentRun>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockTag {
    pub fn new(tag: &str, content: Vec<ContentRun>) -> Self {
        Self {
            tag: tag.to_string(),
            content,
            extra: Map::new(),
        }
    }
}

/// A parsed doc comment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub summary: Vec<ContentRun>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub block_tags: Vec<BlockTag>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Comment {
    pub fn new(summary: Vec<ContentRun>) -> Self {
        Self {
            summary,
            ..Self::default()
        }
    }

    pub fn with_block_tag(mut self, tag: BlockTag) -> Self {
        self.block_tags.push(tag);
        self
    }

    /// All block sections carrying `tag`, in document order
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a BlockTag> + 'a {
        self.block_tags.iter().filter(move |block| block.tag == tag)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tagged(tag).next().is_some()
    }

    /// Remove every block section carrying `tag`
    pub fn remove_tags(&mut self, tag: &str) {
        self.block_tags.retain(|block| block.tag != tag);
    }

    /// Text of every summary run, concatenated
    pub fn summary_text(&self) -> String {
        self.summary.iter().map(|run| run.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_and_remove() {
        let mut comment = Comment::new(vec![ContentRun::text("Intro. ")])
            .with_block_tag(BlockTag::new("@remarks", vec![ContentRun::text("Keep me")]))
            .with_block_tag(BlockTag::new("@description", vec![ContentRun::text("One")]))
            .with_block_tag(BlockTag::new("@description", vec![ContentRun::text("Two")]));

        assert_eq!(comment.tagged("@description").count(), 2);
        assert!(comment.has_tag("@remarks"));

        comment.remove_tags("@description");
        assert_eq!(comment.block_tags.len(), 1);
        assert!(!comment.has_tag("@description"));
        assert_eq!(comment.summary_text(), "Intro. ");
    }

    #[test]
    fn test_run_kind_serialization() {
        let run: ContentRun = serde_json::from_str(
            r#"{"kind":"inline-tag","tag":"@link","text":"Foo","target":12}"#,
        )
        .unwrap();
        assert_eq!(run.kind, RunKind::InlineTag);
        assert!(!run.is_text());

        let back = serde_json::to_value(&run).unwrap();
        assert_eq!(back["kind"], "inline-tag");
        assert_eq!(back["target"], 12);
    }
}
