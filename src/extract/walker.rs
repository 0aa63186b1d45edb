//! Depth-first tree walker
//!
//! The walker reads the tree without mutating it. Comment surgery needed by
//! the inline and accessor extractors is returned as [`Rewrite`]s and applied
//! afterwards with [`commit`].

use super::extractors::{
    AccessorCommentExtractor, BlockCommentExtractor, CategoryExtractor, FragmentExtractor,
    GroupExtractor, InlineCommentExtractor, NodeContext,
};
use super::{ExtractError, Extraction, Fragment, Phase, Tags};
use crate::model::path::{index_token, resolve_node_mut};
use crate::model::{Comment, ContentRun, Reflection, ResolveError};
use tracing::debug;

/// Default limit on tree nesting
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// A deferred edit of a node's comment, addressed by the node's project path
#[derive(Debug, Clone, PartialEq)]
pub enum Rewrite {
    /// Append runs to the summary, creating the comment if absent
    AppendSummary {
        node: Vec<String>,
        runs: Vec<ContentRun>,
    },
    /// Drop every block section carrying `tag`
    RemoveTags { node: Vec<String>, tag: String },
}

/// Output of a walk
#[derive(Debug, Default)]
pub struct Walk {
    pub fragments: Extraction,
    pub rewrites: Vec<Rewrite>,
}

impl Walk {
    /// Add a fragment; a later fragment with the same key wins
    pub fn insert(&mut self, fragment: Fragment) {
        self.fragments.insert(fragment.translation_key.clone(), fragment);
    }
}

/// Runs the fragment extractors over every node of a tree
pub struct Walker {
    tags: Tags,
    max_depth: usize,
    extractors: Vec<Box<dyn FragmentExtractor>>,
}

impl Walker {
    /// Create a walker with the default extractor set
    pub fn new(tags: Tags) -> Self {
        Self {
            tags,
            max_depth: DEFAULT_MAX_DEPTH,
            extractors: vec![
                Box::new(CategoryExtractor),
                Box::new(GroupExtractor),
                Box::new(InlineCommentExtractor),
                Box::new(BlockCommentExtractor),
                Box::new(AccessorCommentExtractor),
            ],
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Walk the tree from `root`
    pub fn walk(&self, root: &Reflection) -> Result<Walk, ExtractError> {
        let mut out = Walk::default();
        self.visit(root, &[], &[], 0, false, &mut out)?;

        debug!(
            fragments = out.fragments.len(),
            rewrites = out.rewrites.len(),
            "Walk complete"
        );

        Ok(out)
    }

    /// Walk and commit, discarding the fragments
    ///
    /// Leaves the tree as a generate run would: translatable sections moved
    /// into summaries and their tags removed.
    pub fn strip(&self, root: &mut Reflection) -> Result<(), ExtractError> {
        let walk = self.walk(root)?;
        commit(root, walk.rewrites)?;
        Ok(())
    }

    fn visit(
        &self,
        node: &Reflection,
        path: &[String],
        human: &[String],
        depth: usize,
        is_accessor: bool,
        out: &mut Walk,
    ) -> Result<(), ExtractError> {
        if node.is_external() {
            return Ok(());
        }
        if depth > self.max_depth {
            return Err(ExtractError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        let mut cx = NodeContext {
            node,
            path,
            human,
            tags: &self.tags,
            is_accessor,
            summary_len: node.comment.as_ref().map_or(0, |c| c.summary.len()),
        };

        for extractor in &self.extractors {
            extractor
                .extract(&mut cx, out)
                .map_err(|e| e.in_phase(extractor.phase(), human))?;
        }

        let collections = [
            ("children", Phase::Children, node.children.as_deref()),
            ("signatures", Phase::Signatures, node.signatures.as_deref()),
        ];
        for (field, phase, items) in collections {
            for (index, child) in items.unwrap_or_default().iter().enumerate() {
                let child_path = extend(path, &[field, index_token(index).as_str()]);
                let child_human = extend(human, &[child.display_name()]);

                self.visit(child, &child_path, &child_human, depth + 1, false, out)
                    .map_err(|e| e.in_phase(phase, &child_human))?;
            }
        }

        let accessors = [
            ("getSignature", node.get_signature.as_deref()),
            ("setSignature", node.set_signature.as_deref()),
        ];
        for (field, accessor) in accessors {
            if let Some(accessor) = accessor {
                let child_path = extend(path, &[field]);
                let child_human = extend(human, &[accessor.display_name()]);

                self.visit(accessor, &child_path, &child_human, depth + 1, true, out)
                    .map_err(|e| e.in_phase(Phase::Accessor, &child_human))?;
            }
        }

        Ok(())
    }
}

impl Default for Walker {
    fn default() -> Self {
        Self::new(Tags::default())
    }
}

fn extend(path: &[String], tokens: &[&str]) -> Vec<String> {
    let mut extended = path.to_vec();
    extended.extend(tokens.iter().map(|t| t.to_string()));
    extended
}

/// Apply rewrites in the order they were planned
pub fn commit(root: &mut Reflection, rewrites: Vec<Rewrite>) -> Result<(), ResolveError> {
    for rewrite in rewrites {
        match rewrite {
            Rewrite::AppendSummary { node, runs } => {
                let target = resolve_node_mut(root, &node)?;
                target
                    .comment
                    .get_or_insert_with(Comment::default)
                    .summary
                    .extend(runs);
            }
            Rewrite::RemoveTags { node, tag } => {
                let target = resolve_node_mut(root, &node)?;
                if let Some(comment) = target.comment.as_mut() {
                    comment.remove_tags(&tag);
                }
            }
        }
    }
    Ok(())
}
