//! Per-shape fragment extractors
//!
//! Each extractor looks at one feature of a node (labels, tagged comment
//! sections, accessor comments) and records fragments plus the rewrites
//! needed to make the recorded project paths valid.

use super::walker::{Rewrite, Walk};
use super::{ExtractError, Fragment, Phase, Tags, DEFAULT_GROUP_TITLES};
use crate::model::path::index_token;
use crate::model::{ContentRun, Reflection};

/// Fragment kind of category labels
pub const CATEGORY_KIND: &str = "category";

/// Fragment kind of group labels
pub const GROUP_KIND: &str = "group";

/// Everything an extractor may look at for the current node
pub struct NodeContext<'a> {
    pub node: &'a Reflection,
    /// Project path of the node
    pub path: &'a [String],
    /// Breadcrumb of display names leading to the node
    pub human: &'a [String],
    pub tags: &'a Tags,
    /// The node is the get/set signature of its parent
    pub is_accessor: bool,
    /// Summary length once the already planned appends are committed
    pub summary_len: usize,
}

/// Trait for per-shape extractors run at every node
pub trait FragmentExtractor: Send + Sync {
    /// Phase reported when the extractor fails
    fn phase(&self) -> Phase;

    /// Record the node's fragments and rewrites into `out`
    fn extract(&self, cx: &mut NodeContext<'_>, out: &mut Walk) -> Result<(), ExtractError>;
}

fn extend(path: &[String], tokens: &[&str]) -> Vec<String> {
    let mut extended = path.to_vec();
    extended.extend(tokens.iter().map(|t| t.to_string()));
    extended
}

/// Category titles
pub struct CategoryExtractor;

impl FragmentExtractor for CategoryExtractor {
    fn phase(&self) -> Phase {
        Phase::Categories
    }

    fn extract(&self, cx: &mut NodeContext<'_>, out: &mut Walk) -> Result<(), ExtractError> {
        let Some(categories) = &cx.node.categories else {
            return Ok(());
        };

        for (index, category) in categories.iter().enumerate() {
            let index = index_token(index);
            let flat_path = vec![cx.node.id.to_string(), "categories".to_string(), index.clone()];
            let tokens = ["categories", index.as_str(), "title"];

            out.insert(Fragment::new(
                flat_path,
                extend(cx.path, &tokens),
                &category.title,
                CATEGORY_KIND,
                &extend(cx.human, &tokens),
            ));
        }

        Ok(())
    }
}

/// Group titles, minus the titles the documentation tool generates itself
pub struct GroupExtractor;

impl GroupExtractor {
    pub fn is_default_title(title: &str) -> bool {
        DEFAULT_GROUP_TITLES.contains(&title)
    }
}

impl FragmentExtractor for GroupExtractor {
    fn phase(&self) -> Phase {
        Phase::Groups
    }

    fn extract(&self, cx: &mut NodeContext<'_>, out: &mut Walk) -> Result<(), ExtractError> {
        let Some(groups) = &cx.node.groups else {
            return Ok(());
        };

        let kept = groups
            .iter()
            .enumerate()
            .filter(|(_, group)| !Self::is_default_title(&group.title));

        // Kept groups get a contiguous ordinal appended to their flat path.
        for (position, (index, group)) in kept.enumerate() {
            let index = index_token(index);
            let flat_path = vec![cx.node.id.to_string(), "groups".to_string(), index.clone()];
            let tokens = ["groups", index.as_str(), "title"];

            let mut fragment = Fragment::new(
                flat_path,
                extend(cx.path, &tokens),
                &group.title,
                GROUP_KIND,
                &extend(cx.human, &tokens),
            );
            fragment.extend_flat_path(index_token(position));
            out.insert(fragment);
        }

        Ok(())
    }
}

/// Move the runs under `tag` of `source` to the end of the owner's summary,
/// recording one fragment per text run
fn splice_tagged(
    cx: &mut NodeContext<'_>,
    source: &Reflection,
    tag: &str,
    marker: &str,
    out: &mut Walk,
) -> Vec<ContentRun> {
    let mut runs = Vec::new();
    let Some(comment) = &source.comment else {
        return runs;
    };

    let kind = cx.node.kind_label();

    for block in comment.tagged(tag) {
        for (index, run) in block.content.iter().enumerate() {
            if run.is_text() {
                let flat_path = vec![
                    source.id.to_string(),
                    source.name.clone(),
                    "comments".to_string(),
                    index_token(index),
                ];
                let slot = index_token(cx.summary_len);
                let ordinal = index_token(index);
                let project_path =
                    extend(cx.path, &["comment", "summary", slot.as_str(), "text"]);
                let human = extend(cx.human, &[marker, ordinal.as_str(), "text"]);

                out.insert(Fragment::new(flat_path, project_path, &run.text, kind, &human));
            }

            runs.push(run.clone());
            cx.summary_len += 1;
        }
    }

    runs
}

/// Inline `@description`-style sections, spliced into the node's summary
pub struct InlineCommentExtractor;

impl FragmentExtractor for InlineCommentExtractor {
    fn phase(&self) -> Phase {
        Phase::Comment
    }

    fn extract(&self, cx: &mut NodeContext<'_>, out: &mut Walk) -> Result<(), ExtractError> {
        let node = cx.node;
        let tags = cx.tags;
        let tag = tags.inline.as_str();

        let has_tag = node.comment.as_ref().is_some_and(|c| c.has_tag(tag));
        if !has_tag {
            return Ok(());
        }

        let runs = splice_tagged(cx, node, tag, "translation comments", out);

        out.rewrites.push(Rewrite::AppendSummary {
            node: cx.path.to_vec(),
            runs,
        });
        out.rewrites.push(Rewrite::RemoveTags {
            node: cx.path.to_vec(),
            tag: tag.to_string(),
        });

        Ok(())
    }
}

/// Accessor sections: the text lives on the get/set signature but renders
/// on the accessor itself
pub struct AccessorCommentExtractor;

impl FragmentExtractor for AccessorCommentExtractor {
    fn phase(&self) -> Phase {
        Phase::Accessor
    }

    fn extract(&self, cx: &mut NodeContext<'_>, out: &mut Walk) -> Result<(), ExtractError> {
        let node = cx.node;
        let tags = cx.tags;
        let tag = tags.accessor.as_str();

        let accessors = [
            ("getSignature", node.get_signature.as_deref()),
            ("setSignature", node.set_signature.as_deref()),
        ];

        for (field, accessor) in accessors {
            let Some(accessor) = accessor else {
                continue;
            };
            let Some(comment) = &accessor.comment else {
                continue;
            };
            let has_tag = comment.has_tag(tag);

            let runs = splice_tagged(cx, accessor, tag, "accessor comments", out);

            // Appending even nothing gives the parent a comment to render into.
            out.rewrites.push(Rewrite::AppendSummary {
                node: cx.path.to_vec(),
                runs,
            });
            if has_tag {
                out.rewrites.push(Rewrite::RemoveTags {
                    node: extend(cx.path, &[field]),
                    tag: tag.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Block sections translated where they are
pub struct BlockCommentExtractor;

impl FragmentExtractor for BlockCommentExtractor {
    fn phase(&self) -> Phase {
        Phase::BlockComment
    }

    fn extract(&self, cx: &mut NodeContext<'_>, out: &mut Walk) -> Result<(), ExtractError> {
        let node = cx.node;
        let Some(comment) = &node.comment else {
            return Ok(());
        };

        let tags = cx.tags;
        let is_accessor = cx.is_accessor;
        let stripped = |tag: &str| tag == tags.inline || (is_accessor && tag == tags.accessor);

        let kind = node.kind_label();

        // Block indices are counted as they will be once stripped tags are gone.
        let remaining = comment.block_tags.iter().filter(|block| !stripped(block.tag.as_str()));

        for (block_index, block) in remaining.enumerate() {
            if block.tag != tags.block {
                continue;
            }

            let block_index = index_token(block_index);
            for (index, run) in block.content.iter().enumerate() {
                if !run.is_text() {
                    continue;
                }

                let index = index_token(index);
                let flat_path = vec![
                    node.id.to_string(),
                    node.name.clone(),
                    "comments".to_string(),
                    index.clone(),
                ];
                let project_path = extend(
                    cx.path,
                    &[
                        "comment",
                        "blockTags",
                        block_index.as_str(),
                        "content",
                        index.as_str(),
                        "text",
                    ],
                );
                let human = extend(
                    cx.human,
                    &["translation block comments", index.as_str(), "text"],
                );

                out.insert(Fragment::new(flat_path, project_path, &run.text, kind, &human));
            }
        }

        Ok(())
    }
}
