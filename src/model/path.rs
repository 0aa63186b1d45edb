//! Project path resolution
//!
//! A project path is the navigation route from the tree root to a text slot,
//! e.g. `children / index-0 / signatures / index-0 / comment / summary /
//! index-2 / text`. The last token always names the string field; every
//! token before it selects a container.

use super::{BlockTag, Category, Comment, ContentRun, Group, Reflection};
use thiserror::Error;

/// Prefix of ordinal path tokens
pub const INDEX_PREFIX: &str = "index";

/// Render an ordinal path token
pub fn index_token(index: usize) -> String {
    format!("{}-{}", INDEX_PREFIX, index)
}

/// Errors raised while resolving a project path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("empty project path")]
    EmptyPath,

    #[error("path not found at step {position} (`{token}`)")]
    ContainerNotFound { position: usize, token: String },

    #[error("no text field `{field}` at the end of the path")]
    FieldNotFound { field: String },
}

/// One parsed token of a project path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep<'p> {
    Field(&'p str),
    Index(usize),
}

impl<'p> PathStep<'p> {
    /// Parse a token; `None` for an ordinal token whose number does not parse
    pub fn parse(token: &'p str) -> Option<Self> {
        if token.starts_with(INDEX_PREFIX) {
            token
                .get(INDEX_PREFIX.len() + 1..)
                .and_then(|n| n.parse().ok())
                .map(PathStep::Index)
        } else {
            Some(PathStep::Field(token))
        }
    }
}

enum Cursor<'a> {
    Node(&'a Reflection),
    Nodes(&'a [Reflection]),
    Categories(&'a [Category]),
    Category(&'a Category),
    Groups(&'a [Group]),
    Group(&'a Group),
    Comment(&'a Comment),
    BlockTags(&'a [BlockTag]),
    BlockTag(&'a BlockTag),
    Runs(&'a [ContentRun]),
    Run(&'a ContentRun),
}

impl<'a> Cursor<'a> {
    fn step(self, step: PathStep<'_>) -> Option<Cursor<'a>> {
        match (self, step) {
            (Cursor::Node(node), PathStep::Field(field)) => match field {
                "children" => node.children.as_deref().map(Cursor::Nodes),
                "signatures" => node.signatures.as_deref().map(Cursor::Nodes),
                "getSignature" => node.get_signature.as_deref().map(Cursor::Node),
                "setSignature" => node.set_signature.as_deref().map(Cursor::Node),
                "categories" => node.categories.as_deref().map(Cursor::Categories),
                "groups" => node.groups.as_deref().map(Cursor::Groups),
                "comment" => node.comment.as_ref().map(Cursor::Comment),
                _ => None,
            },
            (Cursor::Nodes(nodes), PathStep::Index(i)) => nodes.get(i).map(Cursor::Node),
            (Cursor::Categories(items), PathStep::Index(i)) => items.get(i).map(Cursor::Category),
            (Cursor::Groups(items), PathStep::Index(i)) => items.get(i).map(Cursor::Group),
            (Cursor::Comment(comment), PathStep::Field("summary")) => {
                Some(Cursor::Runs(&comment.summary))
            }
            (Cursor::Comment(comment), PathStep::Field("blockTags")) => {
                Some(Cursor::BlockTags(&comment.block_tags))
            }
            (Cursor::BlockTags(tags), PathStep::Index(i)) => tags.get(i).map(Cursor::BlockTag),
            (Cursor::BlockTag(tag), PathStep::Field("content")) => Some(Cursor::Runs(&tag.content)),
            (Cursor::Runs(runs), PathStep::Index(i)) => runs.get(i).map(Cursor::Run),
            _ => None,
        }
    }

    fn text(self, field: &str) -> Option<&'a str> {
        match (self, field) {
            (Cursor::Category(category), "title") => Some(&category.title),
            (Cursor::Group(group), "title") => Some(&group.title),
            (Cursor::Run(run), "text") => Some(&run.text),
            (Cursor::Node(node), "name") => Some(&node.name),
            _ => None,
        }
    }
}

enum CursorMut<'a> {
    Node(&'a mut Reflection),
    Nodes(&'a mut [Reflection]),
    Categories(&'a mut [Category]),
    Category(&'a mut Category),
    Groups(&'a mut [Group]),
    Group(&'a mut Group),
    Comment(&'a mut Comment),
    BlockTags(&'a mut [BlockTag]),
    BlockTag(&'a mut BlockTag),
    Runs(&'a mut [ContentRun]),
    Run(&'a mut ContentRun),
}

impl<'a> CursorMut<'a> {
    fn step(self, step: PathStep<'_>) -> Option<CursorMut<'a>> {
        match (self, step) {
            (CursorMut::Node(node), PathStep::Field(field)) => match field {
                "children" => node.children.as_deref_mut().map(CursorMut::Nodes),
                "signatures" => node.signatures.as_deref_mut().map(CursorMut::Nodes),
                "getSignature" => node.get_signature.as_deref_mut().map(CursorMut::Node),
                "setSignature" => node.set_signature.as_deref_mut().map(CursorMut::Node),
                "categories" => node.categories.as_deref_mut().map(CursorMut::Categories),
                "groups" => node.groups.as_deref_mut().map(CursorMut::Groups),
                "comment" => node.comment.as_mut().map(CursorMut::Comment),
                _ => None,
            },
            (CursorMut::Nodes(nodes), PathStep::Index(i)) => nodes.get_mut(i).map(CursorMut::Node),
            (CursorMut::Categories(items), PathStep::Index(i)) => {
                items.get_mut(i).map(CursorMut::Category)
            }
            (CursorMut::Groups(items), PathStep::Index(i)) => items.get_mut(i).map(CursorMut::Group),
            (CursorMut::Comment(comment), PathStep::Field("summary")) => {
                Some(CursorMut::Runs(&mut comment.summary))
            }
            (CursorMut::Comment(comment), PathStep::Field("blockTags")) => {
                Some(CursorMut::BlockTags(&mut comment.block_tags))
            }
            (CursorMut::BlockTags(tags), PathStep::Index(i)) => {
                tags.get_mut(i).map(CursorMut::BlockTag)
            }
            (CursorMut::BlockTag(tag), PathStep::Field("content")) => {
                Some(CursorMut::Runs(&mut tag.content))
            }
            (CursorMut::Runs(runs), PathStep::Index(i)) => runs.get_mut(i).map(CursorMut::Run),
            _ => None,
        }
    }

    fn text(self, field: &str) -> Option<&'a mut String> {
        match (self, field) {
            (CursorMut::Category(category), "title") => Some(&mut category.title),
            (CursorMut::Group(group), "title") => Some(&mut group.title),
            (CursorMut::Run(run), "text") => Some(&mut run.text),
            (CursorMut::Node(node), "name") => Some(&mut node.name),
            _ => None,
        }
    }
}

fn not_found(position: usize, token: &str) -> ResolveError {
    ResolveError::ContainerNotFound {
        position,
        token: token.to_string(),
    }
}

/// Strict read: every token must resolve and the last must name a text field
pub fn resolve_text<'a, S: AsRef<str>>(
    root: &'a Reflection,
    path: &[S],
) -> Result<&'a str, ResolveError> {
    let (last, containers) = path.split_last().ok_or(ResolveError::EmptyPath)?;

    let mut cursor = Cursor::Node(root);
    for (position, token) in containers.iter().enumerate() {
        let token = token.as_ref();
        cursor = PathStep::parse(token)
            .and_then(|step| cursor.step(step))
            .ok_or_else(|| not_found(position, token))?;
    }

    cursor
        .text(last.as_ref())
        .ok_or_else(|| ResolveError::FieldNotFound {
            field: last.as_ref().to_string(),
        })
}

/// Resolve the container named by all tokens but the last, then hand out
/// the last token's field for assignment
pub fn resolve_text_mut<'a, S: AsRef<str>>(
    root: &'a mut Reflection,
    path: &[S],
) -> Result<&'a mut String, ResolveError> {
    let (last, containers) = path.split_last().ok_or(ResolveError::EmptyPath)?;

    let mut cursor = CursorMut::Node(root);
    for (position, token) in containers.iter().enumerate() {
        let token = token.as_ref();
        cursor = PathStep::parse(token)
            .and_then(|step| cursor.step(step))
            .ok_or_else(|| not_found(position, token))?;
    }

    cursor
        .text(last.as_ref())
        .ok_or_else(|| ResolveError::FieldNotFound {
            field: last.as_ref().to_string(),
        })
}

/// Resolve a node by a path made only of node navigation tokens
pub(crate) fn resolve_node_mut<'a, S: AsRef<str>>(
    root: &'a mut Reflection,
    path: &[S],
) -> Result<&'a mut Reflection, ResolveError> {
    let mut cursor = CursorMut::Node(root);
    for (position, token) in path.iter().enumerate() {
        let token = token.as_ref();
        cursor = PathStep::parse(token)
            .and_then(|step| cursor.step(step))
            .ok_or_else(|| not_found(position, token))?;
    }

    match cursor {
        CursorMut::Node(node) => Ok(node),
        _ => Err(not_found(path.len().saturating_sub(1), "")),
    }
}
