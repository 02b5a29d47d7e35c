//! Slash-delimited element addressing.
//!
//! An [`ElementPath`] such as `general/remote_management/management_password`
//! names a chain of tags starting below the document root. Every step selects
//! the *first* child (in document order) carrying that tag, so repeated
//! siblings after the first are never touched.

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::tree::XmlNode;

/// Tag of the identifier element removed by [`strip_child_ids`].
pub const ID_TAG: &str = "id";

/// Errors raised when building an [`ElementPath`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("element path is empty")]
    Empty,
    #[error("element path '{0}' contains an empty segment")]
    EmptySegment(String),
}

/// A validated, non-empty chain of element tags.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementPath {
    segments: Vec<String>,
}

impl ElementPath {
    /// Parse a slash-joined path, rejecting empty input and empty segments.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        let segments: Vec<String> = raw.split('/').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment(raw.to_string()));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Tag of the addressed element.
    pub fn last(&self) -> &str {
        // Construction guarantees at least one segment.
        &self.segments[self.segments.len() - 1]
    }

    /// Whether `prefix` names this element or one of its ancestors.
    pub fn starts_with(&self, prefix: &ElementPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    fn parent_segments(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }
}

impl Display for ElementPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Locate the element addressed by `path`.
pub fn find<'a>(tree: &'a XmlNode, path: &ElementPath) -> Option<&'a XmlNode> {
    let mut current = tree;
    for segment in path.segments() {
        current = current.get_child(segment)?;
    }
    Some(current)
}

/// Mutable variant of [`find`].
pub fn find_mut<'a>(tree: &'a mut XmlNode, path: &ElementPath) -> Option<&'a mut XmlNode> {
    descend_mut(tree, path.segments())
}

/// Locate the element addressed by `path`, creating any missing links.
///
/// Created elements are appended after existing siblings and start without
/// text or children.
pub fn ensure<'a>(tree: &'a mut XmlNode, path: &ElementPath) -> &'a mut XmlNode {
    let mut current = tree;
    for segment in path.segments() {
        current = current.ensure_child(segment);
    }
    current
}

/// Remove the addressed element and its subtree.
///
/// Returns `false` when the element (or any ancestor) does not exist.
pub fn remove(tree: &mut XmlNode, path: &ElementPath) -> bool {
    descend_mut(tree, path.parent_segments())
        .and_then(|parent| parent.remove_child(path.last()))
        .is_some()
}

/// Drop the direct `id` child from every direct child of the addressed collection.
///
/// Returns `None` when the collection is absent, otherwise how many `id`
/// elements were removed. Deeper `id` elements are left alone.
pub fn strip_child_ids(tree: &mut XmlNode, path: &ElementPath) -> Option<usize> {
    let collection = find_mut(tree, path)?;
    let removed = collection
        .children
        .iter_mut()
        .filter_map(|member| member.remove_child(ID_TAG))
        .count();
    Some(removed)
}

fn descend_mut<'a>(tree: &'a mut XmlNode, segments: &[String]) -> Option<&'a mut XmlNode> {
    let mut current = tree;
    for segment in segments {
        current = current.get_child_mut(segment)?;
    }
    Some(current)
}
