//! A parsed XML document.
//!
//! `XmlTree` owns the document's root element and offers index-path
//! navigation plus a selection shortcut that evaluates a `Path` against the
//! root element.
//!
//! # Example
//!
//! ```
//! use xmlquill::document::tree::XmlTree;
//! use xmlquill::document::node::{Element, XmlNode};
//! use xmlquill::query::{Path, Step};
//!
//! let tree = XmlTree::new(
//!     XmlNode::new("results")
//!         .with_child(XmlNode::new("room").with_attribute("type", "single"))
//!         .with_child(XmlNode::new("room").with_attribute("type", "double")),
//! );
//!
//! let path = Path::new(vec![Step::attribute("type", "double")]);
//! let rooms = tree.select(&path).unwrap();
//! assert_eq!(rooms.len(), 1);
//!
//! // Index paths count element children only
//! let second = tree.get_node(&[1]).unwrap();
//! assert_eq!(second.attribute("type"), Some("double"));
//! ```

use super::node::{Element, XmlNode};
use crate::query::{selector, Path, SelectError};

/// A complete XML document rooted at a single element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlTree {
    root: XmlNode,
}

impl XmlTree {
    /// Creates a tree with the given root element.
    pub fn new(root: XmlNode) -> Self {
        Self { root }
    }

    /// Returns the document's root element.
    pub fn root(&self) -> &XmlNode {
        &self.root
    }

    /// Consumes the tree, returning its root element.
    pub fn into_root(self) -> XmlNode {
        self.root
    }

    /// Gets the element at the given index path.
    ///
    /// Each index selects the nth *element* child of the current node; text
    /// and comments are not counted. An empty path returns the root.
    /// Returns `None` when an index is out of bounds.
    pub fn get_node(&self, path: &[usize]) -> Option<&XmlNode> {
        let mut current = &self.root;

        for &index in path {
            current = current.child_elements().nth(index)?;
        }

        Some(current)
    }

    /// Evaluates `path` against the root element.
    ///
    /// The first step is tested against the root's element children, so the
    /// root itself is never part of the result.
    pub fn select(&self, path: &Path) -> Result<Vec<&XmlNode>, SelectError> {
        selector::select(&self.root, path)
    }
}
