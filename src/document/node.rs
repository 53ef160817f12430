//! XML element representation used by the selector engine.
//!
//! This module provides the core data structures for representing parsed XML
//! documents in xmlquill. Each element is an `XmlNode` carrying a tag name,
//! its attributes, and an ordered list of `XmlContent` children. Only element
//! children take part in selection; text and comments are kept so the tree
//! mirrors the source, but they are never match candidates.
//!
//! # Example
//!
//! ```
//! use xmlquill::document::node::{Element, XmlNode};
//!
//! let room = XmlNode::new("room")
//!     .with_attribute("type", "single")
//!     .with_child(XmlNode::new("rate").with_attribute("price", "234.00"))
//!     .with_text("available");
//!
//! assert_eq!(room.name(), "room");
//! assert_eq!(room.attribute("type"), Some("single"));
//! assert_eq!(room.child_elements().count(), 1);
//! assert_eq!(room.children().len(), 2);
//! ```

use indexmap::IndexMap;

/// The tree input contract required by the selector engine.
///
/// Any tree representation can be queried as long as each node can report
/// its name, look up attributes, and iterate its element children in
/// document order. Implementors filter out non-element content (text,
/// comments) in `child_elements`.
pub trait Element {
    /// The element's tag name.
    fn name(&self) -> &str;

    /// Looks up a single attribute value by key.
    fn attribute(&self, key: &str) -> Option<&str>;

    /// Iterates all attributes as `(key, value)` pairs.
    fn attributes(&self) -> impl Iterator<Item = (&str, &str)>;

    /// Iterates element children in document order, skipping other content.
    fn child_elements(&self) -> impl Iterator<Item = &Self>;
}

/// One piece of content inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlContent {
    /// A nested element
    Element(XmlNode),
    /// Character data (text and CDATA sections)
    Text(String),
    /// A comment (`<!-- ... -->`)
    Comment(String),
}

impl XmlContent {
    /// Returns the element if this content is one.
    pub fn as_element(&self) -> Option<&XmlNode> {
        match self {
            XmlContent::Element(node) => Some(node),
            XmlContent::Text(_) | XmlContent::Comment(_) => None,
        }
    }

    /// Returns true for element content.
    pub fn is_element(&self) -> bool {
        matches!(self, XmlContent::Element(_))
    }
}

impl From<XmlNode> for XmlContent {
    fn from(node: XmlNode) -> Self {
        XmlContent::Element(node)
    }
}

impl From<&str> for XmlContent {
    fn from(text: &str) -> Self {
        XmlContent::Text(text.to_string())
    }
}

impl From<String> for XmlContent {
    fn from(text: String) -> Self {
        XmlContent::Text(text)
    }
}

/// An XML element with attributes and ordered children.
///
/// Attribute keys are unique. Insertion order is kept for display only;
/// matching never depends on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    attributes: IndexMap<String, String>,
    children: Vec<XmlContent>,
}

impl XmlNode {
    /// Creates an element with no attributes and no children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Creates an element from all of its parts.
    pub fn from_parts(
        name: impl Into<String>,
        attributes: IndexMap<String, String>,
        children: Vec<XmlContent>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            children,
        }
    }

    /// Adds (or replaces) an attribute, builder style.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Appends a child, builder style.
    pub fn with_child(mut self, child: impl Into<XmlContent>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Appends a text child, builder style.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlContent::Text(text.into()));
        self
    }

    /// Appends a child in place.
    pub fn push_child(&mut self, child: impl Into<XmlContent>) {
        self.children.push(child.into());
    }

    /// Returns the attribute map.
    pub fn attribute_map(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Returns all children, including non-element content.
    pub fn children(&self) -> &[XmlContent] {
        &self.children
    }

    /// Concatenates the direct text children of this element.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                XmlContent::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Renders the start tag as a one-line summary, e.g. `rate price="234.00"`.
    ///
    /// Attribute values are shown verbatim; this is a description for humans,
    /// not markup.
    pub fn describe(&self, show_attributes: bool) -> String {
        let mut out = self.name.clone();
        if show_attributes {
            for (key, value) in &self.attributes {
                out.push_str(&format!(" {}=\"{}\"", key, value));
            }
        }
        out
    }
}

impl Element for XmlNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(XmlContent::as_element)
    }
}
