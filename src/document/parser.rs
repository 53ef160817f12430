//! Builds an `XmlTree` from XML text.
//!
//! This is a thin adapter over quick-xml's streaming reader: start and end
//! events are folded into owned `XmlNode`s using an explicit stack of open
//! elements. Declarations, processing instructions and the doctype are
//! skipped. CDATA sections become ordinary text children.
//!
//! # Example
//!
//! ```
//! use xmlquill::document::parser::parse_xml;
//! use xmlquill::document::node::Element;
//!
//! let tree = parse_xml(r#"<results><room type="single"/></results>"#, true).unwrap();
//! assert_eq!(tree.root().name(), "results");
//! assert_eq!(tree.get_node(&[0]).unwrap().attribute("type"), Some("single"));
//! ```

use super::node::{XmlContent, XmlNode};
use super::tree::XmlTree;
use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

/// Parses an XML document into an `XmlTree`.
///
/// When `trim_text` is set, leading and trailing whitespace is removed from
/// text content and whitespace-only text is dropped entirely.
///
/// # Errors
///
/// Returns an error if:
/// - The input is not well-formed XML (mismatched tags, bad attributes, ...)
/// - An element is still open at end of input
/// - The document has no root element, or more than one
/// - Non-whitespace text appears outside the root element
pub fn parse_xml(source: &str, trim_text: bool) -> Result<XmlTree> {
    let mut reader = Reader::from_str(source);
    reader.trim_text(trim_text);

    let mut open: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .with_context(|| format!("Malformed XML near byte {}", position))?;

        match event {
            Event::Start(start) => open.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let node = element_from_start(&start)?;
                attach(&mut open, &mut root, node)?;
            }
            Event::End(_) => {
                let node = open
                    .pop()
                    .with_context(|| format!("Unexpected closing tag near byte {}", position))?;
                attach(&mut open, &mut root, node)?;
            }
            Event::Text(text) => {
                let text = text.unescape().context("Invalid character data")?;
                push_text(&mut open, text.into_owned())?;
            }
            Event::CData(cdata) => {
                let text = std::str::from_utf8(&cdata).context("CDATA is not valid UTF-8")?;
                push_text(&mut open, text.to_string())?;
            }
            Event::Comment(comment) => {
                if let Some(parent) = open.last_mut() {
                    let text = String::from_utf8_lossy(&comment).into_owned();
                    parent.push_child(XmlContent::Comment(text));
                }
            }
            Event::Eof => break,
            // Declarations, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        bail!("Unclosed element <{}> at end of input", unclosed.describe(false));
    }

    let root = root.context("Document has no root element")?;
    debug!(root = %root.describe(false), "parsed XML document");
    Ok(XmlTree::new(root))
}

/// Converts a start (or empty) tag into an element without children.
fn element_from_start(start: &BytesStart) -> Result<XmlNode> {
    let name = std::str::from_utf8(start.name().as_ref())
        .context("Element name is not valid UTF-8")?
        .to_string();

    let mut attributes = IndexMap::new();
    for attr in start.attributes() {
        let attr = attr.with_context(|| format!("Malformed attribute on <{}>", name))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .context("Attribute name is not valid UTF-8")?
            .to_string();
        let value = attr
            .unescape_value()
            .with_context(|| format!("Invalid value for attribute '{}'", key))?
            .into_owned();
        attributes.insert(key, value);
    }

    Ok(XmlNode::from_parts(name, attributes, Vec::new()))
}

/// Attaches a finished element to its parent, or makes it the root.
fn attach(open: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> Result<()> {
    match open.last_mut() {
        Some(parent) => parent.push_child(node),
        None if root.is_some() => {
            bail!("Multiple root elements: found <{}> after the root", node.describe(false))
        }
        None => *root = Some(node),
    }
    Ok(())
}

/// Appends text to the innermost open element.
fn push_text(open: &mut [XmlNode], text: String) -> Result<()> {
    match open.last_mut() {
        Some(parent) => parent.push_child(XmlContent::Text(text)),
        None if text.trim().is_empty() => {}
        None => bail!("Text outside the root element: {:?}", text.trim()),
    }
    Ok(())
}
