//! Minimal owned XML element tree.
//!
//! E-utilities responses are deeply nested, sparsely populated and mix text
//! with inline markup (`<i>`, `<sup>`, ...). Instead of mapping them onto rigid
//! serde structs, documents are read with `quick-xml` into a small tree and
//! callers walk it with [`Element::child`], [`Element::children`] and
//! [`Element::path`].
//!
//! Text content is stored as it appeared in the document. Entity references
//! are resolved on access by [`Element::text`], which can therefore fail on a
//! malformed entity without invalidating the rest of the document.

use crate::error::{OptionExt, PubmedError, Result};
use quick_xml::escape::{unescape, EscapeError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// A node inside an element
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Child element
    Element(Element),
    /// Escaped character data
    Text(String),
    /// CDATA section (never escaped)
    CData(String),
}

/// An XML element with its attributes and children in document order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Tag name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value (already unescaped)
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// All child elements with the given name, in document order
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    /// All child elements
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Consume the element, yielding owned child elements with the given name
    pub fn into_children(self, name: &str) -> Vec<Element> {
        self.children
            .into_iter()
            .filter_map(|n| match n {
                Node::Element(e) if e.name == name => Some(e),
                _ => None,
            })
            .collect()
    }

    /// Follow a chain of first-matching child names
    pub fn path(&self, names: &[&str]) -> Option<&Element> {
        names.iter().try_fold(self, |el, name| el.child(name))
    }

    /// Concatenated text of this element and all descendants, trimmed.
    ///
    /// Inline markup is flattened: `a <i>b</i> c` reads as `a b c`.
    pub fn text(&self) -> std::result::Result<String, EscapeError> {
        let mut out = String::new();
        self.collect_text(&mut out)?;
        Ok(out.trim().to_string())
    }

    /// Like [`Element::text`], but entity references that cannot be resolved
    /// are left as written instead of failing.
    pub fn text_lossy(&self) -> String {
        self.text().unwrap_or_else(|_| self.raw_text())
    }

    /// Concatenated text exactly as written in the document, trimmed
    pub fn raw_text(&self) -> String {
        let mut out = String::new();
        self.collect_raw(&mut out);
        out.trim().to_string()
    }

    /// Append a child node
    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder-style child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder-style text content (given unescaped, stored escaped)
    pub fn with_text(mut self, text: &str) -> Self {
        self.children
            .push(Node::Text(quick_xml::escape::escape(text).into_owned()));
        self
    }

    fn collect_text(&self, out: &mut String) -> std::result::Result<(), EscapeError> {
        for node in &self.children {
            match node {
                Node::Element(e) => e.collect_text(out)?,
                Node::Text(raw) => out.push_str(&unescape(raw)?),
                Node::CData(s) => out.push_str(s),
            }
        }
        Ok(())
    }

    fn collect_raw(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Element(e) => e.collect_raw(out),
                Node::Text(s) | Node::CData(s) => out.push_str(s),
            }
        }
    }
}

/// Parse a complete document and return its root element.
///
/// Declarations, doctypes, comments and processing instructions are skipped.
pub fn parse(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(e) => stack.push(open_element(&e)?),
            Event::Empty(e) => {
                let element = open_element(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_parse("Unbalanced closing tag")?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push(Node::Text(utf8(&t)?.to_string()));
                }
            }
            Event::CData(c) => {
                if let Some(parent) = stack.last_mut() {
                    let bytes = c.into_inner();
                    parent.push(Node::CData(utf8(&bytes)?.to_string()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(PubmedError::Parse(format!(
            "Unexpected end of document inside <{}>",
            open.name
        )));
    }

    root.ok_or_parse("Document has no root element")
}

fn open_element(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(utf8(start.name().as_ref())?);
    for attr in start.attributes() {
        let attr = attr.map_err(parse_error)?;
        let key = utf8(attr.key.as_ref())?.to_string();
        let value = attr.unescape_value().map_err(parse_error)?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(PubmedError::Parse(format!(
            "Second root element <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| PubmedError::Parse(format!("Invalid UTF-8: {}", e)))
}

fn parse_error(e: impl std::fmt::Display) -> PubmedError {
    PubmedError::Parse(format!("Malformed XML: {}", e))
}
