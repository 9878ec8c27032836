//! Typed representation of parsed post markup.
//!
//! Post bodies arrive as HTML text. They are parsed once with html5ever's
//! fragment parser and immediately converted into [`ParsedNode`] trees, so
//! the sanitizer and the renderer never touch the parser's own DOM types.

use std::cell::RefCell;

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, QualName, local_name, namespace_url, ns, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::{Error, Result};

/// One node of a parsed HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedNode {
    /// An element with its attributes and children.
    Element(Element),
    /// A run of character data (already entity-decoded).
    Text(String),
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in source order. Names are not deduplicated.
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<ParsedNode>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child node.
    pub fn child(mut self, node: impl Into<ParsedNode>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Look up the first attribute with the given name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl From<Element> for ParsedNode {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for ParsedNode {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Parse an HTML fragment as if it were the contents of `<body>`.
///
/// Comments, doctypes, and processing instructions are dropped. Trees nested
/// deeper than `max_depth` elements are rejected before conversion recurses
/// any further.
pub fn parse_fragment_html(html: &str, max_depth: usize) -> Result<Vec<ParsedNode>> {
    let context = QualName::new(None, ns!(html), local_name!("body"));
    let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, vec![]).one(html);

    // The fragment parser wraps its output in a synthetic <html> element.
    let document_children = dom.document.children.borrow();
    let Some(root) = document_children.first() else {
        return Ok(Vec::new());
    };

    convert_children(root, 0, max_depth)
}

fn convert_children(handle: &Handle, depth: usize, max_depth: usize) -> Result<Vec<ParsedNode>> {
    let children = handle.children.borrow();
    let mut nodes = Vec::with_capacity(children.len());
    for child in children.iter() {
        if let Some(node) = convert(child, depth, max_depth)? {
            nodes.push(node);
        }
    }
    Ok(nodes)
}

fn convert(handle: &Handle, depth: usize, max_depth: usize) -> Result<Option<ParsedNode>> {
    match &handle.data {
        NodeData::Text { contents } => Ok(Some(ParsedNode::Text(contents.borrow().to_string()))),
        NodeData::Element { name, attrs, .. } => {
            if depth >= max_depth {
                return Err(Error::NestingTooDeep { max: max_depth });
            }
            Ok(Some(ParsedNode::Element(Element {
                tag: name.local.to_string(),
                attributes: collect_attributes(attrs),
                children: convert_children(handle, depth + 1, max_depth)?,
            })))
        }
        NodeData::Document
        | NodeData::Doctype { .. }
        | NodeData::Comment { .. }
        | NodeData::ProcessingInstruction { .. } => Ok(None),
    }
}

fn collect_attributes(attrs: &RefCell<Vec<html5ever::Attribute>>) -> Vec<(String, String)> {
    attrs
        .borrow()
        .iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect()
}
