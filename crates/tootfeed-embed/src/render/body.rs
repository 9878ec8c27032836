//! Serialization of sanitized post bodies back to HTML.
//!
//! Only a [`SanitizedFragment`] is accepted, so every tag and attribute
//! written here has already passed the allow-list. Text and attribute values
//! are escaped on the way out.

use maud::{Markup, PreEscaped, Render};
use tootfeed_core::{Element, ParsedNode, SanitizedFragment};

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Render a sanitized fragment as markup.
pub fn render_fragment(fragment: &SanitizedFragment) -> Markup {
    let mut out = String::new();
    for node in fragment.nodes() {
        write_node(&mut out, node);
    }
    PreEscaped(out)
}

fn write_node(out: &mut String, node: &ParsedNode) {
    match node {
        ParsedNode::Text(text) => text.render_to(out),
        ParsedNode::Element(element) => write_element(out, element),
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        value.render_to(out);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.tag.as_str()) {
        return;
    }

    for child in &element.children {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}
