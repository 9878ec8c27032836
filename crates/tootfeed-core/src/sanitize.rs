//! Fail-closed validation of parsed post markup.
//!
//! The sanitizer never repairs a tree. A node with a tag or attribute outside
//! the [`AllowListPolicy`] rejects the whole fragment, and the caller renders
//! a placeholder instead. Only a [`SanitizedFragment`] can be handed to the
//! renderer, so an unchecked tree cannot reach the output.

use crate::error::{Error, Result};
use crate::markup::{Element, ParsedNode, parse_fragment_html};
use crate::policy::{AllowListPolicy, is_safe_url};

/// Validates markup trees against an injected policy.
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer<'p> {
    policy: &'p AllowListPolicy,
}

impl Default for Sanitizer<'static> {
    fn default() -> Self {
        Self::new(AllowListPolicy::mastodon())
    }
}

impl<'p> Sanitizer<'p> {
    /// Create a sanitizer enforcing `policy`.
    pub fn new(policy: &'p AllowListPolicy) -> Self {
        Self { policy }
    }

    /// The policy this sanitizer enforces.
    pub fn policy(&self) -> &'p AllowListPolicy {
        self.policy
    }

    /// Validate sibling roots in document order, stopping at the first violation.
    pub fn check(&self, nodes: &[ParsedNode]) -> Result<()> {
        nodes.iter().try_for_each(|node| self.check_node(node, 0))
    }

    /// Validate `nodes` and, on success, mark them safe to render.
    pub fn sanitize(&self, nodes: Vec<ParsedNode>) -> Result<SanitizedFragment> {
        self.check(&nodes)?;
        Ok(SanitizedFragment { nodes })
    }

    /// Parse `html` and sanitize the resulting fragment.
    pub fn sanitize_html(&self, html: &str) -> Result<SanitizedFragment> {
        let nodes = parse_fragment_html(html, self.policy.max_depth())?;
        self.sanitize(nodes)
    }

    fn check_node(&self, node: &ParsedNode, depth: usize) -> Result<()> {
        match node {
            ParsedNode::Text(_) => Ok(()),
            ParsedNode::Element(element) => self.check_element(element, depth),
        }
    }

    fn check_element(&self, element: &Element, depth: usize) -> Result<()> {
        let max = self.policy.max_depth();
        if depth >= max {
            return Err(Error::NestingTooDeep { max });
        }

        let allowed = self
            .policy
            .attributes_allowed(&element.tag)
            .ok_or_else(|| Error::DisallowedTag {
                tag: element.tag.clone(),
            })?;

        for (name, value) in &element.attributes {
            if !allowed.contains(name) {
                return Err(Error::DisallowedAttribute {
                    tag: element.tag.clone(),
                    attribute: name.clone(),
                });
            }
            if self.policy.is_url_attribute(name) && !is_safe_url(value) {
                return Err(Error::UnsafeUrl {
                    tag: element.tag.clone(),
                    attribute: name.clone(),
                });
            }
        }

        element
            .children
            .iter()
            .try_for_each(|child| self.check_node(child, depth + 1))
    }
}

/// A fragment that passed sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedFragment {
    nodes: Vec<ParsedNode>,
}

impl SanitizedFragment {
    /// The validated nodes.
    pub fn nodes(&self) -> &[ParsedNode] {
        &self.nodes
    }

    /// Whether the fragment has no content.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Give back the validated nodes.
    pub fn into_nodes(self) -> Vec<ParsedNode> {
        self.nodes
    }
}
