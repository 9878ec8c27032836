//! Feed assembly: one entry per status, and mounting into a live target.

use maud::{Markup, Render, html};
use tootfeed_core::FeedSource;

use super::components::{error_node, post_placeholder};
use super::post::{PostRenderer, RenderError, RenderedPost};
use crate::client::{FeedError, StatusEntry};

/// One rendered feed item.
#[derive(Debug, Clone)]
pub enum FeedEntry {
    /// A successfully rendered post.
    Post(Box<RenderedPost>),
    /// The fallback shown in place of a post that failed to render.
    Placeholder,
}

impl Render for FeedEntry {
    fn render(&self) -> Markup {
        match self {
            Self::Post(post) => post.render(),
            Self::Placeholder => post_placeholder(),
        }
    }
}

/// Render every status in feed order.
///
/// Failures are isolated: a status that does not decode or render becomes a
/// placeholder and its siblings are unaffected.
pub fn render_feed(renderer: &PostRenderer<'_>, statuses: &[StatusEntry]) -> Vec<FeedEntry> {
    statuses
        .iter()
        .map(|status| {
            let rendered = status
                .as_ref()
                .map_err(|e| RenderError::Decode(e.to_string()))
                .and_then(|post| renderer.render(post));
            match rendered {
                Ok(post) => FeedEntry::Post(Box::new(post)),
                Err(err) => {
                    let post_id = status.as_ref().map(|p| p.id.as_str()).unwrap_or("?");
                    tracing::warn!(post_id, error = %err, "could not render toot");
                    FeedEntry::Placeholder
                }
            }
        })
        .collect()
}

/// A container the feed is written into.
pub trait FeedTarget {
    /// Whether the container is still part of a live document.
    fn is_attached(&self) -> bool;

    /// Remove all children.
    fn clear(&mut self);

    /// Append one child node.
    fn append(&mut self, node: Markup);
}

/// In-memory [`FeedTarget`] that collects nodes for a response body.
#[derive(Debug, Clone)]
pub struct MarkupBuffer {
    attached: bool,
    nodes: Vec<Markup>,
}

impl Default for MarkupBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupBuffer {
    /// An empty, attached buffer.
    pub fn new() -> Self {
        Self {
            attached: true,
            nodes: Vec::new(),
        }
    }

    /// Mark the buffer as detached; later mounts leave it untouched.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Nodes appended so far.
    pub fn nodes(&self) -> &[Markup] {
        &self.nodes
    }

    /// The collected nodes wrapped in the feed container.
    pub fn into_markup(self) -> Markup {
        html! {
            div class="toots" {
                @for node in &self.nodes { (node) }
            }
        }
    }
}

impl FeedTarget for MarkupBuffer {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn clear(&mut self) {
        self.nodes.clear();
    }

    fn append(&mut self, node: Markup) {
        self.nodes.push(node);
    }
}

/// Write a fetch outcome into `target`.
///
/// A detached target is left alone. A fetch error or an empty feed yields
/// exactly one error node; otherwise one node per status, in order.
pub fn mount_feed<T: FeedTarget + ?Sized>(
    target: &mut T,
    renderer: &PostRenderer<'_>,
    source: &FeedSource,
    outcome: Result<Vec<StatusEntry>, FeedError>,
) {
    if !target.is_attached() {
        tracing::debug!("feed target detached, dropping result");
        return;
    }

    target.clear();
    match outcome {
        Err(err) => {
            tracing::warn!(error = %err, "could not load feed");
            target.append(error_node(&err.to_string()));
        }
        Ok(statuses) if statuses.is_empty() => {
            target.append(error_node(&source.empty_feed_message()));
        }
        Ok(statuses) => {
            for entry in render_feed(renderer, &statuses) {
                target.append(entry.render());
            }
        }
    }
}
