//! Single-post renderer.
//!
//! Boosts are shown as the boosted post with a "boosted by" line. The body
//! is parsed, sanitized, and only then serialized; a post whose body fails
//! sanitization is never partially shown.

use maud::{Markup, Render, html};
use tootfeed_core::{
    AllowListPolicy, EmojiExpander, Post, Sanitizer, ShortcodeSyntax,
};

use super::body::render_fragment;
use super::card::render_card;
use super::components::{author_header, display_name, format_timestamp, safe_href};
use super::media::render_media;
use super::poll::render_poll;

/// Why a post (or part of one) could not be rendered.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The body failed parsing or sanitization.
    #[error(transparent)]
    Markup(#[from] tootfeed_core::Error),

    /// A media, card, or similar URL was not http(s).
    #[error("{field} URL is not http(s): {url}")]
    UnsafeUrl {
        /// Which field carried the URL.
        field: &'static str,
        /// The rejected value.
        url: String,
    },

    /// A link card was missing required data.
    #[error("malformed card: {0}")]
    Card(String),

    /// A status object did not match the expected shape.
    #[error("malformed status: {0}")]
    Decode(String),
}

/// Renders posts with an injected policy and shortcode syntax.
#[derive(Debug, Clone, Copy)]
pub struct PostRenderer<'p> {
    sanitizer: Sanitizer<'p>,
    expander: EmojiExpander,
}

impl Default for PostRenderer<'static> {
    fn default() -> Self {
        Self::new(AllowListPolicy::mastodon(), ShortcodeSyntax::default())
    }
}

impl<'p> PostRenderer<'p> {
    /// Create a renderer enforcing `policy`.
    pub fn new(policy: &'p AllowListPolicy, syntax: ShortcodeSyntax) -> Self {
        Self {
            sanitizer: Sanitizer::new(policy),
            expander: EmojiExpander::new(syntax),
        }
    }

    /// Render one post.
    ///
    /// Any error means the whole post should be replaced by a placeholder.
    /// Card failures are the exception and are handled inside the card.
    pub fn render(&self, post: &Post) -> Result<RenderedPost, RenderError> {
        let shown = post.unwrap_reblog();
        let boosted_by = (!std::ptr::eq(shown, post)).then(|| self.boosted_by(post));

        let body = self.sanitizer.sanitize_html(&shown.content)?;
        let media = render_media(&shown.media_attachments)?;

        let content = html! {
            (render_fragment(&body))
            (media)
            @if let Some(poll) = &shown.poll {
                (render_poll(poll))
            }
            @if let Some(card) = &shown.card {
                (render_card(card))
            }
        };

        Ok(RenderedPost {
            id: shown.id.clone(),
            boosted_by,
            header: self.header(shown),
            spoiler: shown.spoiler().map(str::to_string),
            sensitive: shown.sensitive,
            body_hidden: shown.sensitive,
            content,
        })
    }

    fn header(&self, post: &Post) -> Markup {
        let permalink = post.permalink().and_then(safe_href);
        html! {
            div class="toot-meta" {
                @if let Some(href) = permalink {
                    a class="toot-link" href=(href) target="_blank" rel="noopener" title="permalink" { "🔗" }
                }
                time class="toot-time" datetime=(post.created_at.to_rfc3339()) {
                    (format_timestamp(&post.created_at))
                }
            }
            (author_header(&post.account, &self.expander))
        }
    }

    fn boosted_by(&self, booster: &Post) -> Markup {
        let account = &booster.account;
        html! {
            div class="toot-boost" {
                "boosted by "
                @if let Some(href) = safe_href(&account.url) {
                    a href=(href) target="_blank" rel="noopener" { (display_name(account, &self.expander)) }
                } @else {
                    (display_name(account, &self.expander))
                }
            }
        }
    }
}

/// A rendered post plus its show/hide state.
#[derive(Debug, Clone)]
pub struct RenderedPost {
    id: String,
    boosted_by: Option<Markup>,
    header: Markup,
    spoiler: Option<String>,
    sensitive: bool,
    body_hidden: bool,
    content: Markup,
}

impl RenderedPost {
    /// ID of the post actually shown (the boosted one for boosts).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the post carries the sensitive toggle.
    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Whether the body region is currently hidden.
    pub fn body_hidden(&self) -> bool {
        self.body_hidden
    }

    /// Flip body visibility. Posts without the toggle stay visible.
    ///
    /// Returns the new hidden state.
    pub fn toggle_sensitive(&mut self) -> bool {
        if self.sensitive {
            self.body_hidden = !self.body_hidden;
        }
        self.body_hidden
    }
}

impl Render for RenderedPost {
    fn render(&self) -> Markup {
        html! {
            div class="toot" data-id=(self.id) {
                @if let Some(boosted_by) = &self.boosted_by {
                    (boosted_by)
                }
                (self.header)
                @if let Some(spoiler) = &self.spoiler {
                    p class="spoiler-text" { (spoiler) }
                }
                @if self.sensitive {
                    button class="toot-show-sensitive" type="button"
                        onclick="this.closest('.toot').querySelector('.toot-content').classList.toggle('hidden')" {
                        "show/hide content"
                    }
                }
                div.toot-content.hidden[self.body_hidden] {
                    (self.content)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{post, post_value};

    fn render(post: &Post) -> String {
        PostRenderer::default().render(post).unwrap().render().into_string()
    }

    #[test]
    fn renders_header_and_body() {
        let html = render(&post("100", "<p>Hello <b>world</b></p>"));
        assert!(html.contains(r#"href="https://example.social/@alice/100""#));
        assert!(html.contains("2024-03-05 14:07"));
        assert!(html.contains("@alice"));
        assert!(html.contains("<p>Hello <b>world</b></p>"));
        assert!(html.contains(r#"<div class="toot-content">"#));
        assert!(!html.contains("toot-show-sensitive"));
    }

    #[test]
    fn disallowed_tag_fails_whole_post() {
        let err = PostRenderer::default()
            .render(&post("1", "<p>ok</p><script>alert(1)</script>"))
            .unwrap_err();
        assert!(matches!(err, RenderError::Markup(e) if e.is_sanitizer_violation()));
    }

    #[test]
    fn boost_renders_inner_post() {
        let mut outer = post_value("2", "");
        outer["account"]["display_name"] = serde_json::json!("Booster");
        outer["account"]["url"] = serde_json::json!("https://example.social/@booster");
        let mut inner = post_value("1", "<p>original words</p>");
        inner["account"]["acct"] = serde_json::json!("carol@remote.example");
        outer["reblog"] = inner;
        let post: Post = serde_json::from_value(outer).unwrap();

        let rendered = PostRenderer::default().render(&post).unwrap();
        assert_eq!(rendered.id(), "1");
        let html = rendered.render().into_string();
        assert!(html.contains("original words"));
        assert!(html.contains("@carol@remote.example"));
        assert!(html.contains("boosted by"));
        assert!(html.contains(r#"href="https://example.social/@booster""#));
    }

    #[test]
    fn plain_post_has_no_boost_line() {
        assert!(!render(&post("1", "<p>x</p>")).contains("boosted by"));
    }

    #[test]
    fn spoiler_text_is_shown() {
        let mut p = post("1", "<p>x</p>");
        p.spoiler_text = "food <pics>".to_string();
        let html = render(&p);
        assert!(html.contains(r#"<p class="spoiler-text">food &lt;pics&gt;</p>"#));
    }

    #[test]
    fn sensitive_post_starts_hidden() {
        let mut p = post("1", "<p>x</p>");
        p.sensitive = true;
        let rendered = PostRenderer::default().render(&p).unwrap();
        assert!(rendered.is_sensitive());
        assert!(rendered.body_hidden());
        let html = rendered.render().into_string();
        assert!(html.contains("toot-show-sensitive"));
        assert!(html.contains(r#"<div class="toot-content hidden">"#));
    }

    #[test]
    fn toggle_flips_only_its_own_post() {
        let mut p = post("1", "<p>x</p>");
        p.sensitive = true;
        let renderer = PostRenderer::default();
        let mut first = renderer.render(&p).unwrap();
        let second = renderer.render(&p).unwrap();

        assert!(!first.toggle_sensitive());
        assert!(!first.body_hidden());
        assert!(second.body_hidden());
        assert!(
            first
                .render()
                .into_string()
                .contains(r#"<div class="toot-content">"#)
        );
        assert!(first.toggle_sensitive());
    }

    #[test]
    fn toggle_is_noop_for_non_sensitive() {
        let mut rendered = PostRenderer::default()
            .render(&post("1", "<p>x</p>"))
            .unwrap();
        assert!(!rendered.toggle_sensitive());
        assert!(!rendered.body_hidden());
    }

    #[test]
    fn unsafe_media_fails_post() {
        let mut value = post_value("1", "<p>x</p>");
        value["media_attachments"] = serde_json::json!([
            {"type": "image", "url": "javascript:x", "preview_url": "javascript:x"}
        ]);
        let post: Post = serde_json::from_value(value).unwrap();
        assert!(matches!(
            PostRenderer::default().render(&post),
            Err(RenderError::UnsafeUrl { .. })
        ));
    }

    #[test]
    fn bad_card_keeps_post() {
        let mut value = post_value("1", "<p>still here</p>");
        value["card"] = serde_json::json!({"url": "ftp://x.example/"});
        let post: Post = serde_json::from_value(value).unwrap();
        let html = render(&post);
        assert!(html.contains("still here"));
        assert!(html.contains("could not render card"));
    }

    #[test]
    fn malformed_card_field_keeps_post() {
        let mut value = post_value("1", "<p>body survives</p>");
        value["card"] = serde_json::json!({"url": "https://x.example/", "title": null});
        let post: Post = serde_json::from_value(value).unwrap();
        let html = render(&post);
        assert!(html.contains("body survives"));
        assert!(html.contains("could not render card"));
        assert!(!html.contains("could not render toot"));
    }

    #[test]
    fn poll_is_rendered() {
        let mut value = post_value("1", "<p>vote</p>");
        value["poll"] = serde_json::json!({
            "options": [{"title": "A", "votes_count": 3}, {"title": "B", "votes_count": 7}],
            "votes_count": 10
        });
        let post: Post = serde_json::from_value(value).unwrap();
        let html = render(&post);
        assert!(html.contains("7/10"));
        assert!(html.contains("poll-max"));
    }

    #[test]
    fn injected_policy_is_used() {
        let policy = AllowListPolicy::empty().with_tag("p", []);
        let renderer = PostRenderer::new(&policy, ShortcodeSyntax::Strict);
        assert!(renderer.render(&post("1", "<p>plain</p>")).is_ok());
        assert!(renderer.render(&post("1", "<p><b>bold</b></p>")).is_err());
    }
}
