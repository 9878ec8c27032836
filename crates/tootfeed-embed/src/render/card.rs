//! Link preview cards.
//!
//! A card that cannot be rendered is replaced by a short notice. The failure
//! stays inside the card; the rest of the post still renders.

use maud::{Markup, html};
use tootfeed_core::{CardEntry, LinkCard, is_safe_url};

use super::components::safe_href;
use super::post::RenderError;

/// Text of the per-card fallback node.
pub const CARD_PLACEHOLDER: &str = "could not render card";

/// Render `card`, or the card notice if it is malformed.
pub fn render_card(card: &CardEntry) -> Markup {
    let card = match card {
        Ok(card) => card,
        Err(reason) => {
            tracing::warn!(error = %reason, "could not decode link card");
            return card_notice();
        }
    };
    match try_render_card(card) {
        Ok(markup) => markup,
        Err(err) => {
            tracing::warn!(url = %card.url, error = %err, "could not render link card");
            card_notice()
        }
    }
}

fn card_notice() -> Markup {
    html! {
        p class="toot-card-error" { (CARD_PLACEHOLDER) }
    }
}

fn try_render_card(card: &LinkCard) -> Result<Markup, RenderError> {
    let url = card.url.trim();
    if url.is_empty() {
        return Err(RenderError::Card("card has no URL".to_string()));
    }
    if !is_safe_url(url) {
        return Err(RenderError::UnsafeUrl {
            field: "card",
            url: url.to_string(),
        });
    }
    let image = match card.image.as_deref().filter(|i| !i.is_empty()) {
        Some(image) if !is_safe_url(image) => {
            return Err(RenderError::UnsafeUrl {
                field: "card image",
                url: image.to_string(),
            });
        }
        other => other,
    };
    let image_alt = card.image_description.as_deref().unwrap_or("");
    let authors = card.card_authors();

    Ok(html! {
        div class="toot-card-wrapper" {
            a class="toot-card" href=(url) target="_blank" rel="noopener" {
                @if let Some(image) = image {
                    img class="toot-card-image" src=(image) alt=(image_alt) loading="lazy";
                }
                div class="toot-card-text" {
                    @if !card.title.is_empty() {
                        div class="toot-card-title" { (card.title) }
                    }
                    @if !card.description.is_empty() {
                        div class="toot-card-description" { (card.description) }
                    }
                }
            }
            @if authors.iter().any(|a| !a.name.is_empty()) {
                div class="toot-card-authors" {
                    "by "
                    @for (i, author) in authors.iter().filter(|a| !a.name.is_empty()).enumerate() {
                        @if i > 0 { ", " }
                        @if let Some(href) = safe_href(&author.url) {
                            a href=(href) target="_blank" rel="noopener" { (author.name) }
                        } @else {
                            (author.name)
                        }
                    }
                }
            }
        }
    })
}
