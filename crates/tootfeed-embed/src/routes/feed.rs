//! Feed routes: `GET /feed` (full page) and `GET /fragment` (bare feed).
//!
//! Both take the embed parameters `instance`, `id` or `url`, `limit`,
//! `exclude-replies`, and `exclude-reblogs`.

use axum::extract::{Query, State};
use axum::response::Response;
use tootfeed_core::{AllowListPolicy, FeedParams, FeedSource};

use super::html_response;
use crate::error::EmbedError;
use crate::render::components::page_shell;
use crate::render::{MarkupBuffer, PostRenderer, mount_feed};
use crate::state::AppState;

/// Full HTML page with the rendered feed.
pub async fn feed_page(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<Response, EmbedError> {
    let (source, buffer) = load_feed(&state, params).await?;
    let title = match &source {
        FeedSource::Account(feed) => format!("Toots of {} on {}", feed.id, feed.instance),
        FeedSource::Url(_) => "Toots".to_string(),
    };
    Ok(html_response(page_shell(
        &title,
        &state.config.site_name,
        buffer.into_markup(),
    )))
}

/// The rendered feed without a page shell, for embedding.
pub async fn feed_fragment(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<Response, EmbedError> {
    let (_, buffer) = load_feed(&state, params).await?;
    Ok(html_response(buffer.into_markup()))
}

async fn load_feed(
    state: &AppState,
    params: FeedParams,
) -> Result<(FeedSource, MarkupBuffer), EmbedError> {
    let source = params.into_source(state.config.default_limit)?;
    // Unusable or non-public targets are a 400, not an inline feed error.
    let url = source.url()?;
    state.client.check_host(&url)?;

    let outcome = state.client.fetch_statuses(&source).await;
    let renderer = PostRenderer::new(AllowListPolicy::mastodon(), state.config.shortcode_syntax);

    let mut buffer = MarkupBuffer::new();
    mount_feed(&mut buffer, &renderer, &source, outcome);
    Ok((source, buffer))
}
