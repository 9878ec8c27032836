//! Account lookup: `GET /lookup?acct=user@instance`.

use axum::extract::{Query, State};
use axum::response::Response;
use maud::{Markup, html};
use serde::Deserialize;
use tootfeed_core::AccountHandle;

use super::html_response;
use crate::client::{LookupError, ResolvedAccount};
use crate::error::EmbedError;
use crate::render::components::page_shell;
use crate::state::AppState;

/// Query string for the lookup page.
#[derive(Debug, Deserialize)]
pub struct LookupParams {
    /// Free-text `user@instance` handle.
    pub acct: Option<String>,
}

/// Resolve a handle and show its ID, or show why it could not be resolved.
///
/// Syntax, network, and missing-ID failures are reported inline.
pub async fn lookup_page(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<Response, EmbedError> {
    let acct = params
        .acct
        .ok_or_else(|| EmbedError::BadRequest("missing parameter: acct".to_string()))?;

    let outcome = match AccountHandle::parse(&acct) {
        Ok(handle) => state.client.lookup_account(&handle).await,
        Err(err) => Err(LookupError::from(err)),
    };
    if let Err(err) = &outcome {
        tracing::info!(acct = %acct, error = %err, "account lookup failed");
    }

    Ok(html_response(page_shell(
        "Account lookup",
        &state.config.site_name,
        lookup_body(&acct, &outcome),
    )))
}

fn lookup_body(acct: &str, outcome: &Result<ResolvedAccount, LookupError>) -> Markup {
    html! {
        form class="lookup-form" method="get" action="/lookup" {
            input type="text" name="acct" value=(acct) placeholder="user@instance" required;
            button type="submit" { "Look up" }
        }
        @match outcome {
            Ok(resolved) => {
                div class="lookup-result" {
                    p { "Account " strong { (resolved.handle.to_string()) } " has id " code { (resolved.id) } }
                    p { "Statuses: " code { (resolved.statuses_url.as_str()) } }
                    p { a href=(feed_link(resolved)) { "Show feed" } }
                }
            }
            Err(err) => {
                div class="error" { (err.to_string()) }
            }
        }
    }
}

/// `/feed` link for a resolved account.
fn feed_link(resolved: &ResolvedAccount) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("instance", &resolved.handle.instance)
        .append_pair("id", &resolved.id)
        .finish();
    format!("/feed?{query}")
}
