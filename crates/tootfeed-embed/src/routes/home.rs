//! Home page with the account lookup and feed forms.

use axum::extract::State;
use axum::response::Response;
use maud::{Markup, html};

use super::html_response;
use crate::render::components::page_shell;
use crate::state::AppState;

/// Render the home page.
pub async fn home_page(State(state): State<AppState>) -> Response {
    html_response(page_shell(
        "Embed Mastodon toots",
        &state.config.site_name,
        home_body(&state.config.site_name),
    ))
}

fn home_body(site_name: &str) -> Markup {
    html! {
        h1 { (site_name) }
        p { "Render a Mastodon account's toots as plain, sanitized HTML." }

        section {
            h2 { "Find an account ID" }
            form class="lookup-form" method="get" action="/lookup" {
                input type="text" name="acct" placeholder="user@instance" required;
                button type="submit" { "Look up" }
            }
        }

        section {
            h2 { "Show a feed" }
            form class="feed-form" method="get" action="/feed" {
                input type="text" name="instance" placeholder="mastodon.social" required;
                input type="text" name="id" placeholder="account id" required;
                input type="number" name="limit" placeholder="limit" min="1";
                label { input type="checkbox" name="exclude-replies"; " no replies" }
                label { input type="checkbox" name="exclude-reblogs"; " no boosts" }
                button type="submit" { "Show" }
            }
            p {
                "Use " code { "/fragment" } " with the same parameters to get the bare feed for embedding."
            }
        }
    }
}
