//! Error types for the embed service.
//!
//! Request-level errors are rendered as simple HTML error pages rather than
//! JSON. Feed and lookup failures are not request errors; they are shown
//! inline in the page.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{DOCTYPE, PreEscaped, html};

/// Embed service error type.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// Query parameters were missing or unusable.
    #[error("invalid parameters: {0}")]
    InvalidParameters(#[from] tootfeed_core::Error),

    /// A required query parameter was absent.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for EmbedError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            Self::InvalidParameters(err) => (
                StatusCode::BAD_REQUEST,
                "Invalid Parameters",
                format!("The feed parameters could not be used: {err}"),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad Request", msg.clone()),
        };
        tracing::debug!(error = %self, "rejecting request");

        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (title) }
                    meta name="robots" content="noindex";
                    style { (PreEscaped(crate::render::components::ERROR_CSS)) }
                }
                body {
                    main class="error-page" {
                        h1 { (title) }
                        p { (message) }
                        a href="/" { "Back to start" }
                    }
                }
            }
        };

        (status, markup).into_response()
    }
}
