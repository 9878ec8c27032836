//! Route definitions for the embed service.
//!
//! ## Routes
//!
//! - `GET /` - Home page with lookup and feed forms
//! - `GET /health` - Health check (JSON)
//! - `GET /lookup?acct=user@instance` - Resolve a handle to an account ID
//! - `GET /feed?…` - Rendered feed as a full page
//! - `GET /fragment?…` - Rendered feed without the page shell

mod feed;
mod health;
mod home;
mod lookup;

use axum::Router;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use maud::Markup;

use crate::render::components::CSP_HEADER;
use crate::state::AppState;

/// Build the complete embed service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home_page))
        .route("/health", get(health::health_check))
        .route("/lookup", get(lookup::lookup_page))
        .route("/feed", get(feed::feed_page))
        .route("/fragment", get(feed::feed_fragment))
        .with_state(state)
}

/// Wrap rendered markup in a response with HTML and security headers.
fn html_response(markup: Markup) -> Response {
    let mut response = (StatusCode::OK, markup).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CSP_HEADER),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    response
}
