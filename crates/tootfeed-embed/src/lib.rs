//! Tootfeed Embed - sanitized HTML feeds of Mastodon toots.
//!
//! This crate provides a small HTTP server that fetches an account's public
//! statuses from a Mastodon instance and renders them as plain HTML, either
//! as a full page or as a bare fragment for embedding in another site.
//!
//! # Architecture
//!
//! - **Client**: Fetches statuses and resolves `user@instance` handles via reqwest
//! - **Render**: Sanitizes toot bodies with `tootfeed-core` and builds markup with maud
//! - **Routes**: Home, lookup, feed, and fragment pages
//!
//! # URL Pattern
//!
//! ```text
//! GET /feed?instance=mastodon.social&id=109...&limit=10&exclude-replies
//! GET /fragment?url=https://mastodon.social/api/v1/accounts/109.../statuses
//! GET /lookup?acct=user@instance
//! ```
//!
//! # Security
//!
//! - Toot bodies pass an allow-list sanitizer; any violation drops the whole toot
//! - All other dynamic content is HTML-escaped by maud
//! - URLs are validated (HTTPS/HTTP only) before use in attributes
//! - Content-Security-Policy limits scripts to the inline sensitive-content toggle
//! - X-Frame-Options: DENY prevents clickjacking

pub mod client;
pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

#[cfg(test)]
mod fixtures;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
