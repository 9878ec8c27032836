//! Core types and validation for rendering Mastodon posts.
//!
//! This crate provides:
//! - The Mastodon status, account, media, poll, and card model (serde)
//! - An allow-list policy and a fail-closed sanitizer for post HTML
//! - Custom emoji shortcode expansion for display names
//! - `user@instance` handles and statuses/lookup URL construction
//! - Shared error types
//!
//! Nothing here performs I/O.

mod error;

pub mod account;
pub mod emoji;
pub mod feed;
pub mod markup;
pub mod model;
pub mod policy;
pub mod sanitize;

// ═══════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════

/// Path of the account statuses endpoint, relative to an account.
pub const STATUSES_PATH: &str = "statuses";

/// Path of the account lookup endpoint on an instance.
pub const LOOKUP_PATH: &str = "/api/v1/accounts/lookup";

pub use account::AccountHandle;
pub use emoji::{EmojiExpander, NameFragment, ShortcodeSyntax};
pub use error::{Error, Result};
pub use feed::{AccountFeed, FeedParams, FeedSource};
pub use markup::{Element, ParsedNode, parse_fragment_html};
pub use model::{Account, CardEntry, LinkCard, MediaAttachment, MediaType, Poll, PollOption, Post};
pub use policy::{AllowListPolicy, is_public_host, is_public_ip, is_safe_url};
pub use sanitize::{SanitizedFragment, Sanitizer};
