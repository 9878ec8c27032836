//! HTML rendering for toots and feeds.
//!
//! Post bodies only reach the output as a `SanitizedFragment`; everything
//! else is built with [maud](https://maud.lambda.xyz/), which escapes all
//! dynamic values.

pub mod body;
pub mod card;
pub mod components;
pub mod feed;
pub mod media;
pub mod poll;
pub mod post;

pub use feed::{FeedEntry, FeedTarget, MarkupBuffer, mount_feed, render_feed};
pub use post::{PostRenderer, RenderError, RenderedPost};
