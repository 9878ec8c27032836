//! Mastodon REST entities as returned by `/api/v1/accounts/:id/statuses`.
//!
//! Only the fields the renderer needs are modeled; unknown fields are ignored.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// A link card as sent by the server, or why it could not be decoded.
///
/// Cards are decoded apart from their post so a malformed card only costs
/// the card.
pub type CardEntry = std::result::Result<LinkCard, String>;

/// A status (toot).
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    /// Server-assigned status ID.
    pub id: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// HTML permalink, if the server provides one.
    #[serde(default)]
    pub url: Option<String>,
    /// ActivityPub URI.
    #[serde(default)]
    pub uri: String,
    /// The author.
    pub account: Account,
    /// Untrusted HTML body.
    #[serde(default)]
    pub content: String,
    /// Content warning shown before the body. Empty when absent.
    #[serde(default)]
    pub spoiler_text: String,
    /// Whether the body should start hidden.
    #[serde(default)]
    pub sensitive: bool,
    /// Attached media in display order.
    #[serde(default)]
    pub media_attachments: Vec<MediaAttachment>,
    /// Attached poll.
    #[serde(default)]
    pub poll: Option<Poll>,
    /// Link preview card.
    #[serde(default, deserialize_with = "lenient_card")]
    pub card: Option<CardEntry>,
    /// The boosted status when this one is a boost.
    #[serde(default)]
    pub reblog: Option<Box<Post>>,
}

impl Post {
    /// The innermost boosted status, or `self` when this is not a boost.
    pub fn unwrap_reblog(&self) -> &Post {
        let mut post = self;
        while let Some(inner) = post.reblog.as_deref() {
            post = inner;
        }
        post
    }

    /// The best link to this status: the HTML permalink, else the URI.
    pub fn permalink(&self) -> Option<&str> {
        self.url
            .as_deref()
            .or(Some(self.uri.as_str()))
            .filter(|u| !u.is_empty())
    }

    /// Spoiler text, or `None` when empty.
    pub fn spoiler(&self) -> Option<&str> {
        Some(self.spoiler_text.as_str()).filter(|s| !s.is_empty())
    }
}

fn lenient_card<'de, D>(deserializer: D) -> std::result::Result<Option<CardEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(|v| serde_json::from_value(v).map_err(|e| e.to_string())))
}

/// A user account.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// Server-assigned account ID.
    pub id: String,
    /// Local username.
    pub username: String,
    /// `username` for local accounts, `username@instance` for remote ones.
    pub acct: String,
    /// Display name; may contain `:shortcode:` tokens.
    #[serde(default)]
    pub display_name: String,
    /// Profile page URL.
    pub url: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar: String,
    /// Custom emoji usable in the display name.
    #[serde(default)]
    pub emojis: Vec<CustomEmoji>,
}

impl Account {
    /// Shortcode → image URL mapping. A later duplicate shortcode wins.
    pub fn emoji_map(&self) -> HashMap<String, String> {
        self.emojis
            .iter()
            .map(|e| (e.shortcode.clone(), e.url.clone()))
            .collect()
    }

    /// The display name, falling back to the username when blank.
    pub fn name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

/// A custom emoji.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomEmoji {
    /// Name without colons.
    pub shortcode: String,
    /// Image URL.
    pub url: String,
}

/// Media attachment type, keeping the raw string for types we do not handle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum MediaType {
    /// Static image.
    Image,
    /// Looping silent video standing in for an animated GIF.
    Gifv,
    /// Video with sound.
    Video,
    /// The server could not process the file.
    Unknown,
    /// Any other type (e.g. `audio`).
    Other(String),
}

impl From<String> for MediaType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "image" => Self::Image,
            "gifv" => Self::Gifv,
            "video" => Self::Video,
            "unknown" => Self::Unknown,
            _ => Self::Other(raw),
        }
    }
}

impl MediaType {
    /// The raw type string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Image => "image",
            Self::Gifv => "gifv",
            Self::Video => "video",
            Self::Unknown => "unknown",
            Self::Other(raw) => raw,
        }
    }
}

/// A media attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaAttachment {
    /// Attachment type.
    #[serde(rename = "type")]
    pub kind: MediaType,
    /// Full-size media URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Thumbnail URL.
    #[serde(default)]
    pub preview_url: Option<String>,
    /// URL on the origin server, for remote media this server did not fetch.
    #[serde(default)]
    pub remote_url: Option<String>,
    /// Alt text.
    #[serde(default)]
    pub description: Option<String>,
}

/// A poll.
#[derive(Debug, Clone, Deserialize)]
pub struct Poll {
    /// Options in display order.
    pub options: Vec<PollOption>,
    /// Total votes across all options.
    #[serde(default)]
    pub votes_count: u64,
    /// Distinct voters; only meaningful for multiple-choice polls.
    #[serde(default)]
    pub voters_count: Option<u64>,
    /// Whether more than one option may be chosen.
    #[serde(default)]
    pub multiple: bool,
    /// Closing time, if any.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether voting has closed.
    #[serde(default)]
    pub expired: bool,
}

/// One poll option.
#[derive(Debug, Clone, Deserialize)]
pub struct PollOption {
    /// Option label.
    pub title: String,
    /// Votes for this option; `None` while results are hidden.
    #[serde(default)]
    pub votes_count: Option<u64>,
}

/// A link preview card.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkCard {
    /// Target URL.
    pub url: String,
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// Page summary.
    #[serde(default)]
    pub description: String,
    /// Preview image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Alt text for the preview image.
    #[serde(default)]
    pub image_description: Option<String>,
    /// Structured author list (Mastodon 4.3+).
    #[serde(default)]
    pub authors: Vec<CardAuthor>,
    /// Legacy single author name.
    #[serde(default)]
    pub author_name: String,
    /// Legacy single author URL.
    #[serde(default)]
    pub author_url: String,
}

impl LinkCard {
    /// Authors to show, preferring the structured list over the legacy fields.
    pub fn card_authors(&self) -> Vec<CardAuthor> {
        if !self.authors.is_empty() {
            return self.authors.clone();
        }
        if self.author_name.is_empty() {
            return Vec::new();
        }
        vec![CardAuthor {
            name: self.author_name.clone(),
            url: self.author_url.clone(),
        }]
    }
}

/// An author credited on a link card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CardAuthor {
    /// Author name.
    #[serde(default)]
    pub name: String,
    /// Author page URL.
    #[serde(default)]
    pub url: String,
}
