//! Custom emoji shortcode expansion for display names.
//!
//! Display names are plain text, never HTML. They are only scanned for
//! `:shortcode:` tokens, and known shortcodes are replaced by image fragments.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Token syntax: any run of non-colon characters. `::` is an empty token
/// and consumes both colons.
static PERMISSIVE_SHORTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([^:]*):").expect("permissive shortcode regex should compile"));

/// Token syntax used by older Mastodon clients.
static STRICT_SHORTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i):([a-z0-9_]*):").expect("strict shortcode regex should compile")
});

/// Which characters may appear between the colons of a shortcode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShortcodeSyntax {
    /// Any run of non-colon characters.
    #[default]
    Permissive,
    /// ASCII letters, digits, and underscores only.
    Strict,
}

impl ShortcodeSyntax {
    fn regex(self) -> &'static Regex {
        match self {
            Self::Permissive => &PERMISSIVE_SHORTCODE,
            Self::Strict => &STRICT_SHORTCODE,
        }
    }
}

/// A piece of an expanded display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameFragment<'a> {
    /// Literal text, including any unmatched `:tokens:`.
    Text(&'a str),
    /// A custom emoji image.
    Emoji {
        /// Image URL from the account's emoji list.
        url: &'a str,
        /// The matched text including colons, used as the image title.
        title: &'a str,
    },
}

/// Scans display names for custom emoji shortcodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmojiExpander {
    syntax: ShortcodeSyntax,
}

impl EmojiExpander {
    /// Create an expander using the given token syntax.
    pub fn new(syntax: ShortcodeSyntax) -> Self {
        Self { syntax }
    }

    /// Split `name` into text and emoji fragments.
    ///
    /// Matches are non-overlapping and scanned left to right. A token that is
    /// not a key of `emojis` stays in the surrounding text fragment unchanged,
    /// so adjacent literal text is never split.
    pub fn expand<'a>(
        &self,
        name: &'a str,
        emojis: &'a HashMap<String, String>,
    ) -> Vec<NameFragment<'a>> {
        let mut fragments = Vec::new();
        let mut text_start = 0;

        for caps in self.syntax.regex().captures_iter(name) {
            let (Some(whole), Some(token)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if token.is_empty() {
                continue;
            }
            let Some(url) = emojis.get(token.as_str()) else {
                continue;
            };

            if whole.start() > text_start {
                fragments.push(NameFragment::Text(&name[text_start..whole.start()]));
            }
            fragments.push(NameFragment::Emoji {
                url: url.as_str(),
                title: whole.as_str(),
            });
            text_start = whole.end();
        }

        if text_start < name.len() {
            fragments.push(NameFragment::Text(&name[text_start..]));
        }

        fragments
    }
}
