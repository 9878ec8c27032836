//! Error types for post markup validation and account handling.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the sanitizer, the markup parser, and handle parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An element whose tag has no entry in the allow-list policy.
    #[error("sanitize: unexpected node tag {tag}")]
    DisallowedTag {
        /// The offending tag name.
        tag: String,
    },

    /// An attribute that is not in its tag's allowed set.
    #[error("sanitize: attribute \"{attribute}\" not allowed in {tag} element")]
    DisallowedAttribute {
        /// The element carrying the attribute.
        tag: String,
        /// The offending attribute name.
        attribute: String,
    },

    /// A URL-valued attribute whose value is not an http(s) URL.
    #[error("sanitize: attribute \"{attribute}\" in {tag} element is not an http(s) URL")]
    UnsafeUrl {
        /// The element carrying the attribute.
        tag: String,
        /// The URL-valued attribute.
        attribute: String,
    },

    /// Markup nested deeper than the policy allows.
    #[error("sanitize: markup nested deeper than {max} levels")]
    NestingTooDeep {
        /// The configured maximum depth.
        max: usize,
    },

    /// A `user@instance` string that does not split into exactly two parts.
    #[error("Unexpected account syntax: \"{0}\"")]
    AccountSyntax(String),

    /// A required feed parameter was not supplied.
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    /// A feed parameter had a value that could not be used.
    #[error("invalid value for {name}: \"{value}\"")]
    InvalidParameter {
        /// Parameter name as the caller spelled it.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A fetch target that resolves to a loopback, private, or otherwise
    /// non-public host.
    #[error("refusing to contact non-public host \"{0}\"")]
    ForbiddenHost(String),

    /// A feed or lookup URL could not be built from its parts.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as it was assembled.
        url: String,
        /// Parser diagnostics.
        reason: String,
    },
}

impl Error {
    /// Whether this error came from sanitizer validation.
    pub fn is_sanitizer_violation(&self) -> bool {
        matches!(
            self,
            Self::DisallowedTag { .. }
                | Self::DisallowedAttribute { .. }
                | Self::UnsafeUrl { .. }
                | Self::NestingTooDeep { .. }
        )
    }
}
