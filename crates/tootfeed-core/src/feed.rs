//! Where a feed comes from, and how embed parameters select it.

use serde::Deserialize;
use url::Url;

use crate::STATUSES_PATH;
use crate::account::statuses_url;
use crate::error::{Error, Result};
use crate::policy::is_safe_url;

/// An account's statuses endpoint plus its query options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFeed {
    /// Instance hostname.
    pub instance: String,
    /// Account ID on that instance.
    pub id: String,
    /// Maximum number of posts to request.
    pub limit: Option<u32>,
    /// Ask the server to leave out replies.
    pub exclude_replies: bool,
    /// Ask the server to leave out boosts.
    pub exclude_reblogs: bool,
}

impl AccountFeed {
    /// A feed for `id` on `instance` with no query options.
    pub fn new(instance: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            id: id.into(),
            limit: None,
            exclude_replies: false,
            exclude_reblogs: false,
        }
    }

    /// Statuses URL with only the options that are set.
    pub fn url(&self) -> Result<Url> {
        let mut url = statuses_url(&self.instance, &self.id)?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(limit) = self.limit {
                query.append_pair("limit", &limit.to_string());
            }
            if self.exclude_replies {
                query.append_pair("exclude_replies", "true");
            }
            if self.exclude_reblogs {
                query.append_pair("exclude_reblogs", "true");
            }
        }
        // An empty serializer still leaves a bare '?'.
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }
}

/// A feed to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// Built from instance and account ID.
    Account(AccountFeed),
    /// A caller-supplied statuses URL, fetched as given.
    Url(String),
}

impl FeedSource {
    /// The URL to `GET`.
    pub fn url(&self) -> Result<Url> {
        match self {
            Self::Account(feed) => feed.url(),
            Self::Url(raw) => {
                if !is_safe_url(raw) {
                    return Err(Error::InvalidUrl {
                        url: raw.clone(),
                        reason: "feed URL must be http or https".to_string(),
                    });
                }
                let url = Url::parse(raw).map_err(|e| Error::InvalidUrl {
                    url: raw.clone(),
                    reason: e.to_string(),
                })?;
                if !is_statuses_path(&url) {
                    return Err(Error::InvalidUrl {
                        url: raw.clone(),
                        reason: "feed URL must point at /api/v1/accounts/<id>/statuses".to_string(),
                    });
                }
                Ok(url)
            }
        }
    }

    /// Message shown when the feed came back empty.
    pub fn empty_feed_message(&self) -> String {
        match self {
            Self::Account(feed) => format!(
                "Nothing to see here. (Is the account id \"{}\" correct?)",
                feed.id
            ),
            Self::Url(raw) => format!("Nothing to see here. (Is the feed URL \"{raw}\" correct?)"),
        }
    }
}

/// Embed parameters as they arrive in a query string.
///
/// The two `exclude-*` flags follow attribute semantics: any value, even an
/// empty one, switches them on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedParams {
    /// Instance hostname.
    #[serde(default)]
    pub instance: Option<String>,
    /// Account ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Full statuses URL; takes precedence over `instance`/`id`.
    #[serde(default)]
    pub url: Option<String>,
    /// Maximum number of posts. Empty means unset.
    #[serde(default)]
    pub limit: Option<String>,
    /// Present to leave out replies.
    #[serde(default, rename = "exclude-replies")]
    pub exclude_replies: Option<String>,
    /// Present to leave out boosts.
    #[serde(default, rename = "exclude-reblogs")]
    pub exclude_reblogs: Option<String>,
}

impl FeedParams {
    /// Resolve the parameters to a feed source.
    ///
    /// `default_limit` applies only when no `limit` was given.
    pub fn into_source(self, default_limit: Option<u32>) -> Result<FeedSource> {
        if let Some(url) = non_empty(self.url) {
            return Ok(FeedSource::Url(url));
        }

        let instance = non_empty(self.instance).ok_or(Error::MissingParameter("instance"))?;
        let id = non_empty(self.id).ok_or(Error::MissingParameter("id"))?;
        let limit = match non_empty(self.limit) {
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| Error::InvalidParameter {
                name: "limit",
                value: raw.clone(),
            })?),
            None => default_limit,
        };

        Ok(FeedSource::Account(AccountFeed {
            instance,
            id,
            limit,
            exclude_replies: self.exclude_replies.is_some(),
            exclude_reblogs: self.exclude_reblogs.is_some(),
        }))
    }
}

/// `/api/v1/accounts/<id>/statuses`, optionally with a trailing slash.
fn is_statuses_path(url: &Url) -> bool {
    let Some(segments) = url.path_segments() else {
        return false;
    };
    let segments: Vec<_> = segments.collect();
    let segments = match segments.as_slice() {
        [rest @ .., ""] => rest,
        all => all,
    };
    matches!(
        segments,
        ["api", "v1", "accounts", id, STATUSES_PATH] if !id.is_empty()
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> FeedParams {
        let value = serde_json::Value::Object(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
                .collect(),
        );
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn account_url_without_options() {
        let feed = AccountFeed::new("example.social", "109");
        assert_eq!(
            feed.url().unwrap().as_str(),
            "https://example.social/api/v1/accounts/109/statuses"
        );
    }

    #[test]
    fn account_url_with_all_options() {
        let feed = AccountFeed {
            limit: Some(5),
            exclude_replies: true,
            exclude_reblogs: true,
            ..AccountFeed::new("example.social", "109")
        };
        assert_eq!(
            feed.url().unwrap().as_str(),
            "https://example.social/api/v1/accounts/109/statuses?limit=5&exclude_replies=true&exclude_reblogs=true"
        );
    }

    #[test]
    fn params_presence_turns_flags_on() {
        let source = params(&[
            ("instance", "example.social"),
            ("id", "42"),
            ("exclude-replies", ""),
        ])
        .into_source(None)
        .unwrap();
        let FeedSource::Account(feed) = source else {
            panic!("expected account feed");
        };
        assert!(feed.exclude_replies);
        assert!(!feed.exclude_reblogs);
        assert_eq!(feed.limit, None);
    }

    #[test]
    fn params_empty_limit_is_unset() {
        let source = params(&[("instance", "example.social"), ("id", "42"), ("limit", "")])
            .into_source(Some(20))
            .unwrap();
        assert!(matches!(source, FeedSource::Account(AccountFeed { limit: Some(20), .. })));
    }

    #[test]
    fn params_explicit_limit_beats_default() {
        let source = params(&[("instance", "example.social"), ("id", "42"), ("limit", "3")])
            .into_source(Some(20))
            .unwrap();
        assert!(matches!(source, FeedSource::Account(AccountFeed { limit: Some(3), .. })));
    }

    #[test]
    fn params_bad_limit_is_rejected() {
        let err = params(&[("instance", "example.social"), ("id", "42"), ("limit", "ten")])
            .into_source(None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "limit", .. }));
    }

    #[test]
    fn params_url_wins() {
        let source = params(&[
            ("url", "https://example.social/api/v1/accounts/1/statuses"),
            ("instance", "other.example"),
        ])
        .into_source(None)
        .unwrap();
        assert_eq!(
            source,
            FeedSource::Url("https://example.social/api/v1/accounts/1/statuses".to_string())
        );
    }

    #[test]
    fn params_missing_id() {
        let err = params(&[("instance", "example.social")])
            .into_source(None)
            .unwrap_err();
        assert_eq!(err, Error::MissingParameter("id"));
    }

    #[test]
    fn url_source_must_be_http() {
        let source = FeedSource::Url("file:///etc/passwd".to_string());
        assert!(matches!(source.url(), Err(Error::InvalidUrl { .. })));
    }

    #[test]
    fn url_source_must_be_statuses_endpoint() {
        for raw in [
            "https://example.social/admin",
            "https://example.social/api/v1/accounts//statuses",
            "https://example.social/api/v1/accounts/1/statuses/extra",
            "http://169.254.169.254/latest/meta-data/",
        ] {
            let source = FeedSource::Url(raw.to_string());
            assert!(matches!(source.url(), Err(Error::InvalidUrl { .. })), "{raw}");
        }
        for raw in [
            "https://example.social/api/v1/accounts/1/statuses",
            "https://example.social/api/v1/accounts/1/statuses/?limit=3",
        ] {
            assert!(FeedSource::Url(raw.to_string()).url().is_ok(), "{raw}");
        }
    }

    #[test]
    fn empty_feed_message_names_target() {
        let account = FeedSource::Account(AccountFeed::new("example.social", "42"));
        assert_eq!(
            account.empty_feed_message(),
            "Nothing to see here. (Is the account id \"42\" correct?)"
        );
        let url = FeedSource::Url("https://x.example/feed".to_string());
        assert!(url.empty_feed_message().contains("https://x.example/feed"));
    }
}
