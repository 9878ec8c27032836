//! Mastodon REST client for statuses and account lookup.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tootfeed_core::{AccountHandle, FeedSource, Post, is_public_host, is_public_ip};
use url::Url;

/// One element of a statuses response, decoded on its own so a malformed
/// status does not take its siblings down with it.
pub type StatusEntry = Result<Post, serde_json::Error>;

/// Why a feed could not be fetched.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The embed parameters did not produce a usable URL.
    #[error(transparent)]
    Source(#[from] tootfeed_core::Error),

    /// The server answered with a non-2xx status.
    #[error("Could not get mastodon toots from {url} (HTTP status: {status})")]
    Status {
        /// The attempted URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request did not complete.
    #[error("Could not get mastodon toots from {url}")]
    Transport {
        /// The attempted URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The body was not a JSON array.
    #[error("Unexpected response from {url}")]
    Decode {
        /// The attempted URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
}

/// Why a `user@instance` handle could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The handle did not parse, or names a host that may not be contacted.
    #[error(transparent)]
    Handle(#[from] tootfeed_core::Error),

    /// The instance answered with a non-2xx status.
    #[error("Could not retrieve user name \"{user}\" from \"{instance}\"")]
    Status {
        /// Username part of the handle.
        user: String,
        /// Instance part of the handle.
        instance: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request did not complete.
    #[error("Could not retrieve user name \"{user}\" from \"{instance}\"")]
    Transport {
        /// Username part of the handle.
        user: String,
        /// Instance part of the handle.
        instance: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The lookup response carried no account ID.
    #[error("No id provided for \"{user}\" on \"{instance}\"")]
    MissingId {
        /// Username part of the handle.
        user: String,
        /// Instance part of the handle.
        instance: String,
    },

    /// The lookup response was not JSON.
    #[error("Lookup failed: {0}")]
    Decode(#[source] reqwest::Error),
}

/// A handle resolved to its account ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAccount {
    /// The handle that was looked up.
    pub handle: AccountHandle,
    /// Account ID on the handle's instance.
    pub id: String,
    /// Statuses endpoint for the account.
    pub statuses_url: Url,
}

/// Body of `/api/v1/accounts/lookup`. Only the ID matters here.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    id: Option<serde_json::Value>,
}

impl LookupResponse {
    /// The ID as a string. Some servers send it as a number.
    fn id(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Redirects followed before giving up.
const MAX_REDIRECTS: usize = 5;

/// DNS resolver that drops loopback, private, and link-local addresses.
#[derive(Debug, Clone, Copy)]
struct PublicResolver;

impl Resolve for PublicResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(public_addrs(name.as_str().to_string()))
    }
}

async fn public_addrs(host: String) -> Result<Addrs, Box<dyn std::error::Error + Send + Sync>> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host.as_str(), 0))
        .await?
        .filter(|addr| is_public_ip(addr.ip()))
        .collect();
    if addrs.is_empty() {
        tracing::warn!(host = %host, "host has no public address");
        return Err(Box::new(tootfeed_core::Error::ForbiddenHost(host)));
    }
    Ok(Box::new(addrs.into_iter()))
}

/// Thin wrapper over a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct MastodonClient {
    http: reqwest::Client,
    allow_private_hosts: bool,
}

impl MastodonClient {
    /// Build a client whose requests time out after `timeout`.
    ///
    /// Unless `allow_private_hosts` is set, only public hosts are contacted,
    /// both by name and by resolved address.
    pub fn new(timeout: Duration, allow_private_hosts: bool) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tootfeed/", env!("CARGO_PKG_VERSION")));
        if !allow_private_hosts {
            builder = builder
                .dns_resolver(Arc::new(PublicResolver))
                .redirect(reqwest::redirect::Policy::custom(|attempt| {
                    if attempt.previous().len() >= MAX_REDIRECTS {
                        attempt.error("too many redirects")
                    } else if is_public_host(attempt.url()) {
                        attempt.follow()
                    } else {
                        attempt.stop()
                    }
                }));
        }
        Ok(Self {
            http: builder.build()?,
            allow_private_hosts,
        })
    }

    /// Refuse targets on loopback, private, or unqualified hosts.
    pub fn check_host(&self, url: &Url) -> tootfeed_core::Result<()> {
        if self.allow_private_hosts || is_public_host(url) {
            return Ok(());
        }
        let host = url.host_str().unwrap_or_default().to_string();
        tracing::warn!(host = %host, "refusing non-public fetch target");
        Err(tootfeed_core::Error::ForbiddenHost(host))
    }

    /// Fetch a feed.
    pub async fn fetch_statuses(&self, source: &FeedSource) -> Result<Vec<StatusEntry>, FeedError> {
        let url = source.url()?;
        self.check_host(&url)?;
        tracing::debug!(url = %url, "fetching statuses");

        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| FeedError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "statuses request failed");
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let values: Vec<serde_json::Value> =
            response.json().await.map_err(|source| FeedError::Decode {
                url: url.to_string(),
                source,
            })?;

        Ok(values.into_iter().map(serde_json::from_value).collect())
    }

    /// Resolve `handle` to an account ID on its instance.
    pub async fn lookup_account(
        &self,
        handle: &AccountHandle,
    ) -> Result<ResolvedAccount, LookupError> {
        let url = handle.lookup_url()?;
        self.lookup_account_at(handle, url).await
    }

    /// Resolve `handle` against an explicit lookup endpoint.
    pub async fn lookup_account_at(
        &self,
        handle: &AccountHandle,
        url: Url,
    ) -> Result<ResolvedAccount, LookupError> {
        self.check_host(&url)?;
        tracing::debug!(url = %url, handle = %handle, "looking up account");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| LookupError::Transport {
                user: handle.user.clone(),
                instance: handle.instance.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                user: handle.user.clone(),
                instance: handle.instance.clone(),
                status: status.as_u16(),
            });
        }

        let body: LookupResponse = response.json().await.map_err(LookupError::Decode)?;
        let id = body.id().ok_or_else(|| LookupError::MissingId {
            user: handle.user.clone(),
            instance: handle.instance.clone(),
        })?;
        let statuses_url = handle.statuses_url(&id)?;

        tracing::info!(handle = %handle, id = %id, "account resolved");
        Ok(ResolvedAccount {
            handle: handle.clone(),
            id,
            statuses_url,
        })
    }
}
