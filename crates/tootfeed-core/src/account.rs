//! `user@instance` handles and the API URLs derived from them.

use std::fmt;

use url::Url;

use crate::error::{Error, Result};
use crate::{LOOKUP_PATH, STATUSES_PATH};

/// A parsed `user@instance` handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountHandle {
    /// Local username on the instance.
    pub user: String,
    /// Instance hostname.
    pub instance: String,
}

impl AccountHandle {
    /// Parse free-text `user@instance` input, tolerating one leading `@`.
    ///
    /// Anything other than exactly two non-empty parts is a syntax error.
    pub fn parse(input: &str) -> Result<Self> {
        let mut parts: Vec<&str> = input.trim().split('@').collect();
        if parts.first() == Some(&"") {
            parts.remove(0);
        }

        match parts.as_slice() {
            [user, instance] if !user.is_empty() && !instance.is_empty() => Ok(Self {
                user: (*user).to_string(),
                instance: (*instance).to_string(),
            }),
            _ => Err(Error::AccountSyntax(input.to_string())),
        }
    }

    /// `GET` target for resolving this handle to an account ID.
    pub fn lookup_url(&self) -> Result<Url> {
        let mut url = instance_url(&self.instance, LOOKUP_PATH)?;
        url.query_pairs_mut().append_pair("acct", &self.user);
        Ok(url)
    }

    /// Statuses endpoint for an account ID on this handle's instance.
    pub fn statuses_url(&self, id: &str) -> Result<Url> {
        statuses_url(&self.instance, id)
    }
}

impl fmt::Display for AccountHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.instance)
    }
}

/// `https://<instance>/api/v1/accounts/<id>/statuses`.
pub fn statuses_url(instance: &str, id: &str) -> Result<Url> {
    let mut url = instance_url(instance, "/")?;
    let shown = url.to_string();
    url.path_segments_mut()
        .map_err(|()| Error::InvalidUrl {
            url: shown,
            reason: "cannot be a base".to_string(),
        })?
        .clear()
        .extend(["api", "v1", "accounts", id, STATUSES_PATH]);
    Ok(url)
}

/// Build an https URL on `instance` with the given absolute path.
fn instance_url(instance: &str, path: &str) -> Result<Url> {
    let raw = format!("https://{instance}{path}");
    let url = Url::parse(&raw).map_err(|e| Error::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;

    // An instance containing '/', '?' or '#' would smuggle in a path or query.
    let authority = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };
    if authority != instance.to_ascii_lowercase() {
        return Err(Error::InvalidUrl {
            url: raw,
            reason: "instance is not a bare hostname".to_string(),
        });
    }
    Ok(url)
}
