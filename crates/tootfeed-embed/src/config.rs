//! Application configuration loaded from environment variables.

use std::time::Duration;

use tootfeed_core::ShortcodeSyntax;

/// Fallback for an unset or unparsable fetch timeout.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8082").
    pub bind_addr: String,

    /// Site name shown in page titles and headers.
    pub site_name: String,

    /// Timeout for each request to a Mastodon instance.
    pub fetch_timeout: Duration,

    /// `limit` sent when the embed parameters do not name one.
    pub default_limit: Option<u32>,

    /// Shortcode token syntax for display names.
    pub shortcode_syntax: ShortcodeSyntax,

    /// Permit fetches from loopback, private, and unqualified hosts.
    pub allow_private_hosts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8082".to_string(),
            site_name: "Toot Feed".to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            default_limit: None,
            shortcode_syntax: ShortcodeSyntax::Permissive,
            allow_private_hosts: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `TOOTFEED_BIND_ADDR`: Server bind address (default: "0.0.0.0:8082")
    /// - `TOOTFEED_SITE_NAME`: Site name (default: "Toot Feed")
    /// - `TOOTFEED_FETCH_TIMEOUT_SECS`: Upstream timeout in seconds (default: 10)
    /// - `TOOTFEED_DEFAULT_LIMIT`: Default `limit` for feeds (default: unset)
    /// - `TOOTFEED_STRICT_SHORTCODES`: `1`/`true` restricts shortcodes to `[a-z0-9_]`
    /// - `TOOTFEED_ALLOW_PRIVATE_HOSTS`: `1`/`true` lets feeds target local hosts
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_addr = std::env::var("TOOTFEED_BIND_ADDR").unwrap_or(defaults.bind_addr);

        let site_name = std::env::var("TOOTFEED_SITE_NAME")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.site_name);

        let fetch_timeout = std::env::var("TOOTFEED_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.fetch_timeout);

        let default_limit = match std::env::var("TOOTFEED_DEFAULT_LIMIT") {
            Ok(raw) if !raw.trim().is_empty() => Some(raw.trim().parse::<u32>().map_err(|e| {
                anyhow::anyhow!("TOOTFEED_DEFAULT_LIMIT must be a positive integer: {e}")
            })?),
            _ => None,
        };

        let shortcode_syntax = if env_flag("TOOTFEED_STRICT_SHORTCODES") {
            ShortcodeSyntax::Strict
        } else {
            ShortcodeSyntax::Permissive
        };

        let allow_private_hosts = env_flag("TOOTFEED_ALLOW_PRIVATE_HOSTS");
        if allow_private_hosts {
            tracing::warn!("private hosts allowed; feeds may target the local network");
        }

        tracing::info!(
            bind_addr = %bind_addr,
            site_name = %site_name,
            fetch_timeout_secs = fetch_timeout.as_secs(),
            default_limit = ?default_limit,
            shortcode_syntax = ?shortcode_syntax,
            allow_private_hosts,
            "tootfeed configuration loaded"
        );

        Ok(Self {
            bind_addr,
            site_name,
            fetch_timeout,
            default_limit,
            shortcode_syntax,
            allow_private_hosts,
        })
    }
}

/// `1` or `true`, case-insensitively.
fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key)
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
            .as_str(),
        "1" | "true"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "TOOTFEED_BIND_ADDR",
        "TOOTFEED_SITE_NAME",
        "TOOTFEED_FETCH_TIMEOUT_SECS",
        "TOOTFEED_DEFAULT_LIMIT",
        "TOOTFEED_STRICT_SHORTCODES",
        "TOOTFEED_ALLOW_PRIVATE_HOSTS",
    ];

    /// Run `f` with only `vars` set among the config keys.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn config_defaults() {
        with_env_vars(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bind_addr, "0.0.0.0:8082");
            assert_eq!(config.site_name, "Toot Feed");
            assert_eq!(config.fetch_timeout, Duration::from_secs(10));
            assert_eq!(config.default_limit, None);
            assert_eq!(config.shortcode_syntax, ShortcodeSyntax::Permissive);
            assert!(!config.allow_private_hosts);
        });
    }

    #[test]
    fn config_custom_values() {
        with_env_vars(
            &[
                ("TOOTFEED_BIND_ADDR", "127.0.0.1:9090"),
                ("TOOTFEED_SITE_NAME", "My Toots"),
                ("TOOTFEED_FETCH_TIMEOUT_SECS", "3"),
                ("TOOTFEED_DEFAULT_LIMIT", "20"),
                ("TOOTFEED_STRICT_SHORTCODES", "true"),
                ("TOOTFEED_ALLOW_PRIVATE_HOSTS", "TRUE"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.bind_addr, "127.0.0.1:9090");
                assert_eq!(config.site_name, "My Toots");
                assert_eq!(config.fetch_timeout, Duration::from_secs(3));
                assert_eq!(config.default_limit, Some(20));
                assert_eq!(config.shortcode_syntax, ShortcodeSyntax::Strict);
                assert!(config.allow_private_hosts);
            },
        );
    }

    #[test]
    fn config_invalid_timeout_falls_back() {
        with_env_vars(&[("TOOTFEED_FETCH_TIMEOUT_SECS", "soon")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        });
        with_env_vars(&[("TOOTFEED_FETCH_TIMEOUT_SECS", "0")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        });
    }

    #[test]
    fn config_invalid_limit_is_error() {
        with_env_vars(&[("TOOTFEED_DEFAULT_LIMIT", "many")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn config_blank_site_name_uses_default() {
        with_env_vars(&[("TOOTFEED_SITE_NAME", "   ")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.site_name, "Toot Feed");
        });
    }

    #[test]
    fn config_strict_shortcodes_flag() {
        with_env_vars(&[("TOOTFEED_STRICT_SHORTCODES", "1")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.shortcode_syntax, ShortcodeSyntax::Strict);
        });
        with_env_vars(&[("TOOTFEED_STRICT_SHORTCODES", "no")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.shortcode_syntax, ShortcodeSyntax::Permissive);
        });
    }
}
