//! Allow-list of tags and attributes permitted in post bodies.
//!
//! Only markup named here survives sanitization. Loosening the policy means
//! adding entries with [`AllowListPolicy::with_tag`]; there is no way to skip
//! a violation.

use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use url::{Host, Url};

/// Default maximum element nesting accepted in a post body.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tags and attributes allowed in Mastodon post content.
///
/// Mastodon servers emit a small, predictable subset of HTML: paragraphs,
/// line breaks, links (mentions, hashtags, URLs), and spans used for
/// link shortening.
const MASTODON_TAGS: &[(&str, &[&str])] = &[
    ("a", &["class", "href", "rel", "target", "translate"]),
    ("b", &[]),
    ("br", &[]),
    ("em", &[]),
    ("i", &[]),
    ("li", &[]),
    ("ol", &[]),
    ("p", &[]),
    ("span", &["class", "translate"]),
    ("strong", &[]),
    ("ul", &[]),
];

/// Attributes whose values must be `http(s)` URLs.
const URL_ATTRIBUTES: &[&str] = &["href"];

static MASTODON_POLICY: LazyLock<AllowListPolicy> = LazyLock::new(|| {
    let mut policy = AllowListPolicy::empty();
    for (tag, attrs) in MASTODON_TAGS {
        policy = policy.with_tag(tag, attrs.iter().copied());
    }
    for attr in URL_ATTRIBUTES {
        policy = policy.with_url_attribute(attr);
    }
    policy
});

/// Mapping from tag name to the attribute names allowed on it.
///
/// Tag names are lowercase, matching the parser's canonical casing, and
/// lookups are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowListPolicy {
    tags: HashMap<String, HashSet<String>>,
    url_attributes: HashSet<String>,
    max_depth: usize,
}

impl AllowListPolicy {
    /// The process-wide policy for Mastodon post bodies.
    pub fn mastodon() -> &'static AllowListPolicy {
        &MASTODON_POLICY
    }

    /// A policy that allows nothing.
    pub fn empty() -> Self {
        Self {
            tags: HashMap::new(),
            url_attributes: HashSet::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Allow `tag` with the given attribute names, merging with any existing entry.
    pub fn with_tag<'a>(mut self, tag: &str, attributes: impl IntoIterator<Item = &'a str>) -> Self {
        self.tags
            .entry(tag.to_string())
            .or_default()
            .extend(attributes.into_iter().map(str::to_string));
        self
    }

    /// Require values of `attribute` to be `http://` or `https://` URLs.
    pub fn with_url_attribute(mut self, attribute: &str) -> Self {
        self.url_attributes.insert(attribute.to_string());
        self
    }

    /// Override the maximum element nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The attribute names allowed on `tag`, or `None` if the tag is not allowed.
    pub fn attributes_allowed(&self, tag: &str) -> Option<&HashSet<String>> {
        self.tags.get(tag)
    }

    /// Whether values of `attribute` must be checked as URLs.
    pub fn is_url_attribute(&self, attribute: &str) -> bool {
        self.url_attributes.contains(attribute)
    }

    /// Maximum element nesting depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// Check if a URL is safe to use in `src` or `href` attributes.
pub fn is_safe_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Name suffixes reserved for local networks.
const LOCAL_SUFFIXES: &[&str] = &[".localhost", ".local", ".localdomain", ".internal", ".home.arpa"];

/// Whether the server may fetch from `url`'s host.
///
/// Instances are addressed by public DNS name. IP literals, single-label
/// names, and local-network suffixes are refused. Names that resolve to
/// non-public addresses are caught at connect time with [`is_public_ip`].
pub fn is_public_host(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain.contains('.') && !LOCAL_SUFFIXES.iter().any(|s| domain.ends_with(s))
        }
        Some(Host::Ipv4(_) | Host::Ipv6(_)) | None => false,
    }
}

/// Whether `ip` is a globally routable unicast address.
pub fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_ipv4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_public_ipv4(v4),
            None => is_public_ipv6(v6),
        },
    }
}

fn is_public_ipv4(ip: Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    let shared = a == 100 && (64..128).contains(&b);
    !(ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || ip.is_documentation()
        || ip.is_multicast()
        || a == 0
        || shared)
}

fn is_public_ipv6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    let unique_local = first & 0xfe00 == 0xfc00;
    let link_local = first & 0xffc0 == 0xfe80;
    !(ip.is_loopback() || ip.is_unspecified() || ip.is_multicast() || unique_local || link_local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mastodon_policy_covers_required_tags() {
        let policy = AllowListPolicy::mastodon();
        for tag in ["a", "b", "i", "em", "strong", "br", "p", "ul", "li", "span"] {
            assert!(policy.attributes_allowed(tag).is_some(), "missing {tag}");
        }
    }

    #[test]
    fn mastodon_policy_link_attributes() {
        let attrs = AllowListPolicy::mastodon().attributes_allowed("a").unwrap();
        for name in ["class", "href", "rel", "target", "translate"] {
            assert!(attrs.contains(name));
        }
        assert!(!attrs.contains("onclick"));
        assert!(!attrs.contains("style"));
    }

    #[test]
    fn mastodon_policy_rejects_unlisted_tags() {
        let policy = AllowListPolicy::mastodon();
        assert!(policy.attributes_allowed("script").is_none());
        assert!(policy.attributes_allowed("img").is_none());
        assert!(policy.attributes_allowed("iframe").is_none());
    }

    #[test]
    fn tag_lookup_is_case_sensitive() {
        assert!(AllowListPolicy::mastodon().attributes_allowed("P").is_none());
    }

    #[test]
    fn with_tag_merges_attributes() {
        let policy = AllowListPolicy::empty()
            .with_tag("span", ["class"])
            .with_tag("span", ["lang"]);
        let attrs = policy.attributes_allowed("span").unwrap();
        assert_eq!(attrs.len(), 2);
        assert!(attrs.contains("lang"));
    }

    #[test]
    fn empty_policy_allows_nothing() {
        let policy = AllowListPolicy::empty();
        assert!(policy.attributes_allowed("p").is_none());
        assert_eq!(policy.max_depth(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn url_attributes() {
        let policy = AllowListPolicy::mastodon();
        assert!(policy.is_url_attribute("href"));
        assert!(!policy.is_url_attribute("class"));
    }

    fn host_ok(raw: &str) -> bool {
        is_public_host(&Url::parse(raw).unwrap())
    }

    #[test]
    fn public_host_accepts_instance_names() {
        assert!(host_ok("https://mastodon.social/api/v1/accounts/1/statuses"));
        assert!(host_ok("https://Example.Social./"));
    }

    #[test]
    fn public_host_rejects_internal_targets() {
        for raw in [
            "http://127.0.0.1/",
            "http://169.254.169.254/latest/meta-data/",
            "http://10.0.0.8:8080/",
            "http://[::1]/",
            "http://0x7f.1/",
            "http://localhost/",
            "http://localhost./",
            "http://api.localhost/",
            "http://printer.local/",
            "http://metadata/",
            "http://metadata.google.internal/",
        ] {
            assert!(!host_ok(raw), "{raw} should be refused");
        }
    }

    #[test]
    fn public_ip_classification() {
        for ip in ["93.184.216.34", "2606:4700::1111"] {
            assert!(is_public_ip(ip.parse().unwrap()), "{ip}");
        }
        for ip in [
            "127.0.0.1",
            "10.1.2.3",
            "172.16.0.1",
            "192.168.1.1",
            "169.254.169.254",
            "100.64.0.1",
            "0.0.0.0",
            "::1",
            "fd00::1",
            "fe80::1",
            "::ffff:127.0.0.1",
        ] {
            assert!(!is_public_ip(ip.parse().unwrap()), "{ip}");
        }
    }

    #[test]
    fn is_safe_url_schemes() {
        assert!(is_safe_url("https://example.com"));
        assert!(is_safe_url("http://example.com"));
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url("data:text/html,<b>x</b>"));
        assert!(!is_safe_url("/relative"));
        assert!(!is_safe_url(""));
    }
}
