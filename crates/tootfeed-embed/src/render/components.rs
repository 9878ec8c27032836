//! Shared HTML components used across pages and posts.
//!
//! These are maud functions that return `Markup` fragments for composition
//! into full pages or bare feed fragments.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use maud::{Markup, PreEscaped, html};
use tootfeed_core::{Account, EmojiExpander, NameFragment, is_safe_url};

/// Inline CSS for feed pages.
///
/// Flat layout, no shadows. `.hidden` backs the sensitive-content toggle.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#fafafa;--fg:#111;--fg2:#555;--fg3:#999;--accent:#6364ff;--accent-hover:#4f50d8;--surface:#fff;--border:rgba(99,100,255,.18);--mono:"SF Mono",SFMono-Regular,ui-monospace,Menlo,monospace}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column;align-items:center;padding:1.5rem 1rem}
main{max-width:640px;width:100%;flex:1}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
img{max-width:100%;height:auto}
.hidden{display:none}

.toots{display:flex;flex-direction:column;gap:1rem}
.toot{padding:1.25rem;border:1px solid var(--border);border-radius:10px;background:var(--surface)}
.toot.error{color:var(--fg3);font-style:italic}
.error{padding:1rem;border-radius:8px;color:#b00020;background:rgba(176,0,32,.06)}

.toot-boost{font-size:.85rem;color:var(--fg3);margin-bottom:.5rem}
.toot-meta{display:flex;align-items:center;gap:.5rem;font-size:.8rem;color:var(--fg3)}
.toot-link{text-decoration:none}
.toot-time{font-family:var(--mono)}
.toot-author{display:flex;align-items:center;gap:.6rem;margin:.5rem 0 .75rem}
.toot-avatar{width:44px;height:44px;border-radius:8px;object-fit:cover;display:block}
.toot-display-name{font-weight:600}
.toot-user{font-size:.85rem;color:var(--fg3)}
img.emoji{width:1.2em;height:1.2em;vertical-align:-.2em;display:inline}

.spoiler-text{font-weight:600;margin-bottom:.5rem}
.toot-show-sensitive{font:inherit;font-size:.8rem;padding:.2rem .6rem;border:1px solid var(--border);border-radius:6px;background:none;color:var(--fg2);cursor:pointer;margin-bottom:.5rem}
.toot-content{word-break:break-word}
.toot-content p{margin:.5rem 0}
.toot-content .invisible{display:none}
.toot-content .ellipsis::after{content:"…"}
.toot-content ul,.toot-content ol{margin:.5rem 0;padding-left:1.5rem}

.toot-image-link{display:block;margin:.5rem 0}
.toot-image{border-radius:8px;display:block}
.toot-video{width:100%;border-radius:8px;margin:.5rem 0;background:#000}
.toot-attachment-link{display:inline-block;margin:.5rem 0;font-family:var(--mono);font-size:.85rem}

.toot-poll{margin:.75rem 0;display:flex;flex-direction:column;gap:.35rem}
.poll-option{position:relative;padding:.3rem .6rem;border-radius:6px;overflow:hidden}
.poll-bar{position:absolute;left:0;top:0;bottom:0;background:var(--border);z-index:0}
.poll-option.poll-max .poll-bar{background:rgba(99,100,255,.35)}
.poll-option.poll-max .poll-title{font-weight:600}
.poll-title,.poll-votes{position:relative;z-index:1}
.poll-votes{float:right;font-family:var(--mono);font-size:.8rem;color:var(--fg2)}
.poll-footer{font-size:.8rem;color:var(--fg3)}
.poll-expiry.expired{color:#b00020}

.toot-card{display:block;margin:.75rem 0;border:1px solid var(--border);border-radius:8px;overflow:hidden;color:var(--fg)}
.toot-card:hover{text-decoration:none;border-color:var(--accent)}
.toot-card-image{width:100%;max-height:260px;object-fit:cover;display:block}
.toot-card-text{padding:.6rem .85rem}
.toot-card-title{font-weight:600}
.toot-card-description{font-size:.9rem;color:var(--fg2)}
.toot-card-authors{font-size:.8rem;color:var(--fg3);padding:0 .85rem .6rem}
.toot-card-error{font-size:.85rem;color:var(--fg3);font-style:italic}

.lookup-form,.feed-form{display:flex;gap:.5rem;flex-wrap:wrap;margin:1rem 0}
.lookup-form input,.feed-form input{flex:1;min-width:10rem;font:inherit;padding:.45rem .7rem;border:1px solid var(--border);border-radius:6px;background:var(--surface);color:var(--fg)}
.lookup-form button,.feed-form button{font:inherit;padding:.45rem 1rem;border:none;border-radius:6px;background:var(--accent);color:#fff;cursor:pointer}
.lookup-result code{font-family:var(--mono);font-size:.85rem;word-break:break-all}

.footer{text-align:center;margin-top:1rem;padding-top:.75rem;font-size:.8rem;color:var(--fg3);width:100%;max-width:640px}

@media(prefers-color-scheme:dark){
:root{--bg:#0f0f14;--fg:#e5e5e5;--fg2:#a0a0a0;--fg3:#666;--accent:#8c8dff;--accent-hover:#a5a6ff;--surface:#16161d;--border:rgba(140,141,255,.2)}
.error{color:#ff8a80;background:rgba(255,138,128,.08)}
}
"#;

/// Inline CSS for error pages.
pub const ERROR_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;display:flex;justify-content:center;align-items:center;min-height:100vh;background:#fafafa;color:#1a1a2e;padding:1rem}
.error-page{text-align:center;max-width:420px}
.error-page h1{font-size:1.5rem;margin-bottom:.75rem}
.error-page p{color:#666;margin-bottom:1rem;line-height:1.5}
.error-page a{color:#6364ff}
@media(prefers-color-scheme:dark){
body{background:#0f0f14;color:#e0e0e8}
.error-page p{color:#aaa}
.error-page a{color:#8c8dff}
}
"#;

/// Content-Security-Policy header value.
///
/// Inline styles plus the one-line inline handler on the sensitive toggle.
/// Media may come from any http(s) origin since posts federate.
pub const CSP_HEADER: &str = "default-src 'none'; style-src 'unsafe-inline'; script-src 'unsafe-inline'; img-src https: http: data:; media-src https: http:; form-action 'self'; frame-ancestors 'none'";

/// Text of the per-post fallback node.
pub const POST_PLACEHOLDER: &str = "could not render toot";

/// Render the full HTML page shell around `body_content`.
pub fn page_shell(title: &str, site_name: &str, body_content: Markup) -> Markup {
    html! {
        (maud::DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " · " (site_name) }
                meta name="robots" content="noindex";
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                main { (body_content) }
                footer class="footer" {
                    a href="/" { (site_name) }
                }
            }
        }
    }
}

/// The `href` to emit for `url`, or `None` when it is not http(s).
pub fn safe_href(url: &str) -> Option<&str> {
    Some(url).filter(|u| is_safe_url(u))
}

/// Format a post timestamp as `YYYY-MM-DD HH:MM` (UTC).
pub fn format_timestamp(created_at: &DateTime<Utc>) -> String {
    created_at.format("%Y-%m-%d %H:%M").to_string()
}

/// Render a display name with custom emoji shortcodes replaced by images.
///
/// An emoji whose image URL is not http(s) is left as its literal shortcode.
pub fn display_name(account: &Account, expander: &EmojiExpander) -> Markup {
    let emojis: HashMap<String, String> = account.emoji_map();
    let fragments = expander.expand(account.name(), &emojis);

    html! {
        @for fragment in &fragments {
            @match fragment {
                NameFragment::Text(text) => (text),
                NameFragment::Emoji { url, title } => {
                    @if is_safe_url(url) {
                        img class="emoji" src=(url) alt=(title) title=(title);
                    } @else {
                        (title)
                    }
                }
            }
        }
    }
}

/// Render the author block: linked avatar, display name, and `@acct`.
pub fn author_header(account: &Account, expander: &EmojiExpander) -> Markup {
    let profile = safe_href(&account.url);
    let avatar = safe_href(&account.avatar);

    html! {
        div class="toot-author" {
            @if let Some(avatar) = avatar {
                @if let Some(profile) = profile {
                    a class="toot-avatar-link" href=(profile) target="_blank" rel="noopener" {
                        img class="toot-avatar" src=(avatar) alt="" title={ "avatar of user @" (account.username) } loading="lazy";
                    }
                } @else {
                    img class="toot-avatar" src=(avatar) alt="" title={ "avatar of user @" (account.username) } loading="lazy";
                }
            }
            div {
                div class="toot-display-name" { (display_name(account, expander)) }
                @if let Some(profile) = profile {
                    a class="toot-user" href=(profile) target="_blank" rel="noopener" { "@" (account.acct) }
                } @else {
                    span class="toot-user" { "@" (account.acct) }
                }
            }
        }
    }
}

/// The node that stands in for a post that failed to render.
pub fn post_placeholder() -> Markup {
    html! {
        div class="toot error" { (POST_PLACEHOLDER) }
    }
}

/// A feed-level error message node.
pub fn error_node(message: &str) -> Markup {
    html! {
        div class="error" { (message) }
    }
}
