//! Media attachment dispatch.
//!
//! Images and GIFVs become linked preview thumbnails, videos become inline
//! players, and anything else becomes a labeled link. A media URL that is not
//! http(s) fails the whole post.

use maud::{Markup, html};
use tootfeed_core::{MediaAttachment, MediaType, is_safe_url};

use super::post::RenderError;

/// Render all attachments in order.
pub fn render_media(attachments: &[MediaAttachment]) -> Result<Markup, RenderError> {
    let rendered = attachments
        .iter()
        .map(render_attachment)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(html! {
        @for item in &rendered { (item) }
    })
}

fn render_attachment(attachment: &MediaAttachment) -> Result<Markup, RenderError> {
    let description = attachment.description.as_deref().unwrap_or("");

    match &attachment.kind {
        MediaType::Image | MediaType::Gifv => {
            let link = attachment.url.as_deref().or(attachment.preview_url.as_deref());
            let preview = attachment.preview_url.as_deref().or(link);
            match (preview, link) {
                (Some(preview), Some(link)) => image_link(preview, link, description),
                _ => attachment_link(attachment),
            }
        }
        MediaType::Video => match attachment.url.as_deref() {
            Some(url) => video(url, attachment.preview_url.as_deref(), description),
            None => attachment_link(attachment),
        },
        MediaType::Unknown => match attachment.remote_url.as_deref() {
            Some(remote) => {
                tracing::warn!(url = %remote, "attachment with unknown type, showing remote_url");
                image_link(remote, remote, description)
            }
            None => attachment_link(attachment),
        },
        MediaType::Other(kind) => {
            tracing::debug!(kind = %kind, "unsupported attachment type");
            attachment_link(attachment)
        }
    }
}

fn require_safe<'a>(field: &'static str, url: &'a str) -> Result<&'a str, RenderError> {
    if is_safe_url(url) {
        Ok(url)
    } else {
        Err(RenderError::UnsafeUrl {
            field,
            url: url.to_string(),
        })
    }
}

fn image_link(preview: &str, link: &str, description: &str) -> Result<Markup, RenderError> {
    let preview = require_safe("media preview", preview)?;
    let link = require_safe("media", link)?;
    Ok(html! {
        a class="toot-image-link" href=(link) target="_blank" rel="noopener" {
            img class="toot-image" src=(preview) alt=(description) title=(description) loading="lazy";
        }
    })
}

fn video(url: &str, poster: Option<&str>, description: &str) -> Result<Markup, RenderError> {
    let url = require_safe("video", url)?;
    let poster = poster.map(|p| require_safe("video poster", p)).transpose()?;
    Ok(html! {
        video class="toot-video" src=(url) poster=[poster] controls title=(description) {}
    })
}

fn attachment_link(attachment: &MediaAttachment) -> Result<Markup, RenderError> {
    let label = format!("[{} attachment]", attachment.kind.as_str());
    Ok(match attachment.url.as_deref() {
        Some(url) => {
            let url = require_safe("attachment", url)?;
            html! {
                a class="toot-attachment-link" href=(url) target="_blank" rel="noopener" { (label) }
            }
        }
        None => html! {
            span class="toot-attachment-link" { (label) }
        },
    })
}
