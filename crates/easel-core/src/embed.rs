//! Classification and sanitizing of embedded web links.
//!
//! An embeddable element carries only a link. Whether it can be shown as a live
//! frame, what URL that frame loads, and what placeholder text stands in for it
//! are decided here so that both backends make the same call.

use url::Url;

/// What kind of content a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedKind {
    /// A video player (YouTube, Vimeo, Loom) with a dedicated embed URL.
    Video,
    /// Content that only embeds through injected markup (X posts, Gists).
    Document,
    /// Any other web page.
    Generic,
}

/// A link that can be embedded, with the URL to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedLink {
    pub kind: EmbedKind,
    pub url: String,
}

const UNSAFE_SCHEMES: [&str; 3] = ["javascript:", "data:", "vbscript:"];
const BLANK: &str = "about:blank";

pub const EMPTY_EMBED_LABEL: &str = "Empty Web-Embed";
pub const NOT_PERMITTED_LABEL: &str = "Embedding this url is not permitted";

/// Trims a link and neutralizes script-capable schemes.
///
/// # Examples
///
/// ```
/// use easel_core::embed::normalize_link;
///
/// assert_eq!(normalize_link("  https://example.com "), "https://example.com");
/// assert_eq!(normalize_link("JavaScript:alert(1)"), "about:blank");
/// assert_eq!(normalize_link("java\tscript:alert(1)"), "about:blank");
/// ```
pub fn normalize_link(link: &str) -> String {
    let trimmed = link.trim();
    let compact: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if UNSAFE_SCHEMES.iter().any(|scheme| compact.starts_with(scheme)) {
        return BLANK.to_string();
    }
    trimmed.to_string()
}

/// Classifies `link` for embedding, or returns `None` if it is not a web URL.
///
/// # Examples
///
/// ```
/// use easel_core::embed::{classify_embed_link, EmbedKind};
///
/// let video = classify_embed_link("https://youtu.be/dQw4w9WgXcQ").unwrap();
/// assert_eq!(video.kind, EmbedKind::Video);
/// assert_eq!(video.url, "https://www.youtube.com/embed/dQw4w9WgXcQ");
///
/// assert!(classify_embed_link("ftp://example.com/file").is_none());
/// ```
pub fn classify_embed_link(link: &str) -> Option<EmbedLink> {
    let normalized = normalize_link(link);
    let url = Url::parse(&normalized).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?.trim_start_matches("www.").to_ascii_lowercase();
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    if let Some(embed) = youtube_embed(&url, &host, &segments) {
        return Some(EmbedLink {
            kind: EmbedKind::Video,
            url: embed,
        });
    }

    let video = match (host.as_str(), segments.as_slice()) {
        ("vimeo.com", [id, ..]) if is_numeric(id) => {
            Some(format!("https://player.vimeo.com/video/{id}"))
        }
        ("player.vimeo.com", ["video", id, ..]) if is_numeric(id) => {
            Some(format!("https://player.vimeo.com/video/{id}"))
        }
        ("loom.com", ["share" | "embed", id, ..]) => Some(format!("https://www.loom.com/embed/{id}")),
        _ => None,
    };
    if let Some(url) = video {
        return Some(EmbedLink {
            kind: EmbedKind::Video,
            url,
        });
    }

    let document = match (host.as_str(), segments.as_slice()) {
        ("twitter.com" | "x.com", [_, "status", id, ..]) if is_numeric(id) => {
            Some(format!("https://twitter.com/x/status/{id}"))
        }
        ("gist.github.com", [user, id, ..]) => Some(format!("https://gist.github.com/{user}/{id}")),
        _ => None,
    };
    if let Some(url) = document {
        return Some(EmbedLink {
            kind: EmbedKind::Document,
            url,
        });
    }

    Some(EmbedLink {
        kind: EmbedKind::Generic,
        url: url.to_string(),
    })
}

fn youtube_embed(url: &Url, host: &str, segments: &[&str]) -> Option<String> {
    let id = match (host, segments) {
        ("youtu.be", [id, ..]) => Some((*id).to_string()),
        ("youtube.com" | "m.youtube.com", ["watch"]) => url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned()),
        ("youtube.com" | "m.youtube.com", ["embed" | "shorts" | "live", id, ..]) => {
            Some((*id).to_string())
        }
        _ => None,
    }?;
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return None;
    }

    let start = url
        .query_pairs()
        .find(|(key, _)| key == "t" || key == "start")
        .and_then(|(_, value)| value.trim_end_matches('s').parse::<u32>().ok());
    Some(match start {
        Some(seconds) => format!("https://www.youtube.com/embed/{id}?start={seconds}"),
        None => format!("https://www.youtube.com/embed/{id}"),
    })
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
}

/// Text shown in place of an embed that is not displayed live.
///
/// # Examples
///
/// ```
/// use easel_core::embed::embed_placeholder_label;
///
/// assert_eq!(embed_placeholder_label(None, true), "Empty Web-Embed");
/// assert_eq!(embed_placeholder_label(Some("https://a.b"), false), "Embedding this url is not permitted");
/// assert_eq!(embed_placeholder_label(Some(" https://a.b "), true), "https://a.b");
/// ```
pub fn embed_placeholder_label(link: Option<&str>, valid: bool) -> String {
    match link.map(str::trim).filter(|l| !l.is_empty()) {
        None => EMPTY_EMBED_LABEL.to_string(),
        Some(_) if !valid => NOT_PERMITTED_LABEL.to_string(),
        Some(link) => normalize_link(link),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_variants() {
        for link in [
            "https://www.youtube.com/watch?v=abc123",
            "https://youtube.com/shorts/abc123",
            "https://m.youtube.com/watch?v=abc123&feature=share",
            "https://www.youtube.com/embed/abc123",
        ] {
            let embed = classify_embed_link(link).unwrap();
            assert_eq!(embed.kind, EmbedKind::Video, "{link}");
            assert_eq!(embed.url, "https://www.youtube.com/embed/abc123", "{link}");
        }
    }

    #[test]
    fn test_youtube_start_time() {
        let embed = classify_embed_link("https://youtu.be/abc?t=42s").unwrap();
        assert_eq!(embed.url, "https://www.youtube.com/embed/abc?start=42");
    }

    #[test]
    fn test_vimeo_and_loom() {
        let vimeo = classify_embed_link("https://vimeo.com/123456").unwrap();
        assert_eq!(vimeo.url, "https://player.vimeo.com/video/123456");
        let loom = classify_embed_link("https://www.loom.com/share/f00d").unwrap();
        assert_eq!(loom.url, "https://www.loom.com/embed/f00d");
        assert_eq!(loom.kind, EmbedKind::Video);
    }

    #[test]
    fn test_document_kinds() {
        let tweet = classify_embed_link("https://x.com/someone/status/1234").unwrap();
        assert_eq!(tweet.kind, EmbedKind::Document);
        assert_eq!(tweet.url, "https://twitter.com/x/status/1234");

        let gist = classify_embed_link("https://gist.github.com/user/abcdef").unwrap();
        assert_eq!(gist.kind, EmbedKind::Document);
    }

    #[test]
    fn test_generic_and_rejected() {
        let page = classify_embed_link("https://example.com/page").unwrap();
        assert_eq!(page.kind, EmbedKind::Generic);
        assert_eq!(page.url, "https://example.com/page");

        assert!(classify_embed_link("not a url").is_none());
        assert!(classify_embed_link("javascript:alert(1)").is_none());
        assert!(classify_embed_link("mailto:a@b.c").is_none());
    }

    #[test]
    fn test_normalize_link_variants() {
        assert_eq!(normalize_link("data:text/html,hi"), "about:blank");
        assert_eq!(normalize_link(" VBSCRIPT:x"), "about:blank");
        assert_eq!(normalize_link("https://ok"), "https://ok");
        assert_eq!(normalize_link(""), "");
    }
}
