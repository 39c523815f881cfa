//! Embedded web content.
//!
//! Whether an embed is shown live, and what stands in for it otherwise, is
//! decided once by [`resolve_embed`] so the raster preview and the export agree.

use easel_core::{
    config::{RenderConfig, Thumbnail},
    element::Element,
    embed::{EmbedKind, EmbedLink, classify_embed_link, embed_placeholder_label, normalize_link},
    geometry::{Bounds, Point},
    path::PathData,
    text::truncate_with_ellipsis,
    theme::Palette,
};

use super::{MeasureFn, Primitive, TextAnchor, TextRun, centered_baseline};

const PLACEHOLDER_RADIUS: f64 = 8.0;
const LABEL_FONT_SIZE: f64 = 14.0;
const LABEL_PADDING: f64 = 10.0;
const BLANK: &str = "about:blank";

/// How an embeddable element is rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbedRendering<'a> {
    /// A live frame loading `link.url`.
    Live(EmbedLink),
    /// A plain hyperlink wrapping a thumbnail or a placeholder label.
    Anchor {
        href: String,
        thumbnail: Option<&'a Thumbnail>,
        label: String,
    },
}

/// Decides how `element` is rendered under `config`.
///
/// Exports never embed live content; neither do links that only embed through
/// injected markup, or links the host marked as not permitted.
pub fn resolve_embed<'a>(element: &Element, config: &'a RenderConfig) -> EmbedRendering<'a> {
    let valid = config.is_embed_valid(element.id());
    let classified = element.link().and_then(classify_embed_link);

    if let Some(link) = &classified {
        if !config.exporting && valid && link.kind != EmbedKind::Document {
            return EmbedRendering::Live(link.clone());
        }
    }

    let href = match (classified, element.link().map(normalize_link)) {
        (Some(link), _) => link.url,
        (None, Some(link)) if !link.is_empty() => link,
        _ => BLANK.to_string(),
    };
    EmbedRendering::Anchor {
        href,
        thumbnail: config.thumbnails.get(&element.id()),
        label: embed_placeholder_label(element.link(), valid),
    }
}

/// Placeholder card with a centered label.
pub fn placeholder_primitives(bounds: Bounds, label: &str, palette: &Palette, measure: MeasureFn) -> Vec<Primitive> {
    let card = PathData::rounded_rect(bounds, PLACEHOLDER_RADIUS);
    let text = truncate_with_ellipsis(label, bounds.width() - 2.0 * LABEL_PADDING, |s| {
        measure(s, LABEL_FONT_SIZE)
    });
    let mut out = vec![Primitive::fill(card, palette.embed_placeholder_background)];
    if !text.is_empty() {
        let origin = Point::new(
            bounds.center().x(),
            centered_baseline(bounds.min_y(), bounds.height(), LABEL_FONT_SIZE),
        );
        out.push(Primitive::Clip {
            bounds,
            children: vec![Primitive::Text(
                TextRun::new(origin, &text, LABEL_FONT_SIZE, palette.embed_placeholder_text)
                    .with_anchor(TextAnchor::Middle),
            )],
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use easel_core::{config::Theme, element::ElementKind};

    use super::*;

    fn embed(link: Option<&str>) -> Element {
        let element = Element::new("web", ElementKind::Embeddable, 0.0, 0.0, 320.0, 180.0);
        match link {
            Some(link) => element.with_link(link),
            None => element,
        }
    }

    #[test]
    fn test_live_in_editor() {
        let config = RenderConfig::default();
        let rendering = resolve_embed(&embed(Some("https://youtu.be/abc")), &config);
        assert!(matches!(rendering, EmbedRendering::Live(link) if link.kind == EmbedKind::Video));
    }

    #[test]
    fn test_export_degrades_to_anchor() {
        let config = RenderConfig {
            exporting: true,
            ..RenderConfig::default()
        };
        let rendering = resolve_embed(&embed(Some("https://example.com/page")), &config);
        assert_eq!(
            rendering,
            EmbedRendering::Anchor {
                href: "https://example.com/page".to_string(),
                thumbnail: None,
                label: "https://example.com/page".to_string(),
            }
        );
    }

    #[test]
    fn test_document_links_never_live() {
        let config = RenderConfig::default();
        let rendering = resolve_embed(&embed(Some("https://x.com/a/status/1")), &config);
        assert!(matches!(rendering, EmbedRendering::Anchor { .. }));
    }

    #[test]
    fn test_invalid_and_unparseable_links() {
        let element = embed(Some("javascript:alert(1)"));
        let mut config = RenderConfig::default();
        config.embeds_validation.insert(element.id(), false);
        let EmbedRendering::Anchor { href, label, .. } = resolve_embed(&element, &config) else {
            panic!("expected anchor");
        };
        assert_eq!(href, "about:blank");
        assert_eq!(label, "Embedding this url is not permitted");

        let EmbedRendering::Anchor { href, label, .. } = resolve_embed(&embed(None), &config) else {
            panic!("expected anchor");
        };
        assert_eq!(href, "about:blank");
        assert_eq!(label, "Empty Web-Embed");
    }

    #[test]
    fn test_thumbnail_is_passed_through() {
        let element = embed(Some("https://youtu.be/abc"));
        let mut config = RenderConfig {
            exporting: true,
            ..RenderConfig::default()
        };
        config
            .thumbnails
            .insert(element.id(), Thumbnail::DataUrl("data:image/png;base64,AA==".to_string()));
        let EmbedRendering::Anchor { thumbnail, .. } = resolve_embed(&element, &config) else {
            panic!("expected anchor");
        };
        assert!(matches!(thumbnail, Some(Thumbnail::DataUrl(_))));
    }

    #[test]
    fn test_placeholder_centers_label() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), easel_core::geometry::Size::new(200.0, 100.0));
        let palette = Palette::for_theme(Theme::Light);
        let out = placeholder_primitives(bounds, "Empty Web-Embed", &palette, &|s, _| s.len() as f64 * 5.0);
        let runs: Vec<&TextRun> = out.iter().flat_map(Primitive::text_runs).collect();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].anchor, TextAnchor::Middle);
        assert_eq!(runs[0].origin.x(), 100.0);
    }
}
