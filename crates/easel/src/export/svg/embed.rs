//! Embedded web content in exported documents.

use svg::node::element as svg_element;
use svg::node::Node;

use easel_core::{config::Thumbnail, element::Element};

use super::{
    SvgNode,
    document::{DocumentDefs, ExportContext},
    primitives::primitive_nodes,
};
use crate::subrender::embed::{EmbedRendering, placeholder_primitives, resolve_embed};

const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// The node standing in for an embeddable element.
///
/// Live content becomes a `<foreignObject>` holding an `<iframe>`. Everything
/// else becomes an anchor opening the link in a new tab, wrapping either the
/// prefetched video thumbnail or the placeholder card.
pub(super) fn embed_node(element: &Element, ctx: &ExportContext<'_>, defs: &mut DocumentDefs) -> SvgNode {
    let rect = element.rect();
    match resolve_embed(element, ctx.config) {
        EmbedRendering::Live(link) => {
            let mut iframe = svg_element::Element::new("iframe");
            iframe.assign("xmlns", XHTML_NS);
            iframe.assign("src", link.url);
            iframe.assign("width", "100%");
            iframe.assign("height", "100%");
            iframe.assign("style", "border: none");
            iframe.assign("allowfullscreen", "true");

            let mut object = svg_element::Element::new("foreignObject");
            object.assign("x", rect.min_x());
            object.assign("y", rect.min_y());
            object.assign("width", rect.width());
            object.assign("height", rect.height());
            object.append(iframe);
            Box::new(object)
        }
        EmbedRendering::Anchor {
            href,
            thumbnail,
            label,
        } => {
            let mut anchor = svg_element::Anchor::new()
                .set("href", href)
                .set("target", "_blank")
                .set("rel", "noopener noreferrer");
            match thumbnail {
                Some(Thumbnail::DataUrl(url)) => {
                    anchor = anchor.add(
                        svg_element::Image::new()
                            .set("x", rect.min_x())
                            .set("y", rect.min_y())
                            .set("width", rect.width())
                            .set("height", rect.height())
                            .set("preserveAspectRatio", "xMidYMid slice")
                            .set("href", url.as_str()),
                    );
                }
                // decoded pixels only serve the raster backend
                Some(Thumbnail::Bitmap(_)) | None => {
                    let placeholder = placeholder_primitives(rect, &label, ctx.palette, ctx.measure);
                    for node in primitive_nodes(&placeholder, defs) {
                        anchor = anchor.add(node);
                    }
                }
            }
            Box::new(anchor)
        }
    }
}

#[cfg(test)]
mod tests {
    use easel_core::{
        config::RenderConfig,
        element::{ElementKind, ElementMap, FileMap},
        geometry::Point,
        theme::Palette,
    };

    use super::*;
    use crate::subrender::measure_sans;

    fn render(element: &Element, config: &RenderConfig) -> String {
        let elements = ElementMap::new();
        let files = FileMap::new();
        let palette = Palette::for_theme(config.theme);
        let ctx = ExportContext {
            elements: &elements,
            files: &files,
            config,
            palette: &palette,
            offset: Point::default(),
            measure: &measure_sans,
        };
        embed_node(element, &ctx, &mut DocumentDefs::default()).to_string()
    }

    fn embeddable(link: &str) -> Element {
        Element::new("e", ElementKind::Embeddable, 0.0, 0.0, 320.0, 180.0).with_link(link)
    }

    #[test]
    fn test_export_degrades_to_anchor() {
        let config = RenderConfig {
            exporting: true,
            ..RenderConfig::default()
        };
        let out = render(&embeddable("https://www.youtube.com/watch?v=abc"), &config);
        assert!(out.starts_with("<a"), "{out}");
        assert!(out.contains(r#"rel="noopener noreferrer""#));
        assert!(!out.contains("foreignObject"));
    }

    #[test]
    fn test_live_embed_in_editor() {
        let out = render(&embeddable("https://example.com/page"), &RenderConfig::default());
        assert!(out.contains("<foreignObject"), "{out}");
        assert!(out.contains("<iframe"));
    }

    #[test]
    fn test_thumbnail_used_when_prefetched() {
        let element = embeddable("https://www.youtube.com/watch?v=abc");
        let mut config = RenderConfig {
            exporting: true,
            ..RenderConfig::default()
        };
        config
            .thumbnails
            .insert(element.id(), Thumbnail::DataUrl("data:image/jpeg;base64,AA==".to_string()));
        let out = render(&element, &config);
        assert!(out.contains("<image"), "{out}");
        assert!(out.contains("data:image/jpeg;base64,AA=="));
    }

    #[test]
    fn test_invalid_link_uses_blank_anchor() {
        let config = RenderConfig {
            exporting: true,
            ..RenderConfig::default()
        };
        let out = render(&embeddable("javascript:alert(1)"), &config);
        assert!(out.contains(r#"href="about:blank""#), "{out}");
    }
}
