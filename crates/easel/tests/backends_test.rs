//! Scenarios checked against both backends.

use easel::{
    element::{BinaryFile, Bitmap, Crop, Element, ElementKind, ElementMap, FileMap, ImageData},
    export::svg::SvgBuilder,
    identifier::Id,
    raster::{RasterRenderer, RecordingSurface, SurfaceCall},
    scene::Scene,
};
use easel_core::config::RenderConfig;

fn rectangle() -> Element {
    Element::new("r", ElementKind::Rectangle, 10.0, 10.0, 50.0, 50.0)
}

fn map_of(elements: &[Element]) -> ElementMap {
    elements.iter().map(|e| (e.id(), e.clone())).collect()
}

#[test]
fn test_single_rectangle_transform_agrees() {
    let elements = map_of(&[rectangle()]);
    let config = RenderConfig {
        zoom: 2.0,
        ..RenderConfig::default()
    };

    let mut surface = RecordingSurface::new(200, 200);
    RasterRenderer::new()
        .render_frame(&mut surface, &elements, &FileMap::new(), &config)
        .expect("frame renders");
    let calls = surface.calls();
    assert!(calls.contains(&SurfaceCall::Scale { sx: 2.0, sy: 2.0 }));
    let element_transform = [
        SurfaceCall::Translate { dx: 0.0, dy: 0.0 },
        SurfaceCall::Rotate {
            degrees: 0.0,
            cx: 35.0,
            cy: 35.0,
        },
    ];
    assert!(calls.windows(2).any(|pair| pair == element_transform), "{calls:?}");

    let svg = SvgBuilder::new()
        .build()
        .render_to_string(&Scene::new([rectangle()]))
        .expect("document renders");
    assert!(svg.contains(r#"transform="translate(0 0) rotate(0 35 35)""#), "{svg}");
}

fn image(id: &str, x: f64, crop: Option<Crop>) -> Element {
    let data = ImageData::new(Id::new("photo"));
    let data = match crop {
        Some(crop) => data.with_crop(crop),
        None => data,
    };
    Element::new(id, ElementKind::Image(data), x, 0.0, 100.0, 50.0)
}

fn photo() -> BinaryFile {
    BinaryFile {
        id: Id::new("photo"),
        mime_type: "image/png".to_string(),
        data_url: "data:image/png;base64,iVBORw0KGgo=".to_string(),
        bitmap: Bitmap::new(200, 100, vec![255; 200 * 100 * 4]),
    }
}

#[test]
fn test_symbol_reuse_for_cropped_and_uncropped() {
    let crop = Crop {
        x: 50.0,
        y: 25.0,
        width: 100.0,
        height: 50.0,
        natural_width: 200.0,
        natural_height: 100.0,
    };
    let scene = Scene::new([image("plain", 0.0, None), image("cropped", 200.0, Some(crop))]).with_file(photo());

    let svg = SvgBuilder::new().build().render_to_string(&scene).unwrap();
    assert_eq!(svg.matches("<symbol").count(), 1, "{svg}");
    assert_eq!(svg.matches("data:image/png;base64").count(), 1);
    assert_eq!(svg.matches("<use").count(), 2);
    assert_eq!(svg.matches("<mask").count(), 1);

    // the cropped instance is stretched to the uncropped size
    assert!(svg.contains(r#"width="200""#), "{svg}");
    assert!(svg.contains(r#"x="150""#), "{svg}");
}

#[test]
fn test_missing_image_file_is_skipped_quietly() {
    let scene = Scene::new([image("orphan", 0.0, None)]);
    let svg = SvgBuilder::new().build().render_to_string(&scene).unwrap();
    assert!(!svg.contains("<use"));

    let mut surface = RecordingSurface::new(100, 100);
    let report = RasterRenderer::new()
        .render_frame(&mut surface, scene.elements(), scene.files(), &RenderConfig::default())
        .unwrap();
    assert!(report.failed.is_empty());
    assert!(!surface.calls().iter().any(|c| matches!(c, SurfaceCall::DrawImage { .. })));
}

#[test]
fn test_degraded_embed_exports_anchor() {
    let embed = Element::new("e", ElementKind::Embeddable, 0.0, 0.0, 320.0, 180.0).with_link("not a valid link");
    let svg = SvgBuilder::new()
        .build()
        .render_to_string(&Scene::new([embed]))
        .expect("no error for a bad link");
    assert!(svg.contains("<a "), "{svg}");
    assert!(svg.contains(r#"target="_blank""#));
    assert!(!svg.contains("foreignObject"));
}

#[test]
fn test_frame_clip_wraps_grouped_label() {
    let frame = Element::new("f", ElementKind::Frame(Default::default()), 0.0, 0.0, 100.0, 100.0);
    let rect = Element::new("box", ElementKind::Rectangle, 10.0, 10.0, 40.0, 20.0).with_frame_id("f");
    let label = Element::new(
        "label",
        ElementKind::Text(easel::element::TextData::new("hi").with_container(Id::new("box"))),
        12.0,
        12.0,
        20.0,
        16.0,
    )
    .with_frame_id("f");

    let svg = SvgBuilder::new()
        .build()
        .render_to_string(&Scene::new([frame, rect, label]))
        .unwrap();
    assert_eq!(svg.matches(r#"<clipPath id="frame-clip-f""#).count(), 1, "{svg}");
    assert_eq!(svg.matches(r#"clip-path="url(#frame-clip-f)""#).count(), 1);

    let clip = svg.find(r#"clip-path="url(#frame-clip-f)""#).unwrap();
    let text = svg.find(">hi<").expect("label text");
    assert!(clip < text);
}

#[test]
fn test_editor_link_icon_absent_from_snapshot() {
    let linked = rectangle().with_link("https://example.com");
    let elements = map_of(&[linked]);
    let snapshot = RenderConfig {
        exporting: true,
        ..RenderConfig::default()
    };
    let mut surface = RecordingSurface::new(100, 100);
    RasterRenderer::new()
        .render_frame(&mut surface, &elements, &FileMap::new(), &snapshot)
        .unwrap();
    assert!(!surface.calls().iter().any(|c| matches!(c, SurfaceCall::DrawImage { .. })));

    let svg = SvgBuilder::new()
        .build()
        .render_to_string(&Scene::new([rectangle().with_link("https://example.com")]))
        .unwrap();
    assert!(svg.contains("<a "), "{svg}");
    assert!(svg.contains(r#"href="https://example.com/""#));
}
