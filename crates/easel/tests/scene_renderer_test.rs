//! Integration tests for the SceneRenderer API.

use easel::{
    EaselError, RenderError, SceneRenderer,
    config::{AppConfig, ExportConfig, StyleConfig},
    identifier::Id,
};
use easel_core::config::RenderConfig;

const SINGLE_RECT: &str = r#"{
    "elements": [
        { "id": "r", "type": "rectangle", "x": 10, "y": 10, "width": 50, "height": 50 }
    ]
}"#;

#[test]
fn test_render_single_rectangle_svg() {
    let renderer = SceneRenderer::default();
    let scene = renderer.load_scene(SINGLE_RECT).expect("Failed to load scene");
    let svg = renderer.render_svg(&scene).expect("Failed to render");

    assert!(svg.contains("<svg"), "Output should be an SVG document");
    assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
    assert!(svg.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
    assert!(svg.contains(r#"viewBox="0 0 70 70""#), "{svg}");
    assert!(svg.contains(r#"transform="translate(0 0) rotate(0 35 35)""#), "{svg}");
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn test_render_png_has_signature() {
    let renderer = SceneRenderer::default();
    let scene = renderer.load_scene(SINGLE_RECT).expect("Failed to load scene");
    let png = renderer.render_png(&scene, 2.0).expect("Failed to render");
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_invalid_json_keeps_source() {
    let renderer = SceneRenderer::default();
    let source = "{ \"elements\": [ { \"id\": 1 ";
    match renderer.load_scene(source) {
        Err(EaselError::Scene { src, .. }) => assert_eq!(src, source),
        other => panic!("expected a scene error, got {other:?}"),
    }
}

#[test]
fn test_unsupported_kind_is_distinct_error() {
    let source = r#"{ "elements": [
        { "id": "ok", "type": "rectangle", "x": 0, "y": 0, "width": 10, "height": 10 },
        { "id": "mystery", "type": "hologram", "x": 0, "y": 0, "width": 10, "height": 10 }
    ] }"#;
    let renderer = SceneRenderer::default();
    let scene = renderer.load_scene(source).expect("unknown kinds still load");

    let expected = RenderError::UnsupportedElement {
        id: Id::new("mystery"),
    };
    match renderer.render_svg(&scene) {
        Err(EaselError::Render(err)) => assert_eq!(err, expected),
        other => panic!("expected a render error, got {other:?}"),
    }
    match renderer.render_png(&scene, 1.0) {
        Err(EaselError::Render(err)) => assert_eq!(err, expected),
        other => panic!("expected a render error, got {other:?}"),
    }
}

#[test]
fn test_malformed_element_does_not_abort_export() {
    let source = r#"{ "elements": [
        { "id": "bad", "type": "arrow", "x": 0, "y": 0, "width": 0, "height": 0, "points": [[0, 0]] },
        { "id": "good", "type": "ellipse", "x": 0, "y": 0, "width": 20, "height": 20 }
    ] }"#;
    let renderer = SceneRenderer::default();
    let scene = renderer.load_scene(source).expect("Failed to load scene");

    let svg = renderer.render_svg(&scene).expect("export still succeeds");
    assert_eq!(svg.matches("<g transform=").count(), 1, "{svg}");
    assert!(renderer.render_png(&scene, 1.0).is_ok());
}

#[test]
fn test_background_toggle() {
    let scene_source = SINGLE_RECT;
    let with = SceneRenderer::default();
    let scene = with.load_scene(scene_source).unwrap();
    assert!(with.render_svg(&scene).unwrap().contains("<rect"));

    let config = AppConfig::new(
        RenderConfig::default(),
        ExportConfig::default().with_background(false),
        StyleConfig::default(),
    );
    let without = SceneRenderer::new(config);
    assert!(!without.render_svg(&scene).unwrap().contains("<rect"));
}

#[test]
fn test_invalid_style_color_is_config_error() {
    let config = AppConfig::new(
        RenderConfig::default(),
        ExportConfig::default(),
        StyleConfig::new(Some("not-a-color".to_string())),
    );
    let renderer = SceneRenderer::new(config);
    let scene = renderer.load_scene(SINGLE_RECT).unwrap();
    assert!(matches!(renderer.render_svg(&scene), Err(EaselError::Config(_))));
}

#[test]
fn test_invalid_png_scale() {
    let renderer = SceneRenderer::default();
    let scene = renderer.load_scene(SINGLE_RECT).unwrap();
    assert!(matches!(renderer.render_png(&scene, 0.0), Err(EaselError::Config(_))));
}

#[test]
fn test_renderer_reusability() {
    let renderer = SceneRenderer::default();
    let scene = renderer.load_scene(SINGLE_RECT).unwrap();
    let first = renderer.render_svg(&scene).unwrap();
    let second = renderer.render_svg(&scene).unwrap();
    assert_eq!(first, second, "exports keep no state between calls");
}
