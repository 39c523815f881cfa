//! Scene documents.
//!
//! A [`Scene`] is the snapshot handed to the renderers: the live elements in
//! z-order, the binary files they reference and the document's own view
//! settings. Tombstoned elements are dropped here, at the boundary, so neither
//! backend ever sees them.

use indexmap::IndexMap;
use log::{debug, info};
use serde::Deserialize;

use easel_core::{
    color::Color,
    config::{RenderConfig, Theme},
    element::{BinaryFile, Element, ElementMap, FileMap},
    identifier::Id,
};

/// View settings stored in a scene document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub view_background_color: Option<Color>,
    pub theme: Option<Theme>,
    /// Minor grid cell size; `null` hides the grid.
    pub grid_size: Option<f64>,
    /// Minor cells per major cell.
    pub grid_step: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFile {
    mime_type: String,
    #[serde(rename = "dataURL")]
    data_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScene {
    #[serde(default)]
    elements: Vec<Element>,
    #[serde(default)]
    files: IndexMap<Id, RawFile>,
    #[serde(default)]
    app_state: AppState,
}

/// A renderable snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    elements: ElementMap,
    files: FileMap,
    app_state: AppState,
}

impl Scene {
    /// Creates a scene from elements in z-order.
    pub fn new(elements: impl IntoIterator<Item = Element>) -> Self {
        Self {
            elements: elements
                .into_iter()
                .filter(|e| !e.is_deleted())
                .map(|e| (e.id(), e))
                .collect(),
            files: FileMap::new(),
            app_state: AppState::default(),
        }
    }

    /// Parses a scene document.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the document does not match the scene shape.
    pub fn from_json(src: &str) -> Result<Self, serde_json::Error> {
        let raw: RawScene = serde_json::from_str(src)?;
        let total = raw.elements.len();
        let mut scene = Self::new(raw.elements);
        scene.files = raw
            .files
            .into_iter()
            .map(|(id, file)| {
                (
                    id,
                    BinaryFile {
                        id,
                        mime_type: file.mime_type,
                        data_url: file.data_url,
                        bitmap: None,
                    },
                )
            })
            .collect();
        scene.app_state = raw.app_state;

        debug!(deleted = total - scene.elements.len(); "Dropped tombstoned elements");
        info!(elements = scene.elements.len(), files = scene.files.len(); "Scene loaded");
        Ok(scene)
    }

    pub fn with_file(mut self, file: BinaryFile) -> Self {
        self.files.insert(file.id, file);
        self
    }

    pub fn with_app_state(mut self, app_state: AppState) -> Self {
        self.app_state = app_state;
        self
    }

    pub fn elements(&self) -> &ElementMap {
        &self.elements
    }

    pub fn files(&self) -> &FileMap {
        &self.files
    }

    /// Mutable access to the files, used by the prefetch phase to attach
    /// decoded bitmaps.
    pub fn files_mut(&mut self) -> &mut FileMap {
        &mut self.files
    }

    pub fn app_state(&self) -> &AppState {
        &self.app_state
    }

    /// `base` with this scene's view settings applied on top.
    pub fn render_config(&self, base: &RenderConfig) -> RenderConfig {
        let mut config = base.clone();
        if let Some(color) = self.app_state.view_background_color {
            config.view_background_color = Some(color);
        }
        if let Some(theme) = self.app_state.theme {
            config.theme = theme;
        }
        if let Some(size) = self.app_state.grid_size.filter(|s| s.is_finite() && *s > 0.0) {
            config.grid.cell_size = size;
        }
        if let Some(step) = self.app_state.grid_step.filter(|s| *s > 1) {
            config.grid.subdivision = step;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use easel_core::element::ElementKind;

    use super::*;

    const SCENE: &str = r##"{
        "type": "easel",
        "elements": [
            { "id": "a", "type": "rectangle", "x": 0, "y": 0, "width": 10, "height": 10 },
            { "id": "b", "type": "ellipse", "x": 5, "y": 5, "width": 10, "height": 10, "isDeleted": true },
            { "id": "c", "type": "image", "x": 0, "y": 0, "width": 4, "height": 4, "fileId": "f1" }
        ],
        "files": {
            "f1": { "id": "f1", "mimeType": "image/png", "dataURL": "data:image/png;base64,AA==" }
        },
        "appState": { "viewBackgroundColor": "#fafafa", "theme": "dark", "gridSize": 10, "gridStep": 4 }
    }"##;

    #[test]
    fn test_deleted_elements_are_dropped() {
        let scene = Scene::from_json(SCENE).unwrap();
        let ids: Vec<String> = scene.elements().keys().map(|id| id.to_string()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_files_are_keyed_by_id() {
        let scene = Scene::from_json(SCENE).unwrap();
        let file = scene.files().get(&Id::new("f1")).unwrap();
        assert_eq!(file.mime_type, "image/png");
        assert!(file.bitmap.is_none());
    }

    #[test]
    fn test_app_state_overrides_config() {
        let scene = Scene::from_json(SCENE).unwrap();
        let config = scene.render_config(&RenderConfig::default());
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.grid.cell_size, 10.0);
        assert_eq!(config.grid.subdivision, 4);
        assert_eq!(config.view_background_color.map(|c| c.to_hex()), Some("#fafafa".to_string()));
    }

    #[test]
    fn test_unknown_kind_is_kept_as_unsupported() {
        let scene = Scene::from_json(r#"{"elements":[{"id":"x","type":"magic"}]}"#).unwrap();
        let element = scene.elements().get(&Id::new("x")).unwrap();
        assert_eq!(element.kind(), &ElementKind::Unsupported);
    }

    #[test]
    fn test_malformed_document() {
        assert!(Scene::from_json("{\"elements\": 3}").is_err());
    }
}
