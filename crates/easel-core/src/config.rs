//! Render configuration consumed read-only by both backends.
//!
//! The serializable part ([`RenderConfig`] and its nested settings) can come
//! from a TOML file or a scene's `appState`; every field has a default. The
//! runtime maps (embed validation, prefetched thumbnails) and the interaction
//! state are supplied by the host right before a render call.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::{
    color::Color,
    element::Bitmap,
    geometry::{Point, Size},
    identifier::Id,
};

/// Canvas color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(format!("invalid theme `{s}`, valid values: light, dark")),
        }
    }
}

/// How grid cells are marked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridKind {
    #[default]
    Lines,
    Dots,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub visible: bool,
    pub kind: GridKind,
    /// Multiplier applied to the palette's grid colors, 0.0-1.0.
    pub opacity: f64,
    /// Size of one minor cell at zoom 1, in document units.
    pub cell_size: f64,
    /// Number of minor cells per major cell. Must be greater than 1.
    pub subdivision: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            visible: false,
            kind: GridKind::default(),
            opacity: 1.0,
            cell_size: 20.0,
            subdivision: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrameRendering {
    /// Master switch: when false frames neither clip nor draw chrome.
    pub enabled: bool,
    pub clip: bool,
    pub outline: bool,
    pub name: bool,
}

impl Default for FrameRendering {
    fn default() -> Self {
        Self {
            enabled: true,
            clip: true,
            outline: true,
            name: true,
        }
    }
}

/// A prefetched thumbnail for an embedded video element.
#[derive(Debug, Clone, PartialEq)]
pub enum Thumbnail {
    /// Decoded pixels, used by the raster backend.
    Bitmap(Bitmap),
    /// A `data:` URL, used by the vector backend.
    DataUrl(String),
}

/// Selection and drag-into-frame state of the editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    pub selected: HashSet<Id>,
    /// Frame highlighted as the target of a drag-into-frame gesture.
    pub frame_to_highlight: Option<Id>,
    /// True while the selection is being dragged.
    pub dragging: bool,
}

impl InteractionState {
    /// True when `id` is part of an active drag.
    pub fn is_dragging(&self, id: Id) -> bool {
        self.dragging && self.selected.contains(&id)
    }
}

/// Everything a backend needs to know about how to render, apart from the
/// elements themselves.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub theme: Theme,
    pub zoom: f64,
    /// Scroll offset in document units; positive values move content right/down.
    pub scroll_x: f64,
    pub scroll_y: f64,
    /// Viewport size in CSS pixels.
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub grid: GridConfig,
    pub axes: bool,
    pub frame_rendering: FrameRendering,
    /// Suppresses editor-only affordances (frame chrome, link icons).
    pub exporting: bool,
    pub view_background_color: Option<Color>,
    #[serde(skip)]
    pub embeds_validation: HashMap<Id, bool>,
    #[serde(skip)]
    pub thumbnails: HashMap<Id, Thumbnail>,
    #[serde(skip)]
    pub interaction: InteractionState,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            zoom: 1.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
            viewport_width: 1024.0,
            viewport_height: 768.0,
            grid: GridConfig::default(),
            axes: false,
            frame_rendering: FrameRendering::default(),
            exporting: false,
            view_background_color: None,
            embeds_validation: HashMap::new(),
            thumbnails: HashMap::new(),
            interaction: InteractionState::default(),
        }
    }
}

impl RenderConfig {
    pub fn scroll(&self) -> Point {
        Point::new(self.scroll_x, self.scroll_y)
    }

    pub fn viewport(&self) -> Size {
        Size::new(self.viewport_width, self.viewport_height)
    }

    /// Zoom clamped to a usable positive value.
    pub fn effective_zoom(&self) -> f64 {
        if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        }
    }

    /// True when frames clip their children.
    pub fn clips_frames(&self) -> bool {
        self.frame_rendering.enabled && self.frame_rendering.clip
    }

    /// Validation status of an embeddable; unknown embeds count as valid.
    pub fn is_embed_valid(&self, id: Id) -> bool {
        self.embeds_validation.get(&id).copied().unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_config_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.zoom, 1.0);
        assert_eq!(config.grid.cell_size, 20.0);
        assert_eq!(config.grid.subdivision, 5);
        assert!(config.clips_frames());
        assert!(!config.exporting);
    }

    #[test]
    fn test_render_config_partial_deserialize() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"theme": "dark", "grid": {"visible": true, "kind": "dots"}}"#)
                .unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert!(config.grid.visible);
        assert_eq!(config.grid.kind, GridKind::Dots);
        assert_eq!(config.grid.cell_size, 20.0);
    }

    #[test]
    fn test_effective_zoom_guards_bad_values() {
        let config = RenderConfig {
            zoom: 0.0,
            ..RenderConfig::default()
        };
        assert_eq!(config.effective_zoom(), 1.0);
    }

    #[test]
    fn test_interaction_dragging() {
        let mut state = InteractionState::default();
        state.selected.insert(Id::new("a"));
        assert!(!state.is_dragging(Id::new("a")));
        state.dragging = true;
        assert!(state.is_dragging(Id::new("a")));
        assert!(!state.is_dragging(Id::new("b")));
    }

    #[test]
    fn test_embed_validation_default_true() {
        let mut config = RenderConfig::default();
        assert!(config.is_embed_valid(Id::new("e")));
        config.embeds_validation.insert(Id::new("e"), false);
        assert!(!config.is_embed_valid(Id::new("e")));
    }
}
