//! Text measurement backed by cosmic-text.
//!
//! Layout decisions that depend on text width (file-card badges, filename
//! truncation, frame names) are made once here and shared by both backends.
//! The raster backend also borrows the same [`FontSystem`] to rasterize glyphs,
//! so measured and painted text agree.

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;

use crate::geometry::Size;

/// Width of one glyph relative to the font size when no font can be shaped.
const FALLBACK_ADVANCE: f64 = 0.55;
pub const ELLIPSIS: char = '\u{2026}';

/// Font family selector for measurement and rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind<'a> {
    SansSerif,
    Monospace,
    Named(&'a str),
}

impl<'a> FontKind<'a> {
    fn family(self) -> Family<'a> {
        match self {
            Self::SansSerif => Family::SansSerif,
            Self::Monospace => Family::Monospace,
            Self::Named(name) => Family::Name(name),
        }
    }

    /// Attributes for a cosmic-text buffer using this family.
    pub fn attrs(self) -> Attrs<'a> {
        Attrs::new().family(self.family())
    }
}

/// Owns the process-wide [`FontSystem`]; creating one scans system fonts, so
/// it is built once and shared.
struct TextManager {
    font_system: Mutex<FontSystem>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();

/// Runs `f` with exclusive access to the shared font system.
pub fn with_font_system<R>(f: impl FnOnce(&mut FontSystem) -> R) -> R {
    let manager = TEXT_MANAGER.get_or_init(TextManager::new);
    let mut font_system = manager
        .font_system
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut font_system)
}

/// Measures `text` at `font_size` with lines spaced `font_size * line_height`.
///
/// Falls back to [`estimate_text_size`] when no glyphs could be shaped (for
/// example on a system without fonts).
pub fn measure_text(text: &str, font_size: f64, line_height: f64, font: FontKind<'_>) -> Size {
    if text.is_empty() || font_size <= 0.0 {
        return Size::default();
    }
    let line_px = (font_size * line_height) as f32;
    let metrics = Metrics::new(font_size as f32, line_px);

    let width = with_font_system(|font_system| {
        let mut buffer = Buffer::new(font_system, metrics);
        let mut buffer = buffer.borrow_with(font_system);
        buffer.set_size(None, None);
        buffer.set_text(text, &font.attrs(), Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|g| f64::from(g.x + g.w)))
            .fold(None, |acc: Option<f64>, w| Some(acc.map_or(w, |a| a.max(w))))
    });

    let line_count = text.lines().count().max(1) as f64;
    match width {
        Some(width) if width > 0.0 => Size::new(width, line_count * font_size * line_height),
        _ => estimate_text_size(text, font_size, line_height),
    }
}

/// A font-independent size estimate.
pub fn estimate_text_size(text: &str, font_size: f64, line_height: f64) -> Size {
    let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let line_count = text.lines().count().max(1) as f64;
    Size::new(
        widest as f64 * font_size * FALLBACK_ADVANCE,
        line_count * font_size * line_height,
    )
}

/// Shortens `text` with a trailing ellipsis until it fits in `max_width`.
///
/// `measure` returns the width of a candidate string; it is injected so callers
/// can use either real or estimated metrics.
///
/// # Examples
///
/// ```
/// use easel_core::text::truncate_with_ellipsis;
///
/// let width = |s: &str| s.chars().count() as f64 * 10.0;
/// assert_eq!(truncate_with_ellipsis("report.pdf", 60.0, width), "repor\u{2026}");
/// assert_eq!(truncate_with_ellipsis("a.pdf", 60.0, width), "a.pdf");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> String {
    if measure(text) <= max_width {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    for keep in (0..chars.len()).rev() {
        let candidate: String = chars[..keep].iter().chain(std::iter::once(&ELLIPSIS)).collect();
        if measure(&candidate) <= max_width {
            return candidate;
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_measure_empty_text_is_zero() {
        assert!(measure_text("", 16.0, 1.25, FontKind::SansSerif).is_zero());
    }

    #[test]
    fn test_measure_height_follows_line_count() {
        let size = measure_text("one\ntwo\nthree", 10.0, 1.5, FontKind::SansSerif);
        assert_approx_eq!(f64, size.height(), 45.0);
        assert!(size.width() > 0.0);
    }

    #[test]
    fn test_longer_text_is_wider() {
        let short = measure_text("ab", 16.0, 1.25, FontKind::Monospace);
        let long = measure_text("abcdefgh", 16.0, 1.25, FontKind::Monospace);
        assert!(long.width() > short.width());
    }

    #[test]
    fn test_estimate_text_size() {
        let size = estimate_text_size("abcd\nab", 10.0, 1.0);
        assert_approx_eq!(f64, size.width(), 22.0);
        assert_approx_eq!(f64, size.height(), 20.0);
    }

    #[test]
    fn test_truncate_never_fits_returns_empty() {
        assert_eq!(truncate_with_ellipsis("abc", 1.0, |s| s.len() as f64 * 10.0), "");
    }
}
