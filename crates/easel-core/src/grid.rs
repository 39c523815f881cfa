//! Zoom-adaptive grid steps.
//!
//! The grid subdivides as the user zooms in: every time the zoom grows by the
//! subdivision factor, the level increments and the minor step shrinks by the
//! same factor, so the on-screen density repeats instead of drifting. Line and
//! dot positions are always derived from an integer cell index, never from a
//! floating modulo of the scroll offset.

use log::trace;

/// Tolerance used when deciding which side of a level boundary a zoom is on.
const LEVEL_EPSILON: f64 = 1e-9;
/// Tolerance of [`is_on_major`].
const MAJOR_EPSILON: f64 = 1e-6;
/// Upper bound on lines per axis; beyond this the grid is not drawn.
pub const MAX_GRID_LINES: i64 = 10_000;

/// Result of [`compute_grid_steps`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSteps {
    /// Distance between adjacent lines, in document units.
    pub minor: f64,
    /// Distance between emphasized lines, `minor * subdivision`.
    pub major: f64,
    /// Discrete subdivision level; 0 at zoom 1.
    pub level: i32,
}

impl GridSteps {
    /// Decimal places for axis labels at this level.
    pub fn label_precision(&self) -> usize {
        self.level.max(0) as usize
    }
}

/// Computes the displayed grid steps for `zoom`.
///
/// `level = floor(log(zoom) / log(subdivision))`, `minor = cell_size /
/// subdivision^level` and `major = minor * subdivision`.
///
/// # Examples
///
/// ```
/// use easel_core::grid::compute_grid_steps;
///
/// let steps = compute_grid_steps(20.0, 5, 1.0);
/// assert_eq!((steps.minor, steps.major, steps.level), (20.0, 100.0, 0));
///
/// let zoomed = compute_grid_steps(20.0, 5, 5.0);
/// assert_eq!((zoomed.minor, zoomed.level), (4.0, 1));
/// ```
pub fn compute_grid_steps(cell_size: f64, subdivision: u32, zoom: f64) -> GridSteps {
    let factor = f64::from(subdivision.max(2));
    let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
    let level = (zoom.ln() / factor.ln() + LEVEL_EPSILON).floor() as i32;
    let minor = cell_size / factor.powi(level);
    GridSteps {
        minor,
        major: minor * factor,
        level,
    }
}

/// True when cell index `k` falls on a major line.
///
/// # Examples
///
/// ```
/// use easel_core::grid::is_on_major;
///
/// assert!(is_on_major(-10, 5));
/// assert!(!is_on_major(7, 5));
/// ```
pub fn is_on_major(k: i64, subdivision: u32) -> bool {
    let factor = f64::from(subdivision.max(2));
    let ratio = k as f64 / factor;
    (ratio - ratio.round()).abs() < MAJOR_EPSILON
}

/// One grid line (or a row/column of dots) along an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub index: i64,
    /// Document coordinate, `index * minor`.
    pub position: f64,
    pub major: bool,
}

/// Every grid line whose position lies within `[start, end]` (document units).
///
/// Returns nothing when the range would need more than [`MAX_GRID_LINES`].
pub fn grid_lines(start: f64, end: f64, steps: &GridSteps, subdivision: u32) -> Vec<GridLine> {
    if !(start.is_finite() && end.is_finite()) || steps.minor <= 0.0 || end < start {
        return Vec::new();
    }
    let first = (start / steps.minor).floor() as i64;
    let last = (end / steps.minor).ceil() as i64;
    if last.saturating_sub(first) > MAX_GRID_LINES {
        trace!(first = first, last = last, minor = steps.minor; "Grid range too dense, skipping");
        return Vec::new();
    }
    (first..=last)
        .map(|index| GridLine {
            index,
            position: index as f64 * steps.minor,
            major: is_on_major(index, subdivision),
        })
        .collect()
}

/// Formats an axis label for `value` with the level's precision.
///
/// # Examples
///
/// ```
/// use easel_core::grid::{compute_grid_steps, format_axis_label};
///
/// let steps = compute_grid_steps(20.0, 5, 30.0);
/// assert_eq!(format_axis_label(0.8, &steps), "0.80");
/// ```
pub fn format_axis_label(value: f64, steps: &GridSteps) -> String {
    let precision = steps.label_precision();
    let label = format!("{value:.precision$}");
    // "-0" and "-0.00" read as noise next to the origin
    if label.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        label.trim_start_matches('-').to_string()
    } else {
        label
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Property Test Functions
    // ===================

    /// Multiplying the zoom by the subdivision factor moves exactly one level.
    fn check_level_step_per_factor(
        zoom: f64,
        cell_size: f64,
        subdivision: u32,
    ) -> Result<(), TestCaseError> {
        let factor = f64::from(subdivision);
        let base = compute_grid_steps(cell_size, subdivision, zoom);
        let next = compute_grid_steps(cell_size, subdivision, zoom * factor);

        prop_assert_eq!(next.level, base.level + 1);
        prop_assert!(approx_eq!(
            f64,
            base.minor / next.minor,
            factor,
            epsilon = 1e-9
        ));
        Ok(())
    }

    /// The on-screen minor step stays within one subdivision band.
    fn check_screen_density_is_bounded(zoom: f64, subdivision: u32) -> Result<(), TestCaseError> {
        let cell_size = 20.0;
        let steps = compute_grid_steps(cell_size, subdivision, zoom);
        let on_screen = steps.minor * zoom;
        prop_assert!(on_screen >= cell_size * (1.0 - 1e-6));
        prop_assert!(on_screen < cell_size * f64::from(subdivision) * (1.0 + 1e-6));
        Ok(())
    }

    /// Index classification agrees with integer arithmetic.
    fn check_is_on_major_matches_modulo(k: i64, subdivision: u32) -> Result<(), TestCaseError> {
        prop_assert_eq!(is_on_major(k, subdivision), k % i64::from(subdivision) == 0);
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn level_step_per_factor(
            zoom in 0.001f64..1000.0,
            cell_size in 1.0f64..100.0,
            subdivision in 2u32..10,
        ) {
            check_level_step_per_factor(zoom, cell_size, subdivision)?;
        }

        #[test]
        fn screen_density_is_bounded(zoom in 0.001f64..1000.0, subdivision in 2u32..10) {
            check_screen_density_is_bounded(zoom, subdivision)?;
        }

        #[test]
        fn is_on_major_matches_modulo(k in -1_000_000i64..1_000_000, subdivision in 2u32..10) {
            check_is_on_major_matches_modulo(k, subdivision)?;
        }
    }
}
