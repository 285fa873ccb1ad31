//! Canvas-to-unit-square coordinate transform.
//!
//! Synthesis works in normalized coordinates where the canvas maps onto
//! `[0, 1] × [0, 1]`:
//!
//! ```text
//! u = x / canvas_width
//! v = y / canvas_height
//! ```
//!
//! The result is a flat `[u0, v0, u1, v1, ...]` array in point order,
//! rebuilt on every change and borrowed by the synthesizer for the
//! duration of one call.

use crate::types::{CanvasSize, CoreError, Point};

/// Flat normalized coordinates, two `f32` values per point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedMapping(Vec<f32>);

impl NormalizedMapping {
    /// Wrap a flat `[u0, v0, u1, v1, ...]` array.
    #[must_use]
    pub const fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// The flat value array.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Number of `(u, v)` pairs.
    #[must_use]
    pub const fn point_count(&self) -> usize {
        self.0.len() / 2
    }

    /// Returns `true` if the mapping holds no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.len() < 2
    }
}

/// Normalize canvas-space points into the unit square.
///
/// # Errors
///
/// Returns [`CoreError::InvalidCanvasState`] if the canvas has no area.
/// Nothing is divided in that case; callers must skip synthesis.
#[allow(clippy::cast_possible_truncation)]
pub fn normalize<I>(points: I, canvas: CanvasSize) -> Result<NormalizedMapping, CoreError>
where
    I: IntoIterator<Item = Point>,
{
    if canvas.is_zero_area() {
        return Err(CoreError::InvalidCanvasState {
            width: canvas.width,
            height: canvas.height,
        });
    }

    let values = points
        .into_iter()
        .flat_map(|p| [(p.x / canvas.width) as f32, (p.y / canvas.height) as f32])
        .collect();
    Ok(NormalizedMapping(values))
}

/// Map a normalized `(u, v)` pair back into canvas space.
#[must_use]
pub fn denormalize(u: f32, v: f32, canvas: CanvasSize) -> Point {
    Point::new(f64::from(u) * canvas.width, f64::from(v) * canvas.height)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn divides_each_axis_by_its_dimension() {
        let canvas = CanvasSize::new(200.0, 100.0);
        let mapping = normalize([Point::new(50.0, 50.0), Point::new(200.0, 0.0)], canvas).unwrap();
        assert_eq!(mapping.as_slice(), &[0.25, 0.5, 1.0, 0.0]);
        assert_eq!(mapping.point_count(), 2);
    }

    #[test]
    fn empty_input_gives_empty_mapping() {
        let mapping = normalize(std::iter::empty(), CanvasSize::default()).unwrap();
        assert!(mapping.is_empty());
        assert_eq!(mapping.point_count(), 0);
    }

    #[test]
    fn zero_width_canvas_is_rejected() {
        let result = normalize([Point::new(1.0, 1.0)], CanvasSize::new(0.0, 100.0));
        assert!(matches!(result, Err(CoreError::InvalidCanvasState { .. })));
    }

    #[test]
    fn zero_height_canvas_is_rejected() {
        let result = normalize(std::iter::empty(), CanvasSize::new(100.0, 0.0));
        assert!(matches!(result, Err(CoreError::InvalidCanvasState { .. })));
    }

    #[test]
    fn denormalize_inverts_normalize() {
        let canvas = CanvasSize::new(320.0, 240.0);
        let p = Point::new(80.0, 60.0);
        let mapping = normalize([p], canvas).unwrap();
        let values = mapping.as_slice();
        let back = denormalize(values[0], values[1], canvas);
        assert!((back.x - p.x).abs() < 1e-4);
        assert!((back.y - p.y).abs() < 1e-4);
    }
}
