//! Vector overlay description handed to the rendering collaborator.
//!
//! The overlay is pure geometry: a polyline through the points in stored
//! order and one marker square per point, tagged with its selection
//! state. Drawing it is the host's business.

use serde::{Deserialize, Serialize};

use crate::geometry::{PointSet, Rect};
use crate::types::Point;

/// Stroke color of the connecting polyline (black).
pub const LINE_COLOR: [u8; 3] = [0, 0, 0];
/// Outline color of a selected marker (light blue).
pub const SELECTED_COLOR: [u8; 3] = [173, 216, 230];
/// Outline color of an unselected marker (dark red).
pub const UNSELECTED_COLOR: [u8; 3] = [139, 0, 0];

/// A marker square around one control point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// The square outline, in canvas coordinates.
    pub rect: Rect,
    /// Whether the point is selected.
    pub selected: bool,
}

impl Marker {
    /// Outline color for this marker's selection state.
    #[must_use]
    pub const fn color(&self) -> [u8; 3] {
        if self.selected {
            SELECTED_COLOR
        } else {
            UNSELECTED_COLOR
        }
    }
}

/// Overlay geometry for one refresh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Overlay {
    /// Points joined in stored sequence order.
    pub polyline: Vec<Point>,
    /// One marker per point, in stored order.
    pub markers: Vec<Marker>,
}

impl Overlay {
    /// Line segments of the polyline as `(start, end)` pairs.
    ///
    /// Fewer than two points yield no segments.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.polyline.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Build the overlay for `points`.
///
/// Follows stored order, so an unsorted set after a drag draws exactly
/// as the user arranged it.
#[must_use]
pub fn build_overlay(points: &PointSet) -> Overlay {
    let half = points.half_size();
    Overlay {
        polyline: points.positions(),
        markers: points
            .iter()
            .map(|p| Marker {
                rect: p.bounding_rect(half),
                selected: p.selected,
            })
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::CanvasSize;

    fn set_with(positions: &[(f64, f64)]) -> PointSet {
        let mut set = PointSet::new(5.0);
        for &(x, y) in positions {
            set.insert(Point::new(x, y), CanvasSize::default()).unwrap();
        }
        set
    }

    #[test]
    fn empty_set_gives_empty_overlay() {
        let overlay = build_overlay(&PointSet::new(5.0));
        assert!(overlay.polyline.is_empty());
        assert!(overlay.markers.is_empty());
        assert_eq!(overlay.segments().count(), 0);
    }

    #[test]
    fn single_point_has_marker_but_no_segment() {
        let overlay = build_overlay(&set_with(&[(20.0, 20.0)]));
        assert_eq!(overlay.markers.len(), 1);
        assert_eq!(overlay.segments().count(), 0);
    }

    #[test]
    fn polyline_follows_stored_order() {
        let mut set = set_with(&[(10.0, 10.0), (100.0, 50.0), (200.0, 240.0)]);
        // A drag past its neighbor leaves the set unsorted.
        set.set_position(0, Point::new(150.0, 10.0));
        let overlay = build_overlay(&set);
        let segments: Vec<_> = overlay.segments().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], (Point::new(150.0, 10.0), Point::new(100.0, 50.0)));
        assert_eq!(segments[1], (Point::new(100.0, 50.0), Point::new(200.0, 240.0)));
    }

    #[test]
    fn marker_colors_follow_selection() {
        let mut set = set_with(&[(10.0, 10.0), (100.0, 50.0)]);
        set.select_only(1);
        let overlay = build_overlay(&set);
        assert_eq!(overlay.markers[0].color(), UNSELECTED_COLOR);
        assert_eq!(overlay.markers[1].color(), SELECTED_COLOR);
        assert_eq!(overlay.markers[1].rect, Rect::square(Point::new(100.0, 50.0), 5.0));
    }
}
