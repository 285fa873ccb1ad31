//! Control points, their marker squares, and the ordered point set.
//!
//! The [`PointSet`] keeps two invariants:
//!
//! - **No overlap.** Insertion rejects a candidate whose marker square
//!   would intersect an existing square. Squares are closed, so sharing
//!   an edge or a corner counts as intersecting and every canvas point
//!   lies in at most one square.
//! - **Sorted by x after insertion.** Every successful insertion stably
//!   re-sorts the sequence by `x`. Dragging does *not* re-sort, so a drag
//!   can leave the sequence locally unsorted until the next insertion.
//!   Hit-testing and overlay drawing walk the stored order and never
//!   assume it is sorted.

use serde::{Deserialize, Serialize};

use crate::types::{CanvasSize, Point};

/// An axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub min_x: f64,
    /// Top edge.
    pub min_y: f64,
    /// Right edge.
    pub max_x: f64,
    /// Bottom edge.
    pub max_y: f64,
}

impl Rect {
    /// The square of half-size `half` centered on `center`.
    #[must_use]
    pub fn square(center: Point, half: f64) -> Self {
        Self {
            min_x: center.x - half,
            min_y: center.y - half,
            max_x: center.x + half,
            max_y: center.y + half,
        }
    }

    /// Width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns `true` if `p` lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }

    /// Returns `true` if the two closed rectangles intersect.
    ///
    /// Matches [`contains`](Self::contains): rectangles sharing an edge or
    /// a corner have a common point and so overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}

/// The persisted part of a control point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    /// Horizontal position in canvas pixels.
    pub x: f64,
    /// Vertical position in canvas pixels.
    pub y: f64,
}

impl From<Point> for PositionRecord {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<PositionRecord> for Point {
    fn from(r: PositionRecord) -> Self {
        Self::new(r.x, r.y)
    }
}

/// A user-placed control point with its transient selection flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    /// Position in canvas pixels.
    pub position: Point,
    /// Whether the point is currently selected. Never persisted.
    pub selected: bool,
}

impl ControlPoint {
    /// An unselected control point at `position`.
    #[must_use]
    pub const fn new(position: Point) -> Self {
        Self {
            position,
            selected: false,
        }
    }

    /// The marker square used for hit-testing and drawing.
    #[must_use]
    pub fn bounding_rect(&self, half_size: f64) -> Rect {
        Rect::square(self.position, half_size)
    }
}

/// Why an insertion was refused.
///
/// Rejection is an expected outcome of a click, not a failure: the point
/// simply does not appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PointRejected {
    /// The candidate lies outside the canvas or is not finite.
    #[error("candidate lies outside the canvas")]
    OutsideCanvas,

    /// The candidate's square would overlap the square of an existing
    /// point.
    #[error("candidate overlaps point {index}")]
    Overlaps {
        /// Index of the first conflicting point in stored order.
        index: usize,
    },
}

/// Clamp `pos` into `[0, width] × [0, height]`, each axis independently.
#[must_use]
pub fn clamp_to_canvas(pos: Point, canvas: CanvasSize) -> Point {
    Point::new(
        pos.x.clamp(0.0, canvas.width.max(0.0)),
        pos.y.clamp(0.0, canvas.height.max(0.0)),
    )
}

/// The ordered collection of control points.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    points: Vec<ControlPoint>,
    half_size: f64,
}

impl PointSet {
    /// An empty set whose markers have half-size `half_size`.
    #[must_use]
    pub const fn new(half_size: f64) -> Self {
        Self {
            points: Vec::new(),
            half_size,
        }
    }

    /// Build a set from persisted records, preserving their order.
    ///
    /// Every point starts unselected. The order is taken as stored: a set
    /// saved after a drag may be unsorted and stays that way.
    #[must_use]
    pub fn from_records(records: &[PositionRecord], half_size: f64) -> Self {
        Self {
            points: records
                .iter()
                .map(|&r| ControlPoint::new(r.into()))
                .collect(),
            half_size,
        }
    }

    /// The persisted form of the set, in stored order.
    #[must_use]
    pub fn to_records(&self) -> Vec<PositionRecord> {
        self.points.iter().map(|p| p.position.into()).collect()
    }

    /// Marker half-size in canvas pixels.
    #[must_use]
    pub const fn half_size(&self) -> f64 {
        self.half_size
    }

    /// Number of points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the set holds no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The point at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ControlPoint> {
        self.points.get(index)
    }

    /// All points in stored order.
    #[must_use]
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Iterate over points in stored order.
    pub fn iter(&self) -> std::slice::Iter<'_, ControlPoint> {
        self.points.iter()
    }

    /// Positions in stored order.
    #[must_use]
    pub fn positions(&self) -> Vec<Point> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// Try to insert a point at `candidate`.
    ///
    /// On success the sequence is stably re-sorted by `x` and the new
    /// index of the inserted point is returned.
    ///
    /// # Errors
    ///
    /// Returns [`PointRejected::OutsideCanvas`] if `candidate` is outside
    /// `canvas`, and [`PointRejected::Overlaps`] if its square would
    /// overlap an existing square. The set is untouched in both cases.
    pub fn insert(&mut self, candidate: Point, canvas: CanvasSize) -> Result<usize, PointRejected> {
        self.check_insert(candidate, canvas)?;

        self.points.push(ControlPoint::new(candidate));
        let inserted = self.points.len() - 1;

        // Stable sort; carry the inserted point's identity through it.
        let mut order: Vec<usize> = (0..self.points.len()).collect();
        order.sort_by(|&a, &b| self.points[a].position.x.total_cmp(&self.points[b].position.x));
        let new_index = order.iter().position(|&i| i == inserted).unwrap_or(inserted);
        self.points = order.into_iter().map(|i| self.points[i]).collect();

        Ok(new_index)
    }

    /// Decide whether `candidate` would be accepted without mutating.
    ///
    /// # Errors
    ///
    /// Same as [`insert`](Self::insert).
    pub fn check_insert(&self, candidate: Point, canvas: CanvasSize) -> Result<(), PointRejected> {
        if !canvas.contains(candidate) {
            return Err(PointRejected::OutsideCanvas);
        }
        let square = Rect::square(candidate, self.half_size);
        match self
            .points
            .iter()
            .position(|p| p.bounding_rect(self.half_size).overlaps(&square))
        {
            Some(index) => Err(PointRejected::Overlaps { index }),
            None => Ok(()),
        }
    }

    /// The first point, in stored order, whose square contains `query`.
    ///
    /// First match wins even if a later point is nearer.
    #[must_use]
    pub fn hit_test(&self, query: Point) -> Option<usize> {
        self.points
            .iter()
            .position(|p| p.bounding_rect(self.half_size).contains(query))
    }

    /// Remove the point at `index`, shifting later points down.
    pub fn remove(&mut self, index: usize) -> Option<ControlPoint> {
        (index < self.points.len()).then(|| self.points.remove(index))
    }

    /// Remove every point.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Index of the first point flagged as selected.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.points.iter().position(|p| p.selected)
    }

    /// Flag exactly the point at `index` as selected.
    pub fn select_only(&mut self, index: usize) {
        for (i, p) in self.points.iter_mut().enumerate() {
            p.selected = i == index;
        }
    }

    /// Clear every selection flag.
    pub fn clear_selection(&mut self) {
        for p in &mut self.points {
            p.selected = false;
        }
    }

    /// Move the point at `index` to `position` without re-sorting.
    ///
    /// Returns `false` if there is no such point.
    pub fn set_position(&mut self, index: usize, position: Point) -> bool {
        match self.points.get_mut(index) {
            Some(p) => {
                p.position = position;
                true
            }
            None => false,
        }
    }

    /// Returns `true` if positions are non-decreasing in `x`.
    #[must_use]
    pub fn is_sorted_by_x(&self) -> bool {
        self.points
            .windows(2)
            .all(|w| w[0].position.x <= w[1].position.x)
    }
}

impl Default for PointSet {
    fn default() -> Self {
        Self::new(crate::types::SynthConfig::DEFAULT_MARKER_HALF_SIZE)
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a ControlPoint;
    type IntoIter = std::slice::Iter<'a, ControlPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
