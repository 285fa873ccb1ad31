//! Interactive editing state machine.
//!
//! The [`Editor`] owns the [`PointSet`], the canvas size and the
//! synthesis configuration. Pointer and key events from the host UI are
//! fed in through [`Editor::handle`]; every event that changes the point
//! set or its selection ends with a refresh (normalize, synthesize,
//! rebuild the overlay, present to the [`RenderSink`]) before `handle`
//! returns.
//!
//! ```text
//!            press on point             (same event)
//!   Idle ────────────────────▶ Selected ───────────▶ Dragging ──┐ move
//!    ▲  ▲                                               │  ▲────┘
//!    │  └──────────────── release ──────────────────────┘
//!    └── press on empty canvas (insert) / Delete / Escape
//! ```
//!
//! Selection flags live on the points themselves; the phase only tracks
//! the point being moved. Releasing a drag keeps the point selected, so
//! a later Delete still removes it.
//!
//! Each event is decided read-only against the current state before any
//! mutation is applied, so the point list is never mutated mid-scan.

use serde::{Deserialize, Serialize};

use crate::geometry::{PointRejected, PointSet, clamp_to_canvas};
use crate::normalize::normalize;
use crate::overlay::{Overlay, build_overlay};
use crate::synth::synthesize;
use crate::types::{CanvasSize, Point, SynthConfig, SynthesizedImage};

/// Receives the outputs of every refresh.
///
/// `image` is `None` when synthesis had to be skipped because the canvas
/// has no area.
pub trait RenderSink {
    /// Display the freshly synthesized image and overlay.
    fn present(&mut self, image: Option<&SynthesizedImage>, overlay: &Overlay);
}

impl<F> RenderSink for F
where
    F: FnMut(Option<&SynthesizedImage>, &Overlay),
{
    fn present(&mut self, image: Option<&SynthesizedImage>, overlay: &Overlay) {
        self(image, overlay);
    }
}

/// A sink that discards everything. Useful for headless editing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn present(&mut self, _image: Option<&SynthesizedImage>, _overlay: &Overlay) {}
}

/// An input event from the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditorEvent {
    /// Primary pointer button pressed at a canvas position.
    Press(Point),
    /// Pointer moved to a canvas position.
    Move(Point),
    /// Primary pointer button released at a canvas position.
    Release(Point),
    /// Delete key: remove the selected point.
    Delete,
    /// Escape key: drop the selection without deleting.
    Escape,
    /// Remove every point.
    Reset,
    /// Re-run synthesis without changing anything.
    Regenerate,
}

/// Where the editor stands with respect to the moving point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Phase {
    /// No point is being moved.
    #[default]
    Idle,
    /// A point was grabbed; the drag has not started yet.
    Selected {
        /// Index of the grabbed point.
        index: usize,
    },
    /// A point is being dragged.
    Dragging {
        /// Index of the moving point.
        index: usize,
        /// Pointer position of the previous move (or the press).
        last_move: Point,
        /// Pointer position where the drag started.
        start: Point,
    },
}

/// What an event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// The event had no effect.
    Ignored,
    /// A new point was placed at `index`.
    Inserted {
        /// Index of the new point after re-sorting.
        index: usize,
    },
    /// A placement was refused; nothing was added.
    Rejected(PointRejected),
    /// A point was grabbed and its drag started.
    DragStarted {
        /// Index of the grabbed point.
        index: usize,
    },
    /// The moving point moved.
    Moved {
        /// Index of the moving point.
        index: usize,
        /// Its new (clamped) position.
        position: Point,
    },
    /// The drag ended.
    Released {
        /// Index of the point that was moving.
        index: usize,
    },
    /// The selected point was removed.
    Deleted {
        /// Index the point occupied.
        index: usize,
    },
    /// All selection flags were cleared.
    SelectionCleared,
    /// All points were removed.
    Reset,
    /// The point set was replaced wholesale.
    Replaced {
        /// Number of points now held.
        count: usize,
    },
    /// The outputs were regenerated without a change.
    Regenerated,
}

/// Read-only verdict on a press, computed before anything is mutated.
enum PressDecision {
    Ignore,
    Grab(usize),
    Place(Result<(), PointRejected>),
}

/// The editing session.
#[derive(Debug)]
pub struct Editor<S> {
    points: PointSet,
    canvas: CanvasSize,
    config: SynthConfig,
    phase: Phase,
    image: Option<SynthesizedImage>,
    overlay: Overlay,
    sink: S,
}

impl<S: RenderSink> Editor<S> {
    /// Start a session with an empty point set and present the initial
    /// (empty) outputs.
    pub fn new(canvas: CanvasSize, config: SynthConfig, sink: S) -> Self {
        let mut editor = Self {
            points: PointSet::new(config.marker_half_size),
            canvas,
            config,
            phase: Phase::Idle,
            image: None,
            overlay: Overlay::default(),
            sink,
        };
        editor.refresh();
        editor
    }

    /// Feed one input event through the state machine.
    pub fn handle(&mut self, event: EditorEvent) -> Transition {
        let transition = match event {
            EditorEvent::Press(at) => self.press(at),
            EditorEvent::Move(to) => self.move_to(to),
            EditorEvent::Release(at) => self.release(at),
            EditorEvent::Delete => self.delete_selected(),
            EditorEvent::Escape => self.escape(),
            EditorEvent::Reset => self.reset(),
            EditorEvent::Regenerate => self.regenerate(),
        };
        log::debug!("{event:?} -> {transition:?} (phase {:?})", self.phase);
        transition
    }

    /// Pointer pressed at `at`.
    ///
    /// Presses outside the canvas are ignored. A press on a point grabs
    /// it and starts a drag; a press on empty canvas clears the selection
    /// and tries to place a new point.
    pub fn press(&mut self, at: Point) -> Transition {
        // A press while dragging means the release was lost.
        if matches!(self.phase, Phase::Dragging { .. }) {
            self.phase = Phase::Idle;
        }

        match self.decide_press(at) {
            PressDecision::Ignore => Transition::Ignored,
            PressDecision::Grab(index) => {
                self.points.select_only(index);
                self.phase = Phase::Selected { index };
                self.begin_drag(at);
                self.refresh();
                Transition::DragStarted { index }
            }
            PressDecision::Place(Err(reason)) => {
                log::debug!("placement at ({}, {}) rejected: {reason}", at.x, at.y);
                self.points.clear_selection();
                self.phase = Phase::Idle;
                self.refresh();
                Transition::Rejected(reason)
            }
            PressDecision::Place(Ok(())) => {
                self.points.clear_selection();
                self.phase = Phase::Idle;
                let transition = match self.points.insert(at, self.canvas) {
                    Ok(index) => Transition::Inserted { index },
                    Err(reason) => Transition::Rejected(reason),
                };
                self.refresh();
                transition
            }
        }
    }

    fn decide_press(&self, at: Point) -> PressDecision {
        if !self.canvas.contains(at) {
            return PressDecision::Ignore;
        }
        match self.points.hit_test(at) {
            Some(index) => PressDecision::Grab(index),
            None => PressDecision::Place(self.points.check_insert(at, self.canvas)),
        }
    }

    /// `Selected -> Dragging`, anchored at the press position.
    fn begin_drag(&mut self, at: Point) {
        if let Phase::Selected { index } = self.phase {
            self.phase = Phase::Dragging {
                index,
                last_move: at,
                start: at,
            };
        }
    }

    /// Pointer moved to `to`.
    ///
    /// While dragging, the moving point follows the pointer delta and is
    /// clamped to the canvas; every move refreshes. Otherwise ignored.
    pub fn move_to(&mut self, to: Point) -> Transition {
        let Phase::Dragging {
            index,
            last_move,
            start,
        } = self.phase
        else {
            return Transition::Ignored;
        };
        let Some(current) = self.points.get(index).map(|p| p.position) else {
            self.phase = Phase::Idle;
            return Transition::Ignored;
        };

        let position = clamp_to_canvas(
            current.offset(to.x - last_move.x, to.y - last_move.y),
            self.canvas,
        );
        self.points.set_position(index, position);
        self.phase = Phase::Dragging {
            index,
            last_move: to,
            start,
        };
        self.refresh();
        Transition::Moved { index, position }
    }

    /// Pointer released. Ends a drag without re-sorting; the point stays
    /// selected.
    pub fn release(&mut self, _at: Point) -> Transition {
        match self.phase {
            Phase::Dragging { index, .. } | Phase::Selected { index } => {
                self.phase = Phase::Idle;
                Transition::Released { index }
            }
            Phase::Idle => Transition::Ignored,
        }
    }

    /// Remove the first selected point, if any.
    pub fn delete_selected(&mut self) -> Transition {
        self.phase = Phase::Idle;
        let Some(index) = self.points.selected_index() else {
            return Transition::Ignored;
        };
        self.points.remove(index);
        self.refresh();
        Transition::Deleted { index }
    }

    /// Clear every selection flag and the moving point.
    pub fn escape(&mut self) -> Transition {
        self.phase = Phase::Idle;
        self.points.clear_selection();
        self.refresh();
        Transition::SelectionCleared
    }

    /// Remove every point.
    pub fn reset(&mut self) -> Transition {
        self.phase = Phase::Idle;
        self.points.clear();
        self.refresh();
        Transition::Reset
    }

    /// Regenerate the outputs without changing anything.
    pub fn regenerate(&mut self) -> Transition {
        self.refresh();
        Transition::Regenerated
    }

    /// Replace the point set wholesale, e.g. after a successful load.
    ///
    /// The incoming set keeps its order; selection is cleared.
    pub fn replace_points(&mut self, mut points: PointSet) -> Transition {
        points.clear_selection();
        self.phase = Phase::Idle;
        self.points = points;
        self.refresh();
        Transition::Replaced {
            count: self.points.len(),
        }
    }

    /// Change the canvas size and refresh.
    ///
    /// Existing points keep their canvas coordinates.
    pub fn resize_canvas(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
        self.refresh();
    }

    /// Normalize, synthesize, rebuild the overlay, and present.
    ///
    /// On a zero-area canvas synthesis is skipped, the previous image is
    /// dropped and only the overlay is presented.
    fn refresh(&mut self) {
        self.image = match normalize(self.points.positions(), self.canvas) {
            Ok(mapping) => Some(synthesize(
                &mapping,
                self.config.resolution,
                self.config.strategy,
            )),
            Err(e) => {
                log::warn!("{e}");
                None
            }
        };
        self.overlay = build_overlay(&self.points);
        self.sink.present(self.image.as_ref(), &self.overlay);
    }

    /// The current point set.
    pub const fn points(&self) -> &PointSet {
        &self.points
    }

    /// The current phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The canvas size.
    pub const fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// The synthesis configuration.
    pub const fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// The last synthesized image, if the last refresh produced one.
    pub const fn image(&self) -> Option<&SynthesizedImage> {
        self.image.as_ref()
    }

    /// The overlay from the last refresh.
    pub const fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// The render sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the editor and return its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
