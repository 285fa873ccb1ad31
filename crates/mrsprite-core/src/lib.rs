//! mrsprite-core: control-point editing and sprite synthesis (sans-IO).
//!
//! Turns an ordered set of user-placed control points into a small RGBA
//! texture:
//!
//! point set -> normalized coordinates -> synthesized pixels
//!
//! alongside the interactive [`Editor`] state machine that keeps the
//! point set, its overlay and the synthesized image consistent on every
//! edit.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! data. Persistence, container encoding and file handling live in
//! `mrsprite-export` and `mrsprite-io`.

pub mod editor;
pub mod geometry;
pub mod normalize;
pub mod overlay;
pub mod synth;
pub mod types;

pub use editor::{Editor, EditorEvent, NullSink, Phase, RenderSink, Transition};
pub use geometry::{ControlPoint, PointRejected, PointSet, PositionRecord, Rect, clamp_to_canvas};
pub use normalize::{NormalizedMapping, denormalize, normalize};
pub use overlay::{Marker, Overlay, build_overlay};
pub use synth::{BYTES_PER_PIXEL, Synthesizer, SynthesizerKind, synthesize};
pub use types::{CanvasSize, CoreError, Dimensions, Point, RgbaImage, SynthConfig, SynthesizedImage};

/// Normalize `points` against `canvas` and synthesize an image.
///
/// The one-shot form of what the [`Editor`] does on every refresh.
///
/// # Errors
///
/// Returns the [`SynthConfig::validate`] error for a bad config, or
/// [`CoreError::InvalidCanvasState`] if the canvas has no area; synthesis
/// is skipped entirely in either case.
pub fn render(
    points: &PointSet,
    canvas: CanvasSize,
    config: &SynthConfig,
) -> Result<SynthesizedImage, CoreError> {
    config.validate()?;
    let mapping = normalize(points.positions(), canvas)?;
    Ok(synthesize(&mapping, config.resolution, config.strategy))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn render_empty_set_is_all_zero() {
        let image = render(&PointSet::default(), CanvasSize::default(), &SynthConfig::default()).unwrap();
        assert_eq!(image.as_raw().len(), 256 * 256 * 4);
        assert_eq!(image.stride(), 256 * 4);
        assert!(image.as_raw().iter().all(|&b| b == 0));
    }

    #[test]
    fn render_zero_area_canvas_fails() {
        let result = render(&PointSet::default(), CanvasSize::new(0.0, 10.0), &SynthConfig::default());
        assert!(matches!(result, Err(CoreError::InvalidCanvasState { .. })));
    }

    #[test]
    fn render_refuses_oversized_resolution() {
        let config = SynthConfig {
            resolution: Dimensions {
                width: u32::MAX,
                height: u32::MAX,
            },
            ..SynthConfig::default()
        };
        let result = render(&PointSet::default(), CanvasSize::default(), &config);
        assert!(matches!(result, Err(CoreError::UnsupportedResolution { .. })));
    }

    #[test]
    fn render_matches_editor_output() {
        let canvas = CanvasSize::default();
        let config = SynthConfig::default();
        let mut editor = Editor::new(canvas, config.clone(), NullSink);
        editor.press(Point::new(30.0, 200.0));
        editor.press(Point::new(128.0, 20.0));
        editor.press(Point::new(220.0, 160.0));
        let expected = render(editor.points(), canvas, &config).unwrap();
        assert_eq!(editor.image(), Some(&expected));
    }
}
