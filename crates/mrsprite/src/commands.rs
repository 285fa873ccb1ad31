//! Subcommand implementations.
//!
//! Each function takes its parsed arguments, does the work, and returns a
//! summary for `main` to print. Nothing here writes to stdout.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use mrsprite_core::{
    CanvasSize, Editor, EditorEvent, Overlay, Point, PointSet, RenderSink, SynthesizedImage,
    Transition, build_overlay, normalize,
};
use mrsprite_export::{overlay_to_svg, render_preview};
use mrsprite_io::{export_image, load_points, save_points};

use crate::CliError;
use crate::cli::{InspectArgs, OverlayArgs, RenderArgs, ReplayArgs};

/// What `render` produced.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSummary {
    /// Number of points rendered.
    pub points: usize,
    /// Container the texture was written in.
    pub format: &'static str,
}

/// Render a saved point list to an image file, plus optional overlays.
///
/// # Errors
///
/// Fails if the config, the point file, synthesis, or any output write
/// fails.
pub fn render(args: &RenderArgs) -> Result<RenderSummary, CliError> {
    let config = args.synth.config()?;
    let canvas = args.synth.canvas;
    let points = load_points(&args.points, config.marker_half_size)?;
    let image = mrsprite_core::render(&points, canvas, &config)?;
    let format = export_image(&args.output, &image)?;
    write_overlays(&args.overlay, Some(&image), &build_overlay(&points), canvas)?;
    Ok(RenderSummary {
        points: points.len(),
        format: format.extension(),
    })
}

/// Counts refreshes so a replay can report them.
#[derive(Debug, Default)]
struct CountingSink {
    presents: usize,
    skipped: usize,
}

impl RenderSink for CountingSink {
    fn present(&mut self, image: Option<&SynthesizedImage>, _overlay: &Overlay) {
        self.presents += 1;
        if image.is_none() {
            self.skipped += 1;
        }
    }
}

/// Tally of what a replayed script did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Events in the script.
    pub events: usize,
    /// Points placed.
    pub inserted: usize,
    /// Placements refused.
    pub rejected: usize,
    /// Points removed by Delete.
    pub deleted: usize,
    /// Drag moves applied.
    pub moved: usize,
    /// Events that had no effect.
    pub ignored: usize,
    /// Points held at the end.
    pub points: usize,
    /// Refreshes presented, including the initial one.
    pub refreshes: usize,
    /// Refreshes where synthesis was skipped.
    pub skipped: usize,
}

impl ReplaySummary {
    fn record(&mut self, transition: Transition) {
        match transition {
            Transition::Inserted { .. } => self.inserted += 1,
            Transition::Rejected(_) => self.rejected += 1,
            Transition::Deleted { .. } => self.deleted += 1,
            Transition::Moved { .. } => self.moved += 1,
            Transition::Ignored => self.ignored += 1,
            _ => {}
        }
    }
}

/// Parse an event script from disk.
fn read_script(path: &Path) -> Result<Vec<EditorEvent>, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ScriptUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::ScriptMalformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Feed a scripted session through the editor and write its results.
///
/// # Errors
///
/// Fails if the config, the script, the initial point list, or any
/// output write fails.
pub fn replay(args: &ReplayArgs) -> Result<ReplaySummary, CliError> {
    let config = args.synth.config()?;
    let script = read_script(&args.script)?;
    let initial = match args.initial {
        Some(ref path) => Some(load_points(path, config.marker_half_size)?),
        None => None,
    };

    let mut editor = Editor::new(args.synth.canvas, config, CountingSink::default());
    if let Some(points) = initial {
        editor.replace_points(points);
    }

    let mut summary = ReplaySummary {
        events: script.len(),
        ..ReplaySummary::default()
    };
    for event in script {
        summary.record(editor.handle(event));
    }
    summary.points = editor.points().len();

    if let Some(ref path) = args.save_points {
        save_points(path, editor.points())?;
    }
    if let Some(ref path) = args.output {
        match editor.image() {
            Some(image) => {
                export_image(path, image)?;
            }
            None => log::warn!("canvas has no area; not writing {}", path.display()),
        }
    }
    write_overlays(&args.overlay, editor.image(), editor.overlay(), editor.canvas())?;

    let sink = editor.into_sink();
    summary.refreshes = sink.presents;
    summary.skipped = sink.skipped;
    Ok(summary)
}

/// Write the preview and SVG overlays requested in `args`.
fn write_overlays(
    args: &OverlayArgs,
    image: Option<&SynthesizedImage>,
    overlay: &Overlay,
    canvas: CanvasSize,
) -> Result<(), CliError> {
    if let Some(ref path) = args.preview {
        match image {
            Some(image) => {
                let preview = SynthesizedImage::new(render_preview(image, overlay, canvas));
                export_image(path, &preview)?;
            }
            None => log::warn!("no image to preview; not writing {}", path.display()),
        }
    }
    if let Some(ref path) = args.overlay_svg {
        let title = path.file_stem().and_then(|s| s.to_str());
        let svg = overlay_to_svg(overlay, canvas, title);
        std::fs::write(path, &svg).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
        log::info!("overlay SVG written to {} ({} bytes)", path.display(), svg.len());
    }
    Ok(())
}

/// Findings about a saved point list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    /// Number of points.
    pub count: usize,
    /// Whether the stored order is ascending by x. Informational only:
    /// a point dragged past its neighbour leaves the list unsorted until
    /// the next insertion.
    pub sorted_by_x: bool,
    /// Smallest and largest coordinates, if any points exist.
    pub bounds: Option<(Point, Point)>,
    /// Indices of points outside the canvas.
    pub outside_canvas: Vec<usize>,
    /// Index pairs whose squares overlap.
    pub overlapping: Vec<(usize, usize)>,
    /// Normalized coordinates, or `None` on a zero-area canvas.
    pub normalized: Option<Vec<f32>>,
}

impl InspectReport {
    /// Analyse `points` against `canvas`.
    #[must_use]
    pub fn new(points: &PointSet, canvas: CanvasSize) -> Self {
        let positions = points.positions();
        let bounds = positions.split_first().map(|(first, rest)| {
            rest.iter().fold((*first, *first), |(lo, hi), p| {
                (
                    Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                    Point::new(hi.x.max(p.x), hi.y.max(p.y)),
                )
            })
        });

        let outside_canvas = positions
            .iter()
            .enumerate()
            .filter(|(_, p)| !canvas.contains(**p))
            .map(|(i, _)| i)
            .collect();

        let half = points.half_size();
        let rects: Vec<_> = points.iter().map(|p| p.bounding_rect(half)).collect();
        let mut overlapping = Vec::new();
        for (i, a) in rects.iter().enumerate() {
            for (j, b) in rects.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    overlapping.push((i, j));
                }
            }
        }

        let normalized = normalize(positions, canvas)
            .ok()
            .map(|m| m.as_slice().to_vec());

        Self {
            count: points.len(),
            sorted_by_x: points.is_sorted_by_x(),
            bounds,
            outside_canvas,
            overlapping,
            normalized,
        }
    }

    /// Whether every point is on the canvas and no two squares overlap.
    ///
    /// Order is not checked; an editor session can legitimately save an
    /// unsorted list after a drag.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.outside_canvas.is_empty() && self.overlapping.is_empty()
    }
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Points: {}", self.count)?;
        writeln!(f, "Sorted by x: {}", if self.sorted_by_x { "yes" } else { "no" })?;
        if let Some((lo, hi)) = self.bounds {
            writeln!(f, "Bounds: ({}, {}) .. ({}, {})", lo.x, lo.y, hi.x, hi.y)?;
        }
        if !self.outside_canvas.is_empty() {
            writeln!(f, "Outside canvas: {:?}", self.outside_canvas)?;
        }
        if !self.overlapping.is_empty() {
            writeln!(f, "Overlapping: {:?}", self.overlapping)?;
        }
        match self.normalized {
            Some(ref mapping) => {
                let pairs: Vec<String> = mapping
                    .chunks_exact(2)
                    .map(|uv| format!("({:.4}, {:.4})", uv[0], uv[1]))
                    .collect();
                write!(f, "Normalized: [{}]", pairs.join(", "))
            }
            None => write!(f, "Normalized: canvas has no area"),
        }
    }
}

/// Load a point list and analyse it. Returns the report and its
/// rendering (text or JSON per `args.json`).
///
/// # Errors
///
/// Fails if the point file cannot be loaded or the report cannot be
/// serialized.
pub fn inspect(args: &InspectArgs) -> Result<(InspectReport, String), CliError> {
    let points = load_points(&args.points, args.marker_half_size)?;
    let report = InspectReport::new(&points, args.canvas);
    let text = if args.json {
        serde_json::to_string_pretty(&report).map_err(CliError::Report)?
    } else {
        report.to_string()
    };
    Ok((report, text))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mrsprite_core::PositionRecord;

    fn set(points: &[(f64, f64)]) -> PointSet {
        let records: Vec<PositionRecord> =
            points.iter().map(|&(x, y)| PositionRecord { x, y }).collect();
        PointSet::from_records(&records, 5.0)
    }

    #[test]
    fn clean_list_reports_clean() {
        let report = InspectReport::new(
            &set(&[(10.0, 10.0), (100.0, 50.0), (200.0, 240.0)]),
            CanvasSize::default(),
        );
        assert!(report.is_clean());
        assert_eq!(
            report.bounds,
            Some((Point::new(10.0, 10.0), Point::new(200.0, 240.0)))
        );
        assert_eq!(report.normalized.as_ref().unwrap().len(), 6);
    }

    #[test]
    fn violations_are_listed() {
        let report = InspectReport::new(
            &set(&[(100.0, 100.0), (50.0, 50.0), (52.0, 52.0), (300.0, 10.0)]),
            CanvasSize::default(),
        );
        assert!(!report.sorted_by_x);
        assert_eq!(report.outside_canvas, vec![3]);
        assert_eq!(report.overlapping, vec![(1, 2)]);
        assert!(!report.is_clean());
        let text = report.to_string();
        assert!(text.contains("Sorted by x: no"));
        assert!(text.contains("Overlapping: [(1, 2)]"));
    }

    #[test]
    fn unsorted_list_after_drag_is_clean() {
        let mut points = set(&[(10.0, 10.0), (100.0, 50.0)]);
        points.set_position(0, Point::new(200.0, 10.0));
        let report = InspectReport::new(&points, CanvasSize::default());
        assert!(!report.sorted_by_x);
        assert!(report.is_clean());
        assert!(report.to_string().contains("Sorted by x: no"));
    }

    #[test]
    fn empty_list_and_zero_canvas() {
        let report = InspectReport::new(&set(&[]), CanvasSize::new(0.0, 0.0));
        assert_eq!(report.count, 0);
        assert_eq!(report.bounds, None);
        assert_eq!(report.normalized, None);
        assert!(report.to_string().ends_with("canvas has no area"));
    }

    #[test]
    fn summary_tallies_transitions() {
        let mut summary = ReplaySummary::default();
        summary.record(Transition::Inserted { index: 0 });
        summary.record(Transition::Ignored);
        summary.record(Transition::Released { index: 0 });
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.ignored, 1);
    }
}
