//! mrsprite-bench: CLI tool for timing sprite synthesis.
//!
//! Synthesizes a texture from a generated point set, repeatedly, and
//! compares the per-refresh cost with the frame budget an interactive
//! drag has to fit into. Useful for:
//!
//! - Comparing synthesis strategies (`radial-remap` vs `metaball`)
//! - Seeing how resolution and point count affect refresh time
//! - Measuring a full drag refresh (normalize, synthesize, overlay)
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin mrsprite-bench -- [OPTIONS]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use mrsprite_core::{
    CanvasSize, Dimensions, Editor, NullSink, Point, PointSet, SynthConfig, SynthesizerKind,
};
use serde::Serialize;

/// Synthesis timing for mrsprite.
///
/// Builds a point set on a grid, then times one-shot renders and a drag
/// of the middle point through the interactive editor.
#[derive(Parser)]
#[command(name = "mrsprite-bench", version)]
struct Cli {
    /// Number of control points to place.
    #[arg(long, default_value_t = 24)]
    points: usize,

    /// Texture width in pixels.
    #[arg(long, default_value_t = SynthConfig::DEFAULT_RESOLUTION.width, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..=u64::from(Dimensions::MAX_SIDE)))]
    width: u32,

    /// Texture height in pixels.
    #[arg(long, default_value_t = SynthConfig::DEFAULT_RESOLUTION.height, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..=u64::from(Dimensions::MAX_SIDE)))]
    height: u32,

    /// Synthesis strategy.
    #[arg(long, value_enum, default_value_t = Strategy::RadialRemap)]
    strategy: Strategy,

    /// Number of timed runs.
    #[arg(long, default_value_t = 20, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Per-refresh budget in milliseconds.
    #[arg(long, default_value_t = 16.0)]
    budget_ms: f64,

    /// Exit with a failure status if a stage's mean exceeds the budget.
    #[arg(long)]
    check: bool,

    /// Output the report as JSON instead of human-readable text.
    #[arg(long)]
    json: bool,

    /// Full synthesis config as a JSON string.
    ///
    /// When provided, `--width`, `--height` and `--strategy` are ignored.
    #[arg(long)]
    config_json: Option<String>,
}

/// Synthesis strategy selection.
#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// Piecewise-linear remap of distance from the center.
    RadialRemap,
    /// Sum of radial falloffs around each point.
    Metaball,
}

fn config_from_cli(cli: &Cli) -> Result<SynthConfig, String> {
    let config = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        flag_config(cli)
    };
    config.validate().map_err(|e| format!("Invalid config: {e}"))?;
    Ok(config)
}

fn flag_config(cli: &Cli) -> SynthConfig {
    SynthConfig {
        resolution: Dimensions {
            width: cli.width,
            height: cli.height,
        },
        strategy: match cli.strategy {
            Strategy::RadialRemap => SynthesizerKind::RadialRemap,
            Strategy::Metaball => SynthesizerKind::Metaball,
        },
        ..SynthConfig::default()
    }
}

/// Place up to `count` points on a grid spaced so no two squares
/// overlap. Rows alternate direction so the input is not pre-sorted.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn grid_points(count: usize, canvas: CanvasSize, half: f64) -> PointSet {
    let mut set = PointSet::new(half);
    let step = half * 2.0 + 2.0;
    let cols = ((canvas.width - step) / step).floor().max(0.0) as usize;
    let rows = ((canvas.height - step) / step).floor().max(0.0) as usize;
    'outer: for row in 0..rows {
        for col in 0..cols {
            if set.len() >= count {
                break 'outer;
            }
            let col = if row % 2 == 0 { col } else { cols - 1 - col };
            let at = Point::new(step * (col + 1) as f64, step * (row + 1) as f64);
            // The grid never overlaps; a refusal only means the canvas edge.
            let _ = set.insert(at, canvas);
        }
    }
    set
}

#[derive(Serialize)]
struct Stats {
    min_ms: f64,
    mean_ms: f64,
    max_ms: f64,
    over_budget: usize,
}

impl Stats {
    #[allow(clippy::cast_precision_loss)]
    fn new(samples: &[Duration], budget_ms: f64) -> Self {
        let ms: Vec<f64> = samples.iter().map(|d| d.as_secs_f64() * 1000.0).collect();
        let min_ms = ms.iter().copied().reduce(f64::min).unwrap_or(0.0);
        let max_ms = ms.iter().copied().reduce(f64::max).unwrap_or(0.0);
        let mean_ms = if ms.is_empty() {
            0.0
        } else {
            ms.iter().sum::<f64>() / ms.len() as f64
        };
        Self {
            min_ms,
            mean_ms,
            max_ms,
            over_budget: ms.iter().filter(|&&m| m > budget_ms).count(),
        }
    }
}

#[derive(Serialize)]
struct Report {
    points: usize,
    resolution: Dimensions,
    strategy: SynthesizerKind,
    runs: usize,
    budget_ms: f64,
    render: Stats,
    drag: Stats,
}

impl Report {
    fn within_budget(&self) -> bool {
        self.render.mean_ms <= self.budget_ms && self.drag.mean_ms <= self.budget_ms
    }

    fn print(&self) {
        println!(
            "Points: {}  Resolution: {}x{}  Strategy: {:?}  Runs: {}",
            self.points, self.resolution.width, self.resolution.height, self.strategy, self.runs,
        );
        println!("{}", "=".repeat(60));
        println!(
            "{:<16} {:>10} {:>10} {:>10} {:>12}",
            "Stage", "Min (ms)", "Mean (ms)", "Max (ms)", "Over budget"
        );
        println!("{}", "-".repeat(60));
        for (name, s) in [("Render", &self.render), ("Drag refresh", &self.drag)] {
            println!(
                "{name:<16} {:>10.3} {:>10.3} {:>10.3} {:>12}",
                s.min_ms, s.mean_ms, s.max_ms, s.over_budget,
            );
        }
        println!();
        println!("Budget: {:.1}ms per refresh", self.budget_ms);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let canvas = CanvasSize::default();
    let points = grid_points(cli.points, canvas, config.marker_half_size);
    if points.len() < cli.points {
        eprintln!(
            "Only {} of {} points fit on a {}x{} canvas",
            points.len(),
            cli.points,
            canvas.width,
            canvas.height,
        );
    }
    eprintln!("Config: {config:#?}");
    eprintln!();

    let mut render_samples = Vec::with_capacity(cli.runs);
    for _ in 0..cli.runs {
        let start = Instant::now();
        if let Err(e) = mrsprite_core::render(&points, canvas, &config) {
            eprintln!("Render error: {e}");
            return ExitCode::FAILURE;
        }
        render_samples.push(start.elapsed());
    }

    // Drag the middle point back and forth; each move is a full refresh.
    let mut editor = Editor::new(canvas, config.clone(), NullSink);
    editor.replace_points(points.clone());
    let mut drag_samples = Vec::with_capacity(cli.runs);
    if let Some(grab) = points.get(points.len() / 2).map(|p| p.position) {
        editor.press(grab);
        for run in 0..cli.runs {
            let dx = if run % 2 == 0 { 1.0 } else { -1.0 };
            let start = Instant::now();
            editor.move_to(grab.offset(dx, 0.0));
            drag_samples.push(start.elapsed());
        }
        editor.release(grab);
    }

    let report = Report {
        points: points.len(),
        resolution: config.resolution,
        strategy: config.strategy,
        runs: cli.runs,
        budget_ms: cli.budget_ms,
        render: Stats::new(&render_samples, cli.budget_ms),
        drag: Stats::new(&drag_samples, cli.budget_ms),
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        report.print();
    }

    if cli.check && !report.within_budget() {
        eprintln!("Mean refresh time exceeds the {:.1}ms budget", cli.budget_ms);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
