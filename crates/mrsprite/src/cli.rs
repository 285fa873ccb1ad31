//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mrsprite_core::{CanvasSize, Dimensions, SynthConfig, SynthesizerKind};
use mrsprite_io::DEFAULT_EXPORT_NAME;

use crate::CliError;

/// Synthesize sprite and particle textures from control points.
#[derive(Parser, Debug)]
#[command(name = "mrsprite", author, version, about, long_about = None)]
pub struct Cli {
    /// Log debug output (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a saved point list to an image.
    Render(RenderArgs),
    /// Play a scripted editing session and write its results.
    Replay(ReplayArgs),
    /// Summarize a saved point list.
    Inspect(InspectArgs),
}

/// Synthesis parameters shared by the rendering subcommands.
#[derive(Args, Debug, Clone)]
pub struct SynthArgs {
    /// Canvas size in editor coordinates, as WIDTHxHEIGHT.
    #[arg(long, default_value = "256x256", value_parser = parse_canvas)]
    pub canvas: CanvasSize,

    /// Output texture resolution, as WIDTHxHEIGHT.
    #[arg(long, default_value = "256x256", value_parser = parse_resolution)]
    pub resolution: Dimensions,

    /// Synthesis strategy.
    #[arg(long, value_enum, default_value_t = Strategy::RadialRemap)]
    pub strategy: Strategy,

    /// Half the side length of a point's square, in canvas units.
    #[arg(long, default_value_t = SynthConfig::DEFAULT_MARKER_HALF_SIZE, value_parser = parse_half_size)]
    pub marker_half_size: f64,

    /// Full synthesis config as a JSON string.
    ///
    /// When provided, `--resolution`, `--strategy` and
    /// `--marker-half-size` are ignored. The JSON must be a valid
    /// `SynthConfig` serialization; missing fields take their defaults.
    #[arg(long)]
    pub config_json: Option<String>,
}

/// Optional overlay outputs.
#[derive(Args, Debug, Clone, Default)]
pub struct OverlayArgs {
    /// Write the texture with the editing overlay drawn on top.
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Write the editing overlay as SVG.
    #[arg(long)]
    pub overlay_svg: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Point list to render (JSON array of `{x, y}`).
    pub points: PathBuf,

    /// Output image; the extension selects PNG or BMP.
    #[arg(long, short, default_value = DEFAULT_EXPORT_NAME)]
    pub output: PathBuf,

    #[command(flatten)]
    pub synth: SynthArgs,

    #[command(flatten)]
    pub overlay: OverlayArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Event script: a JSON array of editor events.
    pub script: PathBuf,

    /// Point list to start from instead of an empty canvas.
    #[arg(long)]
    pub initial: Option<PathBuf>,

    /// Where to save the resulting point list.
    #[arg(long)]
    pub save_points: Option<PathBuf>,

    /// Where to export the resulting texture.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub synth: SynthArgs,

    #[command(flatten)]
    pub overlay: OverlayArgs,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Point list to inspect.
    pub points: PathBuf,

    /// Canvas size used for the bounds check, as WIDTHxHEIGHT.
    #[arg(long, default_value = "256x256", value_parser = parse_canvas)]
    pub canvas: CanvasSize,

    /// Half the side length of a point's square, for the overlap check.
    #[arg(long, default_value_t = SynthConfig::DEFAULT_MARKER_HALF_SIZE, value_parser = parse_half_size)]
    pub marker_half_size: f64,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Synthesis strategy selection.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Strategy {
    /// Piecewise-linear remap of distance from the center.
    RadialRemap,
    /// Sum of radial falloffs around each point.
    Metaball,
}

impl From<Strategy> for SynthesizerKind {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::RadialRemap => Self::RadialRemap,
            Strategy::Metaball => Self::Metaball,
        }
    }
}

fn parse_pair(s: &str) -> Result<(&str, &str), String> {
    s.split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))
}

/// Parse `WIDTHxHEIGHT` into a canvas size. Either side may be zero.
///
/// # Errors
///
/// Returns a message if the text is not two non-negative finite numbers.
pub fn parse_canvas(s: &str) -> Result<CanvasSize, String> {
    let (w, h) = parse_pair(s)?;
    let parse = |v: &str| -> Result<f64, String> {
        let n: f64 = v.trim().parse().map_err(|e| format!("{v:?}: {e}"))?;
        if n.is_finite() && n >= 0.0 {
            Ok(n)
        } else {
            Err(format!("{v:?} is not a non-negative size"))
        }
    };
    Ok(CanvasSize::new(parse(w)?, parse(h)?))
}

/// Parse `WIDTHxHEIGHT` into pixel dimensions.
///
/// # Errors
///
/// Returns a message if the text is not two integers in
/// `1..=`[`Dimensions::MAX_SIDE`].
pub fn parse_resolution(s: &str) -> Result<Dimensions, String> {
    let (w, h) = parse_pair(s)?;
    let parse = |v: &str| -> Result<u32, String> {
        v.trim().parse().map_err(|e| format!("{v:?}: {e}"))
    };
    let dims = Dimensions {
        width: parse(w)?,
        height: parse(h)?,
    };
    if dims.is_supported() {
        Ok(dims)
    } else {
        Err(format!(
            "each side must be between 1 and {}, got {s:?}",
            Dimensions::MAX_SIDE
        ))
    }
}

/// Parse a marker half-size.
///
/// # Errors
///
/// Returns a message unless the text is a positive finite number.
pub fn parse_half_size(s: &str) -> Result<f64, String> {
    let n: f64 = s.trim().parse().map_err(|e| format!("{s:?}: {e}"))?;
    if n.is_finite() && n > 0.0 {
        Ok(n)
    } else {
        Err(format!("{s:?} is not a positive size"))
    }
}

impl SynthArgs {
    /// Build a [`SynthConfig`] from the flags, or from `--config-json`
    /// when given.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if the JSON does not parse, and
    /// [`CliError::Core`] if the result fails [`SynthConfig::validate`].
    pub fn config(&self) -> Result<SynthConfig, CliError> {
        let config = match self.config_json {
            Some(ref json) => serde_json::from_str(json).map_err(CliError::Config)?,
            None => SynthConfig {
                resolution: self.resolution,
                strategy: self.strategy.into(),
                marker_half_size: self.marker_half_size,
            },
        };
        config.validate()?;
        Ok(config)
    }
}
