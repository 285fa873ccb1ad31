//! Shared types for the mrsprite core.

use serde::{Deserialize, Serialize};

use crate::synth::SynthesizerKind;

/// Re-export `RgbaImage` so downstream crates can reach the synthesized
/// pixels without depending on `image` directly.
pub use image::RgbaImage;

/// A 2D point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Component-wise offset by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Size of the editing canvas in canvas pixels.
///
/// Canvas sizes come from the hosting UI and may be fractional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in canvas pixels.
    pub width: f64,
    /// Height in canvas pixels.
    pub height: f64,
}

impl CanvasSize {
    /// Create a canvas size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either side is zero, negative, or not finite.
    ///
    /// Nothing may be normalized against (or synthesized from) such a
    /// canvas.
    #[must_use]
    pub fn is_zero_area(self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    /// Returns `true` if `p` lies inside the canvas, edges included.
    ///
    /// A zero-area canvas contains nothing.
    #[must_use]
    pub fn contains(self, p: Point) -> bool {
        !self.is_zero_area()
            && p.is_finite()
            && (0.0..=self.width).contains(&p.x)
            && (0.0..=self.height).contains(&p.y)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(256.0, 256.0)
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Largest accepted side length, in pixels.
    pub const MAX_SIDE: u32 = 16_384;

    /// Number of bytes a buffer of these dimensions occupies at
    /// [`BYTES_PER_PIXEL`](crate::synth::BYTES_PER_PIXEL).
    ///
    /// Saturates at `usize::MAX` rather than wrapping.
    #[must_use]
    pub const fn buffer_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(crate::synth::BYTES_PER_PIXEL)
    }

    /// Whether both sides lie in `1..=MAX_SIDE`.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        self.width >= 1
            && self.height >= 1
            && self.width <= Self::MAX_SIDE
            && self.height <= Self::MAX_SIDE
    }
}

/// Configuration for synthesis and hit-testing.
///
/// The single configuration record of the system. Binaries build it from
/// CLI flags or accept it whole as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Output image resolution.
    pub resolution: Dimensions,

    /// Which synthesis strategy turns points into pixels.
    pub strategy: SynthesizerKind,

    /// Half the side length of the square drawn around each control
    /// point, in canvas pixels. Used for hit-testing, overlap rejection
    /// and overlay drawing.
    pub marker_half_size: f64,
}

impl SynthConfig {
    /// Default output resolution (256×256).
    pub const DEFAULT_RESOLUTION: Dimensions = Dimensions {
        width: 256,
        height: 256,
    };

    /// Default marker half-size in canvas pixels.
    pub const DEFAULT_MARKER_HALF_SIZE: f64 = 5.0;

    /// Check the values a deserialized or hand-built config may get wrong.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidMarkerSize`] unless the half-size is
    /// finite and positive, and [`CoreError::UnsupportedResolution`]
    /// unless both sides lie in `1..=`[`Dimensions::MAX_SIDE`].
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.marker_half_size.is_finite() && self.marker_half_size > 0.0) {
            return Err(CoreError::InvalidMarkerSize {
                half_size: self.marker_half_size,
            });
        }
        if !self.resolution.is_supported() {
            return Err(CoreError::UnsupportedResolution {
                width: self.resolution.width,
                height: self.resolution.height,
            });
        }
        Ok(())
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            resolution: Self::DEFAULT_RESOLUTION,
            strategy: SynthesizerKind::default(),
            marker_half_size: Self::DEFAULT_MARKER_HALF_SIZE,
        }
    }
}

/// A synthesized RGBA pixel buffer.
///
/// Row-major, four bytes per pixel in R, G, B, A order, stride
/// `width * 4` with no padding. Regenerated wholesale on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedImage(RgbaImage);

impl SynthesizedImage {
    /// Wrap an existing RGBA buffer.
    #[must_use]
    pub const fn new(pixels: RgbaImage) -> Self {
        Self(pixels)
    }

    /// Image dimensions in pixels.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.0.width(),
            height: self.0.height(),
        }
    }

    /// Bytes per row.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.0.width() as usize * crate::synth::BYTES_PER_PIXEL
    }

    /// The raw pixel bytes.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        self.0.as_raw()
    }

    /// Borrow the underlying `RgbaImage`.
    #[must_use]
    pub const fn as_rgba(&self) -> &RgbaImage {
        &self.0
    }

    /// Consume and return the underlying `RgbaImage`.
    #[must_use]
    pub fn into_rgba(self) -> RgbaImage {
        self.0
    }
}

/// Errors raised by the core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// Normalization or synthesis was attempted against a canvas with
    /// no area.
    #[error("canvas has no area ({width}x{height}); synthesis skipped")]
    InvalidCanvasState {
        /// Canvas width at the time of the attempt.
        width: f64,
        /// Canvas height at the time of the attempt.
        height: f64,
    },

    /// The marker half-size is zero, negative, or not finite.
    #[error("marker half-size must be a positive finite number, got {half_size}")]
    InvalidMarkerSize {
        /// The rejected half-size.
        half_size: f64,
    },

    /// The output resolution is empty or larger than
    /// [`Dimensions::MAX_SIDE`] on a side.
    #[error("resolution {width}x{height} is outside 1..={max} per side", max = Dimensions::MAX_SIDE)]
    UnsupportedResolution {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}
