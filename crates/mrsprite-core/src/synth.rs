//! Image synthesis: turn normalized control points into an RGBA buffer.
//!
//! This module defines the [`Synthesizer`] trait for pluggable synthesis
//! strategies and the [`SynthesizerKind`] enum for selecting one at
//! runtime.
//!
//! # Buffer ownership
//!
//! [`Synthesizer::synthesize_into`] borrows the normalized coordinates and
//! the caller-allocated output buffer for exactly the duration of the
//! call and writes into the buffer synchronously. No reference to either
//! survives the call. [`synthesize`] is the allocating convenience
//! wrapper.
//!
//! # Contract
//!
//! Every strategy is deterministic, continuous in the point positions,
//! and writes only valid channel bytes. With zero points every strategy
//! produces an all-zero (transparent black) buffer. A trailing unpaired
//! coordinate is ignored.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::normalize::NormalizedMapping;
use crate::types::{Dimensions, SynthesizedImage};

/// Bytes per output pixel (R, G, B, A).
pub const BYTES_PER_PIXEL: usize = 4;

/// Influence radius of a single metaball, in unit-square coordinates.
const METABALL_RADIUS: f32 = 0.08;

/// Selects which synthesis strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesizerKind {
    /// Radial falloff shaped by a piecewise-linear transfer curve.
    ///
    /// Each pixel's distance from the image center is turned into a
    /// parameter `t` (1 at the center, 0 at the inscribed edge and
    /// beyond). The control points, read as `(time, value)` pairs in
    /// stored order, define a transfer curve `t -> value`; the resulting
    /// value is the pixel intensity. Produces round particle sprites
    /// whose profile is drawn by the points.
    #[default]
    RadialRemap,

    /// Sum of smooth inverse-square fields centered on each point.
    ///
    /// Each point contributes `r² / (d² + r²)` at distance `d`; the sum
    /// is clamped to 1. Produces soft blobs at the point positions.
    Metaball,
}

/// Trait for synthesis strategies.
///
/// Input: flat normalized coordinates `[u0, v0, u1, v1, ...]`.
/// Output: written into a caller-owned RGBA buffer.
pub trait Synthesizer {
    /// Synthesize into `out`, which must hold exactly
    /// `dimensions.width * dimensions.height * 4` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `out` has the wrong length. A mis-sized buffer is a
    /// programming error, not a recoverable condition.
    fn synthesize_into(&self, mapping: &[f32], dimensions: Dimensions, out: &mut [u8]);
}

impl Synthesizer for SynthesizerKind {
    fn synthesize_into(&self, mapping: &[f32], dimensions: Dimensions, out: &mut [u8]) {
        assert_eq!(
            out.len(),
            dimensions.buffer_len(),
            "output buffer does not match {}x{} RGBA",
            dimensions.width,
            dimensions.height,
        );
        // Drop a trailing unpaired coordinate.
        let mapping = &mapping[..mapping.len() - mapping.len() % 2];
        match *self {
            Self::RadialRemap => radial_remap(mapping, dimensions, out),
            Self::Metaball => metaball(mapping, dimensions, out),
        }
    }
}

/// Allocate a buffer of `resolution` and synthesize into it.
#[must_use]
pub fn synthesize(
    mapping: &NormalizedMapping,
    resolution: Dimensions,
    strategy: SynthesizerKind,
) -> SynthesizedImage {
    let mut raw = vec![0u8; resolution.buffer_len()];
    strategy.synthesize_into(mapping.as_slice(), resolution, &mut raw);
    // The length matches by construction, so `from_raw` cannot fail.
    let pixels = RgbaImage::from_raw(resolution.width, resolution.height, raw)
        .unwrap_or_else(|| RgbaImage::new(resolution.width, resolution.height));
    SynthesizedImage::new(pixels)
}

/// Convert an intensity in `[0, 1]` to a channel byte (truncating).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(intensity: f32) -> u8 {
    (255.0 * intensity.clamp(0.0, 1.0)) as u8
}

/// Evaluate the piecewise-linear transfer curve at `t`.
///
/// `mapping` holds `(time, value)` pairs in stored order. Below the first
/// time the first value holds; at or past the last time the last value
/// holds. In between, the first interval `[time_i, time_i+1)` in stored
/// order that contains `t` is interpolated. Such an interval always
/// exists there, even for unsorted times.
fn remap(t: f32, mapping: &[f32]) -> f32 {
    let count = mapping.len() / 2;
    if count == 0 {
        return 0.0;
    }
    let time = |i: usize| mapping[2 * i];
    let value = |i: usize| mapping[2 * i + 1];
    let last = count - 1;

    if t < time(0) {
        return value(0);
    }
    if t >= time(last) {
        return value(last);
    }

    let Some(i) = (0..last).find(|&i| t >= time(i) && t < time(i + 1)) else {
        return value(last);
    };
    let ofs = (t - time(i)) / (time(i + 1) - time(i));
    ofs.mul_add(value(i + 1) - value(i), value(i))
}

/// Radial falloff from the image center, shaped by [`remap`].
#[allow(clippy::cast_precision_loss)]
fn radial_remap(mapping: &[f32], dimensions: Dimensions, out: &mut [u8]) {
    let w = dimensions.width as f32;
    let h = dimensions.height as f32;
    let row_len = dimensions.width as usize;

    for (i, pixel) in out.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
        let x = (i % row_len) as f32;
        let y = (i / row_len) as f32;
        let dx = 2.0 * (w / 2.0 - x).abs() / w;
        let dy = 2.0 * (h / 2.0 - y).abs() / h;
        let dist = dx.hypot(dy);
        let c = channel(remap(1.0 - dist.clamp(0.0, 1.0), mapping));
        pixel.fill(c);
    }
}

/// Metaball field sampled at pixel centers.
///
/// The inner loop runs once per pixel per point, so it sticks to plain
/// multiply and add; software `mul_add` on targets without FMA costs
/// more than the extra rounding.
#[allow(clippy::cast_precision_loss, clippy::suboptimal_flops)]
fn metaball(mapping: &[f32], dimensions: Dimensions, out: &mut [u8]) {
    let w = dimensions.width as f32;
    let h = dimensions.height as f32;
    let row_len = dimensions.width as usize;
    let r2 = METABALL_RADIUS * METABALL_RADIUS;
    if row_len == 0 {
        return;
    }

    for (row, pixels) in out.chunks_exact_mut(row_len * BYTES_PER_PIXEL).enumerate() {
        let v = (row as f32 + 0.5) / h;
        for (col, pixel) in pixels.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            let u = (col as f32 + 0.5) / w;
            let field: f32 = mapping
                .chunks_exact(2)
                .map(|p| {
                    let du = u - p[0];
                    let dv = v - p[1];
                    r2 / (du * du + dv * dv + r2)
                })
                .sum();
            pixel.fill(channel(field));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const KINDS: [SynthesizerKind; 2] = [SynthesizerKind::RadialRemap, SynthesizerKind::Metaball];

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    fn mapping(pairs: &[(f32, f32)]) -> NormalizedMapping {
        NormalizedMapping::new(pairs.iter().flat_map(|&(u, v)| [u, v]).collect())
    }

    fn max_byte_diff(a: &SynthesizedImage, b: &SynthesizedImage) -> u8 {
        a.as_raw()
            .iter()
            .zip(b.as_raw())
            .map(|(&x, &y)| x.abs_diff(y))
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn default_is_radial_remap() {
        assert_eq!(SynthesizerKind::default(), SynthesizerKind::RadialRemap);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&SynthesizerKind::RadialRemap).unwrap();
        assert_eq!(json, "\"radial_remap\"");
    }

    #[test]
    fn zero_points_gives_all_zero_buffer() {
        for kind in KINDS {
            let image = synthesize(&NormalizedMapping::default(), dims(256, 256), kind);
            assert_eq!(image.as_raw().len(), 256 * 256 * 4);
            assert!(image.as_raw().iter().all(|&b| b == 0), "{kind:?}");
        }
    }

    #[test]
    fn identical_inputs_give_identical_buffers() {
        let m = mapping(&[(0.1, 0.2), (0.4, 0.9), (0.8, 0.5)]);
        for kind in KINDS {
            let a = synthesize(&m, dims(256, 256), kind);
            let b = synthesize(&m, dims(256, 256), kind);
            assert_eq!(a, b, "{kind:?}");
        }
    }

    #[test]
    fn different_points_give_different_buffers() {
        let a = mapping(&[(0.1, 0.2), (0.8, 0.5)]);
        let b = mapping(&[(0.1, 0.9), (0.8, 0.1)]);
        for kind in KINDS {
            assert_ne!(
                synthesize(&a, dims(64, 64), kind),
                synthesize(&b, dims(64, 64), kind),
                "{kind:?}",
            );
        }
    }

    #[test]
    fn all_channels_carry_the_intensity() {
        let m = mapping(&[(0.0, 0.0), (1.0, 1.0)]);
        for kind in KINDS {
            let image = synthesize(&m, dims(32, 32), kind);
            for px in image.as_raw().chunks_exact(4) {
                assert!(px.iter().all(|&c| c == px[0]), "{kind:?} {px:?}");
            }
        }
    }

    #[test]
    fn radial_ramp_is_bright_at_center_dark_at_corner() {
        let m = mapping(&[(0.0, 0.0), (1.0, 1.0)]);
        let image = synthesize(&m, dims(256, 256), SynthesizerKind::RadialRemap);
        let rgba = image.as_rgba();
        assert_eq!(rgba.get_pixel(128, 128).0, [255, 255, 255, 255]);
        assert_eq!(rgba.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn radial_single_point_is_flat() {
        let m = mapping(&[(0.5, 0.6)]);
        let image = synthesize(&m, dims(16, 16), SynthesizerKind::RadialRemap);
        assert!(image.as_raw().iter().all(|&b| b == 153));
    }

    #[test]
    fn metaball_peaks_at_point() {
        let m = mapping(&[(0.5, 0.5)]);
        let image = synthesize(&m, dims(64, 64), SynthesizerKind::Metaball);
        let rgba = image.as_rgba();
        let center = rgba.get_pixel(32, 32).0[0];
        let corner = rgba.get_pixel(0, 0).0[0];
        assert!(center > 240, "center = {center}");
        assert!(corner < 10, "corner = {corner}");
    }

    #[test]
    fn odd_trailing_value_is_ignored() {
        let even = NormalizedMapping::new(vec![0.2, 0.4, 0.7, 0.9]);
        let odd = NormalizedMapping::new(vec![0.2, 0.4, 0.7, 0.9, 0.5]);
        for kind in KINDS {
            assert_eq!(
                synthesize(&even, dims(32, 32), kind),
                synthesize(&odd, dims(32, 32), kind),
            );
        }
    }

    #[test]
    fn out_of_range_values_stay_bounded() {
        // Values outside [0, 1] can only arise from hand-built mappings,
        // but the output must still be well-formed.
        let m = mapping(&[(-0.5, -3.0), (0.5, 7.0), (1.5, 2.0)]);
        for kind in KINDS {
            let image = synthesize(&m, dims(32, 32), kind);
            assert_eq!(image.as_raw().len(), 32 * 32 * 4);
        }
    }

    #[test]
    fn unsorted_times_still_interpolate() {
        // After a drag the times may be out of order.
        let m = [0.6, 0.2, 0.2, 0.8, 0.9, 0.4];
        // t = 0.7 falls in [0.2, 0.9), the second interval.
        let v = remap(0.7, &m);
        let expected = 0.8 + (0.7 - 0.2) / (0.9 - 0.2) * (0.4 - 0.8);
        assert!((v - expected).abs() < 1e-5, "got {v}, expected {expected}");
        // Below the first stored time the first value holds, even though
        // a later time is smaller.
        assert!((remap(0.5, &m) - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn small_moves_make_small_changes() {
        let step = 1.0 / 1024.0;
        for kind in KINDS {
            let mut previous: Option<SynthesizedImage> = None;
            for k in 0..100u16 {
                let offset = f32::from(k) * step;
                let m = mapping(&[(0.1, 0.2), (0.45 + offset, 0.9 - offset), (0.9, 0.3)]);
                let image = synthesize(&m, dims(64, 64), kind);
                if let Some(prev) = &previous {
                    let diff = max_byte_diff(prev, &image);
                    assert!(diff <= 4, "{kind:?} step {k}: max byte change {diff}");
                }
                previous = Some(image);
            }
        }
    }

    #[test]
    fn synthesize_into_fills_borrowed_buffer() {
        let m = mapping(&[(0.0, 1.0)]);
        let mut buf = vec![7u8; 8 * 8 * 4];
        SynthesizerKind::RadialRemap.synthesize_into(m.as_slice(), dims(8, 8), &mut buf);
        assert!(buf.iter().all(|&b| b == 255));
    }

    #[test]
    #[should_panic(expected = "output buffer does not match")]
    fn synthesize_into_rejects_wrong_length() {
        let mut buf = vec![0u8; 10];
        SynthesizerKind::Metaball.synthesize_into(&[], dims(8, 8), &mut buf);
    }

    #[test]
    fn zero_sized_resolution_is_empty() {
        let m = mapping(&[(0.5, 0.5)]);
        for kind in KINDS {
            let image = synthesize(&m, dims(0, 0), kind);
            assert!(image.as_raw().is_empty());
            let image = synthesize(&m, dims(0, 8), kind);
            assert!(image.as_raw().is_empty());
        }
    }

    #[test]
    fn metaball_field_matches_closed_form() {
        let m = mapping(&[(0.25, 0.5), (0.75, 0.5)]);
        let image = synthesize(&m, dims(8, 8), SynthesizerKind::Metaball);
        let r2 = METABALL_RADIUS * METABALL_RADIUS;
        let (u, v) = (2.5_f32 / 8.0, 4.5_f32 / 8.0);
        let field: f32 = [(0.25_f32, 0.5_f32), (0.75, 0.5)]
            .iter()
            .map(|&(pu, pv)| r2 / ((u - pu).powi(2) + (v - pv).powi(2) + r2))
            .sum();
        let got = image.as_rgba().get_pixel(2, 4).0[0];
        assert!(got.abs_diff(channel(field)) <= 1, "{got} vs {}", channel(field));
    }

    #[test]
    #[ignore = "timing; run with --release -- --ignored"]
    fn metaball_fits_frame_budget() {
        let pairs: Vec<(f32, f32)> = (0..36u8)
            .map(|i| (f32::from(i % 6) / 6.0 + 0.08, f32::from(i / 6) / 6.0 + 0.08))
            .collect();
        let m = mapping(&pairs);
        let mut out = vec![0u8; dims(256, 256).buffer_len()];
        let best = (0..10)
            .map(|_| {
                let start = std::time::Instant::now();
                SynthesizerKind::Metaball.synthesize_into(m.as_slice(), dims(256, 256), &mut out);
                start.elapsed()
            })
            .min()
            .unwrap();
        assert!(
            best < std::time::Duration::from_millis(16),
            "36 points at 256x256 took {best:?}"
        );
    }
}
