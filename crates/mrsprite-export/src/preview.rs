//! Preview rendering: the synthesized texture with the editing overlay on top.
//!
//! The texture stores intensity in every channel, so it is drawn as an
//! opaque grayscale background. The overlay is scaled from canvas space
//! to the texture's pixel grid and stroked with `tiny-skia`.

use image::{Rgba, RgbaImage};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use mrsprite_core::overlay::LINE_COLOR;
use mrsprite_core::{CanvasSize, Overlay, SynthesizedImage};

const STROKE_WIDTH: f32 = 1.0;

fn paint(rgb: [u8; 3]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgb[0], rgb[1], rgb[2], 255);
    paint.anti_alias = true;
    paint
}

/// Composite `overlay` over `image`.
///
/// Overlay coordinates are in `canvas` space and are scaled to the
/// image's resolution. A zero-area canvas draws no overlay; a zero-sized
/// image is returned unchanged.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn render_preview(image: &SynthesizedImage, overlay: &Overlay, canvas: CanvasSize) -> RgbaImage {
    let dims = image.dimensions();
    let Some(mut pixmap) = Pixmap::new(dims.width, dims.height) else {
        return image.as_rgba().clone();
    };

    // Background: intensity as opaque gray. Alpha 255 means premultiplied
    // and straight values coincide.
    for (dst, src) in pixmap
        .data_mut()
        .chunks_exact_mut(4)
        .zip(image.as_raw().chunks_exact(4))
    {
        dst.copy_from_slice(&[src[0], src[1], src[2], 255]);
    }

    if !canvas.is_zero_area() {
        let scale_x = f64::from(dims.width) / canvas.width;
        let scale_y = f64::from(dims.height) / canvas.height;
        let transform = Transform::from_scale(scale_x as f32, scale_y as f32);
        // Stroke width is in canvas units; divide so it stays one pixel.
        let stroke = Stroke {
            width: STROKE_WIDTH / (scale_x.min(scale_y) as f32).max(f32::EPSILON),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        let mut pb = PathBuilder::new();
        if let [first, rest @ ..] = overlay.polyline.as_slice() {
            pb.move_to(first.x as f32, first.y as f32);
            for p in rest {
                pb.line_to(p.x as f32, p.y as f32);
            }
        }
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint(LINE_COLOR), &stroke, transform, None);
        }

        for marker in &overlay.markers {
            let r = marker.rect;
            let Some(rect) = tiny_skia::Rect::from_ltrb(
                r.min_x as f32,
                r.min_y as f32,
                r.max_x as f32,
                r.max_y as f32,
            ) else {
                continue;
            };
            let path = PathBuilder::from_rect(rect);
            pixmap.stroke_path(&path, &paint(marker.color()), &stroke, transform, None);
        }
    }

    to_rgba_image(&pixmap)
}

/// Convert a premultiplied pixmap to straight RGBA.
#[allow(clippy::cast_possible_truncation)]
fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let data = pixmap.data();
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (pixel, px) in img.pixels_mut().zip(data.chunks_exact(4)) {
        let a = px[3];
        *pixel = if a == 0 {
            Rgba([0, 0, 0, 0])
        } else {
            let un = |c: u8| (u16::from(c) * 255 / u16::from(a)) as u8;
            Rgba([un(px[0]), un(px[1]), un(px[2]), a])
        };
    }
    img
}
