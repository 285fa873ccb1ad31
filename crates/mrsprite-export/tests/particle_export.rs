//! Integration test: build a point set, synthesize it and serialize every output format.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use mrsprite_core::{CanvasSize, Point, PointSet, SynthConfig, build_overlay, render};
use mrsprite_export::{RasterFormat, encode, from_points_json, overlay_to_svg, render_preview, to_points_json};

#[test]
fn particle_round_trip_through_all_formats() {
    let canvas = CanvasSize::default();
    let mut points = PointSet::new(SynthConfig::DEFAULT_MARKER_HALF_SIZE);
    for (x, y) in [(10.0, 10.0), (100.0, 50.0), (200.0, 240.0)] {
        points.insert(Point::new(x, y), canvas).unwrap();
    }

    // Points survive persistence and render identically afterwards.
    let json = to_points_json(&points).unwrap();
    let reloaded = from_points_json(&json, points.half_size()).unwrap();
    assert_eq!(reloaded.positions(), points.positions());

    let config = SynthConfig::default();
    let image = render(&points, canvas, &config).expect("render should succeed");
    let again = render(&reloaded, canvas, &config).unwrap();
    assert_eq!(image, again);

    // Containers decode back to the same dimensions.
    for format in [RasterFormat::Png, RasterFormat::Bmp] {
        let bytes = encode(&image, format).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (256, 256), "{format:?}");
    }

    // Overlay outputs agree on the number of markers.
    let overlay = build_overlay(&points);
    let svg = overlay_to_svg(&overlay, canvas, Some("Particle"));
    assert_eq!(svg.matches("<rect").count(), 3);
    let preview = render_preview(&image, &overlay, canvas);
    assert_eq!(preview.dimensions(), (256, 256));
    assert!(preview.pixels().all(|p| p[3] == 255));
}
