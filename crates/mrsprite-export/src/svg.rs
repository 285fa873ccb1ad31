//! SVG overlay serializer.
//!
//! Writes the editing overlay (the polyline through the control points
//! and one outlined square per point) as an SVG document using the
//! [`svg`] crate for document construction, XML escaping, and path data
//! formatting. The `viewBox` matches the canvas, so coordinates are
//! emitted unchanged.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Group, Path, Rectangle, Title};
use svg::node::Value;

use mrsprite_core::overlay::LINE_COLOR;
use mrsprite_core::{CanvasSize, Overlay, Point};

/// Format an RGB triple as a CSS hex color.
fn hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Build an SVG path `d` attribute string through `points`.
///
/// Uses `M` for the first point and `L` for subsequent points.
/// Returns an empty string for fewer than 2 points.
///
/// # Examples
///
/// ```
/// use mrsprite_core::Point;
/// use mrsprite_export::svg::build_path_data;
///
/// let d = build_path_data(&[Point::new(10.0, 20.0), Point::new(30.0, 40.0)]);
/// assert_eq!(d, "M10,20 L30,40");
/// ```
#[must_use]
pub fn build_path_data(points: &[Point]) -> String {
    let [first, rest @ ..] = points else {
        return String::new();
    };
    if rest.is_empty() {
        return String::new();
    }

    let mut data = Data::new().move_to((first.x, first.y));
    for p in rest {
        data = data.line_to((p.x, p.y));
    }
    String::from(Value::from(data))
}

/// Serialize an overlay into an SVG document string sized to `canvas`.
///
/// The polyline becomes one `<path>`; markers are `<rect>` outlines
/// grouped under `<g id="markers">`, stroked with the selected or
/// unselected color. An optional `title` is emitted as `<title>`.
#[must_use]
pub fn overlay_to_svg(overlay: &Overlay, canvas: CanvasSize, title: Option<&str>) -> String {
    let mut doc = Document::new()
        .set("width", canvas.width)
        .set("height", canvas.height)
        .set("viewBox", (0, 0, canvas.width, canvas.height));

    if let Some(title) = title {
        doc = doc.add(Title::new(title));
    }

    let d = build_path_data(&overlay.polyline);
    if !d.is_empty() {
        doc = doc.add(
            Path::new()
                .set("d", d)
                .set("fill", "none")
                .set("stroke", hex(LINE_COLOR))
                .set("stroke-width", 1),
        );
    }

    let mut markers = Group::new().set("id", "markers");
    for marker in &overlay.markers {
        markers = markers.add(
            Rectangle::new()
                .set("x", marker.rect.min_x)
                .set("y", marker.rect.min_y)
                .set("width", marker.rect.width())
                .set("height", marker.rect.height())
                .set("fill", "none")
                .set("stroke", hex(marker.color()))
                .set("stroke-width", 1),
        );
    }
    doc = doc.add(markers);

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrsprite_core::{Marker, Rect};

    fn overlay(points: &[(f64, f64)], selected: Option<usize>) -> Overlay {
        Overlay {
            polyline: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            markers: points
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Marker {
                    rect: Rect::square(Point::new(x, y), 5.0),
                    selected: selected == Some(i),
                })
                .collect(),
        }
    }

    #[test]
    fn path_data_needs_two_points() {
        assert_eq!(build_path_data(&[]), "");
        assert_eq!(build_path_data(&[Point::new(1.0, 2.0)]), "");
    }

    #[test]
    fn hex_formats_colors() {
        assert_eq!(hex([173, 216, 230]), "#add8e6");
        assert_eq!(hex([0, 0, 0]), "#000000");
    }

    #[test]
    fn svg_has_viewbox_path_and_markers() {
        let svg = overlay_to_svg(
            &overlay(&[(10.0, 10.0), (100.0, 50.0)], None),
            CanvasSize::new(256.0, 128.0),
            Some("particle"),
        );
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 256 128""#));
        assert!(svg.contains("<title>particle</title>"));
        assert!(svg.contains("M10,10 L100,50"));
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn selected_marker_uses_selected_color() {
        let svg = overlay_to_svg(
            &overlay(&[(10.0, 10.0), (100.0, 50.0)], Some(1)),
            CanvasSize::default(),
            None,
        );
        assert_eq!(svg.matches("#add8e6").count(), 1);
        assert_eq!(svg.matches("#8b0000").count(), 1);
    }

    #[test]
    fn single_point_has_no_path() {
        let svg = overlay_to_svg(&overlay(&[(10.0, 10.0)], None), CanvasSize::default(), None);
        assert!(!svg.contains("<path"));
        assert_eq!(svg.matches("<rect").count(), 1);
    }
}
