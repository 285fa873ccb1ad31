//! mrsprite-export: Pure format serializers (sans-IO)
//!
//! Converts core data into bytes and strings: point lists to JSON,
//! synthesized textures to PNG or BMP, and the editing overlay to SVG or
//! a composited raster preview. Nothing here touches the filesystem.

pub mod points;
pub mod preview;
pub mod raster;
pub mod svg;

pub use crate::points::{PersistError, from_points_json, to_points_json};
pub use crate::preview::render_preview;
pub use crate::raster::{ExportError, RasterFormat, encode};
pub use crate::svg::{build_path_data, overlay_to_svg};
