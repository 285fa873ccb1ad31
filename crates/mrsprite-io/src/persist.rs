//! Point-list files.
//!
//! Saving writes the JSON produced by [`mrsprite_export::to_points_json`];
//! loading reads and validates the whole file before building a set, so
//! a failed load leaves every caller-held point set untouched.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use mrsprite_core::PointSet;
use mrsprite_export::{PersistError, from_points_json, to_points_json};

/// Errors from saving or loading a point-list file.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceFailure {
    /// The file does not exist.
    #[error("point file not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file could not be written.
    #[error("cannot write {}: {source}", path.display())]
    Unwritable {
        /// Path that was written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The contents are not a valid point list, or the set cannot be
    /// represented as one.
    #[error("malformed point file {}: {source}", path.display())]
    Malformed {
        /// Path of the offending file.
        path: PathBuf,
        /// What was wrong with it.
        source: PersistError,
    },
}

/// Write `points` to `path` as a JSON point list.
///
/// Only positions are written, in stored order.
///
/// # Errors
///
/// Returns [`PersistenceFailure::Malformed`] if a position cannot be
/// serialized and [`PersistenceFailure::Unwritable`] if the write fails.
pub fn save_points(path: &Path, points: &PointSet) -> Result<(), PersistenceFailure> {
    let json = to_points_json(points).map_err(|source| PersistenceFailure::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| PersistenceFailure::Unwritable {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("saved {} points to {}", points.len(), path.display());
    Ok(())
}

/// Read a JSON point list from `path`.
///
/// Loaded points are unselected, keep their stored order and get
/// `half_size` as their marker half-size.
///
/// # Errors
///
/// Returns [`PersistenceFailure::NotFound`] if the file is missing,
/// [`PersistenceFailure::Unreadable`] for other I/O errors, and
/// [`PersistenceFailure::Malformed`] if the contents do not parse.
pub fn load_points(path: &Path, half_size: f64) -> Result<PointSet, PersistenceFailure> {
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => PersistenceFailure::NotFound {
            path: path.to_path_buf(),
        },
        _ => PersistenceFailure::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let points =
        from_points_json(&text, half_size).map_err(|source| PersistenceFailure::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!("loaded {} points from {}", points.len(), path.display());
    Ok(points)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::scratch::ScratchDir;
    use mrsprite_core::{CanvasSize, Point};

    fn sample() -> PointSet {
        let mut set = PointSet::new(5.0);
        for (x, y) in [(10.0, 10.0), (100.0, 50.0), (200.0, 240.0)] {
            set.insert(Point::new(x, y), CanvasSize::default()).unwrap();
        }
        set
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = ScratchDir::new("round-trip");
        let path = dir.join("points.json");
        let mut set = sample();
        set.select_only(1);
        save_points(&path, &set).unwrap();
        let back = load_points(&path, 5.0).unwrap();
        assert_eq!(back.positions(), set.positions());
        assert!(back.iter().all(|p| !p.selected));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = ScratchDir::new("missing");
        let result = load_points(&dir.join("nope.json"), 5.0);
        assert!(matches!(result, Err(PersistenceFailure::NotFound { .. })));
    }

    #[test]
    fn directory_is_unreadable() {
        let dir = ScratchDir::new("unreadable");
        let result = load_points(&dir.0, 5.0);
        assert!(matches!(result, Err(PersistenceFailure::Unreadable { .. })));
    }

    #[test]
    fn garbage_is_malformed_and_names_the_file() {
        let dir = ScratchDir::new("garbage");
        let path = dir.join("points.json");
        std::fs::write(&path, "[{\"x\": 1.0, \"y\": ").unwrap();
        let err = load_points(&path, 5.0).unwrap_err();
        assert!(matches!(err, PersistenceFailure::Malformed { .. }));
        assert!(err.to_string().contains("points.json"));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = ScratchDir::new("unwritable");
        let path = dir.join("missing/points.json");
        let result = save_points(&path, &sample());
        assert!(matches!(result, Err(PersistenceFailure::Unwritable { .. })));
    }
}
