//! Point-list serializer.
//!
//! The persisted form of a point set is a JSON array of position records
//! in stored order:
//!
//! ```json
//! [
//!   { "x": 10.0, "y": 10.0 },
//!   { "x": 100.0, "y": 50.0 }
//! ]
//! ```
//!
//! Selection state is never written, and every loaded point starts
//! unselected. The order is preserved exactly; loading does not re-sort.

use mrsprite_core::{PointSet, PositionRecord};

/// Errors that can occur while (de)serializing a point list.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The text is not a JSON array of `{x, y}` records.
    #[error("malformed point list: {0}")]
    Json(#[from] serde_json::Error),

    /// A record holds a NaN or infinite coordinate.
    #[error("point {index} has a non-finite coordinate")]
    NonFinite {
        /// Index of the offending record.
        index: usize,
    },
}

/// Serialize a point set into pretty-printed JSON.
///
/// # Errors
///
/// Returns [`PersistError::NonFinite`] if a position is not finite (JSON
/// cannot represent it), or [`PersistError::Json`] if serialization
/// fails.
pub fn to_points_json(points: &PointSet) -> Result<String, PersistError> {
    let records = points.to_records();
    check_finite(&records)?;
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Parse a point set from JSON.
///
/// The whole document is parsed and validated before a set is built, so
/// on error nothing partial is returned.
///
/// # Errors
///
/// Returns [`PersistError::Json`] for malformed input and
/// [`PersistError::NonFinite`] for non-finite coordinates.
pub fn from_points_json(json: &str, half_size: f64) -> Result<PointSet, PersistError> {
    let records: Vec<PositionRecord> = serde_json::from_str(json)?;
    check_finite(&records)?;
    Ok(PointSet::from_records(&records, half_size))
}

fn check_finite(records: &[PositionRecord]) -> Result<(), PersistError> {
    match records
        .iter()
        .position(|r| !(r.x.is_finite() && r.y.is_finite()))
    {
        Some(index) => Err(PersistError::NonFinite { index }),
        None => Ok(()),
    }
}
