//! mrsprite-io: Filesystem persistence and texture export.
//!
//! Thin adapters that move bytes produced by `mrsprite-export` to and
//! from disk, mapping every failure to a typed error that carries the
//! offending path.

pub mod export;
pub mod persist;

pub use export::{DEFAULT_EXPORT_NAME, ExportFailure, export_image};
pub use persist::{PersistenceFailure, load_points, save_points};

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
pub(crate) mod scratch;
