//! Texture export to image files.

use std::path::{Path, PathBuf};

use mrsprite_core::SynthesizedImage;
use mrsprite_export::{ExportError, RasterFormat, encode};

/// File name offered when the user has not picked one.
pub const DEFAULT_EXPORT_NAME: &str = "Particle.bmp";

/// Errors from writing a texture to disk.
#[derive(Debug, thiserror::Error)]
pub enum ExportFailure {
    /// The extension names a format we cannot write.
    #[error("unsupported image extension {extension:?} for {}", path.display())]
    UnsupportedExtension {
        /// Requested output path.
        path: PathBuf,
        /// The extension as given.
        extension: String,
    },

    /// Encoding the container failed.
    #[error(transparent)]
    Encode(#[from] ExportError),

    /// Writing the encoded bytes failed.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        /// Requested output path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Pick the container for `path` from its extension.
///
/// A path without an extension gets the default format (BMP).
fn format_for(path: &Path) -> Result<RasterFormat, ExportFailure> {
    let Some(ext) = path.extension() else {
        return Ok(RasterFormat::default());
    };
    let ext = ext.to_string_lossy();
    RasterFormat::from_extension(&ext).ok_or_else(|| ExportFailure::UnsupportedExtension {
        path: path.to_path_buf(),
        extension: ext.into_owned(),
    })
}

/// Encode `image` and write it to `path`.
///
/// The container is chosen from the extension (`.png` or `.bmp`). The
/// chosen format is returned.
///
/// # Errors
///
/// Returns [`ExportFailure::UnsupportedExtension`] for any other
/// extension, [`ExportFailure::Encode`] if encoding fails and
/// [`ExportFailure::Write`] if the file cannot be written.
pub fn export_image(path: &Path, image: &SynthesizedImage) -> Result<RasterFormat, ExportFailure> {
    let format = format_for(path)?;
    let bytes = encode(image, format)?;
    std::fs::write(path, &bytes).map_err(|source| ExportFailure::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let dims = image.dimensions();
    log::info!(
        "exported {}x{} {} ({} bytes) to {}",
        dims.width,
        dims.height,
        format.extension(),
        bytes.len(),
        path.display(),
    );
    Ok(format)
}
