//! Raster container encoding for synthesized textures.
//!
//! Wraps the `image` crate's PNG and BMP encoders. Container layout is
//! entirely the encoder's business; this module only picks one and
//! hands it the RGBA bytes.

use image::ImageEncoder;
use image::codecs::bmp::BmpEncoder;
use image::codecs::png::PngEncoder;

use mrsprite_core::SynthesizedImage;

/// Errors that can occur while encoding a texture.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The container encoder failed.
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Supported raster containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterFormat {
    /// Portable Network Graphics.
    Png,
    /// Windows bitmap, 32 bits per pixel.
    #[default]
    Bmp,
}

impl RasterFormat {
    /// Pick a format from a file extension (case-insensitive).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// The conventional file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Bmp => "bmp",
        }
    }

    /// The MIME type.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Bmp => "image/bmp",
        }
    }
}

/// Encode `image` into `format`, returning the container bytes.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if the encoder rejects the buffer.
pub fn encode(image: &SynthesizedImage, format: RasterFormat) -> Result<Vec<u8>, ExportError> {
    let dims = image.dimensions();
    let mut bytes = Vec::new();
    match format {
        RasterFormat::Png => PngEncoder::new(&mut bytes).write_image(
            image.as_raw(),
            dims.width,
            dims.height,
            image::ExtendedColorType::Rgba8,
        )?,
        RasterFormat::Bmp => BmpEncoder::new(&mut bytes).write_image(
            image.as_raw(),
            dims.width,
            dims.height,
            image::ExtendedColorType::Rgba8,
        )?,
    }
    Ok(bytes)
}
