//! Thumbnail encoding: rendered surface in, opaque string out.
//!
//! The core only needs "pixels to an opaque string, or failure"; callers
//! treat a failure as a missing thumbnail, never as a failed save.

use base64::Engine as _;
use image::ImageEncoder;
use thiserror::Error;

/// Errors from thumbnail encoding.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// The pixel buffer does not match the stated dimensions.
    #[error("surface is {width}x{height} but holds {bytes} bytes")]
    BadSurface {
        /// Stated width.
        width: u32,
        /// Stated height.
        height: u32,
        /// Actual buffer length.
        bytes: usize,
    },
    /// The underlying image encoder failed.
    #[error("encoding failed: {0}")]
    Encode(String),
}

/// A rendered canvas surface as raw RGBA pixels.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 pixel data, row-major, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

/// Encodes a rendered surface into an opaque string-encoded image.
pub trait ThumbnailEncoder {
    /// Encode the surface, or fail if encoding is unsupported.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbnailError`] if the surface is malformed or the
    /// encoder rejects it.
    fn encode(&self, surface: &PixelSurface) -> Result<String, ThumbnailError>;
}

/// PNG encoder producing a `data:image/png;base64,` URL string.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngThumbnailEncoder;

impl ThumbnailEncoder for PngThumbnailEncoder {
    fn encode(&self, surface: &PixelSurface) -> Result<String, ThumbnailError> {
        let expected = surface.width as usize * surface.height as usize * 4;
        if surface.rgba.len() != expected {
            return Err(ThumbnailError::BadSurface {
                width: surface.width,
                height: surface.height,
                bytes: surface.rgba.len(),
            });
        }

        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(
                &surface.rgba,
                surface.width,
                surface.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| ThumbnailError::Encode(e.to_string()))?;

        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&buf)
        ))
    }
}
