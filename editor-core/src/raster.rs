//! Decoded raster images shared between the background and image objects.

use std::io::Cursor;
use std::sync::Arc;

use base64::Engine as _;
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{CanvasError, CanvasResult};

/// Decoded RGBA pixel data.
///
/// Cloning shares the pixels; an image placed several times is stored once.
#[derive(Clone)]
pub struct DecodedImage {
    pixels: Arc<RgbaImage>,
}

impl DecodedImage {
    /// Decode PNG/JPEG/GIF/WebP/BMP bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Decode`] if the format is unknown or the data is
    /// corrupt.
    pub fn decode(bytes: &[u8]) -> CanvasResult<Self> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| CanvasError::Decode(e.to_string()))?;
        tracing::debug!("Decoded {}x{} image", decoded.width(), decoded.height());
        Ok(Self::from_rgba(decoded.to_rgba8()))
    }

    /// Wrap an already decoded buffer.
    #[must_use]
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    /// Source width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Source height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Whether two handles share the same pixel buffer.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Re-encode the pixels as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Decode`] if the encoder rejects the buffer.
    pub fn to_png(&self) -> CanvasResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.pixels
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| CanvasError::Decode(format!("PNG encoding failed: {e}")))?;
        Ok(buf.into_inner())
    }

    /// PNG bytes as a base64 `data:` URI.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_data_uri(&self) -> CanvasResult<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(self.to_png()?);
        Ok(format!("data:image/png;base64,{encoded}"))
    }

    /// Decode a base64 string, with or without a `data:` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Decode`] for invalid base64 or image data.
    pub fn from_base64(input: &str) -> CanvasResult<Self> {
        let payload = input
            .split_once(";base64,")
            .map_or(input, |(_, data)| data);
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| CanvasError::Decode(format!("invalid base64: {e}")))?;
        Self::decode(&bytes)
    }
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl PartialEq for DecodedImage {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.pixels == *other.pixels
    }
}

impl Serialize for DecodedImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let uri = self.to_data_uri().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&uri)
    }
}

impl<'de> Deserialize<'de> for DecodedImage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_base64(&raw).map_err(serde::de::Error::custom)
    }
}
