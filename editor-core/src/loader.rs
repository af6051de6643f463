//! Asynchronous image decoding.
//!
//! Decoding is the only asynchronous step in editing. A decode future
//! resolves exactly once; the scene is untouched until the result is handed
//! to [`Scene::apply_decoded`], which performs a single mutation on success.
//!
//! When several decodes are in flight and each result is applied as it
//! completes, the resulting object order follows completion order. Callers
//! that need a deterministic order should collect the results first and apply
//! them in request order.

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use crate::{CanvasResult, DecodedImage, Scene};

/// What a decoded image becomes once applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeTarget {
    /// Replace the background, clearing the scene.
    Background,
    /// Add as an image object.
    Object,
}

/// Decode image bytes off the calling task.
///
/// # Errors
///
/// Returns [`CanvasError::Decode`](crate::CanvasError::Decode) if the bytes are not a supported image.
#[cfg(not(target_arch = "wasm32"))]
pub async fn decode(bytes: Vec<u8>) -> CanvasResult<DecodedImage> {
    tokio::task::spawn_blocking(move || DecodedImage::decode(&bytes))
        .await
        .map_err(|e| crate::CanvasError::Decode(format!("decode task failed: {e}")))?
}

/// Decode image bytes.
///
/// # Errors
///
/// Returns [`CanvasError::Decode`](crate::CanvasError::Decode) if the bytes are not a supported image.
#[cfg(target_arch = "wasm32")]
#[allow(clippy::unused_async)]
pub async fn decode(bytes: Vec<u8>) -> CanvasResult<DecodedImage> {
    DecodedImage::decode(&bytes)
}

/// Read and decode an image file.
///
/// # Errors
///
/// Returns [`CanvasError::Io`](crate::CanvasError::Io) if the file cannot be read, or
/// [`CanvasError::Decode`](crate::CanvasError::Decode) if it is not a supported image.
#[cfg(not(target_arch = "wasm32"))]
pub async fn load_file(path: impl AsRef<Path>) -> CanvasResult<DecodedImage> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
    decode(bytes).await
}

impl Scene {
    /// Apply the result of a decode.
    ///
    /// On success exactly one mutation happens: the background is replaced or
    /// an image object is added. A failed decode is logged and leaves the
    /// scene unchanged. Returns whether the scene was modified.
    pub fn apply_decoded(
        &mut self,
        target: DecodeTarget,
        result: CanvasResult<DecodedImage>,
    ) -> bool {
        match result {
            Ok(image) => {
                match target {
                    DecodeTarget::Background => self.set_background(image),
                    DecodeTarget::Object => {
                        let id = self.add_image(image);
                        tracing::debug!("Added decoded image as {id}");
                    }
                }
                true
            }
            Err(e) => {
                tracing::warn!("Dropping image that failed to decode: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CanvasError, EditorConfig, Rgba, StrokeWidth};
    use image::{Rgba as Pixel, RgbaImage};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        DecodedImage::from_rgba(RgbaImage::from_pixel(w, h, Pixel([0, 255, 0, 255])))
            .to_png()
            .expect("encode png")
    }

    #[tokio::test]
    async fn decodes_png_bytes() {
        let image = decode(png_bytes(4, 2)).await.expect("decode");
        assert_eq!((image.width(), image.height()), (4, 2));
    }

    #[tokio::test]
    async fn rejects_garbage() {
        let result = decode(b"definitely not an image".to_vec()).await;
        assert!(matches!(result, Err(CanvasError::Decode(_))));
    }

    #[tokio::test]
    async fn loads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bg.png");
        std::fs::write(&path, png_bytes(3, 3)).expect("write");

        let image = load_file(&path).await.expect("load");
        assert_eq!(image.width(), 3);

        let missing = load_file(dir.path().join("missing.png")).await;
        assert!(matches!(missing, Err(CanvasError::Io(_))));
    }

    #[tokio::test]
    async fn failed_decode_leaves_scene_untouched() {
        let mut scene = Scene::new(EditorConfig::default());
        scene.add_rect(Rgba::TRANSPARENT, Rgba::BLACK, StrokeWidth::DEFAULT);
        let before = scene.to_json().expect("serialize");

        let result = decode(vec![0, 1, 2, 3]).await;
        assert!(!scene.apply_decoded(DecodeTarget::Background, result));
        assert_eq!(scene.to_json().expect("serialize"), before);
    }

    #[tokio::test]
    async fn decoded_background_replaces_scene() {
        let mut scene = Scene::default();
        scene.add_rect(Rgba::TRANSPARENT, Rgba::BLACK, StrokeWidth::DEFAULT);
        scene.add_rect(Rgba::TRANSPARENT, Rgba::BLACK, StrokeWidth::DEFAULT);

        let result = decode(png_bytes(8, 6)).await;
        assert!(scene.apply_decoded(DecodeTarget::Background, result));
        assert!(scene.is_empty());
        assert_eq!(scene.background().map(DecodedImage::width), Some(8));
    }

    #[tokio::test]
    async fn decoded_object_is_added_and_active() {
        let mut scene = Scene::default();
        let result = decode(png_bytes(200, 100)).await;
        assert!(scene.apply_decoded(DecodeTarget::Object, result));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.active_id(), Some(scene.objects()[0].id));
    }
}
