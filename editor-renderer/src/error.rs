//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while flattening a scene.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The scene could not be turned into pixels.
    #[error("Export failed: {0}")]
    Export(String),

    /// Image data could not be encoded.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
