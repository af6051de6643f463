//! Error types for scene operations.

use thiserror::Error;

/// Result type for scene operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in scene operations.
///
/// Missing selections and attributes a variant does not own are not errors:
/// those edits are ignored. Unparseable colors fall back to opaque black.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Object not found in scene.
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Attribute value outside its allowed set.
    #[error("Invalid attribute value: {0}")]
    InvalidAttribute(String),

    /// Image bytes could not be decoded.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Scene serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading image data failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
