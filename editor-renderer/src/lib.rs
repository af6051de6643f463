//! # Image Editor Renderer
//!
//! Flattens a [`Scene`](editor_core::Scene) into a single image.
//!
//! ```text
//! Scene ──► SVG ──► usvg tree ──► tiny-skia pixmap ──► PNG / JPEG
//! ```
//!
//! The canvas is filled first, then the background image is stretched over
//! it, then objects are painted back to front.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;

pub use error::{RenderError, RenderResult};
pub use export::{ExportConfig, ExportFormat, SceneExporter, DEFAULT_FILE_NAME};
