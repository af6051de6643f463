//! # Image Editor Core
//!
//! Scene model for a layered image editor: a background image with text,
//! rectangles and images stacked on top. Compiles to WASM.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 editor-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Scene           │  Objects                 │
//! │  - Z-order       │  - Text / Rect / Image   │
//! │  - Selection     │  - Bounds, hit testing   │
//! │  - EditSettings  │  - Allowed sizes         │
//! ├─────────────────────────────────────────────┤
//! │  Commands        │  Images                  │
//! │  - JSON scripts  │  - Async decode          │
//! │  - Replay        │  - Base64 embedding      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Rendering the scene to PNG/JPEG/SVG lives in `editor-renderer`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod loader;
pub mod object;
pub mod raster;
pub mod scene;
pub mod settings;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use color::Rgba;
pub use command::EditCommand;
pub use config::{EditorConfig, CANVAS_ASPECT};
pub use error::{CanvasError, CanvasResult};
pub use loader::DecodeTarget;
pub use object::{
    Bounds, FontSize, ImageObject, ObjectId, ObjectKind, RectObject, SceneObject, StrokeWidth,
    TextObject, TEXT_CHAR_WIDTH, TEXT_LINE_HEIGHT,
};
pub use raster::DecodedImage;
pub use scene::{LayerMove, Scene};
pub use settings::EditSettings;

/// Editor core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
