//! Editor configuration, passed to a scene at construction.

use serde::{Deserialize, Serialize};

/// Canvas aspect ratio used when only a width is known (4:3).
pub const CANVAS_ASPECT: f32 = 0.75;

/// Placement and sizing defaults for newly created objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
    /// Where new objects are placed (top-left, x).
    pub default_x: f32,
    /// Where new objects are placed (top-left, y).
    pub default_y: f32,
    /// Width and height of a new rectangle.
    pub default_rect_size: f32,
    /// Display width of a newly added image.
    pub default_image_width: f32,
    /// Initial content of new text.
    pub default_text: String,
}

impl EditorConfig {
    /// Configuration for a canvas of the given width with a 4:3 aspect.
    #[must_use]
    pub fn with_width(width: f32) -> Self {
        Self {
            width,
            height: width * CANVAS_ASPECT,
            ..Self::default()
        }
    }

    /// Override the canvas size.
    #[must_use]
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            default_x: 100.0,
            default_y: 100.0,
            default_rect_size: 100.0,
            default_image_width: 100.0,
            default_text: "Text".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_only_uses_four_by_three() {
        let config = EditorConfig::with_width(640.0);
        assert!((config.height - 480.0).abs() < f32::EPSILON);
        assert!((config.default_x - 100.0).abs() < f32::EPSILON);
    }
}
