//! The editable fields mirrored from the active object.

use serde::{Deserialize, Serialize};

use crate::{FontSize, ObjectKind, Rgba, StrokeWidth};

/// Colors and sizes shown in the editor's controls.
///
/// Selecting an object copies its attributes here. With nothing selected the
/// fields hold the values the next created object will use. For text the
/// foreground is the glyph fill and the background the box behind it; for a
/// rectangle the foreground is the border and the background the interior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditSettings {
    /// Text fill or rectangle border.
    pub foreground: Rgba,
    /// Text box or rectangle interior.
    pub background: Rgba,
    /// Font size for text.
    pub font_size: FontSize,
    /// Border thickness for rectangles.
    pub stroke_width: StrokeWidth,
}

impl EditSettings {
    /// Copy the attributes of a newly selected object.
    ///
    /// Images own none of these fields and leave the settings unchanged.
    pub fn populate_from(&mut self, kind: &ObjectKind) {
        match kind {
            ObjectKind::Text(text) => {
                self.foreground = text.fill;
                self.background = text.background;
                self.font_size = text.font_size;
            }
            ObjectKind::Rect(rect) => {
                self.foreground = rect.stroke;
                self.background = rect.fill;
                self.stroke_width = rect.stroke_width;
            }
            ObjectKind::Image(_) => {}
        }
    }

    /// Reset the colors after the selection is cleared. Sizes are kept.
    pub fn reset_colors(&mut self) {
        self.foreground = Rgba::BLACK;
        self.background = Rgba::TRANSPARENT;
    }
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            foreground: Rgba::BLACK,
            background: Rgba::TRANSPARENT,
            font_size: FontSize::DEFAULT,
            stroke_width: StrokeWidth::DEFAULT,
        }
    }
}
