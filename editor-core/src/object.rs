//! Scene objects - the layered building blocks drawn over the background.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CanvasError, DecodedImage, Rgba};

/// Line height of text as a multiple of the font size.
pub const TEXT_LINE_HEIGHT: f32 = 1.16;

/// Estimated glyph advance as a multiple of the font size.
pub const TEXT_CHAR_WIDTH: f32 = 0.6;

/// Unique identifier for a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Create a new unique object ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A font size from the editor's fixed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FontSize(u32);

impl FontSize {
    /// Sizes offered by the editor, in pixels.
    pub const ALLOWED: [u32; 11] = [12, 14, 16, 18, 20, 24, 28, 32, 36, 48, 64];

    /// The editor's initial font size.
    pub const DEFAULT: Self = Self(20);

    /// Size in pixels.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Size in pixels as a float, for layout.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn px(self) -> f32 {
        self.0 as f32
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for FontSize {
    type Error = CanvasError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&value) {
            Ok(Self(value))
        } else {
            Err(CanvasError::InvalidAttribute(format!(
                "font size {value} is not one of {:?}",
                Self::ALLOWED
            )))
        }
    }
}

impl From<FontSize> for u32 {
    fn from(size: FontSize) -> Self {
        size.0
    }
}

/// A rectangle border thickness from the editor's fixed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct StrokeWidth(u32);

impl StrokeWidth {
    /// Thicknesses offered by the editor, in pixels.
    pub const ALLOWED: [u32; 8] = [1, 2, 3, 4, 5, 6, 8, 10];

    /// The editor's initial thickness.
    pub const DEFAULT: Self = Self(2);

    /// Thickness in pixels.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Thickness in pixels as a float, for layout.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn px(self) -> f32 {
        self.0 as f32
    }
}

impl Default for StrokeWidth {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for StrokeWidth {
    type Error = CanvasError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&value) {
            Ok(Self(value))
        } else {
            Err(CanvasError::InvalidAttribute(format!(
                "stroke width {value} is not one of {:?}",
                Self::ALLOWED
            )))
        }
    }
}

impl From<StrokeWidth> for u32 {
    fn from(width: StrokeWidth) -> Self {
        width.0
    }
}

/// Axis-aligned box in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Bounds {
    /// Check if a point lies inside the box (edges included).
    #[must_use]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

/// Editable text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObject {
    /// Text content; `\n` starts a new line.
    pub content: String,
    /// Glyph color.
    #[serde(default)]
    pub fill: Rgba,
    /// Box color behind the text.
    #[serde(default = "transparent")]
    pub background: Rgba,
    /// Font size.
    #[serde(default)]
    pub font_size: FontSize,
}

impl TextObject {
    /// Lines of the content.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    /// Estimated size of the text box as `(width, height)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size(&self) -> (f32, f32) {
        let px = self.font_size.px();
        let longest = self.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let line_count = self.lines().count();
        (
            longest as f32 * px * TEXT_CHAR_WIDTH,
            line_count as f32 * px * TEXT_LINE_HEIGHT,
        )
    }
}

/// Rectangle with a centred border.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectObject {
    /// Outline width, border excluded.
    pub width: f32,
    /// Outline height, border excluded.
    pub height: f32,
    /// Interior color.
    #[serde(default = "transparent")]
    pub fill: Rgba,
    /// Border color.
    #[serde(default)]
    pub stroke: Rgba,
    /// Border thickness.
    #[serde(default)]
    pub stroke_width: StrokeWidth,
}

/// Embedded raster image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObject {
    /// Shared pixel data.
    pub image: DecodedImage,
    /// Display width.
    pub width: f32,
    /// Display height.
    pub height: f32,
}

impl ImageObject {
    /// Display an image at `width`, keeping its aspect ratio.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn scaled_to_width(image: DecodedImage, width: f32) -> Self {
        let source_w = image.width().max(1) as f32;
        let height = width * image.height() as f32 / source_w;
        Self {
            image,
            width,
            height,
        }
    }
}

/// The content of a scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectKind {
    /// A text label.
    Text(TextObject),
    /// A rectangle.
    Rect(RectObject),
    /// An embedded image.
    Image(ImageObject),
}

impl ObjectKind {
    /// Kind name, matching the serialized tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Rect(_) => "rect",
            Self::Image(_) => "image",
        }
    }
}

/// An addressable, independently stylable object in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Unique identifier.
    pub id: ObjectId,
    /// Left edge of the bounding box.
    pub x: f32,
    /// Top edge of the bounding box.
    pub y: f32,
    /// Object content.
    pub kind: ObjectKind,
}

impl SceneObject {
    /// Create a new object with a fresh ID.
    #[must_use]
    pub fn new(kind: ObjectKind, x: f32, y: f32) -> Self {
        Self {
            id: ObjectId::new(),
            x,
            y,
            kind,
        }
    }

    /// Bounding box, including a rectangle's border.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let (width, height) = match &self.kind {
            ObjectKind::Text(text) => text.size(),
            ObjectKind::Rect(rect) => {
                let sw = rect.stroke_width.px();
                (rect.width + sw, rect.height + sw)
            }
            ObjectKind::Image(img) => (img.width, img.height),
        };
        Bounds {
            x: self.x,
            y: self.y,
            width,
            height,
        }
    }

    /// Check if a point (in canvas coordinates) is within this object.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.bounds().contains(x, y)
    }
}

fn transparent() -> Rgba {
    Rgba::TRANSPARENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba as Pixel, RgbaImage};

    #[test]
    fn font_size_must_be_in_list() {
        assert_eq!(FontSize::try_from(24).expect("allowed").get(), 24);
        assert!(matches!(
            FontSize::try_from(13),
            Err(CanvasError::InvalidAttribute(_))
        ));
    }

    #[test]
    fn stroke_width_must_be_in_list() {
        assert!(StrokeWidth::try_from(10).is_ok());
        assert!(StrokeWidth::try_from(7).is_err());
        assert!(StrokeWidth::try_from(0).is_err());
    }

    #[test]
    fn size_deserialization_is_validated() {
        assert!(serde_json::from_str::<FontSize>("48").is_ok());
        assert!(serde_json::from_str::<FontSize>("47").is_err());
    }

    #[test]
    fn rect_bounds_include_border() {
        let rect = SceneObject::new(
            ObjectKind::Rect(RectObject {
                width: 100.0,
                height: 50.0,
                fill: Rgba::TRANSPARENT,
                stroke: Rgba::BLACK,
                stroke_width: StrokeWidth::try_from(4).expect("allowed"),
            }),
            10.0,
            10.0,
        );
        let b = rect.bounds();
        assert!((b.width - 104.0).abs() < f32::EPSILON);
        assert!((b.height - 54.0).abs() < f32::EPSILON);
        assert!(rect.contains_point(113.0, 63.0));
        assert!(!rect.contains_point(115.0, 20.0));
    }

    #[test]
    fn text_size_uses_longest_line() {
        let text = TextObject {
            content: "ab\nabcd".to_string(),
            fill: Rgba::BLACK,
            background: Rgba::TRANSPARENT,
            font_size: FontSize::try_from(20).expect("allowed"),
        };
        let (w, h) = text.size();
        assert!((w - 48.0).abs() < 0.01);
        assert!((h - 46.4).abs() < 0.01);
    }

    #[test]
    fn image_scaling_keeps_aspect_ratio() {
        let pixels = RgbaImage::from_pixel(200, 50, Pixel([0, 0, 0, 255]));
        let obj = ImageObject::scaled_to_width(DecodedImage::from_rgba(pixels), 100.0);
        assert!((obj.width - 100.0).abs() < f32::EPSILON);
        assert!((obj.height - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn kind_serializes_with_type_tag() {
        let kind = ObjectKind::Text(TextObject {
            content: "Hi".to_string(),
            fill: Rgba::BLACK,
            background: Rgba::TRANSPARENT,
            font_size: FontSize::DEFAULT,
        });
        let json = serde_json::to_value(&kind).expect("serialize");
        assert_eq!(json["type"], "text");
        assert_eq!(json["fill"], "rgba(0, 0, 0, 1)");
        assert_eq!(json["font_size"], 20);
    }
}
