//! Scene model for layered editing.
//!
//! Objects live in a `Vec` whose order is the z-order: index 0 is drawn
//! first (bottom), the last element is drawn on top. At most one object is
//! active; attribute edits go to it, or are remembered in [`EditSettings`]
//! for the next object when nothing is selected.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    CanvasError, CanvasResult, DecodedImage, EditSettings, EditorConfig, FontSize, ImageObject,
    ObjectId, ObjectKind, RectObject, Rgba, SceneObject, StrokeWidth, TextObject,
};

/// Where to move the active object in the z-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerMove {
    /// Top of the stack.
    Front,
    /// Swap with the object directly above.
    Forward,
    /// Swap with the object directly below.
    Backward,
    /// Bottom of the stack.
    Back,
}

impl FromStr for LayerMove {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(Self::Front),
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            "back" => Ok(Self::Back),
            other => Err(CanvasError::InvalidAttribute(format!(
                "unknown layer move: {other}"
            ))),
        }
    }
}

impl fmt::Display for LayerMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Front => "front",
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Back => "back",
        };
        f.write_str(name)
    }
}

/// A background image with layered objects on top.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Canvas size and placement defaults.
    config: EditorConfig,
    /// Image stretched over the whole canvas, if any.
    background: Option<DecodedImage>,
    /// Objects in z-order, back to front.
    objects: Vec<SceneObject>,
    /// Currently active object.
    active: Option<ObjectId>,
    /// Editable fields.
    #[serde(default)]
    settings: EditSettings,
}

impl Scene {
    /// Create a new empty scene.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Create a scene with an initial background.
    #[must_use]
    pub fn with_background(config: EditorConfig, background: Option<DecodedImage>) -> Self {
        Self {
            background,
            ..Self::new(config)
        }
    }

    /// Replace the background and discard every object and the selection.
    pub fn set_background(&mut self, image: DecodedImage) {
        tracing::info!(
            "Background set to {}x{} image, dropping {} objects",
            image.width(),
            image.height(),
            self.objects.len()
        );
        self.background = Some(image);
        self.objects.clear();
        self.clear_selection();
    }

    /// Remove the background image. Objects are kept.
    pub fn clear_background(&mut self) {
        self.background = None;
    }

    /// Add a text object at the default position and make it active.
    pub fn add_text(&mut self, content: impl Into<String>, fill: Rgba, font_size: FontSize) -> ObjectId {
        let kind = ObjectKind::Text(TextObject {
            content: content.into(),
            fill,
            background: Rgba::TRANSPARENT,
            font_size,
        });
        self.push_active(kind)
    }

    /// Add a rectangle of the default size and make it active.
    pub fn add_rect(&mut self, fill: Rgba, stroke: Rgba, stroke_width: StrokeWidth) -> ObjectId {
        let size = self.config.default_rect_size;
        let kind = ObjectKind::Rect(RectObject {
            width: size,
            height: size,
            fill,
            stroke,
            stroke_width,
        });
        self.push_active(kind)
    }

    /// Add an image scaled to the default width and make it active.
    pub fn add_image(&mut self, image: DecodedImage) -> ObjectId {
        let kind = ObjectKind::Image(ImageObject::scaled_to_width(
            image,
            self.config.default_image_width,
        ));
        self.push_active(kind)
    }

    fn push_active(&mut self, kind: ObjectKind) -> ObjectId {
        let object = SceneObject::new(kind, self.config.default_x, self.config.default_y);
        let id = object.id;
        tracing::debug!("Adding {} object {id}", object.kind.name());
        self.objects.push(object);
        self.activate(self.objects.len() - 1);
        id
    }

    fn activate(&mut self, index: usize) {
        let object = &self.objects[index];
        self.active = Some(object.id);
        self.settings.populate_from(&object.kind);
    }

    /// Make an object the active selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not found.
    pub fn select(&mut self, id: ObjectId) -> CanvasResult<()> {
        let index = self
            .index_of(id)
            .ok_or_else(|| CanvasError::ObjectNotFound(id.to_string()))?;
        self.activate(index);
        Ok(())
    }

    /// Select the object at a z-order position.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    pub fn select_index(&mut self, index: usize) -> CanvasResult<ObjectId> {
        if index >= self.objects.len() {
            return Err(CanvasError::ObjectNotFound(format!("index {index}")));
        }
        self.activate(index);
        Ok(self.objects[index].id)
    }

    /// Select the topmost object under a point, or clear the selection when
    /// the point hits nothing.
    pub fn select_at(&mut self, x: f32, y: f32) -> Option<ObjectId> {
        match self.object_at(x, y) {
            Some(id) => {
                // object_at only returns ids present in the scene
                let _ = self.select(id);
                Some(id)
            }
            None => {
                self.clear_selection();
                None
            }
        }
    }

    /// Clear the selection and reset the color fields.
    pub fn clear_selection(&mut self) {
        self.active = None;
        self.settings.reset_colors();
    }

    /// Find the topmost object containing the given canvas point.
    #[must_use]
    pub fn object_at(&self, x: f32, y: f32) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|o| o.contains_point(x, y))
            .map(|o| o.id)
    }

    /// Set the fill of the active text or rectangle.
    pub fn set_fill(&mut self, color: Rgba) {
        let Some(index) = self.active_index() else {
            self.settings.foreground = color;
            return;
        };
        match &mut self.objects[index].kind {
            ObjectKind::Text(text) => {
                text.fill = color;
                self.settings.foreground = color;
            }
            ObjectKind::Rect(rect) => {
                rect.fill = color;
                self.settings.background = color;
            }
            ObjectKind::Image(_) => ignored("fill", "image"),
        }
    }

    /// Set the border color of the active rectangle.
    pub fn set_stroke(&mut self, color: Rgba) {
        let Some(index) = self.active_index() else {
            self.settings.foreground = color;
            return;
        };
        match &mut self.objects[index].kind {
            ObjectKind::Rect(rect) => {
                rect.stroke = color;
                self.settings.foreground = color;
            }
            other => ignored("stroke", other.name()),
        }
    }

    /// Set the foreground color: text fill or rectangle border.
    pub fn set_foreground_color(&mut self, color: Rgba) {
        let Some(index) = self.active_index() else {
            self.settings.foreground = color;
            return;
        };
        match &mut self.objects[index].kind {
            ObjectKind::Text(text) => text.fill = color,
            ObjectKind::Rect(rect) => rect.stroke = color,
            ObjectKind::Image(_) => return ignored("foreground", "image"),
        }
        self.settings.foreground = color;
    }

    /// Set the background color: text box or rectangle interior.
    pub fn set_background_color(&mut self, color: Rgba) {
        let Some(index) = self.active_index() else {
            self.settings.background = color;
            return;
        };
        match &mut self.objects[index].kind {
            ObjectKind::Text(text) => text.background = color,
            ObjectKind::Rect(rect) => rect.fill = color,
            ObjectKind::Image(_) => return ignored("background", "image"),
        }
        self.settings.background = color;
    }

    /// Set the font size of the active text. Always remembered for new text.
    pub fn set_font_size(&mut self, size: FontSize) {
        self.settings.font_size = size;
        if let Some(index) = self.active_index() {
            match &mut self.objects[index].kind {
                ObjectKind::Text(text) => text.font_size = size,
                other => ignored("font_size", other.name()),
            }
        }
    }

    /// Set the border thickness of the active rectangle. Always remembered.
    pub fn set_stroke_width(&mut self, width: StrokeWidth) {
        self.settings.stroke_width = width;
        if let Some(index) = self.active_index() {
            match &mut self.objects[index].kind {
                ObjectKind::Rect(rect) => rect.stroke_width = width,
                other => ignored("stroke_width", other.name()),
            }
        }
    }

    /// Replace the content of the active text.
    pub fn set_text(&mut self, content: impl Into<String>) {
        if let Some(index) = self.active_index() {
            match &mut self.objects[index].kind {
                ObjectKind::Text(text) => text.content = content.into(),
                other => ignored("content", other.name()),
            }
        }
    }

    /// Move the active object by an offset.
    pub fn translate_active(&mut self, dx: f32, dy: f32) {
        if let Some(index) = self.active_index() {
            let object = &mut self.objects[index];
            object.x += dx;
            object.y += dy;
        }
    }

    /// Set the display size of the active rectangle or image.
    ///
    /// A rectangle's size excludes its border. Text is sized by its font and
    /// ignores this, as do sizes that are not finite and positive.
    pub fn resize_active(&mut self, width: f32, height: f32) {
        let Some(index) = self.active_index() else {
            return;
        };
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            tracing::debug!("Ignoring resize to {width}x{height}");
            return;
        }
        match &mut self.objects[index].kind {
            ObjectKind::Rect(rect) => {
                rect.width = width;
                rect.height = height;
            }
            ObjectKind::Image(img) => {
                img.width = width;
                img.height = height;
            }
            ObjectKind::Text(_) => ignored("size", "text"),
        }
    }

    /// Move the active object in the z-order.
    pub fn reorder(&mut self, direction: LayerMove) {
        let Some(from) = self.active_index() else {
            return;
        };
        let last = self.objects.len() - 1;
        let to = match direction {
            LayerMove::Front => last,
            LayerMove::Back => 0,
            LayerMove::Forward => (from + 1).min(last),
            LayerMove::Backward => from.saturating_sub(1),
        };
        if from == to {
            return;
        }
        match direction {
            LayerMove::Forward | LayerMove::Backward => self.objects.swap(from, to),
            LayerMove::Front | LayerMove::Back => {
                let object = self.objects.remove(from);
                self.objects.insert(to, object);
            }
        }
        tracing::debug!("Moved object {direction}: {from} -> {to}");
    }

    /// Remove an object; clears the selection if it was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not found.
    pub fn remove(&mut self, id: ObjectId) -> CanvasResult<SceneObject> {
        let index = self
            .index_of(id)
            .ok_or_else(|| CanvasError::ObjectNotFound(id.to_string()))?;
        let removed = self.objects.remove(index);
        if self.active == Some(id) {
            self.clear_selection();
        }
        Ok(removed)
    }

    /// Remove the active object, if any.
    pub fn remove_active(&mut self) -> Option<SceneObject> {
        let id = self.active?;
        self.remove(id).ok()
    }

    /// Objects in z-order, back to front.
    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Get an object by ID.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Z-order position of an object.
    #[must_use]
    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// ID of the active object.
    #[must_use]
    pub fn active_id(&self) -> Option<ObjectId> {
        self.active
    }

    /// The active object.
    #[must_use]
    pub fn active(&self) -> Option<&SceneObject> {
        self.active.and_then(|id| self.get(id))
    }

    fn active_index(&self) -> Option<usize> {
        self.active.and_then(|id| self.index_of(id))
    }

    /// The editable fields.
    #[must_use]
    pub fn settings(&self) -> &EditSettings {
        &self.settings
    }

    /// The background image.
    #[must_use]
    pub fn background(&self) -> Option<&DecodedImage> {
        self.background.as_ref()
    }

    /// The configuration the scene was created with.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Canvas width in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.config.width
    }

    /// Canvas height in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.config.height
    }

    /// Get the number of objects in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene has no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Serialize the scene to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string(self).map_err(CanvasError::Serialization)
    }

    /// Deserialize a scene from JSON.
    ///
    /// An object whose ID repeats an earlier one gets a fresh ID, and an
    /// active ID that names no object is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let mut scene: Self = serde_json::from_str(json).map_err(CanvasError::Serialization)?;
        let mut seen = HashSet::with_capacity(scene.objects.len());
        for object in &mut scene.objects {
            if !seen.insert(object.id) {
                let fresh = ObjectId::new();
                tracing::warn!("Restored scene repeats object {}, renamed to {fresh}", object.id);
                object.id = fresh;
                seen.insert(fresh);
            }
        }
        if let Some(id) = scene.active {
            if scene.index_of(id).is_none() {
                tracing::warn!("Restored scene names missing active object {id}");
                scene.active = None;
            }
        }
        Ok(scene)
    }
}

fn ignored(attribute: &str, kind: &str) {
    tracing::debug!("Ignoring {attribute} on {kind} object");
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba as Pixel, RgbaImage};

    fn size(n: u32) -> FontSize {
        FontSize::try_from(n).expect("allowed font size")
    }

    fn width(n: u32) -> StrokeWidth {
        StrokeWidth::try_from(n).expect("allowed stroke width")
    }

    fn solid(w: u32, h: u32) -> DecodedImage {
        DecodedImage::from_rgba(RgbaImage::from_pixel(w, h, Pixel([255, 0, 0, 255])))
    }

    fn three_rects(scene: &mut Scene) -> [ObjectId; 3] {
        [
            scene.add_rect(Rgba::TRANSPARENT, Rgba::BLACK, width(1)),
            scene.add_rect(Rgba::TRANSPARENT, Rgba::BLACK, width(2)),
            scene.add_rect(Rgba::TRANSPARENT, Rgba::BLACK, width(3)),
        ]
    }

    fn order(scene: &Scene) -> Vec<ObjectId> {
        scene.objects().iter().map(|o| o.id).collect()
    }

    #[test]
    fn test_add_makes_active() {
        let mut scene = Scene::default();
        assert!(scene.is_empty());

        let text = scene.add_text("Hello", Rgba::BLACK, size(24));
        assert_eq!(scene.active_id(), Some(text));
        let rect = scene.add_rect(Rgba::TRANSPARENT, Rgba::BLACK, width(2));
        assert_eq!(scene.active_id(), Some(rect));
        let image = scene.add_image(solid(50, 25));
        assert_eq!(scene.active_id(), Some(image));

        assert_eq!(scene.len(), 3);
        let placed = scene.get(text).expect("text");
        assert!((placed.x - 100.0).abs() < f32::EPSILON);
        assert!((placed.y - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_new_rect_has_default_size() {
        let mut scene = Scene::default();
        let id = scene.add_rect(Rgba::TRANSPARENT, Rgba::BLACK, width(2));
        let ObjectKind::Rect(rect) = &scene.get(id).expect("rect").kind else {
            panic!("expected rect");
        };
        assert!((rect.width - 100.0).abs() < f32::EPSILON);
        assert!((rect.height - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_new_image_scaled_to_default_width() {
        let mut scene = Scene::default();
        let id = scene.add_image(solid(400, 300));
        let ObjectKind::Image(img) = &scene.get(id).expect("image").kind else {
            panic!("expected image");
        };
        assert!((img.width - 100.0).abs() < f32::EPSILON);
        assert!((img.height - 75.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_select_populates_settings() {
        let mut scene = Scene::default();
        let red = Rgba::opaque(255, 0, 0);
        let blue = Rgba::new(0, 0, 255, 0.5);
        let text = scene.add_text("t", red, size(36));
        let rect = scene.add_rect(blue, Rgba::BLACK, width(8));

        assert_eq!(scene.settings().foreground, Rgba::BLACK);
        assert_eq!(scene.settings().background, blue);
        assert_eq!(scene.settings().stroke_width, width(8));

        scene.select(text).expect("select text");
        assert_eq!(scene.settings().foreground, red);
        assert_eq!(scene.settings().background, Rgba::TRANSPARENT);
        assert_eq!(scene.settings().font_size, size(36));

        scene.select(rect).expect("select rect");
        assert_eq!(scene.settings().background, blue);
    }

    #[test]
    fn test_clear_selection_resets_colors() {
        let mut scene = Scene::default();
        scene.add_text("t", Rgba::opaque(1, 2, 3), size(48));
        scene.clear_selection();
        assert!(scene.active_id().is_none());
        assert_eq!(scene.settings().foreground, Rgba::BLACK);
        assert_eq!(scene.settings().background, Rgba::TRANSPARENT);
        assert_eq!(scene.settings().font_size, size(48));
    }

    #[test]
    fn test_select_unknown_is_error() {
        let mut scene = Scene::default();
        assert!(matches!(
            scene.select(ObjectId::new()),
            Err(CanvasError::ObjectNotFound(_))
        ));
        assert!(scene.select_index(0).is_err());
    }

    #[test]
    fn test_setters_without_selection_are_remembered() {
        let mut scene = Scene::default();
        let green = Rgba::opaque(0, 255, 0);
        scene.set_fill(green);
        scene.set_font_size(size(64));
        scene.set_stroke_width(width(10));
        scene.reorder(LayerMove::Front);

        assert!(scene.is_empty());
        assert_eq!(scene.settings().foreground, green);
        assert_eq!(scene.settings().font_size, size(64));
        assert_eq!(scene.settings().stroke_width, width(10));
    }

    #[test]
    fn test_font_size_ignored_on_rect() {
        let mut scene = Scene::default();
        let id = scene.add_rect(Rgba::TRANSPARENT, Rgba::BLACK, width(2));
        let before = scene.get(id).cloned();
        scene.set_font_size(size(64));
        assert_eq!(scene.get(id).cloned(), before);
    }

    #[test]
    fn test_stroke_ignored_on_text() {
        let mut scene = Scene::default();
        let id = scene.add_text("t", Rgba::BLACK, size(20));
        let before = scene.get(id).cloned();
        scene.set_stroke_width(width(6));
        scene.set_stroke(Rgba::opaque(9, 9, 9));
        assert_eq!(scene.get(id).cloned(), before);
    }

    #[test]
    fn test_fill_on_rect_is_interior() {
        let mut scene = Scene::default();
        let id = scene.add_rect(Rgba::TRANSPARENT, Rgba::BLACK, width(2));
        let fill = Rgba::new(10, 20, 30, 0.25);
        scene.set_fill(fill);
        scene.set_stroke(Rgba::WHITE);
        let ObjectKind::Rect(rect) = &scene.get(id).expect("rect").kind else {
            panic!("expected rect");
        };
        assert_eq!(rect.fill, fill);
        assert_eq!(rect.stroke, Rgba::WHITE);
        assert_eq!(scene.settings().background, fill);
        assert_eq!(scene.settings().foreground, Rgba::WHITE);
    }

    #[test]
    fn test_foreground_and_background_roles() {
        let mut scene = Scene::default();
        let text = scene.add_text("t", Rgba::BLACK, size(20));
        scene.set_foreground_color(Rgba::opaque(1, 1, 1));
        scene.set_background_color(Rgba::opaque(2, 2, 2));
        let ObjectKind::Text(t) = &scene.get(text).expect("text").kind else {
            panic!("expected text");
        };
        assert_eq!(t.fill, Rgba::opaque(1, 1, 1));
        assert_eq!(t.background, Rgba::opaque(2, 2, 2));
    }

    #[test]
    fn test_colors_ignored_on_image() {
        let mut scene = Scene::default();
        let id = scene.add_image(solid(2, 2));
        let before = scene.get(id).cloned();
        let settings = *scene.settings();
        scene.set_fill(Rgba::WHITE);
        scene.set_foreground_color(Rgba::WHITE);
        scene.set_background_color(Rgba::WHITE);
        assert_eq!(scene.get(id).cloned(), before);
        assert_eq!(*scene.settings(), settings);
    }

    #[test]
    fn test_reorder_front_from_middle() {
        let mut scene = Scene::default();
        let [a, b, c] = three_rects(&mut scene);
        scene.select(b).expect("select");
        scene.reorder(LayerMove::Front);
        assert_eq!(order(&scene), vec![a, c, b]);
    }

    #[test]
    fn test_reorder_steps() {
        let mut scene = Scene::default();
        let [a, b, c] = three_rects(&mut scene);

        // c is active and already on top
        scene.reorder(LayerMove::Forward);
        assert_eq!(order(&scene), vec![a, b, c]);

        scene.reorder(LayerMove::Backward);
        assert_eq!(order(&scene), vec![a, c, b]);

        scene.reorder(LayerMove::Back);
        assert_eq!(order(&scene), vec![c, a, b]);

        scene.reorder(LayerMove::Backward);
        assert_eq!(order(&scene), vec![c, a, b]);
        assert_eq!(scene.active_id(), Some(c));
    }

    #[test]
    fn test_layer_move_parsing() {
        assert_eq!("front".parse::<LayerMove>().expect("front"), LayerMove::Front);
        assert_eq!(" Back ".parse::<LayerMove>().expect("back"), LayerMove::Back);
        assert!("sideways".parse::<LayerMove>().is_err());
        assert_eq!(LayerMove::Backward.to_string(), "backward");
    }

    #[test]
    fn test_remove_active_clears_selection() {
        let mut scene = Scene::default();
        let [a, _, c] = three_rects(&mut scene);
        scene.remove(a).expect("remove a");
        assert_eq!(scene.active_id(), Some(c));

        let removed = scene.remove_active().expect("active removed");
        assert_eq!(removed.id, c);
        assert!(scene.active_id().is_none());
        assert_eq!(scene.len(), 1);
        assert!(scene.remove(c).is_err());
    }

    #[test]
    fn test_set_background_resets_scene() {
        let mut scene = Scene::default();
        three_rects(&mut scene);
        let bg = solid(8, 6);
        scene.set_background(bg.clone());
        assert!(scene.is_empty());
        assert!(scene.active_id().is_none());
        assert!(scene.background().expect("background").ptr_eq(&bg));
    }

    #[test]
    fn test_hit_testing_prefers_topmost() {
        let mut scene = Scene::default();
        let [_, _, c] = three_rects(&mut scene);
        assert_eq!(scene.object_at(150.0, 150.0), Some(c));
        assert!(scene.object_at(5.0, 5.0).is_none());

        assert!(scene.select_at(5.0, 5.0).is_none());
        assert!(scene.active_id().is_none());
        assert_eq!(scene.select_at(120.0, 120.0), Some(c));
        assert_eq!(scene.active_id(), Some(c));
    }

    #[test]
    fn test_translate_and_edit_text() {
        let mut scene = Scene::default();
        let id = scene.add_text("old", Rgba::BLACK, size(20));
        scene.translate_active(5.0, -10.0);
        scene.set_text("new");
        let object = scene.get(id).expect("text");
        assert!((object.x - 105.0).abs() < f32::EPSILON);
        assert!((object.y - 90.0).abs() < f32::EPSILON);
        let ObjectKind::Text(text) = &object.kind else {
            panic!("expected text");
        };
        assert_eq!(text.content, "new");
    }

    #[test]
    fn test_resize_rect_and_image() {
        let mut scene = Scene::default();
        let rect = scene.add_rect(Rgba::TRANSPARENT, Rgba::BLACK, width(4));
        scene.resize_active(300.0, 40.0);
        let bounds = scene.get(rect).expect("rect").bounds();
        assert!((bounds.width - 304.0).abs() < f32::EPSILON);
        assert!((bounds.height - 44.0).abs() < f32::EPSILON);
        assert_eq!(scene.object_at(350.0, 120.0), Some(rect));

        // display size is independent of the source aspect ratio
        let image = scene.add_image(solid(400, 300));
        scene.resize_active(50.0, 200.0);
        let ObjectKind::Image(img) = &scene.get(image).expect("image").kind else {
            panic!("expected image");
        };
        assert!((img.width - 50.0).abs() < f32::EPSILON);
        assert!((img.height - 200.0).abs() < f32::EPSILON);
        assert_eq!((img.image.width(), img.image.height()), (400, 300));
    }

    #[test]
    fn test_resize_ignored_for_text_and_bad_sizes() {
        let mut scene = Scene::default();
        let text = scene.add_text("t", Rgba::BLACK, size(20));
        let before = scene.get(text).cloned();
        scene.resize_active(10.0, 10.0);
        assert_eq!(scene.get(text).cloned(), before);

        let rect = scene.add_rect(Rgba::TRANSPARENT, Rgba::BLACK, width(2));
        let before = scene.get(rect).cloned();
        scene.resize_active(0.0, 10.0);
        scene.resize_active(f32::NAN, 10.0);
        scene.resize_active(10.0, -5.0);
        assert_eq!(scene.get(rect).cloned(), before);

        scene.clear_selection();
        scene.resize_active(10.0, 10.0);
        assert_eq!(scene.get(rect).cloned(), before);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut scene = Scene::new(EditorConfig::with_width(400.0));
        scene.set_background(solid(4, 3));
        let text = scene.add_text("Hello", Rgba::opaque(0, 128, 255), size(32));
        scene.add_image(solid(10, 10));
        scene.select(text).expect("select");

        let json = scene.to_json().expect("serialize");
        let restored = Scene::from_json(&json).expect("deserialize");
        assert_eq!(restored.objects(), scene.objects());
        assert_eq!(restored.active_id(), Some(text));
        assert_eq!(restored.settings(), scene.settings());
        assert!((restored.height() - 300.0).abs() < f32::EPSILON);
        assert_eq!(restored.background(), scene.background());
    }

    #[test]
    fn test_restore_drops_dangling_active() {
        let mut scene = Scene::default();
        scene.add_rect(Rgba::TRANSPARENT, Rgba::BLACK, width(2));
        let mut value: serde_json::Value =
            serde_json::from_str(&scene.to_json().expect("serialize")).expect("json");
        value["active"] = serde_json::json!(ObjectId::new());
        let restored = Scene::from_json(&value.to_string()).expect("deserialize");
        assert!(restored.active_id().is_none());
    }

    #[test]
    fn test_restore_renames_repeated_ids() {
        let mut scene = Scene::default();
        let [a, _, _] = three_rects(&mut scene);
        scene.select(a).expect("select");
        let mut value: serde_json::Value =
            serde_json::from_str(&scene.to_json().expect("serialize")).expect("json");
        let first = value["objects"][0]["id"].clone();
        value["objects"][2]["id"] = first;

        let mut restored = Scene::from_json(&value.to_string()).expect("deserialize");
        let ids: HashSet<_> = restored.objects().iter().map(|o| o.id).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(restored.objects()[0].id, a);
        assert_eq!(restored.active_id(), Some(a));

        restored.remove(a).expect("remove");
        assert!(restored.get(a).is_none());
        assert_eq!(restored.len(), 2);
    }

    #[test]
    fn test_restore_with_malformed_colors() {
        let json = r#"{
            "config": {"width": 200.0, "height": 150.0, "default_x": 100.0, "default_y": 100.0,
                       "default_rect_size": 100.0, "default_image_width": 100.0, "default_text": "Text"},
            "background": null,
            "objects": [{
                "id": "7f1c7c5e-3b1a-4f43-9c55-0b8c3f1c2a11",
                "x": 1.0, "y": 2.0,
                "kind": {"type": "rect", "width": 10.0, "height": 10.0,
                         "fill": "not-a-color", "stroke": "rgb(1, 2, 3)", "stroke_width": 4}
            }],
            "active": null
        }"#;
        let scene = Scene::from_json(json).expect("deserialize");
        let ObjectKind::Rect(rect) = &scene.objects()[0].kind else {
            panic!("expected rect");
        };
        assert_eq!(rect.fill, Rgba::BLACK);
        assert_eq!(rect.stroke, Rgba::opaque(1, 2, 3));
        assert_eq!(scene.settings(), &EditSettings::default());
    }
}
