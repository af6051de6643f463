//! WebAssembly bindings for editor-core.
//!
//! This module provides JavaScript-callable functions when compiled to WASM.
//! Objects are addressed by z-order index on the JavaScript side.

use wasm_bindgen::prelude::*;

use crate::{
    DecodeTarget, DecodedImage, EditCommand, EditorConfig, FontSize, LayerMove, Rgba, Scene,
    StrokeWidth,
};

/// Initialize the editor WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmEditor {
    scene: Scene,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor for a canvas of the given width (4:3 aspect).
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(width: f32) -> Self {
        Self {
            scene: Scene::new(EditorConfig::with_width(width)),
        }
    }

    /// Get the current scene as JSON.
    #[wasm_bindgen(js_name = getSceneJson)]
    #[must_use]
    pub fn get_scene_json(&self) -> String {
        self.scene.to_json().unwrap_or_default()
    }

    /// Replace the scene from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if JSON parsing fails.
    #[wasm_bindgen(js_name = loadSceneJson)]
    pub fn load_scene_json(&mut self, json: &str) -> Result<(), String> {
        self.scene = Scene::from_json(json).map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Apply an edit command serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the command is malformed or addresses a
    /// missing object.
    #[wasm_bindgen(js_name = applyCommand)]
    pub fn apply_command(&mut self, json: &str) -> Result<(), String> {
        let command: EditCommand = serde_json::from_str(json).map_err(|e| e.to_string())?;
        self.scene.apply(&command).map_err(|e| e.to_string())
    }

    /// Decode image bytes into the background. Returns whether it was applied.
    #[wasm_bindgen(js_name = setBackgroundImage)]
    pub fn set_background_image(&mut self, bytes: &[u8]) -> bool {
        self.scene
            .apply_decoded(DecodeTarget::Background, DecodedImage::decode(bytes))
    }

    /// Decode image bytes into a new image object. Returns whether it was added.
    #[wasm_bindgen(js_name = addImage)]
    pub fn add_image(&mut self, bytes: &[u8]) -> bool {
        self.scene
            .apply_decoded(DecodeTarget::Object, DecodedImage::decode(bytes))
    }

    /// Add text using the current foreground and font size.
    #[wasm_bindgen(js_name = addText)]
    pub fn add_text(&mut self) -> String {
        let settings = *self.scene.settings();
        let content = self.scene.config().default_text.clone();
        self.scene
            .add_text(content, settings.foreground, settings.font_size)
            .to_string()
    }

    /// Add a rectangle using the current foreground and thickness.
    #[wasm_bindgen(js_name = addRect)]
    pub fn add_rect(&mut self) -> String {
        let settings = *self.scene.settings();
        self.scene
            .add_rect(Rgba::TRANSPARENT, settings.foreground, settings.stroke_width)
            .to_string()
    }

    /// Select the topmost object under a point. Returns whether one was hit.
    #[wasm_bindgen(js_name = selectAt)]
    pub fn select_at(&mut self, x: f32, y: f32) -> bool {
        self.scene.select_at(x, y).is_some()
    }

    /// Move the active object by an offset.
    #[wasm_bindgen(js_name = moveActive)]
    pub fn move_active(&mut self, dx: f32, dy: f32) {
        self.scene.translate_active(dx, dy);
    }

    /// Resize the active rectangle or image.
    #[wasm_bindgen(js_name = resizeActive)]
    pub fn resize_active(&mut self, width: f32, height: f32) {
        self.scene.resize_active(width, height);
    }

    /// Clear the selection.
    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.scene.clear_selection();
    }

    /// Set the foreground color from a CSS color string.
    #[wasm_bindgen(js_name = setForeground)]
    pub fn set_foreground(&mut self, color: &str) {
        self.scene.set_foreground_color(Rgba::parse(color));
    }

    /// Set the background color from a CSS color string.
    #[wasm_bindgen(js_name = setBackground)]
    pub fn set_background(&mut self, color: &str) {
        self.scene.set_background_color(Rgba::parse(color));
    }

    /// Set the font size.
    ///
    /// # Errors
    ///
    /// Returns an error string if the size is not offered by the editor.
    #[wasm_bindgen(js_name = setFontSize)]
    pub fn set_font_size(&mut self, size: u32) -> Result<(), String> {
        let size = FontSize::try_from(size).map_err(|e| e.to_string())?;
        self.scene.set_font_size(size);
        Ok(())
    }

    /// Set the rectangle border thickness.
    ///
    /// # Errors
    ///
    /// Returns an error string if the thickness is not offered by the editor.
    #[wasm_bindgen(js_name = setStrokeWidth)]
    pub fn set_stroke_width(&mut self, width: u32) -> Result<(), String> {
        let width = StrokeWidth::try_from(width).map_err(|e| e.to_string())?;
        self.scene.set_stroke_width(width);
        Ok(())
    }

    /// Move the active object: `front`, `forward`, `backward` or `back`.
    ///
    /// # Errors
    ///
    /// Returns an error string for an unknown direction.
    #[wasm_bindgen(js_name = reorder)]
    pub fn reorder(&mut self, direction: &str) -> Result<(), String> {
        let direction: LayerMove = direction.parse().map_err(|e: crate::CanvasError| e.to_string())?;
        self.scene.reorder(direction);
        Ok(())
    }

    /// Delete the active object. Returns whether one was removed.
    #[wasm_bindgen(js_name = removeActive)]
    pub fn remove_active(&mut self) -> bool {
        self.scene.remove_active().is_some()
    }

    /// Number of objects in the scene.
    #[wasm_bindgen(js_name = objectCount)]
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.scene.len()
    }

    /// Z-order index of the active object, or -1.
    #[wasm_bindgen(js_name = activeIndex)]
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn active_index(&self) -> i32 {
        self.scene
            .active_id()
            .and_then(|id| self.scene.index_of(id))
            .map_or(-1, |i| i as i32)
    }

    /// Current foreground color as `rgba(...)`.
    #[wasm_bindgen(js_name = foreground)]
    #[must_use]
    pub fn foreground(&self) -> String {
        self.scene.settings().foreground.to_string()
    }

    /// Current background color as `rgba(...)`.
    #[wasm_bindgen(js_name = background)]
    #[must_use]
    pub fn background(&self) -> String {
        self.scene.settings().background.to_string()
    }
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default().width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_editor_is_empty() {
        let editor = WasmEditor::new(640.0);
        assert_eq!(editor.object_count(), 0);
        assert_eq!(editor.active_index(), -1);
        assert!(editor.get_scene_json().contains("480"));
    }

    #[test]
    fn add_and_reorder() {
        let mut editor = WasmEditor::default();
        editor.add_rect();
        editor.add_text();
        assert_eq!(editor.active_index(), 1);
        editor.reorder("back").expect("valid direction");
        assert_eq!(editor.active_index(), 0);
        assert!(editor.reorder("up").is_err());
    }

    #[test]
    fn colors_roundtrip_as_strings() {
        let mut editor = WasmEditor::default();
        editor.add_text();
        editor.set_foreground("#ff0000");
        assert_eq!(editor.foreground(), "rgba(255, 0, 0, 1)");
        editor.set_background("rgba(0, 0, 255, 0.5)");
        assert_eq!(editor.background(), "rgba(0, 0, 255, 0.5)");
    }

    #[test]
    fn apply_command_rejects_invalid_json() {
        let mut editor = WasmEditor::default();
        assert!(editor.apply_command("{ not valid json }").is_err());
        assert!(editor.apply_command(r#"{"op": "add_rect"}"#).is_ok());
        assert_eq!(editor.object_count(), 1);
    }

    #[test]
    fn undecodable_image_is_ignored() {
        let mut editor = WasmEditor::default();
        assert!(!editor.add_image(b"nope"));
        assert_eq!(editor.object_count(), 0);
    }

    #[test]
    fn scene_json_reloads() {
        let mut editor = WasmEditor::default();
        editor.add_rect();
        let json = editor.get_scene_json();
        let mut other = WasmEditor::default();
        other.load_scene_json(&json).expect("valid scene");
        assert_eq!(other.object_count(), 1);
        assert!(other.load_scene_json(r#"{"foo": "bar"}"#).is_err());
    }
}
