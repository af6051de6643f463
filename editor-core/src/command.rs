//! Serializable edit commands.
//!
//! Every non-image scene operation can be expressed as an [`EditCommand`],
//! which makes edits scriptable and replayable:
//!
//! ```json
//! [
//!   {"op": "add_rect"},
//!   {"op": "set_stroke", "color": "rgba(255, 0, 0, 1)"},
//!   {"op": "reorder", "direction": "back"}
//! ]
//! ```
//!
//! New objects take their colors and sizes from the scene's
//! [`EditSettings`](crate::EditSettings), as they would when created from the
//! editor's controls.

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult, FontSize, LayerMove, Rgba, Scene, StrokeWidth};

/// A single edit applied to a [`Scene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    /// Add text with the current foreground and font size.
    AddText {
        /// Content; defaults to the configured placeholder.
        #[serde(default)]
        content: Option<String>,
    },
    /// Add a transparent rectangle bordered with the current foreground.
    AddRect,
    /// Select the object at a z-order position.
    Select {
        /// Position, 0 being the bottom.
        index: usize,
    },
    /// Select the topmost object under a point.
    SelectAt {
        /// Canvas x.
        x: f32,
        /// Canvas y.
        y: f32,
    },
    /// Clear the selection.
    ClearSelection,
    /// Set the fill of the active object.
    SetFill {
        /// New fill.
        color: Rgba,
    },
    /// Set the border color of the active rectangle.
    SetStroke {
        /// New border color.
        color: Rgba,
    },
    /// Set the foreground color.
    SetForeground {
        /// New foreground.
        color: Rgba,
    },
    /// Set the background color.
    SetBackground {
        /// New background.
        color: Rgba,
    },
    /// Set the font size.
    SetFontSize {
        /// New size.
        size: FontSize,
    },
    /// Set the border thickness.
    SetStrokeWidth {
        /// New thickness.
        width: StrokeWidth,
    },
    /// Replace the content of the active text.
    SetText {
        /// New content.
        content: String,
    },
    /// Move the active object.
    Translate {
        /// Horizontal offset.
        #[serde(default)]
        dx: f32,
        /// Vertical offset.
        #[serde(default)]
        dy: f32,
    },
    /// Resize the active rectangle or image.
    Resize {
        /// New display width.
        width: f32,
        /// New display height.
        height: f32,
    },
    /// Move the active object in the z-order.
    Reorder {
        /// Where to move it.
        direction: LayerMove,
    },
    /// Remove the object at a z-order position.
    Remove {
        /// Position, 0 being the bottom.
        index: usize,
    },
    /// Remove the active object.
    RemoveActive,
    /// Remove the background image.
    ClearBackground,
}

impl Scene {
    /// Apply an edit command.
    ///
    /// # Errors
    ///
    /// Returns an error if an index does not address an object.
    pub fn apply(&mut self, command: &EditCommand) -> CanvasResult<()> {
        tracing::trace!(?command, "Applying edit");
        match command {
            EditCommand::AddText { content } => {
                let content = content
                    .clone()
                    .unwrap_or_else(|| self.config().default_text.clone());
                let settings = *self.settings();
                self.add_text(content, settings.foreground, settings.font_size);
            }
            EditCommand::AddRect => {
                let settings = *self.settings();
                self.add_rect(Rgba::TRANSPARENT, settings.foreground, settings.stroke_width);
            }
            EditCommand::Select { index } => {
                self.select_index(*index)?;
            }
            EditCommand::SelectAt { x, y } => {
                self.select_at(*x, *y);
            }
            EditCommand::ClearSelection => self.clear_selection(),
            EditCommand::SetFill { color } => self.set_fill(*color),
            EditCommand::SetStroke { color } => self.set_stroke(*color),
            EditCommand::SetForeground { color } => self.set_foreground_color(*color),
            EditCommand::SetBackground { color } => self.set_background_color(*color),
            EditCommand::SetFontSize { size } => self.set_font_size(*size),
            EditCommand::SetStrokeWidth { width } => self.set_stroke_width(*width),
            EditCommand::SetText { content } => self.set_text(content.clone()),
            EditCommand::Translate { dx, dy } => self.translate_active(*dx, *dy),
            EditCommand::Resize { width, height } => self.resize_active(*width, *height),
            EditCommand::Reorder { direction } => self.reorder(*direction),
            EditCommand::Remove { index } => {
                let id = self
                    .objects()
                    .get(*index)
                    .map(|o| o.id)
                    .ok_or_else(|| CanvasError::ObjectNotFound(format!("index {index}")))?;
                self.remove(id)?;
            }
            EditCommand::RemoveActive => {
                self.remove_active();
            }
            EditCommand::ClearBackground => self.clear_background(),
        }
        Ok(())
    }

    /// Apply commands in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first command error.
    pub fn apply_all<'a>(
        &mut self,
        commands: impl IntoIterator<Item = &'a EditCommand>,
    ) -> CanvasResult<()> {
        commands.into_iter().try_for_each(|c| self.apply(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ObjectKind;

    fn parse(json: &str) -> Vec<EditCommand> {
        serde_json::from_str(json).expect("valid commands")
    }

    #[test]
    fn parses_tagged_commands() {
        let commands = parse(
            r##"[
                {"op": "add_text", "content": "Hi"},
                {"op": "add_rect"},
                {"op": "set_fill", "color": "#ff0000"},
                {"op": "set_font_size", "size": 48},
                {"op": "reorder", "direction": "front"},
                {"op": "translate", "dx": 5}
            ]"##,
        );
        assert_eq!(
            commands[0],
            EditCommand::AddText {
                content: Some("Hi".to_string())
            }
        );
        assert_eq!(commands[1], EditCommand::AddRect);
        assert_eq!(
            commands[2],
            EditCommand::SetFill {
                color: Rgba::opaque(255, 0, 0)
            }
        );
        assert_eq!(
            commands[4],
            EditCommand::Reorder {
                direction: LayerMove::Front
            }
        );
        assert_eq!(commands[5], EditCommand::Translate { dx: 5.0, dy: 0.0 });
    }

    #[test]
    fn rejects_sizes_outside_allowed_set() {
        let result = serde_json::from_str::<EditCommand>(r#"{"op": "set_font_size", "size": 13}"#);
        assert!(result.is_err());
    }

    #[test]
    fn new_objects_use_settings() {
        let mut scene = Scene::default();
        let red = Rgba::opaque(255, 0, 0);
        scene
            .apply_all(&parse(
                r#"[
                    {"op": "set_foreground", "color": "rgb(255, 0, 0)"},
                    {"op": "set_stroke_width", "width": 8},
                    {"op": "add_rect"},
                    {"op": "clear_selection"},
                    {"op": "set_font_size", "size": 36},
                    {"op": "add_text"}
                ]"#,
            ))
            .expect("apply");

        let ObjectKind::Rect(rect) = &scene.objects()[0].kind else {
            panic!("expected rect");
        };
        assert_eq!(rect.stroke, red);
        assert_eq!(rect.fill, Rgba::TRANSPARENT);
        assert_eq!(rect.stroke_width.get(), 8);

        // clearing the selection reset the foreground to black
        let ObjectKind::Text(text) = &scene.objects()[1].kind else {
            panic!("expected text");
        };
        assert_eq!(text.content, "Text");
        assert_eq!(text.fill, Rgba::BLACK);
        assert_eq!(text.font_size.get(), 36);
    }

    #[test]
    fn index_addressing() {
        let mut scene = Scene::default();
        scene
            .apply_all(&parse(
                r#"[{"op": "add_rect"}, {"op": "add_rect"}, {"op": "add_rect"}]"#,
            ))
            .expect("apply");
        let ids: Vec<_> = scene.objects().iter().map(|o| o.id).collect();

        scene.apply(&EditCommand::Remove { index: 0 }).expect("remove");
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.active_id(), Some(ids[2]));

        scene.apply(&EditCommand::Select { index: 0 }).expect("select");
        assert_eq!(scene.active_id(), Some(ids[1]));
        scene.apply(&EditCommand::Remove { index: 0 }).expect("remove");
        assert!(scene.active_id().is_none());

        assert!(matches!(
            scene.apply(&EditCommand::Select { index: 7 }),
            Err(CanvasError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn resize_command() {
        let mut scene = Scene::default();
        scene
            .apply_all(&parse(
                r#"[{"op": "add_rect"}, {"op": "resize", "width": 250, "height": 30}]"#,
            ))
            .expect("apply");
        let ObjectKind::Rect(rect) = &scene.objects()[0].kind else {
            panic!("expected rect");
        };
        assert!((rect.width - 250.0).abs() < f32::EPSILON);
        assert!((rect.height - 30.0).abs() < f32::EPSILON);
    }
}
