use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

/// Editor commands bound to the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
    Delete,
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
}

impl Shortcut {
    /// Map a key press to a shortcut.
    ///
    /// While text is being typed, Delete/Backspace belong to the text field.
    pub fn from_key(key: Key, modifiers: Modifiers, editing_text: bool) -> Option<Self> {
        if modifiers.command {
            return match key {
                Key::Z if modifiers.shift => Some(Shortcut::Redo),
                Key::Z => Some(Shortcut::Undo),
                Key::Y => Some(Shortcut::Redo),
                Key::B => Some(Shortcut::ToggleBold),
                Key::I => Some(Shortcut::ToggleItalic),
                Key::U => Some(Shortcut::ToggleUnderline),
                _ => None,
            };
        }
        match key {
            Key::Delete | Key::Backspace if !editing_text => Some(Shortcut::Delete),
            _ => None,
        }
    }
}

/// Pointer and keyboard input for the canvas, in screen coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Pos2 },
    PointerMove { position: Pos2 },
    PointerUp,
    DoubleClick { position: Pos2 },
    /// Ctrl+wheel zoom
    Zoom { delta: f32 },
    Shortcut(Shortcut),
}

/// Converts raw egui input into [`InputEvent`]s for the canvas
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    pressed_in_canvas: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect this frame's events. Presses only count inside `canvas_rect`,
    /// but moves and the release of a press that started there are always reported.
    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect, editing_text: bool) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();

            if input.pointer.button_double_clicked(PointerButton::Primary) {
                if let Some(position) = hover.filter(|p| canvas_rect.contains(*p)) {
                    events.push(InputEvent::DoubleClick { position });
                }
            }

            if input.pointer.button_pressed(PointerButton::Primary) {
                if let Some(position) = hover.filter(|p| canvas_rect.contains(*p)) {
                    self.pressed_in_canvas = true;
                    events.push(InputEvent::PointerDown { position });
                }
            }

            if let Some(position) = hover {
                if self.pressed_in_canvas && Some(position) != self.last_pointer_pos {
                    events.push(InputEvent::PointerMove { position });
                }
                self.last_pointer_pos = Some(position);
            }

            if self.pressed_in_canvas && !input.pointer.button_down(PointerButton::Primary) {
                self.pressed_in_canvas = false;
                events.push(InputEvent::PointerUp);
            }

            if input.modifiers.command && hover.is_some_and(|p| canvas_rect.contains(p)) {
                let delta = input.raw_scroll_delta.y;
                if delta != 0.0 {
                    events.push(InputEvent::Zoom { delta });
                }
            }

            for event in &input.raw.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } = event
                {
                    if let Some(shortcut) = Shortcut::from_key(*key, *modifiers, editing_text) {
                        events.push(InputEvent::Shortcut(shortcut));
                    }
                }
            }
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_redo_bindings() {
        assert_eq!(Shortcut::from_key(Key::Z, Modifiers::COMMAND, false), Some(Shortcut::Undo));
        assert_eq!(
            Shortcut::from_key(Key::Z, Modifiers::COMMAND | Modifiers::SHIFT, false),
            Some(Shortcut::Redo)
        );
        assert_eq!(Shortcut::from_key(Key::Y, Modifiers::COMMAND, false), Some(Shortcut::Redo));
    }

    #[test]
    fn delete_is_ignored_while_typing() {
        assert_eq!(Shortcut::from_key(Key::Delete, Modifiers::NONE, false), Some(Shortcut::Delete));
        assert_eq!(Shortcut::from_key(Key::Backspace, Modifiers::NONE, true), None);
    }
}
