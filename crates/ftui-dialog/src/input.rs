#![forbid(unsafe_code)]

//! Input events routed to a dialog by its host.

use crate::view::DialogPart;

/// Keyboard key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    /// Any key the dialog does not act on.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    pub const fn press(code: KeyCode) -> Self {
        Self {
            code,
            kind: KeyEventKind::Press,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// A mouse button press, hit-tested by the renderer against the dialog's
/// parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub button: MouseButton,
    /// Innermost dialog part under the pointer, if any.
    pub part: Option<DialogPart>,
}

impl MouseEvent {
    /// A left click on `part`.
    pub const fn click(part: DialogPart) -> Self {
        Self {
            button: MouseButton::Left,
            part: Some(part),
        }
    }
}

/// Input delivered to [`Dialog::handle_event`](crate::Dialog::handle_event).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

impl Event {
    /// Whether this is an Escape key press.
    pub fn is_escape_press(&self) -> bool {
        matches!(
            self,
            Self::Key(KeyEvent {
                code: KeyCode::Escape,
                kind: KeyEventKind::Press,
                ..
            })
        )
    }

    /// The part pressed with the left button, if this is such a press.
    pub fn clicked_part(&self) -> Option<DialogPart> {
        match self {
            Self::Mouse(MouseEvent {
                button: MouseButton::Left,
                part,
            }) => *part,
            _ => None,
        }
    }
}
