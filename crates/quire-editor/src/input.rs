//! Platform-agnostic input events.
//!
//! Hosts translate their native pointer and keyboard events into these
//! before handing them to [`Editor::handle_input`](crate::Editor::handle_input).
//! Coordinates are page pixels.

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    /// `ctrl` on most platforms, `meta` (⌘) on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start, pen contact).
    PointerDown { x: f32, y: f32, modifiers: Modifiers },

    /// Pointer moved. Shift is read on every move so snapping can be
    /// toggled mid-drag.
    PointerMove { x: f32, y: f32, modifiers: Modifiers },

    PointerUp { x: f32, y: f32 },

    /// Pointer capture lost; the active gesture ends where it is.
    PointerCancel,

    /// Key press. `key` is the DOM-style key name (`"ArrowLeft"`, `"z"`).
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }
}
