//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s:
//! - Arrows move focus between leaves
//! - ⌘/Ctrl+Arrow merges the focused leaf toward that side
//! - Shift+Arrow snaps the nearest divider in that direction
//! - `v` / `h` split the focused leaf side by side / stacked

use crate::input::Modifiers;
use quire_core::Direction;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Focus & structure ──
    Navigate(Direction),
    Merge(Direction),
    SnapDivider(Direction),
    /// Vertical divider, children side by side.
    SplitVertical,
    /// Horizontal divider, children stacked.
    SplitHorizontal,
    Delete,
    ClearFocus,

    // ── Edit ──
    Undo,
    Redo,

    // ── Content ──
    ToggleFlip,
    ToggleFit,

    // ── Pages ──
    PrevPage,
    NextPage,
    NewPage,
    DuplicatePage,
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"ArrowLeft"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();
        let arrow = arrow_direction(key);

        // ── Modifier combos first (most specific) ──
        if cmd && modifiers.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            if let Some(direction) = arrow {
                return Some(ShortcutAction::Merge(direction));
            }
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "d" | "D" => Some(ShortcutAction::DuplicatePage),
                "Enter" => Some(ShortcutAction::NewPage),
                _ => None,
            };
        }

        if modifiers.shift {
            return arrow.map(ShortcutAction::SnapDivider);
        }

        if modifiers.alt {
            return None;
        }

        // ── Single keys (no modifiers) ──
        if let Some(direction) = arrow {
            return Some(ShortcutAction::Navigate(direction));
        }
        match key {
            "v" | "V" => Some(ShortcutAction::SplitVertical),
            "h" | "H" => Some(ShortcutAction::SplitHorizontal),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "f" | "F" => Some(ShortcutAction::ToggleFlip),
            "c" | "C" => Some(ShortcutAction::ToggleFit),
            "PageUp" => Some(ShortcutAction::PrevPage),
            "PageDown" => Some(ShortcutAction::NextPage),
            "Escape" => Some(ShortcutAction::ClearFocus),
            _ => None,
        }
    }
}

fn arrow_direction(key: &str) -> Option<Direction> {
    match key {
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        _ => None,
    }
}
