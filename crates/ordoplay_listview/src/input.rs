// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyboard and mouse input passed to the list view.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keys the list view reacts to. Anything else arrives as [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
    /// Home
    Home,
    /// End
    End,
    /// Return / Enter
    Enter,
    /// Any other key, by platform key code
    Other(u32),
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Mouse buttons held during a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MouseButtons {
    /// Left button held
    pub left: bool,
    /// Right button held
    pub right: bool,
    /// Middle button held
    pub middle: bool,
}

impl MouseButtons {
    /// No buttons held
    pub const NONE: Self = Self { left: false, right: false, middle: false };
}

/// Qualifier keys held during input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Qualifiers {
    /// Control key
    pub ctrl: bool,
    /// Shift key
    pub shift: bool,
    /// Alt key
    pub alt: bool,
}

impl Qualifiers {
    /// No qualifiers
    pub const NONE: Self = Self { ctrl: false, shift: false, alt: false };
    /// Control only
    pub const CTRL: Self = Self { ctrl: true, shift: false, alt: false };
    /// Shift only
    pub const SHIFT: Self = Self { ctrl: false, shift: true, alt: false };
    /// Alt only
    pub const ALT: Self = Self { ctrl: false, shift: false, alt: true };

    /// Whether any qualifier is held
    pub fn any(&self) -> bool {
        self.ctrl || self.shift || self.alt
    }
}

impl fmt::Display for Qualifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        write!(f, "{}", parts.join("+"))
    }
}
