//! Raw pointer input, normalized across mouse and touch.

use kurbo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
        /// Simultaneous touch contacts; 0 for mouse input.
        touches: u8,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => *position,
        }
    }

    /// Whether this press starts a canvas pan rather than an item gesture:
    /// middle button, ctrl + left button, or a two-finger touch.
    pub fn is_pan_trigger(&self) -> bool {
        match self {
            PointerEvent::Down {
                button,
                modifiers,
                touches,
                ..
            } => {
                *button == MouseButton::Middle
                    || (*button == MouseButton::Left && modifiers.ctrl)
                    || *touches >= 2
            }
            _ => false,
        }
    }

    pub fn down(position: Point) -> Self {
        PointerEvent::Down {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
            touches: 0,
        }
    }
}
