//! Windowing-independent input events.
//!
//! The embedding layer translates its own pointer and wheel events into these
//! values. Coordinates are window pixels with `y` growing downwards.

use crate::Real;

/// Pressed pointer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons {
    pub primary: bool,
    pub secondary: bool,
}

impl Buttons {
    pub const PRIMARY: Buttons = Buttons {
        primary: true,
        secondary: false,
    };
    pub const SECONDARY: Buttons = Buttons {
        primary: false,
        secondary: true,
    };

    /// Only the primary button is held
    pub fn is_primary_only(self) -> bool {
        self == Self::PRIMARY
    }

    /// Only the secondary button is held
    pub fn is_secondary_only(self) -> bool {
        self == Self::SECONDARY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const CTRL: Modifiers = Modifiers { ctrl: true, shift: false };
    pub const SHIFT: Modifiers = Modifiers { ctrl: false, shift: true };
}

/// Pointer press, move or release
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub x: Real,
    pub y: Real,
    /// Movement since the previous event, only meaningful while dragging
    pub delta_x: Real,
    pub delta_y: Real,
    /// A button went down and has not been released yet
    pub dragging: bool,
    pub buttons: Buttons,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Primary press at `(x, y)` without modifiers
    pub fn primary(x: Real, y: Real) -> Self {
        Self {
            x,
            y,
            buttons: Buttons::PRIMARY,
            ..Default::default()
        }
    }

    pub fn secondary(x: Real, y: Real) -> Self {
        Self {
            x,
            y,
            buttons: Buttons::SECONDARY,
            ..Default::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Turns the event into a drag step ending at `(x, y)`
    pub fn dragged_to(mut self, x: Real, y: Real) -> Self {
        self.delta_x = x - self.x;
        self.delta_y = y - self.y;
        self.x = x;
        self.y = y;
        self.dragging = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelEvent {
    pub delta: Real,
    pub modifiers: Modifiers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_masks_are_exact() {
        let both = Buttons {
            primary: true,
            secondary: true,
        };
        assert!(!both.is_primary_only());
        assert!(!both.is_secondary_only());
        assert!(Buttons::PRIMARY.is_primary_only());
    }

    #[test]
    fn test_drag_step_records_deltas() {
        let event = PointerEvent::primary(10.0, 20.0).dragged_to(13.0, 15.0);
        assert!(event.dragging);
        assert_eq!((event.delta_x, event.delta_y), (3.0, -5.0));
    }
}
