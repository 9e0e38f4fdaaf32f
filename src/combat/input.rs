//! Input Capture and Normalization
//!
//! Per-tick input from the input source: move stick, aim stick, button
//! presses and the active control scheme.
//! Uses lookup table (MOVE_LUT) for exact i8 to Fixed conversion.

use serde::{Deserialize, Serialize};
use crate::core::fixed::Fixed;
use crate::core::vec2::FixedVec2;

// =============================================================================
// MOVE LOOKUP TABLE
// =============================================================================

/// Lookup table for converting i8 stick input to Fixed.
///
/// Converting i8 [-127..+127] to Fixed [-1.0..+1.0] requires
/// `value * 65536 / 127`, which is not an integer; floor division is
/// precomputed for all 256 values.
///
/// Index 128 (-128 as i8) = 0 (represents "no input" / stick released)
pub static MOVE_LUT: [Fixed; 256] = {
    let mut lut = [0i32; 256];
    let mut i = 0i32;
    while i < 256 {
        // Treat as signed: 0..127 = positive, 128..255 = negative (-128..-1)
        let signed = if i < 128 { i } else { i - 256 };

        if signed == -128 {
            lut[i as usize] = 0;
        } else {
            lut[i as usize] = (signed * 65536) / 127;
        }
        i += 1;
    }
    lut
};

/// Convert i8 stick input to Fixed using lookup table.
#[inline]
pub fn stick_to_fixed(input: i8) -> Fixed {
    MOVE_LUT[(input as u8) as usize]
}

// =============================================================================
// BUTTONS
// =============================================================================

/// Discrete button presses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Button {
    /// Light attack
    Attack1 = 0x01,
    /// Heavy attack
    Attack2 = 0x02,
    /// Parry
    Parry = 0x04,
    /// Dodge
    Dodge = 0x08,
}

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Raw input state for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
pub struct InputFrame {
    /// Move stick X: -127 (left) to +127 (right), -128 = released
    pub move_x: i8,
    /// Move stick Y: -127 (back) to +127 (forward), -128 = released
    pub move_y: i8,
    /// Aim stick X
    pub aim_x: i8,
    /// Aim stick Y
    pub aim_y: i8,
    /// Packed flags:
    /// - Bits 0-3: buttons pressed this tick (see `Button`)
    /// - Bit 4: a directional device (gamepad) is the active scheme
    /// - Bits 5-7: reserved
    pub flags: u8,
}

impl InputFrame {
    /// Special value indicating a released stick
    pub const NO_INPUT: i8 = -128;

    /// Directional device flag bit
    pub const FLAG_DIRECTIONAL: u8 = 0x10;

    const BUTTON_MASK: u8 = 0x0F;

    /// Create an empty frame (sticks released, nothing pressed).
    pub const fn new() -> Self {
        Self {
            move_x: Self::NO_INPUT,
            move_y: Self::NO_INPUT,
            aim_x: Self::NO_INPUT,
            aim_y: Self::NO_INPUT,
            flags: 0,
        }
    }

    /// Create input with a move stick direction.
    pub const fn with_movement(move_x: i8, move_y: i8) -> Self {
        Self {
            move_x,
            move_y,
            aim_x: Self::NO_INPUT,
            aim_y: Self::NO_INPUT,
            flags: 0,
        }
    }

    /// Builder: set the aim stick.
    pub const fn aiming(mut self, aim_x: i8, aim_y: i8) -> Self {
        self.aim_x = aim_x;
        self.aim_y = aim_y;
        self
    }

    /// Builder: press a button.
    pub const fn pressing(mut self, button: Button) -> Self {
        self.flags |= button as u8;
        self
    }

    /// Builder: mark the directional device as active.
    pub const fn on_gamepad(mut self) -> Self {
        self.flags |= Self::FLAG_DIRECTIONAL;
        self
    }

    /// Move stick as FixedVec2.
    #[inline]
    pub fn move_direction(&self) -> FixedVec2 {
        FixedVec2 {
            x: stick_to_fixed(self.move_x),
            y: stick_to_fixed(self.move_y),
        }
    }

    /// Aim stick as FixedVec2.
    #[inline]
    pub fn aim_direction(&self) -> FixedVec2 {
        FixedVec2 {
            x: stick_to_fixed(self.aim_x),
            y: stick_to_fixed(self.aim_y),
        }
    }

    /// Was `button` pressed this tick?
    #[inline]
    pub fn pressed(&self, button: Button) -> bool {
        self.flags & button as u8 != 0
    }

    /// Any button pressed this tick?
    #[inline]
    pub fn any_pressed(&self) -> bool {
        self.flags & Self::BUTTON_MASK != 0
    }

    /// Is a directional device the active control scheme?
    #[inline]
    pub fn uses_directional_device(&self) -> bool {
        self.flags & Self::FLAG_DIRECTIONAL != 0
    }
}
