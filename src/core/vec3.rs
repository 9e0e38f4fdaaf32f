//! Fixed-Point World Position
//!
//! Actor and hitbox positions as published by the movement driver.
//! Combat math only ever needs the horizontal projection.

use std::fmt;
use serde::{Deserialize, Serialize};

use super::fixed::{Fixed, FIXED_ONE};
use super::vec2::FixedVec2;

/// 3D point with fixed-point components (Y up).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FixedVec3 {
    /// X component
    pub x: Fixed,
    /// Y component (height)
    pub y: Fixed,
    /// Z component
    pub z: Fixed,
}

impl FixedVec3 {
    /// Origin
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    /// Create from fixed-point components.
    #[inline]
    pub const fn new(x: Fixed, y: Fixed, z: Fixed) -> Self {
        Self { x, y, z }
    }

    /// Lift a horizontal-plane vector to a point at the given height.
    #[inline]
    pub const fn from_horizontal(v: FixedVec2, height: Fixed) -> Self {
        Self { x: v.x, y: height, z: v.y }
    }

    /// Project onto the horizontal plane (drops height).
    #[inline]
    pub const fn horizontal(self) -> FixedVec2 {
        FixedVec2 { x: self.x, y: self.z }
    }

    /// Translate along the horizontal plane, keeping height.
    #[inline]
    pub fn offset_horizontal(self, delta: FixedVec2) -> Self {
        Self {
            x: self.x.wrapping_add(delta.x),
            y: self.y,
            z: self.z.wrapping_add(delta.y),
        }
    }
}

impl fmt::Debug for FixedVec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = FIXED_ONE as f32;
        write!(f, "Vec3({:.3}, {:.3}, {:.3})", self.x as f32 / s, self.y as f32 / s, self.z as f32 / s)
    }
}
