//! Core deterministic primitives.
//!
//! Every type here is integer-backed so that a recorded combat script
//! replays to the identical actor state on any platform.

pub mod fixed;
pub mod vec2;
pub mod vec3;
pub mod hash;

// Re-export core types
pub use fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE, TICK_DURATION};
pub use vec2::FixedVec2;
pub use vec3::FixedVec3;
pub use hash::{StateHash, StateHasher};
