//! Q16.16 Fixed-Point Arithmetic
//!
//! Deterministic fixed-point math for the combat simulation. Time, distance
//! and percentages are all carried as `Fixed`; floats only appear when a
//! value is loaded from configuration or converted for display.
//!
//! ## Format: Q16.16
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Bit Layout: Q16.16 (32-bit signed integer)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  [S][IIIIIIIIIIIIIIII][FFFFFFFFFFFFFFFF]                    │
//! │   │  └──── 16 bits ────┘└──── 16 bits ────┘                 │
//! │   └─ Sign bit                                               │
//! │                                                             │
//! │  Range: -32768.0 to +32767.99998 (approx)                   │
//! │  Precision: 1/65536 ≈ 0.000015 units                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Durations are seconds in Q16.16, so one second is `FIXED_ONE` and a
//! 60 Hz tick is `TICK_DURATION`.

/// Q16.16 fixed-point number stored as i32.
/// 16 bits integer, 16 bits fractional.
pub type Fixed = i32;

/// Number of fractional bits (16)
pub const FIXED_SCALE: i32 = 16;

/// 1.0 in fixed-point (65536)
pub const FIXED_ONE: Fixed = 1 << FIXED_SCALE; // 65536

/// 0.5 in fixed-point (32768)
pub const FIXED_HALF: Fixed = FIXED_ONE >> 1; // 32768

/// Maximum positive value
pub const FIXED_MAX: Fixed = i32::MAX;

/// Absolute time in Q16.16 seconds, widened to 64 bits.
///
/// A `Fixed` second count runs out after about nine hours; this does not.
pub type Timestamp = i64;

// =============================================================================
// TIMING CONSTANTS (All as integer literals - NO float conversion!)
// =============================================================================

/// Tick duration: 1/60 second = round(65536/60) = 1092
pub const TICK_DURATION: Fixed = 1092;

/// 100% as a fixed-point percentage: 100 * 65536 = 6553600
pub const PERCENT_100: Fixed = 100 << FIXED_SCALE;

/// Parry active phase: 0.1 second = round(0.1 * 65536) = 6554
pub const PARRY_ACTIVE_DURATION: Fixed = 6554;

/// Parry cooldown phase: 0.9 second, chosen so both phases sum to exactly 1.0
pub const PARRY_COOLDOWN_DURATION: Fixed = FIXED_ONE - PARRY_ACTIVE_DURATION; // 58982

/// Gamepad stick dead zone: 0.1 = 6553 (floor)
pub const DEFAULT_DEAD_ZONE: Fixed = 6553;

// =============================================================================
// CORE OPERATIONS (All deterministic, wrapping semantics)
// =============================================================================

/// Convert a float to fixed-point.
///
/// # Warning
/// Only use at compile-time or initialization (config loading). NEVER in
/// the tick loop.
///
/// # Example
/// ```
/// use beat_brawl::core::fixed::{to_fixed, FIXED_ONE};
/// const MY_VALUE: i32 = to_fixed(2.5);
/// assert_eq!(MY_VALUE, FIXED_ONE * 2 + FIXED_ONE / 2);
/// ```
#[inline]
pub const fn to_fixed(f: f64) -> Fixed {
    (f * (FIXED_ONE as f64)) as Fixed
}

/// Convert fixed-point to float for display/logging.
///
/// # Warning
/// Only use for visual output. NEVER use result in game logic.
#[inline]
pub fn to_float(f: Fixed) -> f32 {
    f as f32 / FIXED_ONE as f32
}

/// Convert a timestamp to float seconds for logging.
#[inline]
pub fn timestamp_to_float(t: Timestamp) -> f64 {
    t as f64 / FIXED_ONE as f64
}

/// Convert whole milliseconds to fixed-point seconds (floor).
#[inline]
pub const fn from_millis(ms: i32) -> Fixed {
    ((ms as i64 * FIXED_ONE as i64) / 1000) as Fixed
}

/// Multiply two fixed-point numbers.
///
/// Uses i64 intermediate to prevent overflow, then truncates.
#[inline]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    let wide = (a as i64) * (b as i64);
    (wide >> FIXED_SCALE) as Fixed
}

/// `part / whole * 100` as a fixed-point percentage.
///
/// Returns 0 for a zero `whole`; saturates at `FIXED_MAX` instead of
/// wrapping when `part` is far larger than `whole`.
#[inline]
pub fn percent_of(part: Fixed, whole: Fixed) -> Fixed {
    if whole == 0 {
        return 0;
    }
    let wide = ((part as i64) * 100 * (FIXED_ONE as i64)) / whole as i64;
    wide.clamp(i32::MIN as i64, FIXED_MAX as i64) as Fixed
}

/// Floor of the integer square root of a 64-bit value, digit by digit.
///
/// The root of a Q32.32 value is Q16.16, so squared lengths computed in
/// 64 bits go through here without losing range. Identical on every
/// platform.
pub fn isqrt_u64(mut value: u64) -> u64 {
    let mut result: u64 = 0;
    let mut bit: u64 = 1 << 62;
    while bit > value {
        bit >>= 2;
    }

    while bit != 0 {
        if value >= result + bit {
            value -= result + bit;
            result = (result >> 1) + bit;
        } else {
            result >>= 1;
        }
        bit >>= 2;
    }

    result
}

/// Absolute value of a fixed-point number.
#[inline]
pub fn fixed_abs(x: Fixed) -> Fixed {
    if x < 0 { x.wrapping_neg() } else { x }
}

// =============================================================================
// SERDE HELPERS
// =============================================================================

/// Serialize a `Fixed` as a float and read it back through `to_fixed`.
///
/// Lets config files say `0.1` instead of `6553`.
pub mod serde_float {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{to_fixed, to_float, Fixed};

    /// Serialize as f64.
    pub fn serialize<S: Serializer>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(to_float(*value) as f64)
    }

    /// Deserialize from f64.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Fixed, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(to_fixed(value))
    }
}

// =============================================================================
// TESTS
// =============================================================================
