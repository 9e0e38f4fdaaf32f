//! Rhythm Clock Interface
//!
//! The rhythm clock is owned by the scene and shared read-only by every
//! actor. Actors receive a handle at construction instead of looking one up.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::combat::judge::TimingQuality;
use crate::core::fixed::{Fixed, FIXED_SCALE};
use crate::error::CombatError;

/// Quality a beat can award. A beat never awards a miss; that is
/// `TimingKey::Miss`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeatQuality {
    /// On the beat
    Perfect,
    /// Inside the beat but early
    Early,
}

impl From<BeatQuality> for TimingQuality {
    fn from(quality: BeatQuality) -> Self {
        match quality {
            BeatQuality::Perfect => TimingQuality::Perfect,
            BeatQuality::Early => TimingQuality::Early,
        }
    }
}

/// Timing key published by the clock for the current instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimingKey {
    /// No beat is active
    Miss,
    /// A beat is active and an input now would land with this quality
    Beat(BeatQuality),
}

impl FromStr for TimingKey {
    type Err = CombatError;

    /// Parse the string keys used by external rhythm sources.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Miss" => Ok(TimingKey::Miss),
            "Early" => Ok(TimingKey::Beat(BeatQuality::Early)),
            "Perfect" => Ok(TimingKey::Beat(BeatQuality::Perfect)),
            other => Err(CombatError::UnknownTimingKey(other.to_string())),
        }
    }
}

impl fmt::Display for TimingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TimingKey::Miss => f.write_str("Miss"),
            TimingKey::Beat(q) => write!(f, "{}", TimingQuality::from(q)),
        }
    }
}

/// Leeway thresholds as fixed-point percentages of a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leeway {
    /// Below this an input does not count
    pub normal: Fixed,
    /// At or above this an input is perfect
    pub perfect: Fixed,
}

impl Leeway {
    /// Build from whole percentages.
    pub const fn from_percent(normal: i32, perfect: i32) -> Self {
        Self {
            normal: normal << FIXED_SCALE,
            perfect: perfect << FIXED_SCALE,
        }
    }
}

/// Read-only view of the shared rhythm source.
pub trait RhythmClock {
    /// Length of one beat (seconds, Q16.16).
    fn beat_length(&self) -> Fixed;

    /// Timing key for the current instant.
    fn timing_key(&self) -> TimingKey;

    /// Normal and perfect leeway percentages.
    fn leeway(&self) -> Leeway;

    /// Ask the clock to show a beat marker for an upcoming window.
    /// Fire-and-forget.
    fn request_arrow_spawn(&self, window: Fixed, offset: Fixed);
}

/// Shared handle to a rhythm clock.
pub type ClockHandle = Rc<dyn RhythmClock>;
