//! Beat Timing Judge
//!
//! Classifies when an attack input lands relative to the rhythm.
//!
//! With a combo window open, the verdict comes from how far through the
//! window the input arrived:
//!
//! ```text
//! 0%          normal        perfect        100%
//! ├── miss ─────┼──── early ────┼── perfect ───┼── early (wraps) ──▶
//! ```
//!
//! With no window open, the rhythm clock's own key is the verdict.

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::core::fixed::{percent_of, Fixed, PERCENT_100};
use crate::rhythm::clock::{Leeway, TimingKey};

/// Retained timing quality of the last attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TimingQuality {
    /// Landed in the late part of the window
    Perfect = 0,
    /// Landed between the normal and perfect leeway, or past the window
    Early = 1,
    /// Landed with no beat to count against
    Miss = 2,
}

impl TimingQuality {
    /// Key string used by rhythm clocks.
    pub fn as_str(self) -> &'static str {
        match self {
            TimingQuality::Perfect => "Perfect",
            TimingQuality::Early => "Early",
            TimingQuality::Miss => "Miss",
        }
    }
}

impl fmt::Display for TimingQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of judging one attack input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Input counted with this quality
    Judged(TimingQuality),
    /// Input did not count at all: no beat active, or too early in the window
    SpecialMiss,
}

impl Verdict {
    /// Quality to retain for this verdict.
    pub fn quality(self) -> TimingQuality {
        match self {
            Verdict::Judged(q) => q,
            Verdict::SpecialMiss => TimingQuality::Miss,
        }
    }

    /// True for `SpecialMiss`.
    pub fn is_special_miss(self) -> bool {
        matches!(self, Verdict::SpecialMiss)
    }
}

/// Classify an input.
///
/// `max_window == 0` means no combo window is open; the clock key decides.
pub fn classify(elapsed: Fixed, max_window: Fixed, leeway: Leeway, clock_key: TimingKey) -> Verdict {
    if max_window == 0 {
        return match clock_key {
            TimingKey::Miss => Verdict::SpecialMiss,
            TimingKey::Beat(quality) => Verdict::Judged(quality.into()),
        };
    }

    let beat_percent = percent_of(elapsed, max_window);

    if beat_percent < leeway.normal {
        Verdict::SpecialMiss
    } else if beat_percent < leeway.perfect {
        Verdict::Judged(TimingQuality::Early)
    } else if beat_percent < PERCENT_100 {
        Verdict::Judged(TimingQuality::Perfect)
    } else {
        Verdict::Judged(TimingQuality::Early)
    }
}

// =============================================================================
// COMBO WINDOW
// =============================================================================

/// Window opened by an attack animation for the follow-up input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboWindow {
    /// Time since the window opened
    pub elapsed: Fixed,
    /// Window length (0 = closed)
    pub max_window: Fixed,
}

impl ComboWindow {
    /// Is a window open?
    #[inline]
    pub fn is_open(&self) -> bool {
        self.max_window != 0
    }

    /// Open a fresh window of the given length.
    pub fn open(&mut self, max_window: Fixed) {
        self.elapsed = 0;
        self.max_window = max_window;
    }

    /// Close the window.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance elapsed time; no-op while closed.
    #[inline]
    pub fn accumulate(&mut self, dt: Fixed) {
        if self.is_open() {
            self.elapsed = self.elapsed.saturating_add(dt);
        }
    }

    /// Judge an input against this window.
    pub fn classify(&self, leeway: Leeway, clock_key: TimingKey) -> Verdict {
        classify(self.elapsed, self.max_window, leeway, clock_key)
    }
}
