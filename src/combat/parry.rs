//! Parry Window
//!
//! Two-deadline timer started by a parry request:
//!
//! ```text
//! start        active_until                     available_at
//!   ├──── active ────┼──────────── cooldown ─────────┤ ready
//!   shield shown     shield hidden
//! ```
//!
//! Deadlines are absolute actor times, checked by `update` once per tick.

use serde::{Deserialize, Serialize};

use crate::core::fixed::{Fixed, Timestamp, PARRY_ACTIVE_DURATION, PARRY_COOLDOWN_DURATION};

/// Phase lengths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParryTimings {
    /// Damage-immune phase
    pub active: Fixed,
    /// Lockout after the active phase
    pub cooldown: Fixed,
}

impl Default for ParryTimings {
    fn default() -> Self {
        Self {
            active: PARRY_ACTIVE_DURATION,
            cooldown: PARRY_COOLDOWN_DURATION,
        }
    }
}

/// Where the timer is at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParryPhase {
    /// A parry may start
    Ready,
    /// Active phase running
    Active,
    /// Waiting out the cooldown
    Cooldown,
}

/// Deadline crossed during `update`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParryTransition {
    /// Active phase ended; hide the shield
    ActiveEnded,
}

/// Parry availability timer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParryWindow {
    active: bool,
    active_until: Timestamp,
    available_at: Timestamp,
    timings: ParryTimings,
}

impl ParryWindow {
    /// Create an idle window with the given phase lengths.
    pub fn new(timings: ParryTimings) -> Self {
        Self {
            active: false,
            active_until: 0,
            available_at: 0,
            timings,
        }
    }

    /// Can a parry start at `now`?
    #[inline]
    pub fn is_available(&self, now: Timestamp) -> bool {
        !self.active && now >= self.available_at
    }

    /// Is the active phase running?
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Instant the active phase ends.
    #[inline]
    pub fn active_until(&self) -> Timestamp {
        self.active_until
    }

    /// Instant a new parry becomes legal.
    #[inline]
    pub fn available_at(&self) -> Timestamp {
        self.available_at
    }

    /// Phase at `now`.
    pub fn phase(&self, now: Timestamp) -> ParryPhase {
        if self.active {
            ParryPhase::Active
        } else if now < self.available_at {
            ParryPhase::Cooldown
        } else {
            ParryPhase::Ready
        }
    }

    /// Start a parry. Returns false (and changes nothing) if unavailable.
    pub fn try_start(&mut self, now: Timestamp) -> bool {
        if !self.is_available(now) {
            return false;
        }
        self.active = true;
        self.active_until = now.saturating_add(i64::from(self.timings.active));
        self.available_at = self.active_until.saturating_add(i64::from(self.timings.cooldown));
        true
    }

    /// Evaluate deadlines at `now`.
    pub fn update(&mut self, now: Timestamp) -> Option<ParryTransition> {
        if self.active && now >= self.active_until {
            self.active = false;
            return Some(ParryTransition::ActiveEnded);
        }
        None
    }
}
