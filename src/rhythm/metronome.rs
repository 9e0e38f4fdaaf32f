//! Fixed-Tempo Rhythm Clock
//!
//! A constant-BPM clock. The scene advances it once per tick before the
//! actors run; actors read it through a `ClockHandle`.
//!
//! The timing key is derived from how far into the current beat the clock
//! is, bucketed with the same leeways the judge uses.

use std::cell::{Cell, RefCell};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::fixed::{self, percent_of, Fixed, FIXED_ONE, PERCENT_100};
use crate::error::{CombatError, Result};
use crate::rhythm::clock::{BeatQuality, Leeway, RhythmClock, TimingKey};

/// Metronome configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetronomeConfig {
    /// Beats per minute
    pub bpm: u32,
    /// Normal leeway (% of beat)
    #[serde(with = "fixed::serde_float")]
    pub normal_leeway_percent: Fixed,
    /// Perfect leeway (% of beat)
    #[serde(with = "fixed::serde_float")]
    pub perfect_leeway_percent: Fixed,
}

impl Default for MetronomeConfig {
    fn default() -> Self {
        let leeway = Leeway::from_percent(20, 60);
        Self {
            bpm: 120,
            normal_leeway_percent: leeway.normal,
            perfect_leeway_percent: leeway.perfect,
        }
    }
}

impl MetronomeConfig {
    /// Parse from JSON and validate.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges: `0 < bpm <= 3600`, `0 <= normal <= perfect <= 100`.
    pub fn validate(&self) -> Result<()> {
        if self.bpm == 0 || self.bpm > 3600 {
            return Err(CombatError::InvalidConfig(format!(
                "bpm must be in 1..=3600, got {}",
                self.bpm
            )));
        }
        let (n, p) = (self.normal_leeway_percent, self.perfect_leeway_percent);
        if n < 0 || n > p || p > PERCENT_100 {
            return Err(CombatError::InvalidConfig(format!(
                "leeway must satisfy 0 <= normal <= perfect <= 100, got {} / {}",
                fixed::to_float(n),
                fixed::to_float(p)
            )));
        }
        Ok(())
    }

    /// Leeway thresholds.
    pub fn leeway(&self) -> Leeway {
        Leeway {
            normal: self.normal_leeway_percent,
            perfect: self.perfect_leeway_percent,
        }
    }
}

/// Beat marker requested by an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrowRequest {
    /// Beat index when the request arrived
    pub beat: u32,
    /// Window the marker spans
    pub window: Fixed,
    /// Offset from now
    pub offset: Fixed,
}

/// Constant-tempo clock.
#[derive(Debug)]
pub struct Metronome {
    leeway: Leeway,
    beat_length: Fixed,
    /// Time into the current beat
    phase: Cell<Fixed>,
    /// Beats completed
    beat: Cell<u32>,
    arrows: RefCell<Vec<ArrowRequest>>,
}

impl Metronome {
    /// Create a metronome at beat 0.
    pub fn new(config: &MetronomeConfig) -> Result<Self> {
        config.validate()?;
        let beat_length = (60 * FIXED_ONE) / config.bpm as Fixed;
        Ok(Self {
            leeway: config.leeway(),
            beat_length,
            phase: Cell::new(0),
            beat: Cell::new(0),
            arrows: RefCell::new(Vec::new()),
        })
    }

    /// Advance by one tick.
    pub fn advance(&self, dt: Fixed) {
        let mut phase = self.phase.get().saturating_add(dt.max(0));
        let mut beat = self.beat.get();
        while phase >= self.beat_length {
            phase -= self.beat_length;
            beat = beat.wrapping_add(1);
        }
        self.phase.set(phase);
        self.beat.set(beat);
    }

    /// Beats completed so far.
    pub fn beat(&self) -> u32 {
        self.beat.get()
    }

    /// Time into the current beat.
    pub fn phase(&self) -> Fixed {
        self.phase.get()
    }

    /// Drain queued arrow requests (for the track renderer).
    pub fn take_arrows(&self) -> Vec<ArrowRequest> {
        self.arrows.take()
    }
}

impl RhythmClock for Metronome {
    fn beat_length(&self) -> Fixed {
        self.beat_length
    }

    fn timing_key(&self) -> TimingKey {
        let pct = percent_of(self.phase.get(), self.beat_length);
        if pct < self.leeway.normal {
            TimingKey::Miss
        } else if pct < self.leeway.perfect {
            TimingKey::Beat(BeatQuality::Early)
        } else {
            TimingKey::Beat(BeatQuality::Perfect)
        }
    }

    fn leeway(&self) -> Leeway {
        self.leeway
    }

    fn request_arrow_spawn(&self, window: Fixed, offset: Fixed) {
        let request = ArrowRequest {
            beat: self.beat.get(),
            window,
            offset,
        };
        debug!(beat = request.beat, window = fixed::to_float(window), "arrow requested");
        self.arrows.borrow_mut().push(request);
    }
}
