//! Rhythm sources.
//!
//! `clock` defines what an actor reads from the beat; `metronome` is a
//! constant-tempo implementation for tools, tests and replays.

pub mod clock;
pub mod metronome;

pub use clock::{BeatQuality, ClockHandle, Leeway, RhythmClock, TimingKey};
pub use metronome::{ArrowRequest, Metronome, MetronomeConfig};
