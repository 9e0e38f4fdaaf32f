//! # Beat Brawl Combat Core
//!
//! Deterministic rhythm-timed combat for one fighter: beat judging, the
//! combat state machine, parry timing and damage resolution.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    BEAT BRAWL CORE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── fixed.rs    - Q16.16 fixed-point arithmetic             │
//! │  ├── vec2.rs     - 2D vector (horizontal plane)              │
//! │  ├── vec3.rs     - World positions                           │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  rhythm/         - Beat sources                              │
//! │  ├── clock.rs    - RhythmClock trait, timing keys, leeway    │
//! │  └── metronome.rs- Constant-BPM clock                        │
//! │                                                              │
//! │  combat/         - Combat logic (deterministic)              │
//! │  ├── judge.rs    - Timing verdicts, combo window             │
//! │  ├── state.rs    - Combat state and capabilities             │
//! │  ├── parry.rs    - Parry active/cooldown timer               │
//! │  ├── damage.rs   - Hit resolution and knockback              │
//! │  ├── input.rs    - Per-tick input frame                      │
//! │  ├── commands.rs - Animation/movement/VFX commands           │
//! │  └── actor.rs    - The state machine                         │
//! │                                                              │
//! │  config.rs       - Actor tuning (JSON)                       │
//! │  replay.rs       - Scripted replay                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Tick logic never touches floats, system time or unseeded randomness.
//! Given the same script, config and tempo, a replay produces the
//! **identical state hash** on any platform.
//!
//! Actor time is a Q16.16 count of seconds held in 64 bits, so parry
//! deadlines stay exact however long a session runs.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod combat;
pub mod rhythm;
pub mod config;
pub mod error;
pub mod replay;

// Re-export commonly used types
pub use core::fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use core::vec2::FixedVec2;
pub use core::vec3::FixedVec3;
pub use combat::{ActorId, CombatActor, CombatState, Command, InputFrame, TickContext};
pub use config::ActorConfig;
pub use error::{CombatError, Result};
pub use rhythm::{Metronome, MetronomeConfig, RhythmClock};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
