//! Combat logic (deterministic).
//!
//! Everything an actor needs between "button pressed" and "command for the
//! animation driver": beat judging, the state machine, parry timing and
//! damage resolution.
//!
//! ## Module Structure
//!
//! - `state`: Combat state, capability flags, actor ids
//! - `judge`: Beat timing classification and the combo window
//! - `parry`: Parry active/cooldown timer
//! - `damage`: Hit resolution
//! - `commands`: Commands for the animation, movement and VFX drivers
//! - `input`: Per-tick input frame
//! - `actor`: The state machine tying it together

pub mod state;
pub mod judge;
pub mod parry;
pub mod damage;
pub mod commands;
pub mod input;
pub mod actor;

pub use actor::{CombatActor, CombatActorBuilder, TickContext, TickResult};
pub use commands::{AnimTrigger, Command, CommandData, MoveKind};
pub use damage::{DamageOutcome, HitEvent};
pub use input::{Button, InputFrame};
pub use judge::{ComboWindow, TimingQuality, Verdict};
pub use parry::{ParryPhase, ParryTimings, ParryWindow};
pub use state::{ActorId, AttackKind, Capabilities, CombatState};
