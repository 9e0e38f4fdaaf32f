//! Combat State Definitions
//!
//! One tagged state per actor plus a small set of independent capability
//! flags. Hit stun is tracked as a countdown on the actor, not here.

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::combat::commands::AnimTrigger;

// =============================================================================
// ACTOR ID
// =============================================================================

/// Actor identifier, as assigned by the owning scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

// =============================================================================
// COMBAT STATE
// =============================================================================

/// Mutually exclusive combat state.
///
/// The actor never stores `Stunned`; it is reported by `CombatActor::state()`
/// while the hit-stun countdown is running, on top of whatever state the
/// hit left behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CombatState {
    /// Free to move, rotate and act
    #[default]
    Idle = 0,
    /// Attack animation in progress
    Attacking = 1,
    /// Parry active phase (damage immune)
    Parrying = 2,
    /// Driven backwards by a launch
    Launching = 3,
    /// Hit stun overlay
    Stunned = 4,
}

impl CombatState {
    /// Idle is the only state that allows rotation.
    #[inline]
    pub fn is_free(self) -> bool {
        self == CombatState::Idle
    }
}

/// Attack button variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    /// `Attack1`
    Light,
    /// `Attack2`
    Heavy,
}

impl AttackKind {
    /// Animation trigger for an attack that landed in time.
    pub fn trigger(self) -> AnimTrigger {
        match self {
            AttackKind::Light => AnimTrigger::Light,
            AttackKind::Heavy => AnimTrigger::Heavy,
        }
    }
}

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Independent flags layered on top of `CombatState`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Set when an attack starts, cleared at the animation's cancel point.
    /// While clear, an `Attacking` actor may walk and chain the next attack.
    pub blocked: bool,

    /// Set by the animation driver's move-allowed signal.
    pub can_move: bool,

    /// Dodge in progress. While set, further dodges are rejected. Dodge
    /// has no duration, so the actor never sets it on its own.
    pub dodging: bool,
}

impl Capabilities {
    /// Clear everything an attack sets up.
    #[inline]
    pub fn clear_attack(&mut self) {
        self.blocked = false;
        self.can_move = false;
    }
}
