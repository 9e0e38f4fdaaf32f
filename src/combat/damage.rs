//! Damage Resolution
//!
//! Turns an incoming hit into an HP delta, a stun duration and a knockback
//! displacement. Parrying actors take nothing.

use serde::{Deserialize, Serialize};

use crate::combat::state::CombatState;
use crate::core::fixed::Fixed;
use crate::core::vec2::FixedVec2;
use crate::core::vec3::FixedVec3;

/// A hit delivered by the collision/animation system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitEvent {
    /// HP to remove
    pub damage: i32,
    /// Stun duration (seconds)
    pub hit_stun: Fixed,
    /// Knockback distance
    pub knockback: Fixed,
    /// Hitbox position
    pub source_position: FixedVec3,
}

/// Effects of a hit that landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDamage {
    /// Signed HP change (negative for damage)
    pub hp_delta: i32,
    /// Stun countdown to install
    pub hit_stun: Fixed,
    /// One-shot horizontal displacement
    pub knockback: FixedVec2,
}

/// Resolution result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Parried: nothing applies
    NoEffect,
    /// Hit landed
    Applied(AppliedDamage),
}

impl DamageOutcome {
    /// Did the hit land?
    pub fn is_applied(&self) -> bool {
        matches!(self, DamageOutcome::Applied(_))
    }
}

/// Resolve a hit against an actor in `state` at `actor_position`.
///
/// Knockback points from the hitbox to the actor on the horizontal plane.
/// A hitbox directly above or below the actor gives zero knockback.
pub fn resolve(hit: &HitEvent, state: CombatState, actor_position: FixedVec3) -> DamageOutcome {
    if state == CombatState::Parrying {
        return DamageOutcome::NoEffect;
    }

    let away = actor_position.horizontal() - hit.source_position.horizontal();
    let knockback = away.normalize().scale(hit.knockback);

    DamageOutcome::Applied(AppliedDamage {
        hp_delta: hit.damage.saturating_neg(),
        hit_stun: hit.hit_stun.max(0),
        knockback,
    })
}
