//! Collaborator Commands
//!
//! Everything the core asks of the animation driver, movement driver and
//! VFX spawner. Commands queue on the actor and are drained by the scene
//! after each tick.

use serde::{Deserialize, Serialize};

use crate::combat::state::ActorId;
use crate::core::fixed::Fixed;
use crate::core::vec2::FixedVec2;

/// Animation trigger vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimTrigger {
    /// Light attack
    Light,
    /// Heavy attack
    Heavy,
    /// Whiffed attack
    Missed,
    /// Dodge roll
    Dodge,
}

impl AnimTrigger {
    /// Trigger name as the animation graph knows it.
    pub fn as_str(self) -> &'static str {
        match self {
            AnimTrigger::Light => "Light",
            AnimTrigger::Heavy => "Heavy",
            AnimTrigger::Missed => "Missed",
            AnimTrigger::Dodge => "Dodge",
        }
    }
}

/// Why a displacement was issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Per-tick stick movement
    Walk,
    /// Per-tick launch drive
    Launch,
    /// One-shot hit reaction
    Knockback,
}

/// Command payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandData {
    /// Fire an animation trigger
    Animation {
        /// Trigger to fire
        trigger: AnimTrigger,
    },

    /// Snap the animator to the idle pose
    PlayIdlePose,

    /// Move on the horizontal plane; the driver resolves collisions
    Move {
        /// Source of the movement
        kind: MoveKind,
        /// World units to move this tick
        displacement: FixedVec2,
    },

    /// Turn to face a horizontal direction
    Face {
        /// New facing (unit length)
        forward: FixedVec2,
    },

    /// Show or hide the parry shield
    Shield {
        /// True while the parry is active
        visible: bool,
    },

    /// Leave a fading afterimage at the actor's pose
    SpawnShadowClone {
        /// Opacity lost per second
        fade_speed: Fixed,
        /// Facing to freeze the afterimage at
        forward: FixedVec2,
    },
}

/// A command with the tick and actor that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Actor tick when issued
    pub tick: u32,
    /// Issuing actor
    pub actor: ActorId,
    /// Payload
    pub data: CommandData,
}

impl Command {
    /// Create a command.
    pub fn new(tick: u32, actor: ActorId, data: CommandData) -> Self {
        Self { tick, actor, data }
    }

    /// Animation trigger.
    pub fn animation(tick: u32, actor: ActorId, trigger: AnimTrigger) -> Self {
        Self::new(tick, actor, CommandData::Animation { trigger })
    }

    /// Displacement.
    pub fn movement(tick: u32, actor: ActorId, kind: MoveKind, displacement: FixedVec2) -> Self {
        Self::new(tick, actor, CommandData::Move { kind, displacement })
    }

    /// Animation trigger carried by this command, if any.
    pub fn trigger(&self) -> Option<AnimTrigger> {
        match self.data {
            CommandData::Animation { trigger } => Some(trigger),
            _ => None,
        }
    }

    /// Displacement carried by this command, if any.
    pub fn displacement(&self) -> Option<(MoveKind, FixedVec2)> {
        match self.data {
            CommandData::Move { kind, displacement } => Some((kind, displacement)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_names() {
        let names: Vec<_> = [AnimTrigger::Light, AnimTrigger::Heavy, AnimTrigger::Missed, AnimTrigger::Dodge]
            .iter()
            .map(|t| t.as_str())
            .collect();
        assert_eq!(names, ["Light", "Heavy", "Missed", "Dodge"]);
    }

    #[test]
    fn test_accessors() {
        let id = ActorId(1);
        let anim = Command::animation(3, id, AnimTrigger::Missed);
        assert_eq!(anim.trigger(), Some(AnimTrigger::Missed));
        assert_eq!(anim.displacement(), None);

        let step = Command::movement(3, id, MoveKind::Walk, FixedVec2::RIGHT);
        assert_eq!(step.displacement(), Some((MoveKind::Walk, FixedVec2::RIGHT)));
        assert_eq!(step.trigger(), None);
    }
}
