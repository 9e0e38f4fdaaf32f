//! Scripted Replay
//!
//! A `Script` records, per tick, the input frame and the collaborator
//! signals that arrived before that tick. Replaying it against a fresh
//! actor and metronome must give the same final state hash every time.
//!
//! The replay plays the movement driver too: every `Move` command is
//! applied to the actor's position with no collision.

use serde::{Deserialize, Serialize};
use tracing::debug;
use std::rc::Rc;

use crate::combat::actor::{CombatActor, TickContext};
use crate::combat::commands::Command;
use crate::combat::damage::HitEvent;
use crate::combat::input::InputFrame;
use crate::combat::state::ActorId;
use crate::config::ActorConfig;
use crate::core::fixed::{Fixed, TICK_DURATION};
use crate::core::hash::{StateHash, StateHasher};
use crate::core::vec3::FixedVec3;
use crate::error::Result;
use crate::rhythm::metronome::{Metronome, MetronomeConfig};

/// Actor id used for replays.
pub const REPLAY_ACTOR: ActorId = ActorId(0);

/// Collaborator signal delivered before a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    /// Animation cancel point
    CancelPoint,
    /// Attack animation finished
    AttackEnd,
    /// Animation allows movement
    MoveAllowed,
    /// Launch backwards
    Launch {
        /// Launch speed (units per second)
        units: Fixed,
    },
    /// Launch finished
    EndLaunch,
    /// Open a combo window
    OpenComboWindow {
        /// Window length in eighth notes
        eighth_notes: u32,
    },
    /// Spawn an afterimage
    ShadowClone {
        /// Opacity lost per second
        fade_speed: Fixed,
    },
    /// Incoming hit
    Hit(HitEvent),
}

/// One recorded tick.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Input for the tick
    pub input: InputFrame,
    /// Signals applied before the tick, in order
    pub signals: Vec<Signal>,
}

impl ScriptStep {
    /// Step with input only.
    pub fn input(input: InputFrame) -> Self {
        Self { input, signals: Vec::new() }
    }

    /// Builder: add a signal.
    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signals.push(signal);
        self
    }
}

/// A recorded combat sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Step length
    pub dt: Fixed,
    /// Actor start position
    pub start_position: FixedVec3,
    /// Other actors (static for the whole script)
    pub opponents: Vec<FixedVec3>,
    /// Per-tick steps
    pub steps: Vec<ScriptStep>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            dt: TICK_DURATION,
            start_position: FixedVec3::ZERO,
            opponents: Vec::new(),
            steps: Vec::new(),
        }
    }
}

impl Script {
    /// Append a step.
    pub fn push(&mut self, step: ScriptStep) {
        self.steps.push(step);
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Decode from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Hash of the encoded script.
    pub fn compute_hash(&self) -> Result<StateHash> {
        let mut hasher = StateHasher::for_script();
        hasher.update_bytes(&self.to_bytes()?);
        Ok(hasher.finalize())
    }
}

/// Result of a replay.
#[derive(Debug)]
pub struct ReplayOutcome {
    /// Actor state hash after the last step
    pub final_hash: StateHash,
    /// Every command the actor emitted
    pub commands: Vec<Command>,
    /// Final position after applying all displacements
    pub position: FixedVec3,
    /// Final hit points
    pub hp: i32,
    /// Arrow requests the metronome received
    pub arrows: usize,
}

/// Replay `script` against a fresh actor and metronome.
pub fn replay(
    actor_config: &ActorConfig,
    metronome_config: &MetronomeConfig,
    script: &Script,
) -> Result<ReplayOutcome> {
    let metronome = Rc::new(Metronome::new(metronome_config)?);
    let mut actor = CombatActor::builder(REPLAY_ACTOR)
        .config(actor_config.clone())
        .clock(metronome.clone())
        .build()?;

    let mut position = script.start_position;
    let mut commands = Vec::new();
    let mut arrows = 0;

    for step in &script.steps {
        metronome.advance(script.dt);

        for signal in &step.signals {
            apply_signal(&mut actor, signal, position);
        }

        let ctx = TickContext {
            dt: script.dt,
            position,
            others: &script.opponents,
        };
        let result = actor.tick(&step.input, &ctx);

        for command in &result.commands {
            if let Some((_, displacement)) = command.displacement() {
                position = position.offset_horizontal(displacement);
            }
        }
        commands.extend(result.commands);
        arrows += metronome.take_arrows().len();
    }

    debug!(
        "Replayed {} steps, {} commands, hp {}",
        script.steps.len(),
        commands.len(),
        actor.hp()
    );

    Ok(ReplayOutcome {
        final_hash: actor.compute_hash(),
        commands,
        position,
        hp: actor.hp(),
        arrows,
    })
}

fn apply_signal(actor: &mut CombatActor, signal: &Signal, position: FixedVec3) {
    match *signal {
        Signal::CancelPoint => {
            actor.anim_cancel_point();
        }
        Signal::AttackEnd => {
            actor.anim_attack_end();
        }
        Signal::MoveAllowed => actor.anim_move_allowed(),
        Signal::Launch { units } => actor.request_launch(units),
        Signal::EndLaunch => {
            actor.end_launch();
        }
        Signal::OpenComboWindow { eighth_notes } => actor.open_combo_window(eighth_notes),
        Signal::ShadowClone { fade_speed } => actor.spawn_shadow_clone(fade_speed),
        Signal::Hit(hit) => {
            actor.receive_hit(&hit, position);
        }
    }
}
