//! Beat Brawl Demo
//!
//! Runs a scripted duel against the combat core and checks that replaying
//! the same script reproduces the same state hash.
//!
//! Usage: `beat-brawl [actor-config.json] [metronome-config.json]`

use std::fs;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use beat_brawl::{
    ActorConfig, MetronomeConfig, TICK_RATE, VERSION,
    combat::{AnimTrigger, Button, CommandData, HitEvent, InputFrame},
    core::fixed::{to_fixed, to_float, FIXED_ONE},
    core::vec3::FixedVec3,
    replay::{replay, Script, ScriptStep, Signal},
};

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Beat Brawl v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let mut args = std::env::args().skip(1);
    let actor_config = match args.next() {
        Some(path) => {
            let json = fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
            ActorConfig::from_json_str(&json).with_context(|| format!("parsing {}", path))?
        }
        None => ActorConfig::default(),
    };
    let metronome_config = match args.next() {
        Some(path) => {
            let json = fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
            MetronomeConfig::from_json_str(&json).with_context(|| format!("parsing {}", path))?
        }
        None => MetronomeConfig::default(),
    };

    demo_duel(&actor_config, &metronome_config)
}

/// Two seconds of a duel: walk in, parry a hit, chain a combo on the beat,
/// eat a hit and get launched.
fn build_script() -> Script {
    let mut script = Script {
        opponents: vec![FixedVec3::new(0, 0, to_fixed(4.0))],
        ..Default::default()
    };

    let hit = HitEvent {
        damage: 3,
        hit_stun: to_fixed(0.3),
        knockback: to_fixed(0.5),
        source_position: FixedVec3::new(0, FIXED_ONE, to_fixed(4.0)),
    };

    for t in 0..TICK_RATE * 2 {
        let mut step = ScriptStep::input(InputFrame::with_movement(0, 100));
        match t {
            10 => step.input = step.input.pressing(Button::Parry),
            12 => step = step.with_signal(Signal::Hit(hit)),
            40 => step.input = step.input.pressing(Button::Attack1),
            50 => step = step.with_signal(Signal::OpenComboWindow { eighth_notes: 2 }),
            60 => step = step.with_signal(Signal::CancelPoint),
            62 => step.input = step.input.pressing(Button::Attack2),
            75 => step = step.with_signal(Signal::AttackEnd),
            80 => step = step.with_signal(Signal::Hit(hit)),
            100 => {
                step = step
                    .with_signal(Signal::ShadowClone { fade_speed: to_fixed(2.0) })
                    .with_signal(Signal::Launch { units: to_fixed(6.0) })
            }
            110 => step = step.with_signal(Signal::EndLaunch),
            _ => {}
        }
        script.push(step);
    }
    script
}

fn demo_duel(actor_config: &ActorConfig, metronome_config: &MetronomeConfig) -> Result<()> {
    info!("=== Starting Demo Duel ===");
    info!("Tempo: {} BPM, HP: {}", metronome_config.bpm, actor_config.max_hp);

    let script = build_script();
    info!("Script Hash: {}", hex::encode(script.compute_hash()?));

    let outcome = replay(actor_config, metronome_config, &script)?;

    for command in &outcome.commands {
        match command.data {
            CommandData::Animation { trigger } => {
                info!("Tick {}: animation {}", command.tick, trigger.as_str());
                if trigger == AnimTrigger::Missed {
                    info!("Tick {}: off the beat", command.tick);
                }
            }
            CommandData::Shield { visible } => {
                info!("Tick {}: shield {}", command.tick, if visible { "up" } else { "down" });
            }
            CommandData::PlayIdlePose => info!("Tick {}: hit taken", command.tick),
            CommandData::SpawnShadowClone { .. } => info!("Tick {}: shadow clone", command.tick),
            _ => {}
        }
    }

    let (x, y, z) = (
        to_float(outcome.position.x),
        to_float(outcome.position.y),
        to_float(outcome.position.z),
    );
    info!("=== Duel Results ===");
    info!("HP: {}", outcome.hp);
    info!("Position: ({:.2}, {:.2}, {:.2})", x, y, z);
    info!("Beat arrows requested: {}", outcome.arrows);
    info!("Final State Hash: {}", hex::encode(outcome.final_hash));

    // Verify determinism by replaying the encoded script
    info!("=== Verifying Determinism ===");
    let decoded = Script::from_bytes(&script.to_bytes()?)?;
    let again = replay(actor_config, metronome_config, &decoded)?;
    info!("Replay State Hash: {}", hex::encode(again.final_hash));

    if again.final_hash != outcome.final_hash {
        bail!("replay diverged");
    }
    info!("Determinism verified");
    Ok(())
}
