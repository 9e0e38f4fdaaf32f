//! Actor Configuration
//!
//! Tuning values for a combat actor, loadable from JSON. Durations and
//! distances are written as plain numbers (seconds, units) and stored as
//! Q16.16.

use serde::{Deserialize, Serialize};

use crate::combat::parry::ParryTimings;
use crate::core::fixed::{self, Fixed, DEFAULT_DEAD_ZONE, FIXED_ONE};
use crate::error::{CombatError, Result};

/// Per-actor tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Starting (and maximum) hit points
    pub max_hp: i32,

    /// Walk speed (units per second)
    #[serde(with = "fixed::serde_float")]
    pub speed: Fixed,

    /// Aim stick magnitude (per axis) below which the stick is ignored
    #[serde(with = "fixed::serde_float")]
    pub controller_dead_zone: Fixed,

    /// Parry active phase (seconds)
    #[serde(with = "fixed::serde_float")]
    pub parry_active: Fixed,

    /// Parry cooldown after the active phase (seconds)
    #[serde(with = "fixed::serde_float")]
    pub parry_cooldown: Fixed,
}

impl Default for ActorConfig {
    fn default() -> Self {
        let parry = ParryTimings::default();
        Self {
            max_hp: 10,
            speed: FIXED_ONE,
            controller_dead_zone: DEFAULT_DEAD_ZONE,
            parry_active: parry.active,
            parry_cooldown: parry.cooldown,
        }
    }
}

impl ActorConfig {
    /// Parse from JSON and validate.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the state machine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_hp <= 0 {
            return Err(CombatError::InvalidConfig(format!(
                "max_hp must be positive, got {}",
                self.max_hp
            )));
        }
        if self.speed < 0 {
            return Err(CombatError::InvalidConfig("speed must not be negative".into()));
        }
        if self.controller_dead_zone < 0 || self.controller_dead_zone > FIXED_ONE {
            return Err(CombatError::InvalidConfig(format!(
                "controller_dead_zone must be in [0, 1], got {}",
                fixed::to_float(self.controller_dead_zone)
            )));
        }
        if self.parry_active <= 0 || self.parry_cooldown < 0 {
            return Err(CombatError::InvalidConfig(
                "parry_active must be positive and parry_cooldown non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Parry phase lengths.
    pub fn parry_timings(&self) -> ParryTimings {
        ParryTimings {
            active: self.parry_active,
            cooldown: self.parry_cooldown,
        }
    }
}
