//! Combat tuning (RON-backed resource).
//!
//! Defaults mirror the shipped melee config asset. Missing fields in a RON
//! file fall back to these defaults (`#[serde(default)]`).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// What a successful block does to the incoming hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum BlockPolicy {
    /// Hit is dropped entirely.
    #[default]
    Suppress,
    /// Hit lands with `damage * block_damage_reduction`.
    Reduce,
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
#[serde(default)]
pub struct CombatConfig {
    // === General ===
    pub base_attack_damage: f32,
    /// Attack clip playback speed (1.0 = authored timing).
    pub base_attack_speed: f32,
    pub critical_hit_chance: f32,
    pub critical_hit_multiplier: f32,

    // === Defense ===
    pub block_chance: f32,
    pub block_damage_reduction: f32,
    pub block_policy: BlockPolicy,

    // === Interruption ===
    /// Default toughness for newly spawned combatants.
    pub toughness: f32,
    /// Damage fraction taken when a hit fails to interrupt an ongoing swing.
    pub uninterrupted_damage_fraction: f32,

    // === Stamina ===
    pub max_stamina: f32,
    pub stamina_regen_rate: f32,
    pub base_attack_stamina_cost: f32,

    // === Animation ===
    /// Crossfade duration handed to the animation layer with each attack request (seconds).
    pub attack_animation_duration: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            base_attack_damage: 10.0,
            base_attack_speed: 1.0,
            critical_hit_chance: 0.1,
            critical_hit_multiplier: 2.0,
            block_chance: 0.2,
            block_damage_reduction: 0.5,
            block_policy: BlockPolicy::Suppress,
            toughness: 10.0,
            uninterrupted_damage_fraction: 0.5,
            max_stamina: 100.0,
            stamina_regen_rate: 5.0,
            base_attack_stamina_cost: 20.0,
            attack_animation_duration: 0.5,
        }
    }
}

impl CombatConfig {
    pub fn from_ron_str(source: &str) -> ConfigResult<Self> {
        let config: CombatConfig = ron::from_str(source).map_err(|source| ConfigError::Parse {
            what: "combat config".to_string(),
            source,
        })?;
        config.validate()
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    /// Loads `path`, falling back to defaults (with a warning) on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                crate::logger::log_warning(&format!(
                    "⚠️ CombatConfig: {}, using defaults",
                    err
                ));
                Self::default()
            }
        }
    }

    pub fn validate(self) -> ConfigResult<Self> {
        check_unit("critical_hit_chance", self.critical_hit_chance)?;
        check_unit("block_chance", self.block_chance)?;
        check_unit("block_damage_reduction", self.block_damage_reduction)?;
        check_unit("uninterrupted_damage_fraction", self.uninterrupted_damage_fraction)?;
        check_non_negative("base_attack_damage", self.base_attack_damage)?;
        check_positive("base_attack_speed", self.base_attack_speed)?;
        check_non_negative("critical_hit_multiplier", self.critical_hit_multiplier)?;
        check_non_negative("toughness", self.toughness)?;
        check_non_negative("max_stamina", self.max_stamina)?;
        check_non_negative("stamina_regen_rate", self.stamina_regen_rate)?;
        check_non_negative("base_attack_stamina_cost", self.base_attack_stamina_cost)?;
        Ok(self)
    }
}

fn check_unit(field: &'static str, value: f32) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("{} is outside [0, 1]", value),
        })
    }
}

fn check_positive(field: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("{} must be a positive number", value),
        })
    }
}

fn check_non_negative(field: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("{} must be a non-negative number", value),
        })
    }
}
