//! Weapon hit geometry catalog.
//!
//! Maps `WeaponKind` → ordered local attack points + attack radius. Loaded once
//! (RON records or built-in defaults), then shared read-only through `Arc` by
//! every combatant's `HitResolver`.
//!
//! Unknown weapons are not an error: `attack_points` returns an empty slice and
//! `attack_radius` returns `DEFAULT_ATTACK_RADIUS`, so the attack plays out with
//! no hits.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::components::WeaponKind;
use crate::error::{ConfigError, ConfigResult};

/// Radius reported for weapons missing from the catalog (meters).
pub const DEFAULT_ATTACK_RADIUS: f32 = 0.5;

/// Hit geometry of one weapon kind. Attack points are local offsets
/// (combatant space, forward = -Z).
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponProfile {
    pub attack_points: Vec<Vec3>,
    pub attack_radius: f32,
    pub damage_multiplier: f32,
}

/// Serialized form of a `WeaponProfile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfileRecord {
    pub weapon: WeaponKind,
    #[serde(default = "default_attack_radius")]
    pub attack_radius: f32,
    #[serde(default)]
    pub attack_points: Vec<[f32; 3]>,
    #[serde(default = "default_damage_multiplier")]
    pub damage_multiplier: f32,
}

fn default_attack_radius() -> f32 {
    DEFAULT_ATTACK_RADIUS
}

fn default_damage_multiplier() -> f32 {
    1.0
}

impl From<&WeaponProfileRecord> for WeaponProfile {
    fn from(record: &WeaponProfileRecord) -> Self {
        Self {
            attack_points: record.attack_points.iter().map(|p| Vec3::from_array(*p)).collect(),
            attack_radius: record.attack_radius,
            damage_multiplier: record.damage_multiplier,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeaponCatalog {
    profiles: HashMap<WeaponKind, WeaponProfile>,
}

impl WeaponCatalog {
    /// Builds a catalog from records. Duplicate weapon entries keep the first
    /// record and log a warning.
    pub fn from_records(records: &[WeaponProfileRecord]) -> Self {
        let mut profiles = HashMap::with_capacity(records.len());

        for record in records {
            if profiles.contains_key(&record.weapon) {
                crate::logger::log_warning(&format!(
                    "⚠️ WeaponCatalog: duplicate weapon {:?}, ignoring duplicate",
                    record.weapon
                ));
                continue;
            }
            profiles.insert(record.weapon, WeaponProfile::from(record));
        }

        Self { profiles }
    }

    pub fn from_ron_str(source: &str) -> ConfigResult<Self> {
        let records: Vec<WeaponProfileRecord> =
            ron::from_str(source).map_err(|source| ConfigError::Parse {
                what: "weapon catalog".to_string(),
                source,
            })?;

        for record in &records {
            if !record.attack_radius.is_finite() || record.attack_radius < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: "attack_radius",
                    reason: format!("{:?} has radius {}", record.weapon, record.attack_radius),
                });
            }
        }

        Ok(Self::from_records(&records))
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    /// Loads `path`, falling back to built-in profiles (with a warning) on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(catalog) => catalog,
            Err(err) => {
                crate::logger::log_warning(&format!(
                    "⚠️ WeaponCatalog: {}, using built-in profiles",
                    err
                ));
                Self::with_defaults()
            }
        }
    }

    /// Built-in profiles for the weapons the combat layer ships with.
    ///
    /// Unarmed is a fist probe: one point 1.5m ahead, radius 1.0.
    pub fn with_defaults() -> Self {
        Self::from_records(&[
            WeaponProfileRecord {
                weapon: WeaponKind::Unarmed,
                attack_radius: 1.0,
                attack_points: vec![[0.0, 1.0, -1.5]],
                damage_multiplier: 1.0,
            },
            WeaponProfileRecord {
                weapon: WeaponKind::TwoHandSword,
                attack_radius: 0.5,
                attack_points: vec![[0.3, 1.2, -0.8], [0.3, 1.3, -1.4], [0.3, 1.4, -2.0]],
                damage_multiplier: 2.0,
            },
            WeaponProfileRecord {
                weapon: WeaponKind::TwoHandAxe,
                attack_radius: 0.6,
                attack_points: vec![[0.2, 1.2, -1.2], [0.2, 1.3, -1.7]],
                damage_multiplier: 2.5,
            },
            WeaponProfileRecord {
                weapon: WeaponKind::RightSword,
                attack_radius: 0.4,
                attack_points: vec![[0.4, 1.2, -0.7], [0.4, 1.2, -1.2]],
                damage_multiplier: 1.5,
            },
            WeaponProfileRecord {
                weapon: WeaponKind::LeftSword,
                attack_radius: 0.4,
                attack_points: vec![[-0.4, 1.2, -0.7], [-0.4, 1.2, -1.2]],
                damage_multiplier: 1.5,
            },
        ])
    }

    pub fn profile(&self, weapon: WeaponKind) -> Option<&WeaponProfile> {
        self.profiles.get(&weapon)
    }

    pub fn attack_points(&self, weapon: WeaponKind) -> &[Vec3] {
        self.profiles
            .get(&weapon)
            .map(|profile| profile.attack_points.as_slice())
            .unwrap_or(&[])
    }

    pub fn attack_radius(&self, weapon: WeaponKind) -> f32 {
        self.profiles
            .get(&weapon)
            .map(|profile| profile.attack_radius)
            .unwrap_or(DEFAULT_ATTACK_RADIUS)
    }

    pub fn damage_multiplier(&self, weapon: WeaponKind) -> f32 {
        self.profiles
            .get(&weapon)
            .map(|profile| profile.damage_multiplier)
            .unwrap_or(1.0)
    }

    pub fn is_weapon_available(&self, weapon: WeaponKind) -> bool {
        self.profiles.contains_key(&weapon)
    }

    /// All catalogued weapons, sorted.
    pub fn weapons(&self) -> Vec<WeaponKind> {
        let mut weapons: Vec<_> = self.profiles.keys().copied().collect();
        weapons.sort();
        weapons
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Resource: catalog shared with every `HitResolver` spawned in the world.
#[derive(Resource, Debug, Clone)]
pub struct SharedWeaponCatalog(pub Arc<WeaponCatalog>);

impl Default for SharedWeaponCatalog {
    fn default() -> Self {
        Self(Arc::new(WeaponCatalog::with_defaults()))
    }
}

impl SharedWeaponCatalog {
    pub fn new(catalog: WeaponCatalog) -> Self {
        Self(Arc::new(catalog))
    }

    pub fn handle(&self) -> Arc<WeaponCatalog> {
        Arc::clone(&self.0)
    }
}
