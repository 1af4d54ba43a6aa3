//! Hit sampling during the Impact phase.
//!
//! # Sampling
//!
//! Weapon swings move attack points across frames, so a single overlap check
//! at Impact start misses targets that enter the arc later. The resolver is
//! called once per fixed tick for as long as Impact lasts:
//!
//! ```text
//! for point in catalog.attack_points(weapon):
//!     world = pose.transform_point(point)
//!     for target in spatial.overlap_sphere(world, radius):
//!         if target != attacker && ledger.record(attack_id, target):
//!             → HitCandidate
//! ```
//!
//! # Dedup ledger
//!
//! `HitLedger` is an arena of hit sets keyed by attack-id. A target enters a
//! set at most once, so at most one hit is delivered per target per attack
//! instance no matter how many ticks sample it.

use bevy::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::combat::weapon_catalog::WeaponCatalog;
use crate::components::{Side, WeaponKind};

/// Monotonic per-combatant attack identifier.
pub type AttackId = u64;

/// Upper bound on hit sets a ledger keeps alive at once.
pub const MAX_TRACKED_ATTACKS: usize = 4;

// ============================================================================
// Spatial query seam
// ============================================================================

/// External overlap capability: damageable entities whose volume overlaps the
/// sphere at `center` with `radius`.
pub trait SpatialQuery {
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<Entity>;
}

/// Headless provider: brute-force sphere/sphere test over a hurtbox snapshot.
///
/// Entries are kept sorted by entity index so results are deterministic.
#[derive(Debug, Clone, Default)]
pub struct HurtboxSnapshot {
    entries: Vec<(Entity, Vec3, f32)>,
}

impl HurtboxSnapshot {
    pub fn new(mut entries: Vec<(Entity, Vec3, f32)>) -> Self {
        entries.sort_by_key(|(entity, _, _)| entity.index());
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SpatialQuery for HurtboxSnapshot {
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<Entity> {
        self.entries
            .iter()
            .filter(|(_, position, hurtbox_radius)| {
                center.distance(*position) <= radius + hurtbox_radius
            })
            .map(|(entity, _, _)| *entity)
            .collect()
    }
}

// ============================================================================
// Attack instance + ledger
// ============================================================================

/// One discrete swing, scoped for hit dedup. Created at Impact start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackInstance {
    pub attack_id: AttackId,
    pub attack_number: u8,
    pub side: Side,
    pub weapon: WeaponKind,
}

/// Arena: attack-id → set of targets already hit by that attack.
#[derive(Debug, Default)]
pub struct HitLedger {
    sets: BTreeMap<AttackId, HashSet<Entity>>,
}

impl HitLedger {
    /// Opens an empty set for `attack_id`.
    ///
    /// Sets of older ids still open here belong to attacks whose end signal
    /// never arrived; they are released now so they cannot leak.
    pub fn open(&mut self, attack_id: AttackId) {
        let stale: Vec<AttackId> = self.sets.range(..attack_id).map(|(id, _)| *id).collect();
        for id in stale {
            self.sets.remove(&id);
            crate::logger::log_warning(&format!(
                "⚠️ HitLedger: attack {} never ended, releasing its hit set",
                id
            ));
        }

        self.sets.entry(attack_id).or_default();

        while self.sets.len() > MAX_TRACKED_ATTACKS {
            self.sets.pop_first();
        }
    }

    /// Records `target` for `attack_id`. Returns true only the first time.
    /// Unknown (never opened or already released) ids record nothing.
    pub fn record(&mut self, attack_id: AttackId, target: Entity) -> bool {
        self.sets
            .get_mut(&attack_id)
            .map(|set| set.insert(target))
            .unwrap_or(false)
    }

    pub fn contains(&self, attack_id: AttackId, target: Entity) -> bool {
        self.sets
            .get(&attack_id)
            .is_some_and(|set| set.contains(&target))
    }

    /// Releases the set; returns how many targets it held.
    pub fn release(&mut self, attack_id: AttackId) -> Option<usize> {
        self.sets.remove(&attack_id).map(|set| set.len())
    }

    pub fn hit_count(&self, attack_id: AttackId) -> usize {
        self.sets.get(&attack_id).map(HashSet::len).unwrap_or(0)
    }

    pub fn is_open(&self, attack_id: AttackId) -> bool {
        self.sets.contains_key(&attack_id)
    }

    pub fn tracked_attacks(&self) -> usize {
        self.sets.len()
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// A first-time overlap of `target` by `attacker`'s current attack.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HitCandidate {
    pub attacker: Entity,
    pub target: Entity,
    pub attack_id: AttackId,
    pub weapon: WeaponKind,
    /// World-space attack point that registered the overlap
    pub point: Vec3,
}

#[derive(Debug, Clone)]
pub struct HitResolver {
    catalog: Arc<WeaponCatalog>,
}

impl HitResolver {
    pub fn new(catalog: Arc<WeaponCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &WeaponCatalog {
        &self.catalog
    }

    /// Attack points of `weapon` transformed into world space by `pose`.
    pub fn world_attack_points(&self, pose: &Transform, weapon: WeaponKind) -> Vec<Vec3> {
        self.catalog
            .attack_points(weapon)
            .iter()
            .map(|offset| pose.transform_point(*offset))
            .collect()
    }

    /// One sampling step for `instance`. Only first-time targets are returned.
    pub fn sample<Q: SpatialQuery + ?Sized>(
        &self,
        attacker: Entity,
        pose: &Transform,
        instance: &AttackInstance,
        ledger: &mut HitLedger,
        spatial: &Q,
    ) -> Vec<HitCandidate> {
        let radius = self.catalog.attack_radius(instance.weapon);
        let mut candidates = Vec::new();

        for point in self.world_attack_points(pose, instance.weapon) {
            for target in spatial.overlap_sphere(point, radius) {
                // Не бьем самого себя
                if target == attacker {
                    continue;
                }

                if ledger.record(instance.attack_id, target) {
                    candidates.push(HitCandidate {
                        attacker,
                        target,
                        attack_id: instance.attack_id,
                        weapon: instance.weapon,
                        point,
                    });
                }
            }
        }

        candidates
    }
}
