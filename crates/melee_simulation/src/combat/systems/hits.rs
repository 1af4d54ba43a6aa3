//! Hit sampling + hit resolution systems.
//!
//! sample_attack_hits: Impact-phase orchestrators → HitCandidate events
//! resolve_hit_candidates: HitCandidate → defense → damage intake → outcome events

use bevy::prelude::*;

use crate::combat::damage::{
    DamageDealt, DamageEvent, DamageIntake, DamageModel, EntityDied, HitReactionRequest,
};
use crate::combat::defense::{DefendState, DefenseArbiter, DefenseOutcome, HitBlocked};
use crate::combat::hit_resolver::{HitCandidate, HurtboxSnapshot};
use crate::combat::orchestrator::CombatOrchestrator;
use crate::combat::weapon_catalog::SharedWeaponCatalog;
use crate::components::{Combatant, CombatDisabled, Dead, Health, Hurtbox};
use crate::config::CombatConfig;
use crate::DeterministicRng;

/// System: one sampling step for every combatant in Impact.
///
/// The spatial provider is a hurtbox snapshot of all living damageable entities,
/// taken once per tick.
pub fn sample_attack_hits(
    hurtboxes: Query<(Entity, &Transform, &Hurtbox), (With<Health>, Without<Dead>)>,
    mut attackers: Query<(Entity, &Transform, &mut CombatOrchestrator), (Without<Dead>, Without<CombatDisabled>)>,
    mut candidates: EventWriter<HitCandidate>,
) {
    if !attackers.iter().any(|(_, _, orchestrator)| orchestrator.is_sampling()) {
        return;
    }

    let snapshot = HurtboxSnapshot::new(
        hurtboxes
            .iter()
            .map(|(entity, transform, hurtbox)| (entity, hurtbox.center(transform.translation), hurtbox.radius))
            .collect(),
    );

    for (entity, transform, mut orchestrator) in attackers.iter_mut() {
        if !orchestrator.is_sampling() {
            continue;
        }

        for candidate in orchestrator.sample_tick(entity, transform, &snapshot) {
            crate::logger::log(&format!(
                "💥 ECS: {:?} hit {:?} (attack {}, {:?})",
                candidate.attacker, candidate.target, candidate.attack_id, candidate.weapon
            ));
            candidates.write(candidate);
        }
    }
}

/// System: resolve hit candidates against their targets.
///
/// 1. Damage roll (base × weapon multiplier × crit)
/// 2. Block arbitration (target DefendState)
/// 3. Target intake: interrupt-then-damage
/// 4. Events: HitBlocked / DamageDealt / HitReactionRequest / EntityDied
#[allow(clippy::too_many_arguments)]
pub fn resolve_hit_candidates(
    mut candidates: EventReader<HitCandidate>,
    mut combatants: Query<(
        &Transform,
        Option<&Combatant>,
        Option<&mut CombatOrchestrator>,
        Option<&mut Health>,
        Option<&DefendState>,
        Has<Dead>,
    )>,
    config: Res<CombatConfig>,
    catalog: Res<SharedWeaponCatalog>,
    mut rng: ResMut<DeterministicRng>,
    mut blocked: EventWriter<HitBlocked>,
    mut dealt: EventWriter<DamageDealt>,
    mut reactions: EventWriter<HitReactionRequest>,
    mut died: EventWriter<EntityDied>,
) {
    let model = DamageModel::from_config(&config);
    let arbiter = DefenseArbiter::from_config(&config);
    let intake = DamageIntake::from_config(&config);

    for candidate in candidates.read() {
        // Attacker snapshot (read-only)
        let Ok((attacker_transform, attacker_combatant, attacker_orchestrator, _, _, _)) =
            combatants.get(candidate.attacker)
        else {
            continue;
        };
        let attacker_position = attacker_transform.translation;
        let attacker_toughness = attacker_orchestrator
            .map(|o| o.toughness())
            .or(attacker_combatant.map(|c| c.toughness))
            .unwrap_or(0.0);

        let Ok((_, _, mut target_orchestrator, target_health, defend, is_dead)) =
            combatants.get_mut(candidate.target)
        else {
            continue;
        };
        if is_dead {
            continue;
        }
        let Some(mut health) = target_health else {
            crate::logger::log(&format!(
                "ECS: hit target {:?} has no Health, skipped",
                candidate.target
            ));
            continue;
        };
        // Killed earlier this tick: Dead lands with the deferred commands
        if !health.is_alive() {
            continue;
        }

        let rolled = model.roll(catalog.0.damage_multiplier(candidate.weapon), &mut rng.rng);
        let defending = defend.is_some_and(DefendState::is_defending);

        let damage = match arbiter.arbitrate(defending, rolled.amount, &mut rng.rng) {
            DefenseOutcome::Blocked => {
                crate::logger::log_info(&format!(
                    "🛡️ ECS: {:?} blocked hit from {:?}",
                    candidate.target, candidate.attacker
                ));
                blocked.write(HitBlocked {
                    attacker: candidate.attacker,
                    target: candidate.target,
                    damage_through: None,
                });
                continue;
            }
            DefenseOutcome::Reduced { damage } => {
                blocked.write(HitBlocked {
                    attacker: candidate.attacker,
                    target: candidate.target,
                    damage_through: Some(damage),
                });
                damage
            }
            DefenseOutcome::Delivered { damage } => damage,
        };

        let event = DamageEvent {
            attacker: candidate.attacker,
            target: candidate.target,
            attacker_position,
            attacker_toughness,
            damage,
        };
        let outcome = intake.receive_hit(
            target_orchestrator.as_deref_mut(),
            &mut health,
            &event,
            &mut rng.rng,
        );

        if outcome.interrupted {
            crate::logger::log_info(&format!(
                "⚡ ECS: {:?} interrupted by {:?} (toughness {:.1})",
                candidate.target, candidate.attacker, attacker_toughness
            ));
        }

        dealt.write(DamageDealt {
            attacker: candidate.attacker,
            target: candidate.target,
            damage: outcome.applied_damage,
            is_critical: rolled.is_critical,
            interrupted: outcome.interrupted,
            target_died: outcome.target_died,
        });

        if let Some(variant) = outcome.reaction_variant {
            reactions.write(HitReactionRequest {
                entity: candidate.target,
                variant,
                attacker_position,
            });
        }

        if outcome.target_died {
            died.write(EntityDied {
                entity: candidate.target,
                killer: Some(candidate.attacker),
            });
            crate::logger::log_info(&format!(
                "💀 ECS: {:?} killed by {:?}",
                candidate.target, candidate.attacker
            ));
        }
    }
}
