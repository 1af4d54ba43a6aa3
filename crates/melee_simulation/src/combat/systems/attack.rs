//! Attack start + animation cue systems.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::combat::defense::{DefendEnded, DefendIntent, DefendStarted, DefendState};
use crate::combat::events::{
    AnimationCue, AttackAnimationRequested, AttackIntent, AttackRefusal, AttackRefused,
};
use crate::combat::orchestrator::CombatOrchestrator;
use crate::components::{Combatant, CombatDisabled, Dead, EquippedWeapons, Stamina};
use crate::config::CombatConfig;

/// System: flag combatants spawned without a `CombatOrchestrator`.
///
/// Logged once per entity; `CombatDisabled` keeps it out of every combat query.
pub fn flag_missing_orchestrators(
    mut commands: Commands,
    query: Query<Entity, (With<Combatant>, Without<CombatOrchestrator>, Without<CombatDisabled>)>,
) {
    for entity in query.iter() {
        crate::logger::log_error(&format!(
            "❌ ECS: Combatant {:?} has no CombatOrchestrator, combat disabled",
            entity
        ));
        commands.entity(entity).insert(CombatDisabled);
    }
}

/// System: DefendIntent → DefendState (+ DefendStarted / DefendEnded).
pub fn process_defend_intents(
    mut intents: EventReader<DefendIntent>,
    mut defenders: Query<&mut DefendState, Without<Dead>>,
    mut started: EventWriter<DefendStarted>,
    mut ended: EventWriter<DefendEnded>,
) {
    for intent in intents.read() {
        let Ok(mut state) = defenders.get_mut(intent.entity) else {
            continue;
        };

        if intent.defending {
            if state.start_defend() {
                started.write(DefendStarted { entity: intent.entity });
                crate::logger::log(&format!("🛡️ ECS: {:?} defending", intent.entity));
            }
        } else if state.end_defend() {
            ended.write(DefendEnded { entity: intent.entity });
        }
    }
}

/// System: AttackIntent → CombatOrchestrator::perform_attack.
///
/// Gates: `Combatant::can_act`, phase (None/Recovery), stamina (if present).
/// Stamina is consumed only when the attack actually starts.
pub fn start_attacks(
    mut intents: EventReader<AttackIntent>,
    mut combatants: Query<
        (&Combatant, &mut CombatOrchestrator, &EquippedWeapons, Option<&mut Stamina>),
        (Without<Dead>, Without<CombatDisabled>),
    >,
    config: Res<CombatConfig>,
    mut requested: EventWriter<AttackAnimationRequested>,
    mut refused: EventWriter<AttackRefused>,
) {
    let cost = config.base_attack_stamina_cost;

    for intent in intents.read() {
        let Ok((combatant, mut orchestrator, weapons, stamina)) = combatants.get_mut(intent.entity) else {
            refused.write(AttackRefused {
                entity: intent.entity,
                reason: AttackRefusal::Unavailable,
            });
            continue;
        };

        let refusal = if !combatant.can_act {
            Some(AttackRefusal::CannotAct)
        } else if !orchestrator.can_start_attack(true) {
            Some(AttackRefusal::Busy)
        } else if stamina.as_ref().is_some_and(|s| !s.can_afford(cost)) {
            Some(AttackRefusal::Exhausted)
        } else {
            None
        };

        if let Some(reason) = refusal {
            refused.write(AttackRefused {
                entity: intent.entity,
                reason,
            });
            continue;
        }

        let Some(request) = orchestrator.perform_attack(
            intent.attack_number,
            intent.side,
            weapons,
            combatant.can_act,
            config.attack_animation_duration,
        ) else {
            continue;
        };

        if let Some(mut stamina) = stamina {
            stamina.consume(cost);
        }

        crate::logger::log(&format!(
            "⚔️ ECS: Attack {} ({:?}) started (entity: {:?}, weapons: {:?}/{:?})",
            request.attack_number, request.side, intent.entity, request.left_weapon, request.right_weapon
        ));

        requested.write(AttackAnimationRequested {
            entity: intent.entity,
            request,
        });
    }
}

/// System: AnimationCue → phase transitions.
///
/// Cues for entities without an orchestrator are reported once and ignored.
/// Cues for dead combatants (clip still playing out) are dropped.
pub fn apply_animation_cues(
    mut cues: EventReader<AnimationCue>,
    mut orchestrators: Query<(&mut CombatOrchestrator, Has<Dead>), Without<CombatDisabled>>,
    mut reported: Local<HashSet<Entity>>,
) {
    for cue in cues.read() {
        let Ok((mut orchestrator, is_dead)) = orchestrators.get_mut(cue.entity) else {
            if reported.insert(cue.entity) {
                crate::logger::log_error(&format!(
                    "❌ ECS: AnimationCue {:?} for {:?} without combat controller, ignored",
                    cue.cue, cue.entity
                ));
            }
            continue;
        };
        if is_dead {
            continue;
        }

        match orchestrator.apply_cue(cue.cue) {
            Some(signal) => crate::logger::log(&format!(
                "🎬 ECS: {:?} → {:?} (entity: {:?})",
                cue.cue, signal, cue.entity
            )),
            None => crate::logger::log(&format!(
                "🎬 ECS: cue {:?} ignored in {:?} (entity: {:?})",
                cue.cue,
                orchestrator.phase(),
                cue.entity
            )),
        }
    }
}
