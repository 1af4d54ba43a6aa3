//! Post-hit upkeep: death handling, toughness sync, phase notifications, stamina.

use bevy::prelude::*;

use crate::combat::damage::EntityDied;
use crate::combat::defense::DefendState;
use crate::combat::events::PhaseNotification;
use crate::combat::orchestrator::CombatOrchestrator;
use crate::components::{Combatant, Dead, Stamina};

/// Система: отключение боя при смерти
///
/// Обрывает текущую атаку (hit set освобождается), снимает блок,
/// `can_act = false`, добавляет маркер Dead.
pub fn disable_combat_on_death(
    mut commands: Commands,
    mut death_events: EventReader<EntityDied>,
    mut fighters: Query<(
        Option<&mut Combatant>,
        Option<&mut CombatOrchestrator>,
        Option<&mut DefendState>,
    )>,
) {
    for event in death_events.read() {
        let Ok((combatant, orchestrator, defend)) = fighters.get_mut(event.entity) else {
            continue;
        };

        if let Some(mut combatant) = combatant {
            combatant.can_act = false;
        }
        if let Some(mut orchestrator) = orchestrator {
            orchestrator.cancel();
        }
        if let Some(mut defend) = defend {
            defend.end_defend();
        }

        commands.entity(event.entity).insert(Dead);
        crate::logger::log_info(&format!("💀 ECS: {:?} is dead, combat disabled", event.entity));
    }
}

/// Keeps the controller's toughness in step with `Combatant::toughness`.
pub fn sync_combatant_toughness(
    mut query: Query<(&Combatant, &mut CombatOrchestrator), Changed<Combatant>>,
) {
    for (combatant, mut orchestrator) in query.iter_mut() {
        if orchestrator.toughness() != combatant.toughness {
            orchestrator.set_toughness(combatant.toughness);
        }
    }
}

/// System: publish routed phase signals as `PhaseNotification` events.
pub fn publish_phase_notifications(
    mut orchestrators: Query<(Entity, &mut CombatOrchestrator)>,
    mut notifications: EventWriter<PhaseNotification>,
) {
    for (entity, mut orchestrator) in orchestrators.iter_mut() {
        for signal in orchestrator.drain_signals() {
            notifications.write(PhaseNotification { entity, signal });
        }
    }
}

/// Система: regenerate stamina для всех живых entities
///
/// Работает в FixedUpdate для детерминизма (delta = fixed timestep).
pub fn regenerate_stamina(mut query: Query<&mut Stamina, Without<Dead>>, time: Res<Time<Fixed>>) {
    let delta = time.timestep().as_secs_f32();

    for mut stamina in query.iter_mut() {
        if stamina.current < stamina.max {
            stamina.regenerate(delta);
        }
    }
}
