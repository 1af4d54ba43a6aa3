//! Shared helpers for integration tests.
//!
//! `run_tick` swaps event buffers every tick, so whole-run assertions read
//! events captured into a resource as they are written.

use bevy::prelude::*;
use melee_simulation::CombatSet;

#[derive(Resource)]
pub struct Recorded<E: Event + Clone>(pub Vec<E>);

fn record<E: Event + Clone>(mut events: EventReader<E>, mut recorded: ResMut<Recorded<E>>) {
    recorded.0.extend(events.read().cloned());
}

pub fn record_events<E: Event + Clone>(app: &mut App) {
    app.insert_resource(Recorded::<E>(Vec::new()))
        .add_systems(FixedUpdate, record::<E>.after(CombatSet::Upkeep));
}

pub fn recorded<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world().resource::<Recorded<E>>().0.clone()
}
