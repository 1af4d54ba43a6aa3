//! Test helpers: event capture across ticks.
//!
//! `app.update()` swaps event buffers every tick, so tests that look at a whole
//! run collect events into a resource as they are written.

use bevy::prelude::*;

use crate::combat::CombatSet;

#[derive(Resource)]
pub struct Recorded<E: Event + Clone>(pub Vec<E>);

fn record<E: Event + Clone>(mut events: EventReader<E>, mut recorded: ResMut<Recorded<E>>) {
    recorded.0.extend(events.read().cloned());
}

/// Starts capturing `E` (after every combat stage of the tick).
pub fn record_events<E: Event + Clone>(app: &mut App) {
    app.insert_resource(Recorded::<E>(Vec::new()))
        .add_systems(FixedUpdate, record::<E>.after(CombatSet::Upkeep));
}

pub fn recorded<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world().resource::<Recorded<E>>().0.clone()
}
