//! Headless navigation provider.
//!
//! Straight-line movement toward `NavigationState::destination` at a fixed
//! speed; arrival clears `is_navigating`. A presentation layer with real
//! pathfinding replaces this plugin and keeps the same `NavigationState` contract.

use bevy::prelude::*;

use crate::components::{Dead, NavigationState};

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct HeadlessNavigator {
    /// Movement speed (m/s)
    pub speed: f32,
}

impl Default for HeadlessNavigator {
    fn default() -> Self {
        Self { speed: 4.0 }
    }
}

/// Система: движение к destination + arrival
pub fn move_navigating_agents(
    mut agents: Query<(Entity, &mut Transform, &mut NavigationState), Without<Dead>>,
    navigator: Res<HeadlessNavigator>,
    time: Res<Time<Fixed>>,
) {
    let step = navigator.speed * time.timestep().as_secs_f32();

    for (entity, mut transform, mut navigation) in agents.iter_mut() {
        if !navigation.is_navigating {
            continue;
        }
        let Some(destination) = navigation.destination else {
            navigation.arrive();
            continue;
        };

        let offset = destination - transform.translation;
        if offset.length() <= step {
            transform.translation = destination;
            navigation.arrive();
            crate::logger::log(&format!("📍 Navigation: {:?} arrived at {:?}", entity, destination));
        } else {
            transform.translation += offset.normalize() * step;
        }
    }
}

pub struct HeadlessNavigationPlugin;

impl Plugin for HeadlessNavigationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HeadlessNavigator>().add_systems(
            FixedUpdate,
            move_navigating_agents
                .in_set(crate::combat::CombatSet::Decide)
                .before(crate::ai::follower::follow_targets),
        );
    }
}
