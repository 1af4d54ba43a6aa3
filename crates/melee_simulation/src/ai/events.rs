//! AI Events: запросы к navigation layer
//!
//! ECS решает куда идти, navigation provider (внешний или headless) двигает
//! entity и сбрасывает `NavigationState::is_navigating` по прибытии.

use bevy::prelude::*;

/// Начать навигацию к точке
#[derive(Event, Debug, Clone, Copy)]
pub struct NavigationRequest {
    pub entity: Entity,
    pub destination: Vec3,
}

/// Прервать текущую навигацию (цель уже в радиусе)
#[derive(Event, Debug, Clone, Copy)]
pub struct StopNavigation {
    pub entity: Entity,
}
