//! World-facing components: hurtbox volume and navigation status.

use bevy::prelude::*;

/// Сфера попадания бойца (центр = Transform.translation + Y × center_height)
///
/// Используется headless spatial провайдером вместо physics collider.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hurtbox {
    pub radius: f32,
    /// Высота центра сферы над Transform (торс)
    pub center_height: f32,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self {
            radius: 0.5,
            center_height: 1.0,
        }
    }
}

impl Hurtbox {
    pub fn center(&self, translation: Vec3) -> Vec3 {
        translation + Vec3::Y * self.center_height
    }
}

/// Navigation status, owned by the external navigation layer.
///
/// The follower AI marks navigation as started when it issues a request;
/// the navigation layer calls `arrive` (or `stop`) when movement ends.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavigationState {
    pub is_navigating: bool,
    pub destination: Option<Vec3>,
}

impl NavigationState {
    pub fn begin(&mut self, destination: Vec3) {
        self.is_navigating = true;
        self.destination = Some(destination);
    }

    pub fn arrive(&mut self) {
        self.is_navigating = false;
        self.destination = None;
    }

    pub fn stop(&mut self) {
        self.arrive();
    }
}
