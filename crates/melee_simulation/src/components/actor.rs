//! Базовые компоненты бойцов: Combatant, Health, Stamina

use bevy::prelude::*;

use crate::components::{EquippedWeapons, Hurtbox};

/// Боец (игрок или NPC): участник melee боя
///
/// Автоматически добавляет Transform, Health, EquippedWeapons, Hurtbox через Required Components.
/// `CombatOrchestrator` не required: ему нужен weapon catalog (см. `CombatantBundle`).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform, Health, EquippedWeapons, Hurtbox)]
pub struct Combatant {
    /// Сопротивление прерыванию атаки (interrupt arbitration)
    pub toughness: f32,
    /// Owner-level gate: false → атаки не стартуют (dead, scripted, stunned)
    pub can_act: bool,
}

impl Default for Combatant {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl Combatant {
    pub fn new(toughness: f32) -> Self {
        Self {
            toughness,
            can_act: true,
        }
    }
}

/// Здоровье бойца
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Returns the amount actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_sub(amount);
        before - self.current
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }
}

/// Выносливость для атак
///
/// Инвариант: 0.0 ≤ current ≤ max
/// Боец без Stamina компонента атакует без ограничений.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Stamina {
    pub current: f32,
    pub max: f32,
    pub regen_rate: f32, // units per second
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new(100.0, 5.0)
    }
}

impl Stamina {
    pub fn new(max: f32, regen_rate: f32) -> Self {
        Self {
            current: max,
            max,
            regen_rate,
        }
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    pub fn consume(&mut self, cost: f32) -> bool {
        if self.can_afford(cost) {
            self.current -= cost;
            true
        } else {
            false
        }
    }

    pub fn regenerate(&mut self, delta_time: f32) {
        self.current = (self.current + self.regen_rate * delta_time).min(self.max);
    }
}

/// Маркер: боец мертв (Health == 0). Атаки и сэмплинг отключены.
#[derive(Component, Debug)]
pub struct Dead;

/// Маркер: у Combatant нет CombatOrchestrator: бой для entity отключен.
#[derive(Component, Debug)]
pub struct CombatDisabled;
