//! Defend state + block arbitration.
//!
//! Before a hit reaches the target's damage intake the arbiter checks whether
//! the target is defending. A defending target rolls `block_chance` against the
//! deterministic simulation RNG; a successful block applies `BlockPolicy`.

use bevy::prelude::*;
use rand::Rng;

use crate::config::{BlockPolicy, CombatConfig};

/// Активна ли защитная стойка (block stance)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct DefendState {
    is_defending: bool,
}

impl DefendState {
    /// Returns true if the state changed.
    pub fn start_defend(&mut self) -> bool {
        let changed = !self.is_defending;
        self.is_defending = true;
        changed
    }

    /// Returns true if the state changed.
    pub fn end_defend(&mut self) -> bool {
        let changed = self.is_defending;
        self.is_defending = false;
        changed
    }

    pub fn is_defending(&self) -> bool {
        self.is_defending
    }
}

/// Result of arbitrating one incoming hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DefenseOutcome {
    /// Blocked, nothing reaches the target.
    Blocked,
    /// Blocked, reduced damage still lands.
    Reduced { damage: f32 },
    /// No block: full damage.
    Delivered { damage: f32 },
}

impl DefenseOutcome {
    pub fn was_blocked(&self) -> bool {
        !matches!(self, DefenseOutcome::Delivered { .. })
    }

    /// Damage that continues to the target's intake, if any.
    pub fn damage(&self) -> Option<f32> {
        match *self {
            DefenseOutcome::Blocked => None,
            DefenseOutcome::Reduced { damage } | DefenseOutcome::Delivered { damage } => Some(damage),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenseArbiter {
    pub block_chance: f32,
    pub block_damage_reduction: f32,
    pub policy: BlockPolicy,
}

impl Default for DefenseArbiter {
    fn default() -> Self {
        Self::from_config(&CombatConfig::default())
    }
}

impl DefenseArbiter {
    pub fn from_config(config: &CombatConfig) -> Self {
        Self {
            block_chance: config.block_chance,
            block_damage_reduction: config.block_damage_reduction,
            policy: config.block_policy,
        }
    }

    /// Rolls only when `defending`; a non-defending target never consumes RNG.
    pub fn arbitrate<R: Rng + ?Sized>(&self, defending: bool, damage: f32, rng: &mut R) -> DefenseOutcome {
        if !defending || !self.roll_block(rng) {
            return DefenseOutcome::Delivered { damage };
        }

        match self.policy {
            BlockPolicy::Suppress => DefenseOutcome::Blocked,
            BlockPolicy::Reduce => DefenseOutcome::Reduced {
                damage: damage * self.block_damage_reduction,
            },
        }
    }

    fn roll_block<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen::<f32>() < self.block_chance
    }
}

// ============================================================================
// Events
// ============================================================================

/// Запрос на вход/выход из защитной стойки (от игрока или AI)
#[derive(Event, Debug, Clone, Copy)]
pub struct DefendIntent {
    pub entity: Entity,
    pub defending: bool,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct DefendStarted {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct DefendEnded {
    pub entity: Entity,
}

/// Удар заблокирован (для анимации блока / звука)
#[derive(Event, Debug, Clone, Copy)]
pub struct HitBlocked {
    pub attacker: Entity,
    pub target: Entity,
    /// Damage that still landed under `BlockPolicy::Reduce`.
    pub damage_through: Option<f32>,
}
