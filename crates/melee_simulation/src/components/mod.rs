//! ECS Components для бойцов
//!
//! Организация по доменам:
//! - actor: базовые характеристики (Combatant, Health, Stamina, Dead)
//! - equipment: оружие в руках (WeaponKind, Side, EquippedWeapons)
//! - world: позиционирование в мире (Hurtbox, NavigationState)

pub mod actor;
pub mod equipment;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use equipment::*;
pub use world::*;
