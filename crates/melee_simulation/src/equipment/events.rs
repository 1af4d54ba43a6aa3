//! Equipment system events
//!
//! # Architecture
//!
//! **Weapon lifecycle:**
//! - `EquipWeaponIntent` → weapon в руку (two-handed → обе руки) → `WeaponEquipped`
//! - `UnequipWeaponIntent` → обе руки Unarmed → `WeaponUnequipped`
//!
//! `WeaponEquipped` / `WeaponUnequipped` are unsheath/sheath requests for the
//! animation layer.

use bevy::prelude::*;

use crate::components::{EquippedWeapons, WeaponKind};

// ============================================================================
// Intents
// ============================================================================

/// Equip weapon (player toggle или AI)
///
/// # Flow
/// 1. Отказ, если идет атака (phase ≠ None)
/// 2. `EquippedWeapons::equip` (two-handed заполняет обе руки)
/// 3. `WeaponEquipped` для анимации unsheath
#[derive(Event, Clone, Copy, Debug)]
pub struct EquipWeaponIntent {
    pub entity: Entity,
    pub weapon: WeaponKind,
}

/// Unequip (обе руки → Unarmed)
#[derive(Event, Clone, Copy, Debug)]
pub struct UnequipWeaponIntent {
    pub entity: Entity,
}

// ============================================================================
// Outcomes
// ============================================================================

#[derive(Event, Clone, Copy, Debug)]
pub struct WeaponEquipped {
    pub entity: Entity,
    pub weapon: WeaponKind,
    /// Hands after the change
    pub weapons: EquippedWeapons,
}

#[derive(Event, Clone, Copy, Debug)]
pub struct WeaponUnequipped {
    pub entity: Entity,
    /// Hands before the change
    pub previous: EquippedWeapons,
}
