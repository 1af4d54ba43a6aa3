//! Equipment module: weapon equip/unequip
//!
//! # Architecture
//!
//! **Events → Systems flow:**
//! - Player/AI/suspended tasks emit intent events (CombatSet::Decide)
//! - Systems process intents (modify EquippedWeapons) in CombatSet::Equip
//! - WeaponEquipped / WeaponUnequipped → animation layer (unsheath/sheath)

use bevy::prelude::*;

use crate::combat::CombatSet;

pub mod events;
pub mod systems;


// Re-exports
pub use events::*;
pub use systems::*;

/// Equipment plugin (weapon lifecycle)
pub struct EquipmentPlugin;

impl Plugin for EquipmentPlugin {
    fn build(&self, app: &mut App) {
        app
            // Events
            .add_event::<EquipWeaponIntent>()
            .add_event::<UnequipWeaponIntent>()
            .add_event::<WeaponEquipped>()
            .add_event::<WeaponUnequipped>()
            // Systems
            .add_systems(
                FixedUpdate,
                (process_equip_weapon, process_unequip_weapon)
                    .chain()
                    .in_set(CombatSet::Equip),
            );
    }
}
