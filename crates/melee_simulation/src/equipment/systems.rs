//! Equipment system implementations
//!
//! # Systems
//!
//! - `process_equip_weapon`: equip weapon в руку/руки
//! - `process_unequip_weapon`: обе руки → Unarmed
//!
//! Смена оружия во время атаки (phase ≠ None, или атака запрошена и ждет
//! Anticipation) запрещена: attack request уже ушел в анимацию с текущим
//! набором оружия.

use bevy::prelude::*;

use crate::combat::CombatOrchestrator;
use crate::components::{Dead, EquippedWeapons};
use crate::equipment::events::*;
use crate::logger::{log, log_error};

fn is_mid_attack(orchestrator: Option<&CombatOrchestrator>) -> bool {
    orchestrator.is_some_and(|o| o.phase().is_attacking() || o.is_attack_requested())
}

// ============================================================================
// Weapon Equip
// ============================================================================

/// Process equip weapon intents
pub fn process_equip_weapon(
    mut events: EventReader<EquipWeaponIntent>,
    mut equipped: Query<(&mut EquippedWeapons, Option<&CombatOrchestrator>), Without<Dead>>,
    mut equipped_events: EventWriter<WeaponEquipped>,
) {
    for intent in events.read() {
        let Ok((mut weapons, orchestrator)) = equipped.get_mut(intent.entity) else {
            log_error(&format!("Entity {:?} missing EquippedWeapons", intent.entity));
            continue;
        };

        if is_mid_attack(orchestrator) {
            log(&format!(
                "🗡️ Equip {:?} refused: {:?} is attacking",
                intent.weapon, intent.entity
            ));
            continue;
        }

        weapons.equip(intent.weapon);
        equipped_events.write(WeaponEquipped {
            entity: intent.entity,
            weapon: intent.weapon,
            weapons: *weapons,
        });

        log(&format!(
            "✅ Equipped {:?} (entity: {:?}, hands: {:?}/{:?})",
            intent.weapon, intent.entity, weapons.left, weapons.right
        ));
    }
}

// ============================================================================
// Weapon Unequip
// ============================================================================

/// Process unequip weapon intents
pub fn process_unequip_weapon(
    mut events: EventReader<UnequipWeaponIntent>,
    mut equipped: Query<(&mut EquippedWeapons, Option<&CombatOrchestrator>), Without<Dead>>,
    mut unequipped_events: EventWriter<WeaponUnequipped>,
) {
    for intent in events.read() {
        let Ok((mut weapons, orchestrator)) = equipped.get_mut(intent.entity) else {
            log_error(&format!("Entity {:?} missing EquippedWeapons", intent.entity));
            continue;
        };

        if is_mid_attack(orchestrator) || weapons.is_unarmed() {
            continue;
        }

        let previous = *weapons;
        weapons.unequip();
        unequipped_events.write(WeaponUnequipped {
            entity: intent.entity,
            previous,
        });

        log(&format!("✅ Unequipped {:?}/{:?} (entity: {:?})", previous.left, previous.right, intent.entity));
    }
}
