//! Player input mapping → combat/equipment intents
//!
//! | Command        | Intent                                              |
//! |----------------|-----------------------------------------------------|
//! | Attack         | `AttackIntent`                                      |
//! | ToggleWeapon   | right hand Unarmed → equip TwoHandSword, else unequip |
//! | Defend(on)     | `DefendIntent`                                      |

use bevy::prelude::*;

use crate::combat::{AttackIntent, DefendIntent};
use crate::components::{EquippedWeapons, Side, WeaponKind};
use crate::equipment::{EquipWeaponIntent, UnequipWeaponIntent};
use crate::player::Player;

/// Оружие, которое достает ToggleWeapon
pub const TOGGLE_WEAPON: WeaponKind = WeaponKind::TwoHandSword;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatCommand {
    Attack { attack_number: u8, side: Side },
    ToggleWeapon,
    Defend(bool),
}

/// Команда от input layer
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerCombatCommand {
    pub entity: Entity,
    pub command: CombatCommand,
}

impl PlayerCombatCommand {
    /// Basic attack (number 1, right hand)
    pub fn attack(entity: Entity) -> Self {
        Self {
            entity,
            command: CombatCommand::Attack {
                attack_number: 1,
                side: Side::Right,
            },
        }
    }
}

/// System: player commands → intents (CombatSet::Decide)
pub fn process_player_commands(
    mut commands: EventReader<PlayerCombatCommand>,
    players: Query<&EquippedWeapons, With<Player>>,
    mut attacks: EventWriter<AttackIntent>,
    mut equips: EventWriter<EquipWeaponIntent>,
    mut unequips: EventWriter<UnequipWeaponIntent>,
    mut defends: EventWriter<DefendIntent>,
) {
    for PlayerCombatCommand { entity, command } in commands.read().copied() {
        let Ok(weapons) = players.get(entity) else {
            crate::logger::log_warning(&format!("Player command {:?} for non-player {:?}", command, entity));
            continue;
        };

        match command {
            CombatCommand::Attack { attack_number, side } => {
                attacks.write(AttackIntent {
                    entity,
                    attack_number,
                    side,
                });
            }
            CombatCommand::ToggleWeapon => {
                if weapons.right == WeaponKind::Unarmed {
                    equips.write(EquipWeaponIntent {
                        entity,
                        weapon: TOGGLE_WEAPON,
                    });
                } else {
                    unequips.write(UnequipWeaponIntent { entity });
                }
            }
            CombatCommand::Defend(defending) => {
                defends.write(DefendIntent { entity, defending });
            }
        }
    }
}
