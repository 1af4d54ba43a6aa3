//! Weapon identifiers and per-hand equipment.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Attack side (which hand swings).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum Side {
    Left,
    #[default]
    Right,
}

/// Weapon identifiers of the character animation set.
///
/// Two-handed kinds occupy both hands; `Left*`/`Right*` kinds (and `Shield`)
/// occupy one.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Reflect,
)]
pub enum WeaponKind {
    #[default]
    Unarmed,
    TwoHandSword,
    TwoHandSpear,
    TwoHandAxe,
    TwoHandBow,
    TwoHandCrossbow,
    TwoHandStaff,
    TwoHandClub,
    Rifle,
    Shield,
    LeftSword,
    RightSword,
    LeftMace,
    RightMace,
    LeftDagger,
    RightDagger,
    LeftItem,
    RightItem,
    LeftPistol,
    RightPistol,
    RightSpear,
}

impl WeaponKind {
    pub fn is_two_handed(self) -> bool {
        matches!(
            self,
            WeaponKind::TwoHandSword
                | WeaponKind::TwoHandSpear
                | WeaponKind::TwoHandAxe
                | WeaponKind::TwoHandBow
                | WeaponKind::TwoHandCrossbow
                | WeaponKind::TwoHandStaff
                | WeaponKind::TwoHandClub
                | WeaponKind::Rifle
        )
    }

    /// Hand a one-handed weapon goes into. `None` for Unarmed and two-handed kinds.
    pub fn hand(self) -> Option<Side> {
        match self {
            WeaponKind::Shield
            | WeaponKind::LeftSword
            | WeaponKind::LeftMace
            | WeaponKind::LeftDagger
            | WeaponKind::LeftItem
            | WeaponKind::LeftPistol => Some(Side::Left),
            WeaponKind::RightSword
            | WeaponKind::RightMace
            | WeaponKind::RightDagger
            | WeaponKind::RightItem
            | WeaponKind::RightPistol
            | WeaponKind::RightSpear => Some(Side::Right),
            _ => None,
        }
    }
}

/// Оружие в руках бойца
///
/// Инвариант: two-handed kind всегда стоит в обеих руках одновременно.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct EquippedWeapons {
    pub left: WeaponKind,
    pub right: WeaponKind,
}

impl EquippedWeapons {
    pub fn for_side(&self, side: Side) -> WeaponKind {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn is_unarmed(&self) -> bool {
        self.left == WeaponKind::Unarmed && self.right == WeaponKind::Unarmed
    }

    pub fn has_two_handed_weapon(&self) -> bool {
        self.right.is_two_handed()
    }

    /// Puts `weapon` into the hand(s) it needs. A two-handed weapon replaces
    /// both hands; a one-handed weapon replaces a two-handed one entirely.
    pub fn equip(&mut self, weapon: WeaponKind) {
        if weapon.is_two_handed() {
            self.left = weapon;
            self.right = weapon;
            return;
        }

        if self.has_two_handed_weapon() {
            *self = Self::default();
        }

        match weapon.hand() {
            Some(Side::Left) => self.left = weapon,
            Some(Side::Right) => self.right = weapon,
            None => *self = Self::default(),
        }
    }

    pub fn unequip(&mut self) {
        *self = Self::default();
    }
}
