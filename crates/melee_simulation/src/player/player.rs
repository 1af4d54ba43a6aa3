//! Player control marker component
//!
//! Отмечает бойца, которым управляет игрок (в отличие от NpcFollower AI).

use bevy::prelude::*;

/// Marker component для player-controlled бойца
///
/// Input layer переводит клавиши в `PlayerCombatCommand`; команды для entity
/// без `Player` игнорируются.
///
/// # Архитектурная заметка
/// - AI systems работают только с `NpcFollower`, игрока не трогают
/// - `process_player_commands` фильтрует по `With<Player>`
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;
