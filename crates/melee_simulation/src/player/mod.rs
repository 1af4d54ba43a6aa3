//! Player module: player-controlled combatant + input command mapping

use bevy::prelude::*;

use crate::combat::CombatSet;

pub mod commands;
pub mod player;


pub use commands::{process_player_commands, CombatCommand, PlayerCombatCommand, TOGGLE_WEAPON};
pub use player::Player;

/// Player plugin: `PlayerCombatCommand` → intents в `CombatSet::Decide`
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerCombatCommand>()
            .register_type::<Player>()
            .add_systems(FixedUpdate, process_player_commands.in_set(CombatSet::Decide));
    }
}
