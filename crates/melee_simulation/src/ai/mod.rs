//! AI decision-making module
//!
//! NPC follower: держится рядом с целью, а если цель долго вне радиуса,
//! подходит и атакует (через suspended tasks).

use bevy::prelude::*;

use crate::combat::CombatSet;

pub mod events;
pub mod follower;
pub mod navigation;


// Re-export основных типов
pub use events::{NavigationRequest, StopNavigation};
pub use follower::{follow_targets, NpcFollower};
pub use navigation::{HeadlessNavigationPlugin, HeadlessNavigator};

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate (CombatSet::Decide) для детерминизма.
/// follow_targets выполняется до resume_suspended_tasks, чтобы задача,
/// поставленная в этом тике, сразу увидела is_navigating = true.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<NavigationRequest>()
            .add_event::<StopNavigation>()
            .register_type::<NpcFollower>()
            .add_systems(
                FixedUpdate,
                follow_targets
                    .in_set(CombatSet::Decide)
                    .before(crate::scheduler::resume_suspended_tasks),
            );
    }
}
