//! Headless attack animator.
//!
//! Stands in for the animation layer when nothing else plays attacks: every
//! `AttackAnimationRequested` starts a scripted timeline that emits the four
//! phase cues at fixed tick offsets. Interruption (or a hit reaction) stops it,
//! the way a real animator would crossfade into the reaction clip.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::events::{AnimationCue, AttackAnimationRequested, PhaseNotification};
use crate::combat::phase::{AttackCue, PhaseSignal};
use crate::combat::CombatSet;
use crate::config::CombatConfig;

/// Tick offsets (from attack start) of each cue at attack speed 1.0.
/// 60Hz: 36 ticks = 0.6s swing.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackTimeline {
    pub anticipation_tick: u32,
    pub impact_tick: u32,
    pub recovery_tick: u32,
    pub end_tick: u32,
}

impl Default for AttackTimeline {
    fn default() -> Self {
        Self {
            anticipation_tick: 0,
            impact_tick: 12,
            recovery_tick: 24,
            end_tick: 36,
        }
    }
}

impl AttackTimeline {
    fn cues(&self) -> [(u32, AttackCue); 4] {
        [
            (self.anticipation_tick, AttackCue::Anticipation),
            (self.impact_tick, AttackCue::Impact),
            (self.recovery_tick, AttackCue::Recovery),
            (self.end_tick, AttackCue::AttackEnd),
        ]
    }

    /// Cue offsets for a clip played at `speed` (2.0 = twice as fast).
    pub fn cues_at(&self, speed: f32) -> [(u32, AttackCue); 4] {
        let speed = if speed.is_finite() && speed > 0.0 { speed } else { 1.0 };
        self.cues()
            .map(|(tick, cue)| (((tick as f32) / speed).round() as u32, cue))
    }
}

/// Attack clip currently "playing" on an entity.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptedAttackAnimation {
    pub elapsed_ticks: u32,
    /// Index of the next cue to emit
    pub next_cue: usize,
}

/// System: stop clips whose attack was interrupted.
pub fn stop_interrupted_animations(
    mut commands: Commands,
    mut notifications: EventReader<PhaseNotification>,
    playing: Query<(), With<ScriptedAttackAnimation>>,
) {
    for notification in notifications.read() {
        if matches!(notification.signal, PhaseSignal::Interrupted { .. })
            && playing.contains(notification.entity)
        {
            commands.entity(notification.entity).remove::<ScriptedAttackAnimation>();
        }
    }
}

/// System: AttackAnimationRequested → fresh clip (replaces a clip still playing).
pub fn start_scripted_animations(
    mut commands: Commands,
    mut requests: EventReader<AttackAnimationRequested>,
) {
    for requested in requests.read() {
        commands
            .entity(requested.entity)
            .insert(ScriptedAttackAnimation::default());
    }
}

/// System: emit due cues and advance every clip by one tick.
///
/// Clips play at `CombatConfig::base_attack_speed`.
pub fn advance_scripted_animations(
    mut commands: Commands,
    timeline: Res<AttackTimeline>,
    config: Res<CombatConfig>,
    mut clips: Query<(Entity, &mut ScriptedAttackAnimation)>,
    mut cues: EventWriter<AnimationCue>,
) {
    let schedule = timeline.cues_at(config.base_attack_speed);

    for (entity, mut clip) in clips.iter_mut() {
        while let Some((tick, cue)) = schedule.get(clip.next_cue).copied() {
            if tick > clip.elapsed_ticks {
                break;
            }
            cues.write(AnimationCue { entity, cue });
            clip.next_cue += 1;
        }

        if clip.next_cue >= schedule.len() {
            commands.entity(entity).remove::<ScriptedAttackAnimation>();
        } else {
            clip.elapsed_ticks += 1;
        }
    }
}

/// Headless animation layer: scripted attack clips on the fixed tick.
pub struct ScriptedAnimationPlugin;

impl Plugin for ScriptedAnimationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AttackTimeline>().add_systems(
            FixedUpdate,
            (
                stop_interrupted_animations,
                start_scripted_animations,
                advance_scripted_animations,
            )
                .chain()
                .in_set(CombatSet::Animate),
        );
    }
}
