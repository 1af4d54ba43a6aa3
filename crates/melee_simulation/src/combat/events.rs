//! Combat events (ECS ↔ animation/input layers).
//!
//! Inbound: `AttackIntent` (player/AI), `AnimationCue` (animation layer).
//! Outbound: `AttackAnimationRequested`, `PhaseNotification`, `AttackRefused`.

use bevy::prelude::*;

use crate::combat::orchestrator::AttackRequest;
use crate::combat::phase::{AttackCue, PhaseSignal};
use crate::components::Side;

/// Запрос атаки от игрока или AI
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackIntent {
    pub entity: Entity,
    pub attack_number: u8,
    pub side: Side,
}

/// Phase-start cue from the animation layer (animation callback).
#[derive(Event, Debug, Clone, Copy)]
pub struct AnimationCue {
    pub entity: Entity,
    pub cue: AttackCue,
}

/// Attack accepted: the animation layer should play `request`.
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackAnimationRequested {
    pub entity: Entity,
    pub request: AttackRequest,
}

/// Why an `AttackIntent` did not start an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackRefusal {
    /// Phase is Anticipation or Impact
    Busy,
    /// `Combatant::can_act` is false
    CannotAct,
    /// Not enough stamina
    Exhausted,
    /// Entity has no combat orchestrator (or is dead)
    Unavailable,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct AttackRefused {
    pub entity: Entity,
    pub reason: AttackRefusal,
}

/// Every phase signal of every combatant, in transition order per entity.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PhaseNotification {
    pub entity: Entity,
    pub signal: PhaseSignal,
}
