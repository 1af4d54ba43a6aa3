//! Attack phase state machine (None → Anticipation → Impact → Recovery → None).
//!
//! # Architecture
//!
//! Transitions are driven only by external animation cues (`AttackCue`) and by
//! interruption. The controller never advances on its own: a stalled animation
//! leaves the combatant in its phase until interrupted or a later `AttackEnd`.
//!
//! ```text
//!   None ──cue Anticipation──▶ Anticipation ──cue Impact──▶ Impact
//!    ▲                              │                         │
//!    │                         interrupt                  cue Recovery
//!    │                         (always)                       ▼
//!    └───────── cue AttackEnd / interrupt (always) ──── Recovery
//! ```
//!
//! Impact itself is interruptible only by a strictly tougher attacker.
//!
//! # Observers
//!
//! Every accepted transition emits one `PhaseSignal`, returned to the caller and
//! broadcast to subscribed `PhaseListener`s in transition order. Listeners are
//! told when they are detached (explicit unsubscribe or controller drop).

use bevy::prelude::*;
use std::fmt;

/// Attack phases. Exactly one is active per combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub enum AttackPhase {
    /// Not attacking
    #[default]
    None,
    /// Windup (telegraph), hitbox OFF
    Anticipation,
    /// Damage window, hitbox ON
    Impact,
    /// Follow-through, hitbox OFF
    Recovery,
}

impl AttackPhase {
    pub fn is_attacking(self) -> bool {
        self != AttackPhase::None
    }
}

/// Phase-start signals coming from the animation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum AttackCue {
    Anticipation,
    Impact,
    Recovery,
    AttackEnd,
}

/// Notification emitted by an accepted transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum PhaseSignal {
    AnticipationStarted,
    ImpactStarted,
    ImpactEnded,
    AttackEnded,
    Interrupted { from: AttackPhase },
}

/// Observer of a controller's signal stream.
pub trait PhaseListener: Send + Sync {
    fn on_signal(&mut self, signal: PhaseSignal);

    /// Called once when the listener is unsubscribed or its controller is dropped.
    fn detached(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

/// Per-combatant attack state machine.
pub struct AttackPhaseController {
    phase: AttackPhase,
    /// Set by an interrupt, cleared by `end_attack` / `clear_interrupted`.
    /// Blocks a stale Impact cue from firing after the swing was broken.
    interrupted: bool,
    /// Toughness of the owning combatant (injected at construction)
    toughness: f32,
    listeners: Vec<(ListenerId, Box<dyn PhaseListener>)>,
    next_listener_id: u32,
}

impl AttackPhaseController {
    pub fn new(toughness: f32) -> Self {
        Self {
            phase: AttackPhase::None,
            interrupted: false,
            toughness,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    pub fn phase(&self) -> AttackPhase {
        self.phase
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn toughness(&self) -> f32 {
        self.toughness
    }

    pub fn set_toughness(&mut self, toughness: f32) {
        self.toughness = toughness;
    }

    /// A new attack may start only from None or Recovery.
    /// Owner-level gating (can act, stamina) is applied by the orchestrator.
    pub fn can_start_attack(&self) -> bool {
        matches!(self.phase, AttackPhase::None | AttackPhase::Recovery)
    }

    pub fn clear_interrupted(&mut self) {
        self.interrupted = false;
    }

    // ========================================================================
    // Forward transitions (animation cues)
    // ========================================================================

    /// Dispatches an animation cue to the matching transition.
    pub fn apply_cue(&mut self, cue: AttackCue) -> Option<PhaseSignal> {
        match cue {
            AttackCue::Anticipation => self.enter_anticipation(),
            AttackCue::Impact => self.enter_impact(),
            AttackCue::Recovery => self.enter_recovery(),
            AttackCue::AttackEnd => self.end_attack(),
        }
    }

    pub fn enter_anticipation(&mut self) -> Option<PhaseSignal> {
        if !self.can_start_attack() {
            return None;
        }
        self.transition(AttackPhase::Anticipation, PhaseSignal::AnticipationStarted)
    }

    /// No-op if the attack was interrupted since anticipation began.
    pub fn enter_impact(&mut self) -> Option<PhaseSignal> {
        if self.interrupted || self.phase != AttackPhase::Anticipation {
            return None;
        }
        self.transition(AttackPhase::Impact, PhaseSignal::ImpactStarted)
    }

    pub fn enter_recovery(&mut self) -> Option<PhaseSignal> {
        if self.phase != AttackPhase::Impact {
            return None;
        }
        self.transition(AttackPhase::Recovery, PhaseSignal::ImpactEnded)
    }

    /// Resets to None and clears the interrupted flag. Accepted from any phase;
    /// a no-op when there is nothing to end.
    pub fn end_attack(&mut self) -> Option<PhaseSignal> {
        if self.phase == AttackPhase::None && !self.interrupted {
            return None;
        }
        self.interrupted = false;
        self.transition(AttackPhase::None, PhaseSignal::AttackEnded)
    }

    // ========================================================================
    // Interruption
    // ========================================================================

    /// Interrupt policy by phase:
    /// - Anticipation: always (flags interrupted so the Impact cue is dropped)
    /// - Impact: only if `attacker_toughness > toughness` (ties favor the defender)
    /// - Recovery: always
    /// - None: nothing to interrupt
    pub fn try_interrupt(&mut self, attacker_toughness: f32) -> bool {
        self.interrupt(attacker_toughness).is_some()
    }

    /// Same as `try_interrupt`, returning the emitted signal.
    pub fn interrupt(&mut self, attacker_toughness: f32) -> Option<PhaseSignal> {
        let from = self.phase;
        match from {
            AttackPhase::None => None,
            AttackPhase::Anticipation => {
                self.interrupted = true;
                self.transition(AttackPhase::None, PhaseSignal::Interrupted { from })
            }
            AttackPhase::Impact => {
                if attacker_toughness > self.toughness {
                    self.interrupted = true;
                    self.transition(AttackPhase::None, PhaseSignal::Interrupted { from })
                } else {
                    None
                }
            }
            AttackPhase::Recovery => {
                self.transition(AttackPhase::None, PhaseSignal::Interrupted { from })
            }
        }
    }

    // ========================================================================
    // Observers
    // ========================================================================

    pub fn subscribe(&mut self, listener: Box<dyn PhaseListener>) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id = self.next_listener_id.wrapping_add(1);
        self.listeners.push((id, listener));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let Some(index) = self.listeners.iter().position(|(lid, _)| *lid == id) else {
            return false;
        };
        let (_, mut listener) = self.listeners.remove(index);
        listener.detached();
        true
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn transition(&mut self, to: AttackPhase, signal: PhaseSignal) -> Option<PhaseSignal> {
        self.phase = to;
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_signal(signal);
        }
        Some(signal)
    }
}

impl Default for AttackPhaseController {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl Drop for AttackPhaseController {
    fn drop(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.detached();
        }
    }
}

impl fmt::Debug for AttackPhaseController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttackPhaseController")
            .field("phase", &self.phase)
            .field("interrupted", &self.interrupted)
            .field("toughness", &self.toughness)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
