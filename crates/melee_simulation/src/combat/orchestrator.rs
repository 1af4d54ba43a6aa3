//! Per-combatant combat orchestration.
//!
//! `CombatOrchestrator` owns the combatant's `AttackPhaseController`,
//! `HitResolver` and `HitLedger`, and subscribes to the controller's signal
//! stream:
//!
//! - `AnticipationStarted` → stale attack instance (if any) is released
//! - `ImpactStarted` → next attack-id, fresh hit set, sampling ON
//! - `ImpactEnded` → sampling OFF
//! - `AttackEnded` / `Interrupted` → hit set released
//!
//! The ECS layer calls `sample_tick` once per fixed tick; it is a no-op outside
//! Impact.

use bevy::prelude::*;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::combat::damage::Interruptible;
use crate::combat::defense::DefendState;
use crate::combat::hit_resolver::{
    AttackId, AttackInstance, HitCandidate, HitLedger, HitResolver, SpatialQuery,
};
use crate::combat::phase::{AttackCue, AttackPhase, AttackPhaseController, PhaseListener, PhaseSignal};
use crate::combat::weapon_catalog::WeaponCatalog;
use crate::components::{Combatant, EquippedWeapons, Side, Stamina, WeaponKind};
use crate::config::CombatConfig;

/// What the animation layer has to play for a started attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackRequest {
    pub attack_number: u8,
    pub side: Side,
    pub left_weapon: WeaponKind,
    pub right_weapon: WeaponKind,
    /// Crossfade duration (seconds)
    pub duration: f32,
}

/// Attack requested but not yet at Impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAttack {
    pub attack_number: u8,
    pub side: Side,
    pub weapon: WeaponKind,
}

/// Shared queue the orchestrator's own listener writes into.
#[derive(Debug, Default, Clone)]
struct SignalQueue(Arc<Mutex<VecDeque<PhaseSignal>>>);

impl SignalQueue {
    fn drain(&self) -> Vec<PhaseSignal> {
        let mut queue = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        queue.drain(..).collect()
    }
}

impl PhaseListener for SignalQueue {
    fn on_signal(&mut self, signal: PhaseSignal) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(signal);
    }
}

#[derive(Component, Debug)]
pub struct CombatOrchestrator {
    controller: AttackPhaseController,
    resolver: HitResolver,
    ledger: HitLedger,
    queue: SignalQueue,
    pending: Option<PendingAttack>,
    active: Option<AttackInstance>,
    sampling: bool,
    next_attack_id: AttackId,
    /// Signals already routed, kept for publication (ECS notifications)
    outbox: Vec<PhaseSignal>,
}

impl CombatOrchestrator {
    pub fn new(toughness: f32, catalog: Arc<WeaponCatalog>) -> Self {
        let mut controller = AttackPhaseController::new(toughness);
        let queue = SignalQueue::default();
        controller.subscribe(Box::new(queue.clone()));

        Self {
            controller,
            resolver: HitResolver::new(catalog),
            ledger: HitLedger::default(),
            queue,
            pending: None,
            active: None,
            sampling: false,
            next_attack_id: 1,
            outbox: Vec::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn phase(&self) -> AttackPhase {
        self.controller.phase()
    }

    pub fn controller(&self) -> &AttackPhaseController {
        &self.controller
    }

    pub fn resolver(&self) -> &HitResolver {
        &self.resolver
    }

    pub fn ledger(&self) -> &HitLedger {
        &self.ledger
    }

    pub fn toughness(&self) -> f32 {
        self.controller.toughness()
    }

    pub fn set_toughness(&mut self, toughness: f32) {
        self.controller.set_toughness(toughness);
    }

    pub fn is_sampling(&self) -> bool {
        self.sampling
    }

    pub fn active_attack(&self) -> Option<&AttackInstance> {
        self.active.as_ref()
    }

    pub fn pending_attack(&self) -> Option<&PendingAttack> {
        self.pending.as_ref()
    }

    /// Attack accepted, Anticipation cue not received yet.
    pub fn is_attack_requested(&self) -> bool {
        self.pending.is_some() && self.controller.phase() == AttackPhase::None
    }

    /// A requested attack counts as busy until its clip starts; Recovery still chains.
    pub fn can_start_attack(&self, can_act: bool) -> bool {
        can_act && !self.is_attack_requested() && self.controller.can_start_attack()
    }

    /// External observers of this combatant's phase stream.
    pub fn subscribe(&mut self, listener: Box<dyn PhaseListener>) -> crate::combat::phase::ListenerId {
        self.controller.subscribe(listener)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Starts an attack if the controller and the owner gate allow it.
    ///
    /// Chaining from Recovery ends the previous attack first (its hit set is
    /// released before the new attack can open one).
    pub fn perform_attack(
        &mut self,
        attack_number: u8,
        side: Side,
        weapons: &EquippedWeapons,
        can_act: bool,
        duration: f32,
    ) -> Option<AttackRequest> {
        if !self.can_start_attack(can_act) {
            return None;
        }

        if self.controller.phase() == AttackPhase::Recovery {
            self.controller.end_attack();
            self.route_signals();
        }
        self.controller.clear_interrupted();

        let weapon = weapons.for_side(side);
        self.pending = Some(PendingAttack {
            attack_number,
            side,
            weapon,
        });

        Some(AttackRequest {
            attack_number,
            side,
            left_weapon: weapons.left,
            right_weapon: weapons.right,
            duration,
        })
    }

    /// Feeds an animation cue to the controller.
    pub fn apply_cue(&mut self, cue: AttackCue) -> Option<PhaseSignal> {
        let signal = self.controller.apply_cue(cue);
        self.route_signals();
        signal
    }

    /// One hit-sampling step. Empty outside Impact.
    pub fn sample_tick<Q: SpatialQuery + ?Sized>(
        &mut self,
        attacker: Entity,
        pose: &Transform,
        spatial: &Q,
    ) -> Vec<HitCandidate> {
        if !self.sampling {
            return Vec::new();
        }
        let Some(instance) = self.active else {
            return Vec::new();
        };
        self.resolver
            .sample(attacker, pose, &instance, &mut self.ledger, spatial)
    }

    pub fn try_interrupt(&mut self, attacker_toughness: f32) -> bool {
        let interrupted = self.controller.try_interrupt(attacker_toughness);
        self.route_signals();
        interrupted
    }

    /// Forces the current attack (if any) to end, e.g. on death.
    pub fn cancel(&mut self) -> Option<PhaseSignal> {
        let signal = self.controller.end_attack();
        self.route_signals();
        self.pending = None;
        signal
    }

    /// Routed signals since the last call, in transition order.
    pub fn drain_signals(&mut self) -> Vec<PhaseSignal> {
        std::mem::take(&mut self.outbox)
    }

    fn route_signals(&mut self) {
        for signal in self.queue.drain() {
            match signal {
                PhaseSignal::AnticipationStarted => {
                    self.sampling = false;
                    if let Some(stale) = self.active.take() {
                        self.ledger.release(stale.attack_id);
                    }
                }
                PhaseSignal::ImpactStarted => self.open_attack_instance(),
                PhaseSignal::ImpactEnded => {
                    self.sampling = false;
                }
                PhaseSignal::AttackEnded | PhaseSignal::Interrupted { .. } => {
                    self.sampling = false;
                    self.pending = None;
                    if let Some(instance) = self.active.take() {
                        let hits = self.ledger.release(instance.attack_id).unwrap_or(0);
                        crate::logger::log(&format!(
                            "⚔️ Orchestrator: attack {} closed ({:?}, {} targets hit)",
                            instance.attack_id, signal, hits
                        ));
                    }
                }
            }
            self.outbox.push(signal);
        }
    }

    fn open_attack_instance(&mut self) {
        let attack_id = self.next_attack_id;
        self.next_attack_id += 1;

        let pending = self.pending.unwrap_or(PendingAttack {
            attack_number: 0,
            side: Side::Right,
            weapon: WeaponKind::Unarmed,
        });

        if !self.resolver.catalog().is_weapon_available(pending.weapon) {
            crate::logger::log(&format!(
                "🗡️ Orchestrator: no hit geometry for {:?}, attack {} will not hit",
                pending.weapon, attack_id
            ));
        }

        self.ledger.open(attack_id);
        self.active = Some(AttackInstance {
            attack_id,
            attack_number: pending.attack_number,
            side: pending.side,
            weapon: pending.weapon,
        });
        self.sampling = true;
    }
}

impl Interruptible for CombatOrchestrator {
    fn attack_phase(&self) -> AttackPhase {
        self.phase()
    }

    fn try_interrupt(&mut self, attacker_toughness: f32) -> bool {
        CombatOrchestrator::try_interrupt(self, attacker_toughness)
    }
}

/// Всё, что нужно бойцу для участия в melee бою
///
/// `Health`, `EquippedWeapons`, `Hurtbox` приходят через required components `Combatant`.
#[derive(Bundle)]
pub struct CombatantBundle {
    pub combatant: Combatant,
    pub orchestrator: CombatOrchestrator,
    pub stamina: Stamina,
    pub defend: DefendState,
}

impl CombatantBundle {
    pub fn new(toughness: f32, catalog: Arc<WeaponCatalog>, config: &CombatConfig) -> Self {
        Self {
            combatant: Combatant::new(toughness),
            orchestrator: CombatOrchestrator::new(toughness, catalog),
            stamina: Stamina::new(config.max_stamina, config.stamina_regen_rate),
            defend: DefendState::default(),
        }
    }

    /// Toughness taken from `config.toughness`.
    pub fn from_config(catalog: Arc<WeaponCatalog>, config: &CombatConfig) -> Self {
        Self::new(config.toughness, catalog, config)
    }
}
