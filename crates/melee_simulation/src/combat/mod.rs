//! Combat system module (animation-driven melee)
//!
//! ECS ответственность:
//! - Combat rules: attack phases, hit dedup, interrupts, block rolls, damage
//! - Game state: Health, Stamina, DefendState, CombatOrchestrator
//! - Events: AttackAnimationRequested, DamageDealt, EntityDied, PhaseNotification
//!
//! Presentation layer ответственность:
//! - Animation playback: sends AnimationCue (Anticipation/Impact/Recovery/AttackEnd)
//! - Spatial overlap queries (headless: HurtboxSnapshot)
//!
//! Порядок внутри FixedUpdate (`CombatSet`, chained):
//! Decide → Equip → Animate → Phases → Hits → Upkeep

use bevy::prelude::*;

pub mod damage;
pub mod defense;
pub mod events;
pub mod hit_resolver;
pub mod orchestrator;
pub mod phase;
pub mod systems;
pub mod timeline;
pub mod weapon_catalog;

#[cfg(test)]
mod hit_resolver_tests;
#[cfg(test)]
mod phase_tests;

// Re-export основных типов
pub use damage::{
    DamageDealt, DamageEvent, DamageIntake, DamageModel, EntityDied, HitOutcome, HitReaction,
    HitReactionRequest, Interruptible, RolledDamage,
};
pub use defense::{DefendEnded, DefendIntent, DefendStarted, DefendState, DefenseArbiter, DefenseOutcome, HitBlocked};
pub use events::{
    AnimationCue, AttackAnimationRequested, AttackIntent, AttackRefusal, AttackRefused, PhaseNotification,
};
pub use hit_resolver::{
    AttackId, AttackInstance, HitCandidate, HitLedger, HitResolver, HurtboxSnapshot, SpatialQuery,
    MAX_TRACKED_ATTACKS,
};
pub use orchestrator::{AttackRequest, CombatOrchestrator, CombatantBundle, PendingAttack};
pub use phase::{AttackCue, AttackPhase, AttackPhaseController, ListenerId, PhaseListener, PhaseSignal};
pub use timeline::{AttackTimeline, ScriptedAnimationPlugin, ScriptedAttackAnimation};
pub use weapon_catalog::{
    SharedWeaponCatalog, WeaponCatalog, WeaponProfile, WeaponProfileRecord, DEFAULT_ATTACK_RADIUS,
};

/// Этапы combat tick (FixedUpdate), выполняются строго по порядку.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Input, AI, suspended tasks → intents
    Decide,
    /// Equip/unequip intents
    Equip,
    /// Animation layer (headless animator)
    Animate,
    /// Attack start + animation cues → phase transitions
    Phases,
    /// Hit sampling + resolution
    Hits,
    /// Death, notifications, stamina
    Upkeep,
}

/// Combat Plugin
///
/// Регистрирует combat события, ресурсы (CombatConfig, SharedWeaponCatalog)
/// и системы в FixedUpdate. Ресурсы, вставленные до плагина, не перезаписываются.
///
/// Порядок выполнения:
/// 1. flag_missing_orchestrators: Combatant без orchestrator → CombatDisabled
/// 2. process_defend_intents: DefendIntent → DefendState
/// 3. start_attacks: AttackIntent → AttackAnimationRequested
/// 4. apply_animation_cues: AnimationCue → phase transitions
/// 5. sample_attack_hits: Impact → HitCandidate
/// 6. resolve_hit_candidates: block, interrupt, damage
/// 7. disable_combat_on_death, sync_combatant_toughness
/// 8. publish_phase_notifications, regenerate_stamina
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<AttackIntent>()
            .add_event::<AnimationCue>()
            .add_event::<AttackAnimationRequested>()
            .add_event::<AttackRefused>()
            .add_event::<PhaseNotification>()
            .add_event::<DefendIntent>()
            .add_event::<DefendStarted>()
            .add_event::<DefendEnded>()
            .add_event::<HitCandidate>()
            .add_event::<HitBlocked>()
            .add_event::<DamageDealt>()
            .add_event::<HitReactionRequest>()
            .add_event::<EntityDied>();

        app.init_resource::<crate::config::CombatConfig>()
            .init_resource::<SharedWeaponCatalog>()
            .register_type::<crate::config::CombatConfig>()
            .register_type::<crate::components::Combatant>()
            .register_type::<crate::components::Health>()
            .register_type::<crate::components::Stamina>()
            .register_type::<crate::components::EquippedWeapons>()
            .register_type::<DefendState>();

        app.configure_sets(
            FixedUpdate,
            (
                CombatSet::Decide,
                CombatSet::Equip,
                CombatSet::Animate,
                CombatSet::Phases,
                CombatSet::Hits,
                CombatSet::Upkeep,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                (
                    systems::flag_missing_orchestrators,
                    systems::process_defend_intents,
                    systems::start_attacks,
                    systems::apply_animation_cues,
                )
                    .chain()
                    .in_set(CombatSet::Phases),
                (systems::sample_attack_hits, systems::resolve_hit_candidates)
                    .chain()
                    .in_set(CombatSet::Hits),
                (
                    systems::disable_combat_on_death,
                    systems::sync_combatant_toughness,
                    systems::publish_phase_notifications,
                    systems::regenerate_stamina,
                )
                    .chain()
                    .in_set(CombatSet::Upkeep),
            ),
        );
    }
}
