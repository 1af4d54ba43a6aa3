//! Damage calculation + target-side intake
//!
//! Pipeline для одного попадания:
//! 1. `DamageModel::roll`: base damage × weapon multiplier (× crit)
//! 2. `DefenseArbiter`: блок (см. defense.rs)
//! 3. `DamageIntake::receive_hit`: interrupt-then-damage policy цели
//!
//! # Interrupt-then-damage
//!
//! ```text
//! target attacking? ──no──────────────────────────▶ full damage + reaction
//!        │yes
//! try_interrupt(attacker_toughness) ──true────────▶ full damage + reaction
//!        │false
//!        └──▶ damage × uninterrupted_fraction, attack continues, no reaction
//! ```

use bevy::prelude::*;
use rand::Rng;

use crate::combat::phase::{AttackPhase, AttackPhaseController};
use crate::components::Health;
use crate::config::CombatConfig;

/// Anything that owns an attack phase and can be interrupted by a hit.
pub trait Interruptible {
    fn attack_phase(&self) -> AttackPhase;
    fn try_interrupt(&mut self, attacker_toughness: f32) -> bool;
}

impl Interruptible for AttackPhaseController {
    fn attack_phase(&self) -> AttackPhase {
        self.phase()
    }

    fn try_interrupt(&mut self, attacker_toughness: f32) -> bool {
        AttackPhaseController::try_interrupt(self, attacker_toughness)
    }
}

/// One incoming hit, consumed synchronously by the target's intake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub attacker: Entity,
    pub target: Entity,
    pub attacker_position: Vec3,
    pub attacker_toughness: f32,
    pub damage: f32,
}

// ============================================================================
// Damage model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolledDamage {
    pub amount: f32,
    pub is_critical: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageModel {
    pub base_damage: f32,
    pub critical_hit_chance: f32,
    pub critical_hit_multiplier: f32,
}

impl Default for DamageModel {
    fn default() -> Self {
        Self::from_config(&CombatConfig::default())
    }
}

impl DamageModel {
    pub fn from_config(config: &CombatConfig) -> Self {
        Self {
            base_damage: config.base_attack_damage,
            critical_hit_chance: config.critical_hit_chance,
            critical_hit_multiplier: config.critical_hit_multiplier,
        }
    }

    /// Формула: base × weapon_multiplier, × crit_multiplier при успешном crit roll.
    ///
    /// Crit roll выполняется всегда, чтобы поток RNG не зависел от шанса.
    pub fn roll<R: Rng + ?Sized>(&self, weapon_multiplier: f32, rng: &mut R) -> RolledDamage {
        let is_critical = rng.gen::<f32>() < self.critical_hit_chance;
        let mut amount = self.base_damage * weapon_multiplier;
        if is_critical {
            amount *= self.critical_hit_multiplier;
        }
        RolledDamage { amount, is_critical }
    }
}

// ============================================================================
// Intake
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitReaction {
    /// Interrupted (or idle): plays the "got hit" reaction.
    Staggered,
    /// Kept attacking through the hit, reduced damage.
    Absorbed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    pub reaction: HitReaction,
    pub interrupted: bool,
    pub applied_damage: u32,
    pub target_died: bool,
    /// Variant index of the hit reaction animation (1..3), only when staggered.
    pub reaction_variant: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageIntake {
    pub uninterrupted_fraction: f32,
}

impl Default for DamageIntake {
    fn default() -> Self {
        Self::from_config(&CombatConfig::default())
    }
}

impl DamageIntake {
    pub fn from_config(config: &CombatConfig) -> Self {
        Self {
            uninterrupted_fraction: config.uninterrupted_damage_fraction,
        }
    }

    /// Applies `event` to `health`.
    ///
    /// `target` is the target's own phase owner; a target without one (a dummy,
    /// a prop) is treated as never attacking.
    pub fn receive_hit<I, R>(
        &self,
        target: Option<&mut I>,
        health: &mut Health,
        event: &DamageEvent,
        rng: &mut R,
    ) -> HitOutcome
    where
        I: Interruptible + ?Sized,
        R: Rng + ?Sized,
    {
        let (was_attacking, interrupted) = match target {
            Some(target) if target.attack_phase().is_attacking() => {
                (true, target.try_interrupt(event.attacker_toughness))
            }
            _ => (false, false),
        };

        let (reaction, amount) = if interrupted || !was_attacking {
            (HitReaction::Staggered, event.damage)
        } else {
            (HitReaction::Absorbed, event.damage * self.uninterrupted_fraction)
        };

        let was_alive = health.is_alive();
        let applied_damage = health.take_damage(to_health_units(amount));
        let target_died = was_alive && !health.is_alive();

        let reaction_variant = match reaction {
            HitReaction::Staggered => Some(rng.gen_range(1..3)),
            HitReaction::Absorbed => None,
        };

        HitOutcome {
            reaction,
            interrupted,
            applied_damage,
            target_died,
            reaction_variant,
        }
    }
}

fn to_health_units(amount: f32) -> u32 {
    if amount.is_finite() && amount > 0.0 {
        amount.round() as u32
    } else {
        0
    }
}

// ============================================================================
// Events
// ============================================================================

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub is_critical: bool,
    pub interrupted: bool,
    pub target_died: bool,
}

/// Событие: entity умер (health == 0)
#[derive(Event, Debug, Clone, Copy)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Запрос анимации "got hit" для presentation layer
#[derive(Event, Debug, Clone, Copy)]
pub struct HitReactionRequest {
    pub entity: Entity,
    pub variant: u8,
    /// Откуда пришел удар (для направления реакции)
    pub attacker_position: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn event(attacker_toughness: f32, damage: f32) -> DamageEvent {
        DamageEvent {
            attacker: Entity::from_raw(1),
            target: Entity::from_raw(2),
            attacker_position: Vec3::ZERO,
            attacker_toughness,
            damage,
        }
    }

    fn controller_in(phase: AttackPhase, toughness: f32) -> AttackPhaseController {
        let mut controller = AttackPhaseController::new(toughness);
        let steps = match phase {
            AttackPhase::None => 0,
            AttackPhase::Anticipation => 1,
            AttackPhase::Impact => 2,
            AttackPhase::Recovery => 3,
        };
        if steps >= 1 {
            controller.enter_anticipation();
        }
        if steps >= 2 {
            controller.enter_impact();
        }
        if steps >= 3 {
            controller.enter_recovery();
        }
        controller
    }

    #[test]
    fn test_recovery_target_interrupted_takes_full_damage() {
        let intake = DamageIntake::default();
        let mut target = controller_in(AttackPhase::Recovery, 10.0);
        let mut health = Health::new(100);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let outcome = intake.receive_hit(Some(&mut target), &mut health, &event(5.0, 20.0), &mut rng);

        assert!(outcome.interrupted);
        assert_eq!(outcome.reaction, HitReaction::Staggered);
        assert_eq!(outcome.applied_damage, 20);
        assert_eq!(health.current, 80);
        assert_eq!(target.phase(), AttackPhase::None);
    }

    #[test]
    fn test_impact_target_absorbs_weaker_hit() {
        let intake = DamageIntake::default();
        let mut target = controller_in(AttackPhase::Impact, 10.0);
        let mut health = Health::new(100);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let outcome = intake.receive_hit(Some(&mut target), &mut health, &event(3.0, 20.0), &mut rng);

        assert!(!outcome.interrupted);
        assert_eq!(outcome.reaction, HitReaction::Absorbed);
        assert_eq!(outcome.applied_damage, 10);
        assert_eq!(outcome.reaction_variant, None);
        assert_eq!(target.phase(), AttackPhase::Impact);
    }

    #[test]
    fn test_idle_target_takes_full_damage() {
        let intake = DamageIntake::default();
        let mut target = AttackPhaseController::new(10.0);
        let mut health = Health::new(100);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let outcome = intake.receive_hit(Some(&mut target), &mut health, &event(0.0, 15.0), &mut rng);

        assert!(!outcome.interrupted);
        assert_eq!(outcome.reaction, HitReaction::Staggered);
        assert_eq!(health.current, 85);
    }

    #[test]
    fn test_target_without_controller() {
        let intake = DamageIntake::default();
        let mut health = Health::new(10);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let outcome = intake.receive_hit::<AttackPhaseController, _>(None, &mut health, &event(1.0, 25.0), &mut rng);

        assert_eq!(outcome.applied_damage, 10);
        assert!(outcome.target_died);
    }

    #[test]
    fn test_reaction_variant_in_range() {
        let intake = DamageIntake::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for _ in 0..200 {
            let mut health = Health::new(1000);
            let outcome =
                intake.receive_hit::<AttackPhaseController, _>(None, &mut health, &event(1.0, 1.0), &mut rng);
            let variant = outcome.reaction_variant.expect("staggered hit has a variant");
            assert!((1..3).contains(&variant));
        }
    }

    #[test]
    fn test_dead_target_does_not_die_twice() {
        let intake = DamageIntake::default();
        let mut health = Health::new(10);
        health.take_damage(10);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let outcome = intake.receive_hit::<AttackPhaseController, _>(None, &mut health, &event(1.0, 5.0), &mut rng);
        assert!(!outcome.target_died);
        assert_eq!(outcome.applied_damage, 0);
    }

    #[test]
    fn test_damage_model_without_crit() {
        let model = DamageModel {
            base_damage: 10.0,
            critical_hit_chance: 0.0,
            critical_hit_multiplier: 2.0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rolled = model.roll(2.0, &mut rng);
        assert_eq!(rolled.amount, 20.0);
        assert!(!rolled.is_critical);
    }

    #[test]
    fn test_damage_model_guaranteed_crit() {
        let model = DamageModel {
            base_damage: 10.0,
            critical_hit_chance: 1.0,
            critical_hit_multiplier: 2.0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rolled = model.roll(1.5, &mut rng);
        assert_eq!(rolled.amount, 30.0);
        assert!(rolled.is_critical);
    }

    #[test]
    fn test_negative_damage_applies_nothing() {
        assert_eq!(to_health_units(-3.0), 0);
        assert_eq!(to_health_units(f32::NAN), 0);
        assert_eq!(to_health_units(2.6), 3);
    }
}
