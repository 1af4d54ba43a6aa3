//! Melee Simulation Core
//!
//! ECS-симуляция ближнего боя на Bevy 0.16 (headless, fixed tick).
//!
//! HYBRID ARCHITECTURE:
//! - ECS = combat rules (attack phases, hit dedup, interrupts, blocks, damage)
//! - Presentation layer = animation playback, spatial queries, navigation
//!
//! Связь только через события: presentation пишет `AnimationCue`, читает
//! `AttackAnimationRequested` / `HitReactionRequest` / `WeaponEquipped`.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod equipment;
pub mod error;
pub mod logger;
pub mod player;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export основных типов для удобства
pub use ai::{AIPlugin, HeadlessNavigationPlugin, NpcFollower};
pub use combat::{
    AttackCue, AttackPhase, AttackPhaseController, CombatOrchestrator, CombatPlugin, CombatSet,
    CombatantBundle, DamageDealt, EntityDied, ScriptedAnimationPlugin, SharedWeaponCatalog,
    WeaponCatalog,
};
pub use components::*;
pub use config::{BlockPolicy, CombatConfig};
pub use equipment::EquipmentPlugin;
pub use error::{ConfigError, ConfigResult};
pub use player::{Player, PlayerCombatCommand, PlayerPlugin};
pub use scheduler::SchedulerPlugin;

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Animation и navigation providers сюда не входят: headless runner добавляет
/// `ScriptedAnimationPlugin` + `HeadlessNavigationPlugin`, engine bridge ставит свои.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_duration(tick_duration()))
            // Детерминистичный RNG (seed по умолчанию)
            .init_resource::<DeterministicRng>()
            .add_plugins((
                CombatPlugin,
                EquipmentPlugin,
                SchedulerPlugin,
                AIPlugin,
                PlayerPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Все броски (crit, block, reaction variant) идут через него, в порядке
/// обработки HitCandidate → одинаковый seed дает одинаковый бой.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub const DEFAULT_SEED: u64 = 42;

    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

/// Частота simulation tick (FixedUpdate)
pub const TICK_RATE_HZ: f64 = 60.0;

/// Длительность одного tick; общая для `Time<Fixed>` и manual clock.
pub fn tick_duration() -> Duration {
    Duration::from_secs_f64(1.0 / TICK_RATE_HZ)
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Плагины подсистем не добавляются: тесты собирают нужный набор сами.
/// Часы ручные: каждый `app.update()` продвигает время ровно на один tick.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_duration(tick_duration())) // 60Hz FixedUpdate
        .insert_resource(TimeUpdateStrategy::ManualDuration(tick_duration()));

    app
}

/// Один simulation tick: полный `app.update()` (swap событий в `First`,
/// затем ровно один FixedUpdate).
///
/// Самый первый update только запускает часы (delta = 0), поэтому при первом
/// вызове он прогоняется дополнительно.
pub fn run_tick(app: &mut App) {
    if app.world().resource::<Time<Real>>().first_update().is_none() {
        app.update();
    }
    app.update();
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
