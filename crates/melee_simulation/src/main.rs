//! Headless melee duel
//!
//! Игрок-манекен против NPC follower: NPC ждет attack_delay, подходит,
//! достает TwoHandSword и атакует; игрок отвечает ударом, когда свободен.
//! Анимация: scripted timeline, навигация: прямая линия.
//!
//! Usage: `melee_simulation [seed] [ticks]`

use bevy::prelude::*;
use melee_simulation::combat::{AttackIntent, PhaseNotification};
use melee_simulation::*;

const CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/combat.ron");
const WEAPONS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/weapons.ron");

/// Сколько phase transitions опубликовано за прогон
#[derive(Resource, Default)]
struct TransitionCount(usize);

fn count_phase_transitions(mut notifications: EventReader<PhaseNotification>, mut count: ResMut<TransitionCount>) {
    count.0 += notifications.read().count();
}

fn main() {
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(DeterministicRng::DEFAULT_SEED);
    let ticks: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(1200);

    println!("Starting headless melee duel (seed: {}, ticks: {})", seed, ticks);

    let mut app = create_headless_app(seed);
    logger::set_log_level(logger::LogLevel::Info);

    let config = CombatConfig::load_or_default(CONFIG_PATH);
    let catalog = SharedWeaponCatalog::new(WeaponCatalog::load_or_default(WEAPONS_PATH));
    app.insert_resource(config.clone())
        .insert_resource(catalog.clone())
        .add_plugins((SimulationPlugin, ScriptedAnimationPlugin, HeadlessNavigationPlugin))
        .init_resource::<TransitionCount>()
        .add_systems(FixedUpdate, count_phase_transitions.after(CombatSet::Upkeep));

    let mut sword = EquippedWeapons::default();
    sword.equip(WeaponKind::TwoHandSword);

    let player = app
        .world_mut()
        .spawn((
            CombatantBundle::from_config(catalog.handle(), &config),
            sword,
            Player,
            Transform::default(),
        ))
        .id();
    let npc = app
        .world_mut()
        .spawn((
            CombatantBundle::from_config(catalog.handle(), &config),
            NpcFollower::new(player)
                .with_follow_distance(2.0)
                .with_approach_distance(1.5),
            Transform::from_xyz(0.0, 0.0, 8.0),
        ))
        .id();

    for tick in 0..ticks {
        counter_attack(&mut app, player, npc);
        run_tick(&mut app);

        if tick % 120 == 0 {
            report(&app, tick, &[player, npc]);
        }
        if app.world().get::<Dead>(player).is_some() || app.world().get::<Dead>(npc).is_some() {
            report(&app, tick, &[player, npc]);
            break;
        }
    }

    let transitions = app.world().resource::<TransitionCount>().0;
    println!("Simulation complete! ({} phase transitions)", transitions);
}

/// Игрок бьет в ответ, если NPC рядом и сам игрок свободен
fn counter_attack(app: &mut App, player: Entity, npc: Entity) {
    let world = app.world();
    let (Some(own), Some(enemy)) = (world.get::<Transform>(player), world.get::<Transform>(npc)) else {
        return;
    };
    if own.translation.distance(enemy.translation) > 2.0 {
        return;
    }
    let idle = world
        .get::<CombatOrchestrator>(player)
        .is_some_and(|o| o.phase() == AttackPhase::None && o.can_start_attack(true));
    let cost = world.resource::<CombatConfig>().base_attack_stamina_cost;
    let rested = world.get::<Stamina>(player).is_some_and(|s| s.can_afford(cost));
    if !idle || !rested {
        return;
    }

    let facing = enemy.translation.with_y(own.translation.y);
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
        transform.look_at(facing, Vec3::Y);
    }
    app.world_mut().send_event(AttackIntent {
        entity: player,
        attack_number: 1,
        side: Side::Right,
    });
}

fn report(app: &App, tick: usize, fighters: &[Entity]) {
    let world = app.world();
    for &fighter in fighters {
        let health = world.get::<Health>(fighter).map(|h| h.current).unwrap_or(0);
        let stamina = world.get::<Stamina>(fighter).map(|s| s.current).unwrap_or(0.0);
        let phase = world.get::<CombatOrchestrator>(fighter).map(|o| o.phase()).unwrap_or_default();
        println!(
            "Tick {}: {:?} hp={} stamina={:.1} phase={:?}",
            tick, fighter, health, stamina, phase
        );
    }
}
