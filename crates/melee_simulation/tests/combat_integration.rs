//! Combat integration test
//!
//! Headless дуэль: SimulationPlugin + scripted animator + headless navigation,
//! tick за tick через `run_tick` (app.update() с ручными часами).
//!
//! Проверяем:
//! - Health/Stamina инварианты
//! - Toughness решает, кто кого прерывает
//! - NPC follower подходит и атакует
//! - Нет паники/крашей

use bevy::prelude::*;
use melee_simulation::combat::{
    AttackIntent, HitReactionRequest, PhaseNotification, PhaseSignal,
};
use melee_simulation::*;

mod common;
use common::{record_events, recorded};

/// Helper: создать полный combat App с всеми plugins
fn create_combat_app(seed: u64, config: CombatConfig) -> App {
    let mut app = create_headless_app(seed);
    // До SimulationPlugin: init_resource не перезапишет
    app.insert_resource(config);
    app.add_plugins((SimulationPlugin, ScriptedAnimationPlugin, HeadlessNavigationPlugin));
    record_events::<PhaseNotification>(&mut app);
    record_events::<DamageDealt>(&mut app);
    record_events::<EntityDied>(&mut app);
    record_events::<HitReactionRequest>(&mut app);
    app
}

fn no_crit() -> CombatConfig {
    CombatConfig {
        critical_hit_chance: 0.0,
        ..Default::default()
    }
}

fn tick(app: &mut App) {
    run_tick(app);
}

/// Helper: боец с TwoHandSword, смотрит на `facing`
fn spawn_swordsman(app: &mut App, position: Vec3, facing: Vec3, toughness: f32) -> Entity {
    let catalog = app.world().resource::<SharedWeaponCatalog>().handle();
    let config = app.world().resource::<CombatConfig>().clone();
    let mut weapons = EquippedWeapons::default();
    weapons.equip(WeaponKind::TwoHandSword);

    app.world_mut()
        .spawn((
            CombatantBundle::new(toughness, catalog, &config),
            weapons,
            Transform::from_translation(position).looking_at(facing, Vec3::Y),
        ))
        .id()
}

fn attack(app: &mut App, entity: Entity) {
    app.world_mut().send_event(AttackIntent {
        entity,
        attack_number: 1,
        side: Side::Right,
    });
}

/// Атакуем, как только боец свободен и может заплатить stamina
fn drive_attacks(app: &mut App, fighters: &[Entity]) {
    let cost = app.world().resource::<CombatConfig>().base_attack_stamina_cost;
    for &fighter in fighters {
        let world = app.world();
        if world.get::<Dead>(fighter).is_some() {
            continue;
        }
        let Some(orchestrator) = world.get::<CombatOrchestrator>(fighter) else {
            continue;
        };
        let idle = orchestrator.phase() == AttackPhase::None && orchestrator.can_start_attack(true);
        let rested = world.get::<Stamina>(fighter).is_some_and(|s| s.can_afford(cost));
        if idle && rested {
            attack(app, fighter);
        }
    }
}

fn check_invariants(app: &App, fighters: &[Entity], tick: usize) {
    let world = app.world();
    for &fighter in fighters {
        let health = world.get::<Health>(fighter).expect("health");
        assert!(health.current <= health.max, "tick {}: health overflow", tick);

        let stamina = world.get::<Stamina>(fighter).expect("stamina");
        assert!(
            stamina.current >= 0.0 && stamina.current <= stamina.max,
            "tick {}: stamina {} out of range",
            tick,
            stamina.current
        );

        if world.get::<Dead>(fighter).is_some() {
            assert_eq!(health.current, 0, "tick {}: dead fighter with health", tick);
            let orchestrator = world.get::<CombatOrchestrator>(fighter).expect("orchestrator");
            assert_eq!(orchestrator.phase(), AttackPhase::None);
            assert!(!world.get::<Combatant>(fighter).expect("combatant").can_act);
        }
    }
}

fn phase_signals(app: &App, entity: Entity) -> Vec<PhaseSignal> {
    recorded::<PhaseNotification>(app)
        .into_iter()
        .filter(|n| n.entity == entity)
        .map(|n| n.signal)
        .collect()
}

/// Test: дуэль до смерти без краша, инварианты каждые 50 тиков
#[test]
fn test_duel_until_death() {
    let mut app = create_combat_app(42, CombatConfig::default());
    let a = spawn_swordsman(&mut app, Vec3::ZERO, Vec3::new(0.0, 0.0, -1.5), 10.0);
    let b = spawn_swordsman(&mut app, Vec3::new(0.0, 0.0, -1.5), Vec3::ZERO, 10.0);
    let fighters = [a, b];

    for t in 0..3000 {
        drive_attacks(&mut app, &fighters);
        tick(&mut app);

        if t % 50 == 0 {
            check_invariants(&app, &fighters, t);
        }
    }
    check_invariants(&app, &fighters, 3000);

    let deaths = recorded::<EntityDied>(&app).len();
    assert!(deaths >= 1, "3000 ticks of trading blows should kill someone");
    assert!(recorded::<DamageDealt>(&app).iter().all(|d| d.damage > 0));
}

/// Test: равная toughness в Impact → оба получают половину урона, никто не прерван
#[test]
fn test_simultaneous_swings_trade_half_damage() {
    let mut app = create_combat_app(1, no_crit());
    let a = spawn_swordsman(&mut app, Vec3::ZERO, Vec3::new(0.0, 0.0, -1.5), 10.0);
    let b = spawn_swordsman(&mut app, Vec3::new(0.0, 0.0, -1.5), Vec3::ZERO, 10.0);

    attack(&mut app, a);
    attack(&mut app, b);
    for _ in 0..60 {
        tick(&mut app);
    }

    let world = app.world();
    assert_eq!(world.get::<Health>(a).expect("health").current, 90);
    assert_eq!(world.get::<Health>(b).expect("health").current, 90);
    assert!(recorded::<DamageDealt>(&app).iter().all(|d| !d.interrupted));

    // Обе атаки дошли до конца
    for fighter in [a, b] {
        assert_eq!(phase_signals(&app, fighter).last(), Some(&PhaseSignal::AttackEnded));
    }
}

/// Test: первый удар прерывает противника в Anticipation, его Impact не наступает
#[test]
fn test_earlier_swing_interrupts_anticipation() {
    let mut app = create_combat_app(2, no_crit());
    let a = spawn_swordsman(&mut app, Vec3::ZERO, Vec3::new(0.0, 0.0, -1.5), 10.0);
    let b = spawn_swordsman(&mut app, Vec3::new(0.0, 0.0, -1.5), Vec3::ZERO, 10.0);

    attack(&mut app, b);
    for _ in 0..5 {
        tick(&mut app);
    }
    attack(&mut app, a);
    for _ in 0..60 {
        tick(&mut app);
    }

    let world = app.world();
    assert_eq!(world.get::<Health>(a).expect("health").current, 80);
    assert_eq!(world.get::<Health>(b).expect("health").current, 100);

    let signals = phase_signals(&app, a);
    assert!(signals.contains(&PhaseSignal::Interrupted {
        from: AttackPhase::Anticipation
    }));
    assert!(!signals.contains(&PhaseSignal::ImpactStarted));

    let reactions: Vec<_> = recorded::<HitReactionRequest>(&app)
        .into_iter()
        .filter(|r| r.entity == a)
        .collect();
    assert_eq!(reactions.len(), 1);
    assert!((1..3).contains(&reactions[0].variant));
}

/// Test: более "жесткий" атакующий прерывает Impact противника
#[test]
fn test_tougher_attacker_breaks_impact() {
    let mut app = create_combat_app(3, no_crit());
    let heavy = spawn_swordsman(&mut app, Vec3::ZERO, Vec3::new(0.0, 0.0, -1.5), 15.0);
    let light = spawn_swordsman(&mut app, Vec3::new(0.0, 0.0, -1.5), Vec3::ZERO, 10.0);

    attack(&mut app, heavy);
    attack(&mut app, light);
    for _ in 0..60 {
        tick(&mut app);
    }

    let world = app.world();
    // heavy бьет light в Impact (15 > 10): полный урон + прерывание
    assert_eq!(world.get::<Health>(light).expect("health").current, 80);
    assert!(phase_signals(&app, light).contains(&PhaseSignal::Interrupted {
        from: AttackPhase::Impact
    }));
    assert!(!phase_signals(&app, heavy)
        .iter()
        .any(|s| matches!(s, PhaseSignal::Interrupted { .. })));
}

/// Test: NPC follower подходит к игроку и бьет один раз
#[test]
fn test_follower_engages_player() {
    let mut app = create_combat_app(4, no_crit());
    let catalog = app.world().resource::<SharedWeaponCatalog>().handle();
    let config = app.world().resource::<CombatConfig>().clone();

    let player = app
        .world_mut()
        .spawn((
            CombatantBundle::from_config(catalog.clone(), &config),
            Player,
            Transform::default(),
        ))
        .id();
    let npc = app
        .world_mut()
        .spawn((
            CombatantBundle::from_config(catalog, &config),
            NpcFollower::new(player)
                .with_follow_distance(2.0)
                .with_approach_distance(1.5),
            Transform::from_xyz(0.0, 0.0, 10.0),
        ))
        .id();

    for _ in 0..500 {
        tick(&mut app);
    }

    let world = app.world();
    assert!(world.get::<EquippedWeapons>(npc).expect("weapons").has_two_handed_weapon());
    assert_eq!(world.get::<Health>(player).expect("health").current, 80);
    assert_eq!(phase_signals(&app, npc).last(), Some(&PhaseSignal::AttackEnded));
}

/// Test: base_attack_speed ускоряет scripted clip → Impact наступает раньше
#[test]
fn test_attack_speed_brings_impact_forward() {
    let health_after = |speed: f32| {
        let mut app = create_combat_app(
            5,
            CombatConfig {
                base_attack_speed: speed,
                ..no_crit()
            },
        );
        let a = spawn_swordsman(&mut app, Vec3::ZERO, Vec3::new(0.0, 0.0, -1.5), 10.0);
        let b = spawn_swordsman(&mut app, Vec3::new(0.0, 0.0, -1.5), Vec3::ZERO, 10.0);

        attack(&mut app, a);
        for _ in 0..10 {
            tick(&mut app);
        }
        app.world().get::<Health>(b).expect("health").current
    };

    // 2x: Impact через 6 тиков после Anticipation, 1x: через 12
    assert_eq!(health_after(2.0), 80);
    assert_eq!(health_after(1.0), 100);
}
