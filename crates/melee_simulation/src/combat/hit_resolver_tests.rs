//! Tests for HitResolver sampling and HitLedger dedup.

#[cfg(test)]
mod tests {
    use super::super::hit_resolver::*;
    use super::super::weapon_catalog::{WeaponCatalog, WeaponProfileRecord};
    use crate::components::{Side, WeaponKind};
    use bevy::prelude::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn sword_catalog() -> Arc<WeaponCatalog> {
        Arc::new(WeaponCatalog::from_records(&[WeaponProfileRecord {
            weapon: WeaponKind::TwoHandSword,
            attack_radius: 0.5,
            attack_points: vec![[0.0, 0.0, -1.0], [0.0, 0.0, -2.0]],
            damage_multiplier: 1.0,
        }]))
    }

    fn instance(attack_id: AttackId, weapon: WeaponKind) -> AttackInstance {
        AttackInstance {
            attack_id,
            attack_number: 1,
            side: Side::Right,
            weapon,
        }
    }

    #[test]
    fn test_target_hit_once_across_ticks() {
        let resolver = HitResolver::new(sword_catalog());
        let attacker = Entity::from_raw(1);
        let target = Entity::from_raw(2);
        let spatial = HurtboxSnapshot::new(vec![(target, Vec3::new(0.0, 0.0, -1.0), 0.5)]);

        let mut ledger = HitLedger::default();
        ledger.open(7);
        let swing = instance(7, WeaponKind::TwoHandSword);

        let first = resolver.sample(attacker, &Transform::IDENTITY, &swing, &mut ledger, &spatial);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].target, target);
        assert_eq!(first[0].attack_id, 7);

        for _ in 0..30 {
            let again = resolver.sample(attacker, &Transform::IDENTITY, &swing, &mut ledger, &spatial);
            assert!(again.is_empty());
        }
        assert_eq!(ledger.hit_count(7), 1);
    }

    #[test]
    fn test_target_overlapping_two_points_counts_once() {
        let resolver = HitResolver::new(sword_catalog());
        let target = Entity::from_raw(2);
        // Большой hurtbox перекрывает обе точки
        let spatial = HurtboxSnapshot::new(vec![(target, Vec3::new(0.0, 0.0, -1.5), 1.5)]);

        let mut ledger = HitLedger::default();
        ledger.open(1);
        let hits = resolver.sample(
            Entity::from_raw(1),
            &Transform::IDENTITY,
            &instance(1, WeaponKind::TwoHandSword),
            &mut ledger,
            &spatial,
        );
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_attacker_never_hits_itself() {
        let resolver = HitResolver::new(sword_catalog());
        let attacker = Entity::from_raw(1);
        let spatial = HurtboxSnapshot::new(vec![(attacker, Vec3::new(0.0, 0.0, -1.0), 2.0)]);

        let mut ledger = HitLedger::default();
        ledger.open(1);
        let hits = resolver.sample(
            attacker,
            &Transform::IDENTITY,
            &instance(1, WeaponKind::TwoHandSword),
            &mut ledger,
            &spatial,
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn test_points_follow_attacker_pose() {
        let resolver = HitResolver::new(sword_catalog());
        // Развернуты на 180° вокруг Y: forward (-Z) смотрит в +Z
        let pose = Transform::from_xyz(10.0, 0.0, 0.0).with_rotation(Quat::from_rotation_y(std::f32::consts::PI));

        let points = resolver.world_attack_points(&pose, WeaponKind::TwoHandSword);
        assert_eq!(points.len(), 2);
        assert!(points[0].distance(Vec3::new(10.0, 0.0, 1.0)) < 1e-4);
        assert!(points[1].distance(Vec3::new(10.0, 0.0, 2.0)) < 1e-4);
    }

    #[test]
    fn test_unknown_weapon_generates_no_hits() {
        let resolver = HitResolver::new(sword_catalog());
        let target = Entity::from_raw(2);
        let spatial = HurtboxSnapshot::new(vec![(target, Vec3::ZERO, 5.0)]);

        let mut ledger = HitLedger::default();
        ledger.open(1);
        let hits = resolver.sample(
            Entity::from_raw(1),
            &Transform::IDENTITY,
            &instance(1, WeaponKind::TwoHandStaff),
            &mut ledger,
            &spatial,
        );
        assert!(hits.is_empty());
        assert_eq!(ledger.hit_count(1), 0);
    }

    #[test]
    fn test_ledger_release_and_fresh_attack() {
        let mut ledger = HitLedger::default();
        let target = Entity::from_raw(3);

        ledger.open(1);
        assert!(ledger.record(1, target));
        assert_eq!(ledger.release(1), Some(1));
        assert!(!ledger.is_open(1));

        ledger.open(2);
        assert!(!ledger.contains(2, target));
        assert!(ledger.record(2, target));
    }

    #[test]
    fn test_ledger_ignores_unopened_attack() {
        let mut ledger = HitLedger::default();
        assert!(!ledger.record(9, Entity::from_raw(1)));
        assert_eq!(ledger.tracked_attacks(), 0);
    }

    #[test]
    fn test_ledger_releases_leaked_sets() {
        let mut ledger = HitLedger::default();
        ledger.open(1);
        ledger.record(1, Entity::from_raw(5));

        // Attack 1 never ended
        ledger.open(2);
        assert!(!ledger.is_open(1));
        assert!(ledger.is_open(2));
        assert_eq!(ledger.tracked_attacks(), 1);
    }

    #[test]
    fn test_snapshot_overlap_is_sphere_sphere() {
        let near = Entity::from_raw(1);
        let far = Entity::from_raw(2);
        let spatial = HurtboxSnapshot::new(vec![
            (far, Vec3::new(3.0, 0.0, 0.0), 0.5),
            (near, Vec3::new(1.2, 0.0, 0.0), 0.5),
        ]);

        // 1.2 <= 1.0 + 0.5, 3.0 > 1.5
        assert_eq!(spatial.overlap_sphere(Vec3::ZERO, 1.0), vec![near]);
    }

    proptest! {
        #[test]
        fn prop_each_target_recorded_at_most_once(
            targets in proptest::collection::vec(0u32..8, 1..200)
        ) {
            let mut ledger = HitLedger::default();
            ledger.open(1);

            let mut delivered = Vec::new();
            for index in targets {
                let target = Entity::from_raw(index);
                if ledger.record(1, target) {
                    delivered.push(target);
                }
            }

            let mut unique = delivered.clone();
            unique.sort_by_key(|e| e.index());
            unique.dedup();
            prop_assert_eq!(unique.len(), delivered.len());
            prop_assert_eq!(ledger.hit_count(1), delivered.len());
        }
    }
}
