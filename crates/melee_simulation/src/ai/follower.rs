//! NPC follower AI
//!
//! Поведение:
//! - Цель дальше `follow_distance` → копим `out_of_range_timer`
//! - Таймер ≥ `attack_delay` → NavigationRequest к точке на `approach_distance`
//!   от цели + suspended task: дождаться конца навигации → повернуться к цели →
//!   взять TwoHandSword (если нет two-handed) → атака 1 правой рукой
//! - Цель в радиусе → таймер в 0, текущая навигация останавливается
//!
//! Пока задача ждет в очереди, новая не ставится.

use bevy::prelude::*;

use crate::ai::events::{NavigationRequest, StopNavigation};
use crate::components::{Dead, NavigationState, Side, WeaponKind};
use crate::scheduler::{SuspendedTask, SuspendedTasks, TaskAction, WaitCondition};

/// Follower AI параметры + состояние
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(SuspendedTasks, NavigationState)]
pub struct NpcFollower {
    pub target: Entity,
    /// Радиус, в котором цель считается "рядом" (метры)
    pub follow_distance: f32,
    /// Сколько цель должна быть вне радиуса до атаки (секунды)
    pub attack_delay: f32,
    /// Дистанция от цели, куда NPC идет перед атакой (метры)
    pub approach_distance: f32,
    pub out_of_range_timer: f32,
}

impl NpcFollower {
    pub fn new(target: Entity) -> Self {
        Self {
            target,
            follow_distance: 3.0,
            attack_delay: 3.0,
            approach_distance: 4.0,
            out_of_range_timer: 0.0,
        }
    }

    pub fn with_follow_distance(mut self, follow_distance: f32) -> Self {
        self.follow_distance = follow_distance;
        self
    }

    pub fn with_approach_distance(mut self, approach_distance: f32) -> Self {
        self.approach_distance = approach_distance;
        self
    }

    /// Точка атаки: на approach_distance от цели, со стороны NPC.
    pub fn attack_position(&self, own: Vec3, target: Vec3) -> Vec3 {
        let direction = (own - target).normalize_or_zero();
        target + direction * self.approach_distance
    }

    fn engagement(&self) -> SuspendedTask {
        SuspendedTask::new(
            WaitCondition::UntilNavigationIdle,
            vec![
                TaskAction::FaceTarget(self.target),
                TaskAction::EnsureTwoHanded(WeaponKind::TwoHandSword),
                TaskAction::PerformAttack {
                    attack_number: 1,
                    side: Side::Right,
                },
            ],
        )
    }
}

/// Система: follower decisions (FixedUpdate, CombatSet::Decide)
pub fn follow_targets(
    mut followers: Query<
        (
            Entity,
            &Transform,
            &mut NpcFollower,
            &mut NavigationState,
            &mut SuspendedTasks,
        ),
        Without<Dead>,
    >,
    targets: Query<&Transform>,
    time: Res<Time<Fixed>>,
    mut navigation_requests: EventWriter<NavigationRequest>,
    mut stop_requests: EventWriter<StopNavigation>,
) {
    let delta = time.timestep().as_secs_f32();

    for (entity, transform, mut follower, mut navigation, mut tasks) in followers.iter_mut() {
        let Ok(target_transform) = targets.get(follower.target) else {
            continue;
        };

        let own = transform.translation;
        let target = target_transform.translation;

        if own.distance(target) <= follower.follow_distance {
            follower.out_of_range_timer = 0.0;
            if navigation.is_navigating {
                navigation.stop();
                stop_requests.write(StopNavigation { entity });
                crate::logger::log(&format!("🛑 AI: {:?} target in range, navigation stopped", entity));
            }
            continue;
        }

        follower.out_of_range_timer += delta;
        if follower.out_of_range_timer < follower.attack_delay || !tasks.is_empty() {
            continue;
        }

        let destination = follower.attack_position(own, target);
        navigation.begin(destination);
        navigation_requests.write(NavigationRequest { entity, destination });
        tasks.push(follower.engagement());
        follower.out_of_range_timer = 0.0;

        crate::logger::log(&format!(
            "🏃 AI: {:?} out of range of {:?}, approaching {:?}",
            entity, follower.target, destination
        ));
    }
}
