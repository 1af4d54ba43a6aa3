//! Suspended tasks (explicit "wait until, then act" continuations)
//!
//! Каждый tick `resume_suspended_tasks` опрашивает очередь каждой entity:
//! готовые задачи возобновляются ровно один раз, в порядке FIFO, и их
//! действия превращаются в обычные intent события.
//!
//! ```text
//! SuspendedTask { wait: UntilNavigationIdle, actions: [FaceTarget, EnsureTwoHanded, PerformAttack] }
//!      │ poll (каждый tick)
//!      ▼ ready
//! FaceTowards → EquipWeaponIntent → AttackIntent
//! ```

use bevy::prelude::*;
use std::collections::VecDeque;

use crate::combat::{AttackIntent, AttackPhase, CombatOrchestrator, CombatSet};
use crate::components::{EquippedWeapons, NavigationState, Side, WeaponKind};
use crate::equipment::{EquipWeaponIntent, UnequipWeaponIntent};


/// Условие возобновления задачи
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitCondition {
    /// Skips n polls, ready on the next one (0 = first poll)
    Ticks(u32),
    /// Ready once the owner's attack phase equals the given phase
    UntilPhase(AttackPhase),
    /// Ready once the owner reports no navigation in progress
    UntilNavigationIdle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskAction {
    PerformAttack { attack_number: u8, side: Side },
    EquipWeapon(WeaponKind),
    UnequipWeapon,
    /// Equip `weapon` only if no two-handed weapon is in hand
    EnsureTwoHanded(WeaponKind),
    FaceTarget(Entity),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuspendedTask {
    pub wait: WaitCondition,
    pub actions: Vec<TaskAction>,
    polls: u32,
}

impl SuspendedTask {
    pub fn new(wait: WaitCondition, actions: Vec<TaskAction>) -> Self {
        Self {
            wait,
            actions,
            polls: 0,
        }
    }

    fn is_ready(&self, context: &TaskContext) -> bool {
        match self.wait {
            WaitCondition::Ticks(n) => self.polls > n,
            WaitCondition::UntilPhase(phase) => context.phase == phase,
            WaitCondition::UntilNavigationIdle => !context.navigating,
        }
    }
}

/// Owner state the wait conditions are checked against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskContext {
    pub phase: AttackPhase,
    pub navigating: bool,
}

/// Очередь suspended задач entity
#[derive(Component, Debug, Clone, Default)]
pub struct SuspendedTasks {
    queue: VecDeque<SuspendedTask>,
}

impl SuspendedTasks {
    pub fn push(&mut self, task: SuspendedTask) {
        self.queue.push_back(task);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Одна итерация: каждый task опрашивается один раз, готовые удаляются.
    /// Returns the actions of every resumed task, FIFO.
    pub fn poll(&mut self, context: &TaskContext) -> Vec<TaskAction> {
        let mut ready = Vec::new();
        let mut waiting = VecDeque::with_capacity(self.queue.len());

        while let Some(mut task) = self.queue.pop_front() {
            task.polls += 1;
            if task.is_ready(context) {
                ready.extend(task.actions);
            } else {
                waiting.push_back(task);
            }
        }

        self.queue = waiting;
        ready
    }
}

/// Request to turn `entity` towards `target` (yaw only).
#[derive(Event, Debug, Clone, Copy)]
pub struct FaceTowards {
    pub entity: Entity,
    pub target: Entity,
}

/// System: poll suspended tasks → intent events
pub fn resume_suspended_tasks(
    mut owners: Query<(
        Entity,
        &mut SuspendedTasks,
        Option<&CombatOrchestrator>,
        Option<&NavigationState>,
        Option<&EquippedWeapons>,
    )>,
    mut attacks: EventWriter<AttackIntent>,
    mut equips: EventWriter<EquipWeaponIntent>,
    mut unequips: EventWriter<UnequipWeaponIntent>,
    mut facing: EventWriter<FaceTowards>,
) {
    for (entity, mut tasks, orchestrator, navigation, weapons) in owners.iter_mut() {
        if tasks.is_empty() {
            continue;
        }

        let context = TaskContext {
            phase: orchestrator.map(|o| o.phase()).unwrap_or_default(),
            navigating: navigation.is_some_and(|n| n.is_navigating),
        };

        for action in tasks.poll(&context) {
            crate::logger::log(&format!("⏯️ Task resumed: {:?} (entity: {:?})", action, entity));

            match action {
                TaskAction::PerformAttack { attack_number, side } => {
                    attacks.write(AttackIntent {
                        entity,
                        attack_number,
                        side,
                    });
                }
                TaskAction::EquipWeapon(weapon) => {
                    equips.write(EquipWeaponIntent { entity, weapon });
                }
                TaskAction::UnequipWeapon => {
                    unequips.write(UnequipWeaponIntent { entity });
                }
                TaskAction::EnsureTwoHanded(weapon) => {
                    if !weapons.is_some_and(EquippedWeapons::has_two_handed_weapon) {
                        equips.write(EquipWeaponIntent { entity, weapon });
                    }
                }
                TaskAction::FaceTarget(target) => {
                    facing.write(FaceTowards { entity, target });
                }
            }
        }
    }
}

/// System: yaw `entity` towards its target.
pub fn apply_facing(mut requests: EventReader<FaceTowards>, mut transforms: Query<&mut Transform>) {
    for request in requests.read() {
        let Ok(target_position) = transforms.get(request.target).map(|t| t.translation) else {
            continue;
        };
        let Ok(mut transform) = transforms.get_mut(request.entity) else {
            continue;
        };

        let mut look_at = target_position;
        look_at.y = transform.translation.y;
        if look_at.distance_squared(transform.translation) > f32::EPSILON {
            transform.look_at(look_at, Vec3::Y);
        }
    }
}

/// Scheduler plugin: resumes suspended tasks in `CombatSet::Decide`.
pub struct SchedulerPlugin;

impl Plugin for SchedulerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FaceTowards>().add_systems(
            FixedUpdate,
            (resume_suspended_tasks, apply_facing)
                .chain()
                .in_set(CombatSet::Decide),
        );
    }
}
