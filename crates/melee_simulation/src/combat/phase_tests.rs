//! Tests for AttackPhaseController.

#[cfg(test)]
mod tests {
    use super::super::phase::*;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    /// Listener that records every signal (and detach) into shared storage.
    struct Recorder {
        signals: Arc<Mutex<Vec<PhaseSignal>>>,
        detached: Arc<Mutex<u32>>,
    }

    impl PhaseListener for Recorder {
        fn on_signal(&mut self, signal: PhaseSignal) {
            self.signals.lock().unwrap().push(signal);
        }

        fn detached(&mut self) {
            *self.detached.lock().unwrap() += 1;
        }
    }

    fn recorder() -> (Box<Recorder>, Arc<Mutex<Vec<PhaseSignal>>>, Arc<Mutex<u32>>) {
        let signals = Arc::new(Mutex::new(Vec::new()));
        let detached = Arc::new(Mutex::new(0));
        let listener = Recorder {
            signals: Arc::clone(&signals),
            detached: Arc::clone(&detached),
        };
        (Box::new(listener), signals, detached)
    }

    fn controller_in(phase: AttackPhase, toughness: f32) -> AttackPhaseController {
        let mut controller = AttackPhaseController::new(toughness);
        if phase == AttackPhase::None {
            return controller;
        }
        controller.enter_anticipation();
        if phase == AttackPhase::Anticipation {
            return controller;
        }
        controller.enter_impact();
        if phase == AttackPhase::Impact {
            return controller;
        }
        controller.enter_recovery();
        controller
    }

    #[test]
    fn test_full_cycle_signal_order() {
        let mut controller = AttackPhaseController::new(10.0);
        let (listener, signals, _) = recorder();
        controller.subscribe(listener);

        assert_eq!(controller.enter_anticipation(), Some(PhaseSignal::AnticipationStarted));
        assert_eq!(controller.enter_impact(), Some(PhaseSignal::ImpactStarted));
        assert_eq!(controller.enter_recovery(), Some(PhaseSignal::ImpactEnded));
        assert_eq!(controller.end_attack(), Some(PhaseSignal::AttackEnded));
        assert_eq!(controller.phase(), AttackPhase::None);

        assert_eq!(
            *signals.lock().unwrap(),
            vec![
                PhaseSignal::AnticipationStarted,
                PhaseSignal::ImpactStarted,
                PhaseSignal::ImpactEnded,
                PhaseSignal::AttackEnded,
            ]
        );
    }

    #[test]
    fn test_can_start_attack_only_in_none_or_recovery() {
        assert!(controller_in(AttackPhase::None, 10.0).can_start_attack());
        assert!(!controller_in(AttackPhase::Anticipation, 10.0).can_start_attack());
        assert!(!controller_in(AttackPhase::Impact, 10.0).can_start_attack());
        assert!(controller_in(AttackPhase::Recovery, 10.0).can_start_attack());
    }

    #[test]
    fn test_out_of_order_cues_ignored() {
        let mut controller = AttackPhaseController::new(10.0);

        assert_eq!(controller.enter_impact(), None);
        assert_eq!(controller.enter_recovery(), None);
        assert_eq!(controller.phase(), AttackPhase::None);

        controller.enter_anticipation();
        assert_eq!(controller.enter_recovery(), None);
        assert_eq!(controller.enter_anticipation(), None);
        assert_eq!(controller.phase(), AttackPhase::Anticipation);
    }

    #[test]
    fn test_interrupt_in_anticipation_skips_impact() {
        let mut controller = AttackPhaseController::new(10.0);
        let (listener, signals, _) = recorder();
        controller.subscribe(listener);

        controller.enter_anticipation();
        assert!(controller.try_interrupt(0.0));
        assert_eq!(controller.phase(), AttackPhase::None);
        assert!(controller.is_interrupted());

        // Stale impact cue from the broken animation
        assert_eq!(controller.enter_impact(), None);

        let recorded = signals.lock().unwrap().clone();
        assert!(!recorded.contains(&PhaseSignal::ImpactStarted));
        assert_eq!(
            recorded.last(),
            Some(&PhaseSignal::Interrupted { from: AttackPhase::Anticipation })
        );
    }

    #[test]
    fn test_end_attack_clears_interrupted_flag() {
        let mut controller = AttackPhaseController::new(10.0);
        controller.enter_anticipation();
        controller.try_interrupt(1.0);

        assert_eq!(controller.end_attack(), Some(PhaseSignal::AttackEnded));
        assert!(!controller.is_interrupted());

        // Next attack plays normally
        controller.enter_anticipation();
        assert_eq!(controller.enter_impact(), Some(PhaseSignal::ImpactStarted));
    }

    #[test]
    fn test_end_attack_idempotent_in_none() {
        let mut controller = AttackPhaseController::new(10.0);
        assert_eq!(controller.end_attack(), None);
        assert_eq!(controller.end_attack(), None);
    }

    #[test]
    fn test_recovery_always_interruptible() {
        let mut controller = controller_in(AttackPhase::Recovery, 10.0);
        assert!(controller.try_interrupt(0.0));
        assert_eq!(controller.phase(), AttackPhase::None);
    }

    #[test]
    fn test_interrupt_in_none_is_noop() {
        let mut controller = AttackPhaseController::new(10.0);
        assert!(!controller.try_interrupt(100.0));
        assert!(!controller.try_interrupt(100.0));
        assert!(!controller.is_interrupted());
    }

    #[test]
    fn test_impact_tie_favors_defender() {
        let mut controller = controller_in(AttackPhase::Impact, 10.0);
        assert!(!controller.try_interrupt(10.0));
        assert_eq!(controller.phase(), AttackPhase::Impact);
    }

    #[test]
    fn test_apply_cue_dispatch() {
        let mut controller = AttackPhaseController::new(5.0);
        assert_eq!(controller.apply_cue(AttackCue::Anticipation), Some(PhaseSignal::AnticipationStarted));
        assert_eq!(controller.apply_cue(AttackCue::Impact), Some(PhaseSignal::ImpactStarted));
        assert_eq!(controller.apply_cue(AttackCue::Recovery), Some(PhaseSignal::ImpactEnded));
        assert_eq!(controller.apply_cue(AttackCue::AttackEnd), Some(PhaseSignal::AttackEnded));
    }

    #[test]
    fn test_unsubscribe_detaches_and_stops_delivery() {
        let mut controller = AttackPhaseController::new(10.0);
        let (listener, signals, detached) = recorder();
        let id = controller.subscribe(listener);

        assert!(controller.unsubscribe(id));
        assert!(!controller.unsubscribe(id));
        assert_eq!(*detached.lock().unwrap(), 1);

        controller.enter_anticipation();
        assert!(signals.lock().unwrap().is_empty());
        assert_eq!(controller.listener_count(), 0);
    }

    #[test]
    fn test_drop_detaches_listeners() {
        let (listener, _, detached) = recorder();
        {
            let mut controller = AttackPhaseController::new(10.0);
            controller.subscribe(listener);
        }
        assert_eq!(*detached.lock().unwrap(), 1);
    }

    proptest! {
        #[test]
        fn prop_impact_interrupt_iff_strictly_tougher(attacker in 0.0f32..100.0, target in 0.0f32..100.0) {
            let mut controller = controller_in(AttackPhase::Impact, target);
            let interrupted = controller.try_interrupt(attacker);

            prop_assert_eq!(interrupted, attacker > target);
            let expected = if attacker > target { AttackPhase::None } else { AttackPhase::Impact };
            prop_assert_eq!(controller.phase(), expected);
        }

        #[test]
        fn prop_equal_toughness_never_interrupts_impact(toughness in 0.0f32..1000.0) {
            let mut controller = controller_in(AttackPhase::Impact, toughness);
            prop_assert!(!controller.try_interrupt(toughness));
        }

        #[test]
        fn prop_phase_sequence_is_prefix_of_cycle(
            cues in proptest::collection::vec(0u8..5, 0..40)
        ) {
            let mut controller = AttackPhaseController::new(10.0);
            let mut previous = controller.phase();

            for code in cues {
                match code {
                    0 => { controller.apply_cue(AttackCue::Anticipation); }
                    1 => { controller.apply_cue(AttackCue::Impact); }
                    2 => { controller.apply_cue(AttackCue::Recovery); }
                    3 => { controller.apply_cue(AttackCue::AttackEnd); }
                    _ => { controller.try_interrupt(5.0); }
                }

                let current = controller.phase();
                let legal = current == previous
                    || current == AttackPhase::None
                    || matches!(
                        (previous, current),
                        (AttackPhase::None, AttackPhase::Anticipation)
                            | (AttackPhase::Recovery, AttackPhase::Anticipation)
                            | (AttackPhase::Anticipation, AttackPhase::Impact)
                            | (AttackPhase::Impact, AttackPhase::Recovery)
                    );
                prop_assert!(legal, "illegal transition {:?} -> {:?}", previous, current);
                previous = current;
            }
        }
    }
}
