use event_sorter::{EventKind, FireTrigger, Sequencer, SequencerError};
use std::sync::{Arc, Mutex};

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Readiness {
        LibraryLoaded = 1,
        ConsentGiven = 2,
        UserIdentified = 3,
        PageReady = 4,
    }

    const REQUIRED: [Readiness; 4] = [
        Readiness::LibraryLoaded,
        Readiness::ConsentGiven,
        Readiness::UserIdentified,
        Readiness::PageReady,
    ];

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init();
    }

    fn push<T: Send + 'static>(log: &Arc<Mutex<Vec<T>>>, value: T) -> impl FnOnce() + Send + 'static {
        let log = Arc::clone(log);
        move || log.lock().unwrap().push(value)
    }

    // --- Scenario A: out-of-order arrivals ---

    #[test]
    fn test_scenario_a_out_of_order_arrivals() {
        init_tracing();
        let result = Arc::new(Mutex::new(Vec::new()));
        let mut sequencer = Sequencer::new(vec![1, 2, 3, 4]);

        sequencer.schedule_state_event(1, push(&result, 1));
        sequencer.schedule_state_event(4, push(&result, 4));
        sequencer.schedule_state_event(3, push(&result, 3));
        sequencer.schedule_state_event(2, push(&result, 2));

        assert_eq!(*result.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    // --- Scenario B: first submission locks the state ---

    #[test]
    fn test_scenario_b_duplicate_submission() {
        let result = Arc::new(Mutex::new(Vec::new()));
        let mut sequencer = Sequencer::new(vec![1, 2]);

        sequencer.schedule_state_event(1, push(&result, "a"));
        sequencer.schedule_state_event(1, push(&result, "b"));

        assert_eq!(*result.lock().unwrap(), vec!["a"]);
    }

    // --- Scenario C: deferred gating ---

    #[test]
    fn test_scenario_c_deferred_gating() {
        init_tracing();
        let result = Arc::new(Mutex::new(Vec::new()));
        let mut sequencer = Sequencer::new(vec![1, 2]);

        sequencer.schedule_deferred_event(push(&result, "x"));
        assert!(result.lock().unwrap().is_empty());

        sequencer.schedule_state_event(1, push(&result, "1"));
        assert_eq!(*result.lock().unwrap(), vec!["1"]);

        sequencer.schedule_state_event(2, push(&result, "2"));
        assert_eq!(*result.lock().unwrap(), vec!["1", "2", "x"]);

        sequencer.schedule_state_event(2, push(&result, "2 again"));
        sequencer.schedule_state_event(5, push(&result, "5"));
        assert_eq!(*result.lock().unwrap(), vec!["1", "2", "x", "5"]);
    }

    // --- Scenario D: empty required sequence ---

    #[test]
    fn test_scenario_d_empty_sequence() {
        let result = Arc::new(Mutex::new(Vec::new()));
        let mut sequencer: Sequencer<u8> = Sequencer::new([]);

        assert!(sequencer.is_initialized());

        sequencer.schedule_deferred_event(push(&result, 0));
        sequencer.schedule_state_event(3, push(&result, 3));
        sequencer.schedule_state_event(1, push(&result, 1));

        assert_eq!(*result.lock().unwrap(), vec![0, 3, 1]);
    }

    // --- Enum states ---

    #[test]
    fn test_enum_states_in_declared_order() {
        init_tracing();
        let fired = Arc::new(Mutex::new(Vec::new()));
        let mut sequencer = Sequencer::try_new(REQUIRED).unwrap();

        sequencer.schedule_deferred_event(push(&fired, None));
        for state in [
            Readiness::PageReady,
            Readiness::ConsentGiven,
            Readiness::LibraryLoaded,
            Readiness::UserIdentified,
        ] {
            sequencer.schedule_state_event(state, push(&fired, Some(state)));
        }

        let expected: Vec<Option<Readiness>> = REQUIRED
            .iter()
            .copied()
            .map(Some)
            .chain(std::iter::once(None))
            .collect();
        assert_eq!(*fired.lock().unwrap(), expected);
    }

    #[test]
    fn test_enum_sequence_must_be_increasing() {
        let result = Sequencer::try_new(vec![Readiness::ConsentGiven, Readiness::LibraryLoaded]);

        assert_eq!(
            result.err(),
            Some(SequencerError::UnorderedStates {
                previous: "ConsentGiven".to_string(),
                current: "LibraryLoaded".to_string(),
            })
        );
    }

    // --- Listener audit trail ---

    #[test]
    fn test_listener_audit_trail() {
        let mut sequencer = Sequencer::new(vec![1u32, 2, 3]);
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = Arc::clone(&events);
        sequencer.add_listener(move |event| events_clone.lock().unwrap().push(event.clone()));

        sequencer.schedule_deferred_event(|| {});
        sequencer.schedule_state_event(2, || {});
        sequencer.schedule_state_event(3, || {});
        sequencer.schedule_state_event(1, || {});
        sequencer.schedule_state_event(3, || {});

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events.iter().map(|e| e.state()).collect::<Vec<_>>(),
            vec![Some(1), Some(2), Some(3), None]
        );
        assert_eq!(
            events[1].kind,
            EventKind::State {
                state: 2,
                trigger: FireTrigger::Replay
            }
        );
        assert!(events[3].is_deferred());
        assert!(events.windows(2).all(|w| w[0].sequence_num < w[1].sequence_num));
        assert!(events.windows(2).all(|w| w[0].timestamp_ns <= w[1].timestamp_ns));
    }
}
