use ffsim_engine::prelude::*;
use ffsim_engine::{MAX_SCORE, MIN_SCORE};
use ffsim_test_utils::{case_id, fixture_library, E2E_CASE};
use proptest::prelude::*;

fn engine() -> ProgressionEngine {
    ProgressionEngine::from_library(fixture_library(), EngineConfig::default())
}

fn choice_ids() -> impl Strategy<Value = Vec<ChoiceId>> {
    prop::collection::vec(
        prop_oneof![
            Just("A"),
            Just("B"),
            Just("C"),
            Just("D"),
            Just("Z"),
        ]
        .prop_map(ChoiceId::from),
        0..8,
    )
}

/// Feed every id, ignoring rejections, and return the session
fn play(engine: &ProgressionEngine, choices: &[ChoiceId]) -> Session {
    let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();
    for choice in choices {
        let _ = engine.resolve_choice(&mut session, choice);
    }
    session
}

proptest! {
    #[test]
    fn prop_scores_stay_in_bounds(choices in choice_ids()) {
        let engine = engine();
        let session = play(&engine, &choices);
        for (_, value) in session.scores().iter() {
            prop_assert!((MIN_SCORE..=MAX_SCORE).contains(&value));
        }
        for entry in session.history() {
            for (_, value) in entry.scores_after.iter() {
                prop_assert!(value <= MAX_SCORE);
            }
        }
    }

    #[test]
    fn prop_failed_resolution_is_atomic(choices in choice_ids()) {
        let engine = engine();
        let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();
        for choice in &choices {
            let before = session.clone();
            match engine.resolve_choice(&mut session, choice) {
                Ok(_) => prop_assert_eq!(session.history().len(), before.history().len() + 1),
                Err(_) => prop_assert_eq!(&session, &before),
            }
        }
    }

    #[test]
    fn prop_terminal_never_reverts(choices in choice_ids()) {
        let engine = engine();
        let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();
        let mut ended = false;
        for choice in &choices {
            let _ = engine.resolve_choice(&mut session, choice);
            if ended {
                prop_assert!(session.is_terminal());
            }
            ended = session.is_terminal();
        }
    }

    #[test]
    fn prop_history_bounded_by_flow(choices in choice_ids()) {
        let engine = engine();
        let session = play(&engine, &choices);
        prop_assert!(session.history().len() <= 2);
        if session.outcome() == OutcomeKind::Completed {
            prop_assert_eq!(session.history().len(), 2);
        }
    }

    #[test]
    fn prop_same_choices_same_report(choices in choice_ids()) {
        let engine = engine();
        let a = play(&engine, &choices);
        let b = play(&engine, &choices);

        prop_assert_eq!(a.scores(), b.scores());
        prop_assert_eq!(a.outcome(), b.outcome());
        if a.is_terminal() {
            prop_assert_eq!(
                engine.finalize_session(&a).unwrap(),
                engine.finalize_session(&b).unwrap()
            );
        }
    }
}
