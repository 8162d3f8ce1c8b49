use ffsim_content::builtin_library;
use ffsim_engine::prelude::*;
use ffsim_engine::test_harness::{run_simulator, SimulatorConfig, TestHarness};
use ffsim_engine::Scores;
use pretty_assertions::assert_eq;

fn engine() -> ProgressionEngine {
    ProgressionEngine::from_library(builtin_library().unwrap(), EngineConfig::default())
}

#[test]
fn test_case_one_playthrough() {
    let engine = engine();
    let (mut session, view) = engine.start_session(&CaseId::from("case_1")).unwrap();
    assert_eq!((view.position, view.total), (1, 3));
    assert_eq!(view.choices.len(), 3);

    for choice in ["C", "B", "B"] {
        engine.resolve_choice(&mut session, &ChoiceId::from(choice)).unwrap();
    }

    assert_eq!(session.outcome(), OutcomeKind::Completed);
    assert_eq!(session.scores(), Scores::new(85, 55, 70));

    let report = engine.finalize_session(&session).unwrap();
    assert_eq!(report.total_score, 70);
    assert_eq!(report.grade, Grade::B);
    assert_eq!(report.advisory, None);
}

#[test]
fn test_every_case_starts() {
    let engine = engine();
    for case in engine.catalog().iter() {
        let (_, view) = engine.start_session(&case.id).unwrap();
        assert_eq!(view.position, 1);
        assert_eq!(view.total, case.stage_count());
        assert!(!view.choices.is_empty());
    }
}

#[test]
fn test_builtin_content_has_no_gaps() {
    assert!(TestHarness::audit_content(&engine()).is_empty());
}

#[test]
fn test_simulator_passes_on_builtin_cases() {
    let report = run_simulator(
        &engine(),
        SimulatorConfig {
            seed: 2024,
            runs: 300,
            ..Default::default()
        },
    );
    assert!(report.passed(), "{}", report.generate_text());
    assert_eq!(report.stats.aborted, 0);
    assert_eq!(
        report.stats.completed + report.stats.failed_on_score,
        report.stats.sessions
    );
}
