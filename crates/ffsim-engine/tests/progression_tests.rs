use ffsim_engine::prelude::*;
use ffsim_engine::{ChoiceRejection, GradingScheme, ScoreKind, Scores, RESULT_PROCESSED};
use ffsim_test_utils::{case_id, choice_id, fixture_library, E2E_CASE};
use pretty_assertions::assert_eq;

fn engine_with(grading: GradingScheme) -> ProgressionEngine {
    ProgressionEngine::from_library(
        fixture_library(),
        EngineConfig::default().with_grading(grading),
    )
}

fn engine() -> ProgressionEngine {
    engine_with(GradingScheme::Tiered)
}

#[test]
fn test_end_to_end_scenario() {
    let engine = engine();
    let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();

    let first = engine.resolve_choice(&mut session, &choice_id("A")).unwrap();
    assert_eq!(session.scores(), Scores::new(60, 45, 50));
    assert_eq!(first.outcome, OutcomeKind::NotDone);
    assert!(!engine.is_terminal(&session));
    assert_eq!(first.feedback.text, "feedback A");

    let second = engine.resolve_choice(&mut session, &choice_id("B")).unwrap();
    assert_eq!(session.scores(), Scores::new(70, 50, 55));
    assert_eq!(second.outcome, OutcomeKind::Completed);
    assert!(second.next.is_none());
    assert!(engine.is_terminal(&session));
    assert!(session.current_stage().is_terminal());

    let report = engine.finalize_session(&session).unwrap();
    assert_eq!(report.total_score, 58);
    assert_eq!(report.grade, Grade::C);
    assert_eq!(report.advisory, None);
    assert_eq!(report.comment, Grade::C.comment());
    assert_eq!(report.stages_completed, 2);
}

#[test]
fn test_end_to_end_under_strict_table() {
    let engine = engine_with(GradingScheme::Strict);
    let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();
    engine.resolve_choice(&mut session, &choice_id("A")).unwrap();
    engine.resolve_choice(&mut session, &choice_id("B")).unwrap();

    let report = engine.finalize_session(&session).unwrap();
    assert_eq!(report.total_score, 58);
    assert_eq!(report.grade, Grade::F);
    assert_eq!(report.scheme, GradingScheme::Strict);
}

#[test]
fn test_history_records_each_stage() {
    let engine = engine();
    let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();
    engine.resolve_choice(&mut session, &choice_id("A")).unwrap();
    engine.resolve_choice(&mut session, &choice_id("B")).unwrap();

    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].stage.as_str(), "S1");
    assert_eq!(history[0].choice_text, "option A");
    assert_eq!(history[0].scores_after, Scores::new(60, 45, 50));
    assert_eq!(history[1].stage.as_str(), "S2");
    assert!(history.iter().all(|h| h.result_tag == RESULT_PROCESSED));
}

#[test]
fn test_score_floor_ends_session_mid_flow() {
    let engine = engine();
    let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();

    let transition = engine.resolve_choice(&mut session, &choice_id("B")).unwrap();
    assert_eq!(transition.outcome, OutcomeKind::FailedOnScore);
    assert!(transition.next.is_none());
    assert_eq!(session.scores().trust(), 0);
    // Stays where the failure happened
    assert_eq!(session.current_stage().as_str(), "S1");
    assert_eq!(session.history().len(), 1);

    let report = engine.finalize_session(&session).unwrap();
    assert_eq!(report.outcome, OutcomeKind::FailedOnScore);
    assert_eq!(report.advisory, Some(ScoreKind::Trust));
    assert_eq!(report.headline(), "实训结束 - 考核中止");
}

#[test]
fn test_score_floor_wins_on_last_stage() {
    let engine = engine();
    let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();
    engine.resolve_choice(&mut session, &choice_id("A")).unwrap();

    let transition = engine.resolve_choice(&mut session, &choice_id("D")).unwrap();
    assert_eq!(transition.outcome, OutcomeKind::FailedOnScore);
    assert_eq!(session.scores(), Scores::new(60, 0, 50));

    let report = engine.finalize_session(&session).unwrap();
    assert_eq!(report.total_score, 37);
    assert_eq!(report.advisory, Some(ScoreKind::CostEfficiency));
    assert!(report.comment.starts_with(Grade::C.comment()));
}

#[test]
fn test_oversized_delta_is_clamped() {
    let engine = engine();
    let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();
    engine.resolve_choice(&mut session, &choice_id("C")).unwrap();

    let transition = engine.resolve_choice(&mut session, &choice_id("C")).unwrap();
    assert_eq!(session.scores(), Scores::new(100, 100, 100));
    assert_eq!(transition.outcome, OutcomeKind::Completed);

    let report = engine.finalize_session(&session).unwrap();
    assert_eq!(report.grade, Grade::S);
    assert_eq!(report.headline(), "实训结束 - 考核完成");
}

#[test]
fn test_neutral_choice_keeps_scores() {
    let engine = engine();
    let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();
    let transition = engine.resolve_choice(&mut session, &choice_id("C")).unwrap();

    assert_eq!(session.scores(), Scores::initial());
    assert_eq!(transition.outcome, OutcomeKind::NotDone);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_invalid_choice_leaves_session_unchanged() {
    let engine = engine();
    let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();
    engine.resolve_choice(&mut session, &choice_id("A")).unwrap();
    let before = session.clone();

    let err = engine.resolve_choice(&mut session, &choice_id("Z")).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidChoice { reason: ChoiceRejection::NotOffered, .. }
    ));
    assert!(err.is_recoverable());
    assert_eq!(session, before);
}

#[test]
fn test_choice_text_is_not_an_id() {
    let engine = engine();
    let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();
    let err = engine.resolve_choice(&mut session, &choice_id("option A")).unwrap_err();
    assert!(matches!(err, EngineError::InvalidChoice { .. }));
}

#[test]
fn test_terminal_session_rejects_choices() {
    let engine = engine();
    let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();
    engine.resolve_choice(&mut session, &choice_id("B")).unwrap();
    let before = session.clone();

    let err = engine.resolve_choice(&mut session, &choice_id("A")).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidChoice { reason: ChoiceRejection::SessionTerminal, .. }
    ));
    assert_eq!(session, before);
    assert_eq!(session.outcome(), OutcomeKind::FailedOnScore);
}

#[test]
fn test_finalize_requires_terminal() {
    let engine = engine();
    let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();
    assert!(matches!(
        engine.finalize_session(&session),
        Err(EngineError::NotTerminal(_))
    ));

    engine.resolve_choice(&mut session, &choice_id("A")).unwrap();
    assert!(engine.finalize_session(&session).is_err());
}

#[test]
fn test_finalize_is_repeatable() {
    let engine = engine();
    let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();
    engine.resolve_choice(&mut session, &choice_id("A")).unwrap();
    engine.resolve_choice(&mut session, &choice_id("B")).unwrap();

    assert_eq!(
        engine.finalize_session(&session).unwrap(),
        engine.finalize_session(&session).unwrap()
    );
}

#[test]
fn test_report_serializes_for_frontends() {
    let engine = engine();
    let (mut session, _) = engine.start_session(&case_id(E2E_CASE)).unwrap();
    engine.resolve_choice(&mut session, &choice_id("A")).unwrap();
    engine.resolve_choice(&mut session, &choice_id("B")).unwrap();
    let report = engine.finalize_session(&session).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["outcome"], "COMPLETED");
    assert_eq!(json["grade"], "C");
    assert_eq!(json["total_score"], 58);
    assert_eq!(json["scores"]["cost_efficiency"], 50);
}
