//! Engine boundary consumed by frontends

use crate::error::EngineError;
use crate::grading::Report;
use crate::session::{Feedback, OutcomeKind, Session};
use ffsim_content::{CaseId, ChoiceId, StageContent, StageId};
use serde::Serialize;

/// A choice as presented, outcome withheld
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    /// Id to submit back
    pub id: ChoiceId,
    /// Label
    pub text: String,
}

/// What to show for the current stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageView {
    /// Case being played
    pub case_id: CaseId,
    /// Stage shown
    pub stage: StageId,
    /// 1-based position among playable stages
    pub position: usize,
    /// Number of playable stages in the case
    pub total: usize,
    /// Screen title
    pub title: String,
    /// Situation description
    pub narrative: String,
    /// Options, without their outcomes
    pub choices: Vec<ChoiceView>,
    /// Reaction to the previous choice, if any
    pub feedback: Option<Feedback>,
}

impl StageView {
    pub(crate) fn from_content(
        case_id: &CaseId,
        stage: &StageId,
        (position, total): (usize, usize),
        content: &StageContent,
        feedback: Option<Feedback>,
    ) -> Self {
        Self {
            case_id: case_id.clone(),
            stage: stage.clone(),
            position,
            total,
            title: content.title.clone(),
            narrative: content.narrative.clone(),
            choices: content
                .choices
                .iter()
                .map(|c| ChoiceView {
                    id: c.id.clone(),
                    text: c.text.clone(),
                })
                .collect(),
            feedback,
        }
    }

    /// Map typed input to an offered choice id
    ///
    /// Surrounding whitespace is ignored and an exact match wins; otherwise the
    /// first id equal up to ASCII case is used. Input matching nothing comes
    /// back trimmed so the engine can reject it.
    #[must_use]
    pub fn choice_for_input(&self, input: &str) -> ChoiceId {
        let input = input.trim();
        self.choices
            .iter()
            .find(|c| c.id.as_str() == input)
            .or_else(|| {
                self.choices
                    .iter()
                    .find(|c| c.id.as_str().eq_ignore_ascii_case(input))
            })
            .map_or_else(|| ChoiceId::from(input), |c| c.id.clone())
    }
}

/// Result of resolving one choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// Outcome of the choice just made
    pub feedback: Feedback,
    /// Session outcome after the transition
    pub outcome: OutcomeKind,
    /// Next stage to present; `None` once terminal
    pub next: Option<StageView>,
}

/// Progression operations
pub trait Progression {
    /// Start a playthrough of `case_id` and load its first stage
    ///
    /// # Errors
    /// `UnknownCase`, or `MissingContent` for the first stage.
    fn start_session(&self, case_id: &CaseId) -> Result<(Session, StageView), EngineError>;

    /// Content for the session's current stage; idempotent
    ///
    /// # Errors
    /// `MissingContent`, or `SessionEnded` once the
    /// session has ended.
    fn current_view(&self, session: &Session) -> Result<StageView, EngineError>;

    /// Apply a choice and advance
    ///
    /// # Errors
    /// `InvalidChoice` or `MissingContent`; the session is left untouched.
    fn resolve_choice(
        &self,
        session: &mut Session,
        choice_id: &ChoiceId,
    ) -> Result<Transition, EngineError>;

    /// Whether no further transitions are possible
    fn is_terminal(&self, session: &Session) -> bool {
        session.is_terminal()
    }

    /// Grade a finished session
    ///
    /// # Errors
    /// `NotTerminal` while the session is still running.
    fn finalize_session(&self, session: &Session) -> Result<Report, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(ids: &[&str]) -> StageView {
        StageView {
            case_id: CaseId::from("demo"),
            stage: StageId::from("S1"),
            position: 1,
            total: 1,
            title: "title".to_string(),
            narrative: "narrative".to_string(),
            choices: ids
                .iter()
                .map(|id| ChoiceView {
                    id: ChoiceId::from(*id),
                    text: format!("option {id}"),
                })
                .collect(),
            feedback: None,
        }
    }

    #[test]
    fn input_keeps_lower_case_ids() {
        let v = view(&["a", "b"]);
        assert_eq!(v.choice_for_input("a\n"), ChoiceId::from("a"));
        assert_eq!(v.choice_for_input(" B "), ChoiceId::from("b"));
    }

    #[test]
    fn input_ignores_case_for_upper_case_ids() {
        let v = view(&["A", "B"]);
        assert_eq!(v.choice_for_input("b"), ChoiceId::from("B"));
    }

    #[test]
    fn exact_match_beats_case_folding() {
        let v = view(&["a", "A"]);
        assert_eq!(v.choice_for_input("A"), ChoiceId::from("A"));
        assert_eq!(v.choice_for_input("a"), ChoiceId::from("a"));
    }

    #[test]
    fn unknown_input_is_passed_through_trimmed() {
        let v = view(&["A"]);
        assert_eq!(v.choice_for_input("  zz "), ChoiceId::from("zz"));
    }
}
