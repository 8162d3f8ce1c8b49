//! Progression engine
//!
//! Owns no session state itself: sessions are handed in by the caller and
//! mutated only by [`ProgressionEngine::resolve_choice`]. Every transition is
//! computed in full against borrowed state and committed at the end, so an
//! error never leaves a session half-advanced.

use crate::api::{Progression, StageView, Transition};
use crate::config::EngineConfig;
use crate::error::{ChoiceRejection, EngineError};
use crate::grading::{assess, Report};
use crate::session::{Feedback, HistoryEntry, OutcomeKind, Session, RESULT_PROCESSED};
use crate::transcript::{Replay, Transcript};
use ffsim_content::{
    Case, CaseCatalog, CaseId, ChoiceId, ContentStore, Library, ScenarioSource, StageContent,
    StageId,
};
use std::sync::Arc;

/// Drives sessions over a case catalog and a content source
#[derive(Debug)]
pub struct ProgressionEngine<S: ScenarioSource = ContentStore> {
    catalog: Arc<CaseCatalog>,
    content: Arc<S>,
    config: EngineConfig,
}

impl<S: ScenarioSource> Clone for ProgressionEngine<S> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            content: Arc::clone(&self.content),
            config: self.config,
        }
    }
}

impl ProgressionEngine<ContentStore> {
    /// Create an engine over a loaded library
    #[must_use]
    pub fn from_library(library: Library, config: EngineConfig) -> Self {
        Self::new(library.catalog, library.content, config)
    }
}

impl<S: ScenarioSource> ProgressionEngine<S> {
    /// Create an engine over a catalog and a content source
    #[must_use]
    pub fn new(catalog: CaseCatalog, content: S, config: EngineConfig) -> Self {
        Self::with_shared(Arc::new(catalog), Arc::new(content), config)
    }

    /// Create an engine over registries shared with other engines
    #[must_use]
    pub fn with_shared(catalog: Arc<CaseCatalog>, content: Arc<S>, config: EngineConfig) -> Self {
        Self {
            catalog,
            content,
            config,
        }
    }

    /// Case registry
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &CaseCatalog {
        &self.catalog
    }

    /// Content source
    #[inline]
    #[must_use]
    pub fn content(&self) -> &S {
        &self.content
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Capture a session's choices, pinned to the current content digest
    #[must_use]
    pub fn transcript(&self, session: &Session) -> Transcript {
        Transcript::from_session(session, self.content.digest())
    }

    /// Re-run a transcript from a fresh session and grade it
    ///
    /// # Errors
    /// - [`EngineError::DigestMismatch`] when both sides carry a digest and they differ
    /// - any error of the replayed operations, including
    ///   [`EngineError::NotTerminal`] when the choices stop short of the end
    pub fn replay(&self, transcript: &Transcript) -> Result<Replay, EngineError> {
        if let (Some(expected), Some(actual)) = (&transcript.content_digest, self.content.digest()) {
            if *expected != actual {
                tracing::warn!("Transcript digest mismatch for case {}", transcript.case_id);
                return Err(EngineError::DigestMismatch {
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        let (mut session, _) = self.start_session(&transcript.case_id)?;
        for choice in &transcript.choices {
            self.resolve_choice(&mut session, choice)?;
        }
        let report = self.finalize_session(&session)?;
        tracing::debug!("Replayed {} choices for case {}", transcript.choices.len(), transcript.case_id);
        Ok(Replay { session, report })
    }

    fn case(&self, case_id: &CaseId) -> Result<&Case, EngineError> {
        self.catalog
            .get(case_id)
            .ok_or_else(|| EngineError::UnknownCase(case_id.clone()))
    }

    fn stage_content(&self, case_id: &CaseId, stage: &StageId) -> Result<&StageContent, EngineError> {
        self.content.stage(case_id, stage).ok_or_else(|| {
            tracing::warn!(case = %case_id, stage = %stage, "no content for reachable stage");
            EngineError::MissingContent {
                case: case_id.clone(),
                stage: stage.clone(),
            }
        })
    }

    fn view(
        &self,
        case: &Case,
        stage: &StageId,
        feedback: Option<Feedback>,
    ) -> Result<StageView, EngineError> {
        let content = self.stage_content(&case.id, stage)?;
        let position = case.position(stage).map_or(0, |idx| idx + 1);
        Ok(StageView::from_content(
            &case.id,
            stage,
            (position, case.stage_count()),
            content,
            feedback,
        ))
    }
}

impl<S: ScenarioSource> Progression for ProgressionEngine<S> {
    fn start_session(&self, case_id: &CaseId) -> Result<(Session, StageView), EngineError> {
        let case = self.case(case_id)?;
        let first = case
            .first_stage()
            .ok_or_else(|| EngineError::MissingContent {
                case: case_id.clone(),
                stage: StageId::terminal(),
            })?;

        let view = self.view(case, first, None)?;
        let session = Session::new(case_id.clone(), first.clone());

        tracing::info!(
            session = %session.id(),
            case = %case_id,
            stages = case.stage_count(),
            "session started"
        );
        Ok((session, view))
    }

    fn current_view(&self, session: &Session) -> Result<StageView, EngineError> {
        if session.is_terminal() {
            return Err(EngineError::SessionEnded(session.case_id.clone()));
        }
        let case = self.case(&session.case_id)?;
        self.view(case, &session.current_stage, session.pending_feedback.clone())
    }

    fn resolve_choice(
        &self,
        session: &mut Session,
        choice_id: &ChoiceId,
    ) -> Result<Transition, EngineError> {
        if session.is_terminal() {
            tracing::warn!(session = %session.id(), choice = %choice_id, "choice submitted after session ended");
            return Err(EngineError::InvalidChoice {
                stage: session.current_stage.clone(),
                choice: choice_id.clone(),
                reason: ChoiceRejection::SessionTerminal,
            });
        }

        let case = self.case(&session.case_id)?;
        let stage = &session.current_stage;
        let content = self.stage_content(&session.case_id, stage)?;
        let choice = content.choice(choice_id).ok_or_else(|| {
            tracing::warn!(session = %session.id(), stage = %stage, choice = %choice_id, "choice not offered");
            EngineError::InvalidChoice {
                stage: stage.clone(),
                choice: choice_id.clone(),
                reason: ChoiceRejection::NotOffered,
            }
        })?;

        let scores = session.scores.apply(&choice.outcome.delta);
        let feedback = Feedback {
            stage: stage.clone(),
            choice_id: choice.id.clone(),
            text: choice.outcome.feedback.clone(),
            delta: choice.outcome.delta,
            scores,
        };
        let entry = HistoryEntry {
            stage: stage.clone(),
            choice_id: choice.id.clone(),
            choice_text: choice.text.clone(),
            result_tag: RESULT_PROCESSED.to_string(),
            scores_after: scores,
        };

        // The floor check runs before the advance, so it wins on the last stage.
        let (outcome, next_stage) = if let Some(depleted) = scores.depleted() {
            tracing::debug!("Score floor reached on {}", depleted);
            (OutcomeKind::FailedOnScore, stage.clone())
        } else {
            match case.successor(stage) {
                Some(next) if !next.is_terminal() => (OutcomeKind::NotDone, next.clone()),
                _ => (OutcomeKind::Completed, StageId::terminal()),
            }
        };

        let next = if outcome.is_terminal() {
            None
        } else {
            Some(self.view(case, &next_stage, Some(feedback.clone()))?)
        };

        tracing::debug!(
            session = %session.id(),
            stage = %stage,
            choice = %choice_id,
            scores = %scores,
            "choice resolved"
        );

        session.scores = scores;
        session.history.push(entry);
        session.current_stage = next_stage;
        session.outcome = outcome;
        session.pending_feedback = Some(feedback.clone());

        if outcome.is_terminal() {
            tracing::info!(
                session = %session.id(),
                case = %session.case_id,
                outcome = %outcome,
                "session ended"
            );
        }

        Ok(Transition {
            feedback,
            outcome,
            next,
        })
    }

    fn finalize_session(&self, session: &Session) -> Result<Report, EngineError> {
        if !session.is_terminal() {
            return Err(EngineError::NotTerminal(session.case_id.clone()));
        }
        let assessment = assess(
            &session.scores,
            self.config.grading,
            self.config.advisory_threshold,
        );
        let report = Report::new(session, assessment, self.config.grading);
        tracing::info!(
            session = %session.id(),
            total = report.total_score,
            grade = %report.grade,
            "session graded"
        );
        Ok(report)
    }
}
