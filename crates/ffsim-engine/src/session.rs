//! Session state for one playthrough
//!
//! A [`Session`] is owned by the caller and only ever mutated by the
//! progression engine. Fields are read through accessors so the invariants
//! (bounded scores, append-only history, one-way terminal flag) cannot be
//! broken from outside.

use crate::scores::Scores;
use ffsim_content::{CaseId, ChoiceId, ScoreDelta, StageId};
use serde::Serialize;
use std::fmt;
use ulid::Ulid;

/// Result tag recorded for every resolved stage
pub const RESULT_PROCESSED: &str = "Processed";

/// Session identifier (ULID), used to correlate log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SessionId(pub Ulid);

impl SessionId {
    /// Generate new session ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the session ended, if it has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    /// Still in progress
    #[default]
    NotDone,
    /// Reached the end of the flow
    Completed,
    /// A score hit the floor
    FailedOnScore,
}

impl OutcomeKind {
    /// Whether this outcome ends the session
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self != OutcomeKind::NotDone
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeKind::NotDone => write!(f, "in progress"),
            OutcomeKind::Completed => write!(f, "completed"),
            OutcomeKind::FailedOnScore => write!(f, "failed on score"),
        }
    }
}

/// One completed stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Stage the choice was made at
    pub stage: StageId,
    /// Id of the chosen option
    pub choice_id: ChoiceId,
    /// Label of the chosen option
    pub choice_text: String,
    /// Always [`RESULT_PROCESSED`]
    pub result_tag: String,
    /// Scores right after the outcome was applied
    pub scores_after: Scores,
}

/// Reaction to the previous choice, shown atop the next screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    /// Stage the choice was made at
    pub stage: StageId,
    /// Chosen option
    pub choice_id: ChoiceId,
    /// Outcome text
    pub text: String,
    /// Delta as authored
    pub delta: ScoreDelta,
    /// Scores after clamping
    pub scores: Scores,
}

/// Mutable state of one playthrough
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) case_id: CaseId,
    pub(crate) current_stage: StageId,
    pub(crate) scores: Scores,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) outcome: OutcomeKind,
    pub(crate) pending_feedback: Option<Feedback>,
}

impl Session {
    pub(crate) fn new(case_id: CaseId, first_stage: StageId) -> Self {
        Self {
            id: SessionId::new(),
            case_id,
            current_stage: first_stage,
            scores: Scores::initial(),
            history: Vec::new(),
            outcome: OutcomeKind::NotDone,
            pending_feedback: None,
        }
    }

    /// Session id
    #[inline]
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Selected case
    #[inline]
    #[must_use]
    pub fn case_id(&self) -> &CaseId {
        &self.case_id
    }

    /// Stage awaiting a choice, or the terminal stage once completed
    #[inline]
    #[must_use]
    pub fn current_stage(&self) -> &StageId {
        &self.current_stage
    }

    /// Current scores
    #[inline]
    #[must_use]
    pub fn scores(&self) -> Scores {
        self.scores
    }

    /// Completed stages, oldest first
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// How the session ended
    #[inline]
    #[must_use]
    pub fn outcome(&self) -> OutcomeKind {
        self.outcome
    }

    /// Whether no further transitions are possible
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Feedback of the most recent choice
    #[inline]
    #[must_use]
    pub fn pending_feedback(&self) -> Option<&Feedback> {
        self.pending_feedback.as_ref()
    }

    /// Choice ids in the order they were made
    pub fn choices_made(&self) -> impl Iterator<Item = &ChoiceId> {
        self.history.iter().map(|entry| &entry.choice_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_fresh() {
        let session = Session::new(CaseId::from("c"), StageId::from("S1"));
        assert_eq!(session.scores(), Scores::initial());
        assert!(session.history().is_empty());
        assert!(!session.is_terminal());
        assert_eq!(session.outcome(), OutcomeKind::NotDone);
        assert!(session.pending_feedback().is_none());
    }

    #[test]
    fn terminal_follows_outcome() {
        assert!(!OutcomeKind::NotDone.is_terminal());
        assert!(OutcomeKind::Completed.is_terminal());
        assert!(OutcomeKind::FailedOnScore.is_terminal());
    }

    #[test]
    fn outcome_serializes_in_caps() {
        let json = serde_json::to_string(&OutcomeKind::FailedOnScore).unwrap();
        assert_eq!(json, "\"FAILED_ON_SCORE\"");
    }
}
