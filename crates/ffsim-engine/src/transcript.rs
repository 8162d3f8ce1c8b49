//! Recorded playthroughs
//!
//! A session is a deterministic function of its case and choice sequence, so
//! those two are enough to reproduce the final report.

use crate::grading::Report;
use crate::session::Session;
use ffsim_content::{CaseId, ChoiceId};
use serde::{Deserialize, Serialize};

/// Case plus the ordered choice ids made in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Case played
    pub case_id: CaseId,
    /// Choices in the order they were made
    pub choices: Vec<ChoiceId>,
    /// Digest of the content the choices were made against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_digest: Option<String>,
}

impl Transcript {
    /// Transcript without a digest
    #[must_use]
    pub fn new(case_id: impl Into<CaseId>, choices: Vec<ChoiceId>) -> Self {
        Self {
            case_id: case_id.into(),
            choices,
            content_digest: None,
        }
    }

    /// Capture the choices made so far in `session`
    #[must_use]
    pub fn from_session(session: &Session, content_digest: Option<String>) -> Self {
        Self {
            case_id: session.case_id().clone(),
            choices: session.choices_made().cloned().collect(),
            content_digest,
        }
    }

    /// Encode as pretty JSON
    ///
    /// # Errors
    /// Serialization failure.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Decode from JSON
    ///
    /// # Errors
    /// Malformed input.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}

/// Outcome of replaying a transcript
#[derive(Debug, Clone)]
pub struct Replay {
    /// Session rebuilt from the transcript
    pub session: Session,
    /// Its report
    pub report: Report,
}
