//! Error types for FFSim Engine
//!
//! Every engine operation is all-or-nothing: when one of these errors is
//! returned, the session passed in is exactly as it was before the call.

use ffsim_content::{CaseId, ChoiceId, StageId};
use std::fmt;
use std::path::PathBuf;

/// Progression engine errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Case id absent from the catalog
    #[error("unknown case: {0}")]
    UnknownCase(CaseId),

    /// Choice cannot be resolved in the current session state
    #[error("invalid choice {choice} at stage {stage}: {reason}")]
    InvalidChoice {
        /// Stage the session is at
        stage: StageId,
        /// Submitted choice id
        choice: ChoiceId,
        /// Why it was rejected
        reason: ChoiceRejection,
    },

    /// A reachable stage has no authored content
    #[error("no content authored for {case}/{stage}")]
    MissingContent {
        /// Case key
        case: CaseId,
        /// Stage key
        stage: StageId,
    },

    /// Report requested before the session ended
    #[error("session for case {0} has not reached a terminal state")]
    NotTerminal(CaseId),

    /// Stage view requested after the session ended
    #[error("session for case {0} has already ended")]
    SessionEnded(CaseId),

    /// Transcript recorded against different content
    #[error("transcript recorded against content {expected}, loaded content is {actual}")]
    DigestMismatch {
        /// Digest stored in the transcript
        expected: String,
        /// Digest of the loaded content
        actual: String,
    },
}

/// Why a choice was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceRejection {
    /// Id not offered at the current stage
    NotOffered,
    /// Session already terminal
    SessionTerminal,
}

impl fmt::Display for ChoiceRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceRejection::NotOffered => write!(f, "not offered at this stage"),
            ChoiceRejection::SessionTerminal => write!(f, "session already ended"),
        }
    }
}

/// Coarse classification, used by frontends to pick a recovery path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Back to case selection
    UnknownCase,
    /// Re-prompt for a choice
    InvalidChoice,
    /// Content defect, session cannot proceed
    MissingContent,
    /// API misuse or replay input problem
    Usage,
}

impl EngineError {
    /// Classify the error
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownCase(_) => ErrorKind::UnknownCase,
            Self::InvalidChoice { .. } => ErrorKind::InvalidChoice,
            Self::MissingContent { .. } => ErrorKind::MissingContent,
            Self::NotTerminal(_) | Self::SessionEnded(_) | Self::DigestMismatch { .. } => {
                ErrorKind::Usage
            }
        }
    }

    /// Whether the current session can continue after this error
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidChoice { reason, .. } => *reason == ChoiceRejection::NotOffered,
            Self::NotTerminal(_) => true,
            Self::UnknownCase(_)
            | Self::MissingContent { .. }
            | Self::SessionEnded(_)
            | Self::DigestMismatch { .. } => false,
        }
    }

    /// Whether the error indicates broken content rather than bad input
    #[inline]
    #[must_use]
    pub fn is_content_defect(&self) -> bool {
        matches!(self, Self::MissingContent { .. })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for the config schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(reason: ChoiceRejection) -> EngineError {
        EngineError::InvalidChoice {
            stage: StageId::from("S1"),
            choice: ChoiceId::from("Z"),
            reason,
        }
    }

    #[test]
    fn display_mentions_ids() {
        let err = invalid(ChoiceRejection::NotOffered);
        assert_eq!(err.to_string(), "invalid choice Z at stage S1: not offered at this stage");

        let err = EngineError::UnknownCase(CaseId::from("nope"));
        assert_eq!(err.to_string(), "unknown case: nope");
    }

    #[test]
    fn classification() {
        assert_eq!(invalid(ChoiceRejection::NotOffered).kind(), ErrorKind::InvalidChoice);
        assert!(invalid(ChoiceRejection::NotOffered).is_recoverable());
        assert!(!invalid(ChoiceRejection::SessionTerminal).is_recoverable());

        let missing = EngineError::MissingContent {
            case: CaseId::from("c"),
            stage: StageId::from("S2"),
        };
        assert_eq!(missing.kind(), ErrorKind::MissingContent);
        assert!(missing.is_content_defect());
        assert!(!missing.is_recoverable());
    }
}
