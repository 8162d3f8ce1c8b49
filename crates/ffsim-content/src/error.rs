//! Error types for FFSim Content
//!
//! Everything here is an authoring defect detected while building the
//! registries; none of it is a player-facing condition.

use crate::ids::{CaseId, ChoiceId, StageId};
use std::path::PathBuf;

/// Catalog and content construction errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Two cases share an id
    #[error("duplicate case id: {0}")]
    DuplicateCase(CaseId),

    /// Flow has no playable stage
    #[error("case {0} has no playable stage in its flow")]
    EmptyFlow(CaseId),

    /// Flow does not end with the terminal stage
    #[error("case {0} flow must end with {term}", term = StageId::TERMINAL)]
    MissingTerminal(CaseId),

    /// Terminal stage found before the end of the flow
    #[error("case {0} has {term} before the end of its flow", term = StageId::TERMINAL)]
    MisplacedTerminal(CaseId),

    /// Stage listed twice in one flow
    #[error("case {case} lists stage {stage} more than once")]
    DuplicateStage {
        /// Offending case
        case: CaseId,
        /// Repeated stage
        stage: StageId,
    },

    /// Content authored twice for one (case, stage)
    #[error("content for {case}/{stage} is defined more than once")]
    DuplicateContent {
        /// Case key
        case: CaseId,
        /// Stage key
        stage: StageId,
    },

    /// Stage content offers nothing to choose
    #[error("content for {case}/{stage} has no choices")]
    NoChoices {
        /// Case key
        case: CaseId,
        /// Stage key
        stage: StageId,
    },

    /// Two choices of one stage share an id
    #[error("content for {case}/{stage} repeats choice id {choice}")]
    DuplicateChoice {
        /// Case key
        case: CaseId,
        /// Stage key
        stage: StageId,
        /// Repeated choice
        choice: ChoiceId,
    },

    /// YAML pack could not be parsed
    #[error("invalid YAML content pack: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON pack could not be parsed
    #[error("invalid JSON content pack: {0}")]
    Json(#[from] serde_json::Error),

    /// Pack file could not be read
    #[error("cannot read content pack {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File extension is neither YAML nor JSON
    #[error("unsupported content pack format: {0}")]
    UnsupportedFormat(PathBuf),
}

impl CatalogError {
    /// Whether the error comes from reading or decoding a pack rather than
    /// from its contents
    #[inline]
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::Yaml(_) | Self::Json(_) | Self::Io { .. } | Self::UnsupportedFormat(_)
        )
    }
}
