//! FFSim Engine - scenario progression and scoring
//!
//! Drives one learner through a case:
//! 1. **Start**: pick a case, scores reset to 50/50/50, first stage loaded
//! 2. **Resolve**: apply the chosen outcome, check the score floor, advance
//! 3. **Finalize**: average score, letter grade and templated debrief
//!
//! The engine is synchronous and deterministic: the same case and choice
//! sequence always yield the same scores, grade and comment.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ffsim_engine::prelude::*;
//!
//! let library = ffsim_content::builtin_library()?;
//! let engine = ProgressionEngine::from_library(library, EngineConfig::default());
//!
//! let (mut session, view) = engine.start_session(&CaseId::from("case_1"))?;
//! let transition = engine.resolve_choice(&mut session, &ChoiceId::from("C"))?;
//! println!("{}", transition.feedback.text);
//! ```

#![warn(unreachable_pub)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod grading;
pub mod logging;
pub mod scores;
pub mod session;
pub mod transcript;

pub mod test_harness;

pub use api::{ChoiceView, Progression, StageView, Transition};
pub use config::{AppConfig, ContentConfig, EngineConfig, LogConfig};
pub use engine::ProgressionEngine;
pub use error::{ChoiceRejection, ConfigError, EngineError, ErrorKind};
pub use grading::{Grade, GradingScheme, Report};
pub use scores::{ScoreKind, Scores, INITIAL_SCORE, MAX_SCORE, MIN_SCORE};
pub use session::{Feedback, HistoryEntry, OutcomeKind, Session, SessionId, RESULT_PROCESSED};
pub use transcript::{Replay, Transcript};

/// Common imports for driving sessions
pub mod prelude {
    pub use crate::api::{Progression, StageView, Transition};
    pub use crate::config::EngineConfig;
    pub use crate::engine::ProgressionEngine;
    pub use crate::error::EngineError;
    pub use crate::grading::{Grade, Report};
    pub use crate::session::{OutcomeKind, Session};
    pub use ffsim_content::{CaseId, ChoiceId, StageId};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
