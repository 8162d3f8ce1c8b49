//! FFSim Content - case catalog and scenario content store
//!
//! Read-only data consumed by the progression engine:
//! - [`CaseCatalog`]: the cases a learner can pick, each with an ordered stage flow
//! - [`ContentStore`]: per-case stage narrative, choices and their outcomes
//! - [`ContentPack`]: YAML/JSON documents that build both registries at once
//!
//! # Example
//!
//! ```rust,ignore
//! use ffsim_content::{builtin_library, CaseId};
//!
//! let library = builtin_library()?;
//! let case = library.catalog.get(&CaseId::from("case_1")).unwrap();
//! println!("{} has {} stages", case.title, case.stage_count());
//! ```

#![warn(unreachable_pub)]

pub mod builtin;
pub mod case;
pub mod error;
pub mod ids;
pub mod pack;
pub mod scenario;

pub use builtin::{builtin_library, BUILTIN_PACK};
pub use case::{Case, CaseCatalog, Difficulty};
pub use error::CatalogError;
pub use ids::{CaseId, ChoiceId, StageId};
pub use pack::{CaseDocument, ContentPack, Library, PackFormat};
pub use scenario::{
    audit_source, Choice, ContentStore, MissingStage, Outcome, ScenarioSource, ScoreDelta, StageContent,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
