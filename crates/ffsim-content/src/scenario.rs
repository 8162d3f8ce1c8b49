//! Scenario content: stage narrative, choices and outcomes
//!
//! Content is keyed by `(case id, stage id)` and never changes after the
//! store is built. Outcomes are resolved by the stable [`ChoiceId`], never
//! by the displayed choice text.

use crate::case::CaseCatalog;
use crate::error::CatalogError;
use crate::ids::{CaseId, ChoiceId, StageId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

/// Score change carried by an outcome; absent fields are 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScoreDelta {
    /// Customer trust change
    #[serde(default, skip_serializing_if = "is_zero")]
    pub trust: i32,
    /// Cost efficiency change (higher is cheaper for the customer)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub cost_efficiency: i32,
    /// Own commission change
    #[serde(default, skip_serializing_if = "is_zero")]
    pub commission: i32,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(v: &i32) -> bool {
    *v == 0
}

impl ScoreDelta {
    /// Create delta
    #[inline]
    #[must_use]
    pub const fn new(trust: i32, cost_efficiency: i32, commission: i32) -> Self {
        Self {
            trust,
            cost_efficiency,
            commission,
        }
    }

    /// Whether every field is 0
    #[inline]
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.trust == 0 && self.cost_efficiency == 0 && self.commission == 0
    }
}

/// Result of picking a choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Reaction text shown at the head of the next screen
    pub feedback: String,
    /// Score change
    #[serde(default)]
    pub delta: ScoreDelta,
}

/// A selectable action at a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Stable id, unique within the stage
    pub id: ChoiceId,
    /// Label shown to the learner
    pub text: String,
    /// Consequence, disclosed only once the choice is committed
    pub outcome: Outcome,
}

impl Choice {
    /// Create choice
    #[must_use]
    pub fn new(
        id: impl Into<ChoiceId>,
        text: impl Into<String>,
        feedback: impl Into<String>,
        delta: ScoreDelta,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            outcome: Outcome {
                feedback: feedback.into(),
                delta,
            },
        }
    }
}

/// Everything presented for one stage of one case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageContent {
    /// Screen title
    pub title: String,
    /// Situation description
    pub narrative: String,
    /// Ordered options
    pub choices: Vec<Choice>,
}

impl StageContent {
    /// Create stage content
    #[must_use]
    pub fn new(title: impl Into<String>, narrative: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            title: title.into(),
            narrative: narrative.into(),
            choices,
        }
    }

    /// Find a choice by id
    #[inline]
    #[must_use]
    pub fn choice(&self, id: &ChoiceId) -> Option<&Choice> {
        self.choices.iter().find(|c| &c.id == id)
    }
}

/// Read-only access to stage content
///
/// The progression engine is written against this trait so alternate
/// content sets can be injected.
pub trait ScenarioSource {
    /// Content for `(case, stage)`, `None` when nothing was authored
    fn stage(&self, case: &CaseId, stage: &StageId) -> Option<&StageContent>;

    /// Fingerprint of the content set, if the source supports one
    fn digest(&self) -> Option<String> {
        None
    }
}

/// A `(case, stage)` reachable through a flow with no authored content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingStage {
    /// Case whose flow references the stage
    pub case: CaseId,
    /// Stage lacking content
    pub stage: StageId,
}

/// Every playable stage of every catalog case that `source` has no content for
#[must_use]
pub fn audit_source<S: ScenarioSource + ?Sized>(
    catalog: &CaseCatalog,
    source: &S,
) -> Vec<MissingStage> {
    catalog
        .iter()
        .flat_map(|case| {
            case.playable_stages()
                .filter(move |stage| source.stage(&case.id, stage).is_none())
                .map(move |stage| MissingStage {
                    case: case.id.clone(),
                    stage: stage.clone(),
                })
        })
        .collect()
}

/// Immutable content registry
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentStore {
    cases: BTreeMap<CaseId, BTreeMap<StageId, StageContent>>,
    stage_titles: BTreeMap<StageId, String>,
    #[serde(skip)]
    digest: OnceLock<String>,
}

impl ContentStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add content for one stage of one case
    ///
    /// # Errors
    /// - [`CatalogError::DuplicateContent`] if the pair already has content
    /// - [`CatalogError::NoChoices`] if the stage offers nothing to pick
    /// - [`CatalogError::DuplicateChoice`] if two choices share an id
    pub fn insert(
        &mut self,
        case: impl Into<CaseId>,
        stage: impl Into<StageId>,
        content: StageContent,
    ) -> Result<(), CatalogError> {
        let case = case.into();
        let stage = stage.into();

        if content.choices.is_empty() {
            return Err(CatalogError::NoChoices { case, stage });
        }
        let mut ids = HashSet::with_capacity(content.choices.len());
        for choice in &content.choices {
            if !ids.insert(&choice.id) {
                return Err(CatalogError::DuplicateChoice {
                    case,
                    stage,
                    choice: choice.id.clone(),
                });
            }
        }

        let stages = self.cases.entry(case.clone()).or_default();
        if stages.contains_key(&stage) {
            return Err(CatalogError::DuplicateContent { case, stage });
        }
        stages.insert(stage, content);
        self.digest = OnceLock::new();
        Ok(())
    }

    /// Builder-style insert
    ///
    /// # Errors
    /// Same as [`ContentStore::insert`].
    pub fn with_stage(
        mut self,
        case: impl Into<CaseId>,
        stage: impl Into<StageId>,
        content: StageContent,
    ) -> Result<Self, CatalogError> {
        self.insert(case, stage, content)?;
        Ok(self)
    }

    /// Set the display label of a stage id
    pub fn set_stage_title(&mut self, stage: impl Into<StageId>, title: impl Into<String>) {
        self.stage_titles.insert(stage.into(), title.into());
    }

    /// Display label of a stage id, shared across cases
    #[inline]
    #[must_use]
    pub fn stage_title(&self, stage: &StageId) -> Option<&str> {
        self.stage_titles.get(stage).map(String::as_str)
    }

    /// Number of authored `(case, stage)` entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.values().map(BTreeMap::len).sum()
    }

    /// Check if store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// List every playable stage of every case that has no content
    #[must_use]
    pub fn audit(&self, catalog: &CaseCatalog) -> Vec<MissingStage> {
        audit_source(catalog, self)
    }

    fn compute_digest(&self) -> String {
        // BTreeMap ordering keeps the encoding canonical.
        let encoded = serde_json::to_vec(&self.cases);
        debug_assert!(encoded.is_ok(), "stage content always encodes to JSON");
        hex::encode(Sha256::digest(encoded.unwrap_or_default()))
    }
}

impl ScenarioSource for ContentStore {
    fn stage(&self, case: &CaseId, stage: &StageId) -> Option<&StageContent> {
        self.cases.get(case).and_then(|stages| stages.get(stage))
    }

    fn digest(&self) -> Option<String> {
        Some(self.digest.get_or_init(|| self.compute_digest()).clone())
    }
}
