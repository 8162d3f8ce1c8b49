//! Case definitions and the case catalog
//!
//! A [`Case`] names an ordered flow of stages ending with the terminal stage.
//! Flows are validated when a case enters the [`CaseCatalog`], so the engine
//! can rely on them being well formed.

use crate::error::CatalogError;
use crate::ids::{CaseId, StageId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Case difficulty shown on the case selection screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Guided course
    Easy,
    /// Default
    #[default]
    Medium,
    /// Crisis scenarios
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.pad(label)
    }
}

/// A selectable case: metadata plus its stage flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    /// Unique key
    pub id: CaseId,
    /// Display title
    pub title: String,
    /// Short briefing
    pub description: String,
    /// Difficulty tier
    pub difficulty: Difficulty,
    /// Topic tags
    pub tags: Vec<String>,
    flow: Vec<StageId>,
}

impl Case {
    /// Create a case with the given flow and empty metadata
    ///
    /// The flow is checked when the case is inserted into a catalog, or
    /// explicitly with [`Case::validate`].
    #[must_use]
    pub fn new(id: impl Into<CaseId>, flow: Vec<StageId>) -> Self {
        let id = id.into();
        Self {
            title: id.to_string(),
            id,
            description: String::new(),
            difficulty: Difficulty::default(),
            tags: Vec::new(),
            flow,
        }
    }

    /// With display title
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// With briefing text
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With difficulty
    #[inline]
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// With tags
    #[inline]
    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Full flow, terminal stage included
    #[inline]
    #[must_use]
    pub fn flow(&self) -> &[StageId] {
        &self.flow
    }

    /// Stage a new session starts at
    ///
    /// Always a playable stage once the case passed validation.
    #[inline]
    #[must_use]
    pub fn first_stage(&self) -> Option<&StageId> {
        self.flow.first()
    }

    /// Index of `stage` in the flow
    #[inline]
    #[must_use]
    pub fn position(&self, stage: &StageId) -> Option<usize> {
        self.flow.iter().position(|s| s == stage)
    }

    /// Stage following `stage`, `None` if `stage` is last or absent
    #[must_use]
    pub fn successor(&self, stage: &StageId) -> Option<&StageId> {
        self.position(stage).and_then(|idx| self.flow.get(idx + 1))
    }

    /// Stages that present content (everything but the terminal stage)
    pub fn playable_stages(&self) -> impl Iterator<Item = &StageId> {
        self.flow.iter().filter(|s| !s.is_terminal())
    }

    /// Number of playable stages
    #[inline]
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.playable_stages().count()
    }

    /// Check the flow shape
    ///
    /// # Errors
    /// - [`CatalogError::EmptyFlow`] when nothing can be played
    /// - [`CatalogError::MissingTerminal`] when the flow does not end with the terminal stage
    /// - [`CatalogError::MisplacedTerminal`] when the terminal stage appears earlier
    /// - [`CatalogError::DuplicateStage`] when a stage repeats
    pub fn validate(&self) -> Result<(), CatalogError> {
        let Some((last, body)) = self.flow.split_last() else {
            return Err(CatalogError::EmptyFlow(self.id.clone()));
        };
        if !last.is_terminal() {
            return Err(CatalogError::MissingTerminal(self.id.clone()));
        }
        if body.is_empty() {
            return Err(CatalogError::EmptyFlow(self.id.clone()));
        }

        let mut seen = HashSet::with_capacity(body.len());
        for stage in body {
            if stage.is_terminal() {
                return Err(CatalogError::MisplacedTerminal(self.id.clone()));
            }
            if !seen.insert(stage) {
                return Err(CatalogError::DuplicateStage {
                    case: self.id.clone(),
                    stage: stage.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Immutable registry of cases, iterated in authoring order
#[derive(Debug, Clone, Default)]
pub struct CaseCatalog {
    cases: IndexMap<CaseId, Case>,
}

impl CaseCatalog {
    /// Create empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a case after validating its flow
    ///
    /// # Errors
    /// [`CatalogError::DuplicateCase`] or any flow error from [`Case::validate`].
    pub fn insert(&mut self, case: Case) -> Result<(), CatalogError> {
        case.validate()?;
        if self.cases.contains_key(&case.id) {
            return Err(CatalogError::DuplicateCase(case.id));
        }
        self.cases.insert(case.id.clone(), case);
        Ok(())
    }

    /// Builder-style insert
    ///
    /// # Errors
    /// Same as [`CaseCatalog::insert`].
    pub fn with_case(mut self, case: Case) -> Result<Self, CatalogError> {
        self.insert(case)?;
        Ok(self)
    }

    /// Look up a case
    #[inline]
    #[must_use]
    pub fn get(&self, id: &CaseId) -> Option<&Case> {
        self.cases.get(id)
    }

    /// Check if case exists
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &CaseId) -> bool {
        self.cases.contains_key(id)
    }

    /// Iterate cases in authoring order
    pub fn iter(&self) -> impl Iterator<Item = &Case> {
        self.cases.values()
    }

    /// Number of cases
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Check if catalog is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
