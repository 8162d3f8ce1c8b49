//! Content packs
//!
//! A pack is one YAML or JSON document describing cases together with their
//! stage content:
//!
//! ```yaml
//! stage_titles:
//!   CASE_SCENARIO_1: Key task one
//! cases:
//!   - id: case_1
//!     title: Rail to air freight dispute
//!     difficulty: hard
//!     flow: [CASE_SCENARIO_1, SUMMARY]
//!     stages:
//!       CASE_SCENARIO_1:
//!         title: Liability
//!         narrative: ...
//!         choices:
//!           - id: A
//!             text: Refuse the refund
//!             outcome: { feedback: ..., delta: { trust: -30, cost_efficiency: 10 } }
//! ```

use crate::case::{Case, CaseCatalog, Difficulty};
use crate::error::CatalogError;
use crate::ids::{CaseId, StageId};
use crate::scenario::{ContentStore, MissingStage, StageContent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Serialization format of a pack file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl PackFormat {
    /// Detect format from file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// One case entry of a pack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDocument {
    /// Case key
    pub id: CaseId,
    /// Display title
    pub title: String,
    /// Briefing
    #[serde(default)]
    pub description: String,
    /// Difficulty tier
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Topic tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Stage order, ending with the terminal stage
    pub flow: Vec<StageId>,
    /// Content per stage
    #[serde(default)]
    pub stages: BTreeMap<StageId, StageContent>,
}

/// Top-level pack document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPack {
    /// Labels for stage ids, shared by all cases
    #[serde(default)]
    pub stage_titles: BTreeMap<StageId, String>,
    /// Cases in presentation order
    #[serde(default)]
    pub cases: Vec<CaseDocument>,
}

impl ContentPack {
    /// Parse a YAML pack
    ///
    /// # Errors
    /// [`CatalogError::Yaml`] on malformed input.
    pub fn from_yaml_str(input: &str) -> Result<Self, CatalogError> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Parse a JSON pack
    ///
    /// # Errors
    /// [`CatalogError::Json`] on malformed input.
    pub fn from_json_str(input: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read a pack file, format chosen by extension
    ///
    /// # Errors
    /// I/O, format detection or parse errors.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let format = PackFormat::from_path(path)
            .ok_or_else(|| CatalogError::UnsupportedFormat(path.to_path_buf()))?;
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match format {
            PackFormat::Yaml => Self::from_yaml_str(&raw),
            PackFormat::Json => Self::from_json_str(&raw),
        }
    }
}

/// Catalog and content built together from a pack
#[derive(Debug, Clone, Default)]
pub struct Library {
    /// Case registry
    pub catalog: CaseCatalog,
    /// Stage content registry
    pub content: ContentStore,
}

impl Library {
    /// Build both registries from a parsed pack
    ///
    /// Stages referenced by a flow but left unauthored are accepted here;
    /// see [`Library::audit`].
    ///
    /// # Errors
    /// Any flow or content validation error.
    pub fn from_pack(pack: ContentPack) -> Result<Self, CatalogError> {
        let mut catalog = CaseCatalog::new();
        let mut content = ContentStore::new();

        for (stage, title) in pack.stage_titles {
            content.set_stage_title(stage, title);
        }

        for doc in pack.cases {
            let case = Case::new(doc.id.clone(), doc.flow)
                .with_title(doc.title)
                .with_description(doc.description)
                .with_difficulty(doc.difficulty)
                .with_tags(doc.tags);
            catalog.insert(case)?;

            for (stage, stage_content) in doc.stages {
                content.insert(doc.id.clone(), stage, stage_content)?;
            }
        }

        let library = Self { catalog, content };
        for missing in library.audit() {
            tracing::warn!(case = %missing.case, stage = %missing.stage, "flow stage has no content");
        }
        tracing::debug!(
            cases = library.catalog.len(),
            stages = library.content.len(),
            "content library loaded"
        );
        Ok(library)
    }

    /// Parse and build from YAML
    ///
    /// # Errors
    /// Parse or validation errors.
    pub fn from_yaml_str(input: &str) -> Result<Self, CatalogError> {
        Self::from_pack(ContentPack::from_yaml_str(input)?)
    }

    /// Parse and build from JSON
    ///
    /// # Errors
    /// Parse or validation errors.
    pub fn from_json_str(input: &str) -> Result<Self, CatalogError> {
        Self::from_pack(ContentPack::from_json_str(input)?)
    }

    /// Read and build from a pack file
    ///
    /// # Errors
    /// I/O, parse or validation errors.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        Self::from_pack(ContentPack::from_path(path)?)
    }

    /// Reachable stages without content
    #[must_use]
    pub fn audit(&self) -> Vec<MissingStage> {
        self.content.audit(&self.catalog)
    }
}
