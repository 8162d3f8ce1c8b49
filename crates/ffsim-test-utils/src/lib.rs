//! Testing fixtures for FFSim workspace
//!
//! Small hand-built libraries with known deltas, so tests can assert exact
//! score trajectories.

#![allow(missing_docs)]

use ffsim_content::{
    Case, CaseCatalog, CaseId, Choice, ChoiceId, ContentStore, Library, ScoreDelta, StageContent,
    StageId,
};

/// Two-stage case with the end-to-end deltas: S1/A = (+10,-5,0), S2/B = (+10,+5,+5)
pub const E2E_CASE: &str = "e2e";
/// Flow `[S1, S2, SUMMARY]` with content for S1 only
pub const GAP_CASE: &str = "gap";
/// Flow `[S1, SUMMARY]` with no content at all
pub const HOLLOW_CASE: &str = "hollow";

pub fn case_id(id: &str) -> CaseId {
    CaseId::from(id)
}

pub fn stage_id(id: &str) -> StageId {
    StageId::from(id)
}

pub fn choice_id(id: &str) -> ChoiceId {
    ChoiceId::from(id)
}

pub fn flow(ids: &[&str]) -> Vec<StageId> {
    ids.iter().map(|s| StageId::from(*s)).collect()
}

pub fn stage(title: &str, choices: Vec<Choice>) -> StageContent {
    StageContent::new(title, format!("{title} narrative"), choices)
}

pub fn choice(id: &str, trust: i32, cost_efficiency: i32, commission: i32) -> Choice {
    Choice::new(
        id,
        format!("option {id}"),
        format!("feedback {id}"),
        ScoreDelta::new(trust, cost_efficiency, commission),
    )
}

/// Stage S1 of the end-to-end case
///
/// - `A`: (+10, -5, 0)
/// - `B`: (-60, 0, 0), drives trust to the floor
/// - `C`: neutral
pub fn e2e_stage_one() -> StageContent {
    stage(
        "Stage one",
        vec![choice("A", 10, -5, 0), choice("B", -60, 0, 0), choice("C", 0, 0, 0)],
    )
}

/// Stage S2 of the end-to-end case
///
/// - `A`: neutral
/// - `B`: (+10, +5, +5)
/// - `C`: (+200, +200, +200), saturates every score
/// - `D`: (0, -100, 0), empties cost efficiency
pub fn e2e_stage_two() -> StageContent {
    stage(
        "Stage two",
        vec![
            choice("A", 0, 0, 0),
            choice("B", 10, 5, 5),
            choice("C", 200, 200, 200),
            choice("D", 0, -100, 0),
        ],
    )
}

pub fn fixture_catalog() -> CaseCatalog {
    CaseCatalog::new()
        .with_case(Case::new(E2E_CASE, flow(&["S1", "S2", "SUMMARY"])).with_title("End to end"))
        .and_then(|c| c.with_case(Case::new(GAP_CASE, flow(&["S1", "S2", "SUMMARY"]))))
        .and_then(|c| c.with_case(Case::new(HOLLOW_CASE, flow(&["S1", "SUMMARY"]))))
        .expect("fixture catalog is valid")
}

pub fn fixture_content() -> ContentStore {
    ContentStore::new()
        .with_stage(E2E_CASE, "S1", e2e_stage_one())
        .and_then(|s| s.with_stage(E2E_CASE, "S2", e2e_stage_two()))
        .and_then(|s| s.with_stage(GAP_CASE, "S1", e2e_stage_one()))
        .expect("fixture content is valid")
}

pub fn fixture_library() -> Library {
    Library {
        catalog: fixture_catalog(),
        content: fixture_content(),
    }
}
