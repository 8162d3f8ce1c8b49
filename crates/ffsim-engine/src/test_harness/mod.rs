//! Test harness
//!
//! Randomized playthroughs and content certification.

pub mod simulator;

pub use simulator::*;

use crate::engine::ProgressionEngine;
use ffsim_content::{audit_source, MissingStage, ScenarioSource};

/// Test harness for certifying a content library against the engine
pub struct TestHarness;

impl TestHarness {
    /// Run the simulator over several seeds
    #[must_use]
    pub fn run_certification<S: ScenarioSource>(
        engine: &ProgressionEngine<S>,
        seeds: u64,
        runs_per_seed: u64,
    ) -> CertificationReport {
        let mut total_violations = 0;
        let mut sessions = 0;

        for seed in 0..seeds {
            let config = SimulatorConfig {
                seed,
                runs: runs_per_seed,
                ..Default::default()
            };

            let report = run_simulator(engine, config);
            for violation in &report.violations {
                tracing::warn!("Certification violation (seed {}): {}", seed, violation);
            }
            total_violations += report.violations.len();
            sessions += report.stats.sessions;
        }

        CertificationReport {
            passed: total_violations == 0,
            total_violations,
            seeds_tested: seeds,
            sessions,
        }
    }

    /// Reachable stages without content
    #[must_use]
    pub fn audit_content<S: ScenarioSource>(engine: &ProgressionEngine<S>) -> Vec<MissingStage> {
        audit_source(engine.catalog(), engine.content())
    }
}

/// Report from certification
#[derive(Debug, Clone)]
pub struct CertificationReport {
    /// No violations on any seed
    pub passed: bool,
    /// Violations across all seeds
    pub total_violations: usize,
    /// Seeds run
    pub seeds_tested: u64,
    /// Sessions played
    pub sessions: u64,
}
