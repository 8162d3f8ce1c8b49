//! Playthrough simulator - randomized invariant checking for the engine
//!
//! Plays seeded random sessions over every case of an engine's catalog,
//! mixing in choices that must be rejected, and checks the session
//! invariants after every operation.

use crate::api::{Progression, StageView};
use crate::error::{ChoiceRejection, EngineError};
use crate::engine::ProgressionEngine;
use crate::grading::Grade;
use crate::scores::{MAX_SCORE, MIN_SCORE};
use crate::session::{OutcomeKind, Session};
use ffsim_content::{CaseId, ChoiceId, ScenarioSource};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::collections::BTreeMap;
use std::fmt;

/// Choice id never offered by any stage
const BOGUS_CHOICE: &str = "__not_offered__";

/// Simulator configuration
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Sessions to play
    pub runs: u64,
    /// Probability of submitting a bogus choice before each real one
    pub invalid_choice_rate: f64,
    /// Stop after the first violation
    pub stop_on_first_violation: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            runs: 1_000,
            invalid_choice_rate: 0.10,
            stop_on_first_violation: false,
        }
    }
}

/// Types of invariant checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantCheck {
    /// Every score stays in [0, 100]
    ScoresInBounds,
    /// A rejected operation leaves the session identical
    RejectionLeavesSessionUnchanged,
    /// Each resolved choice appends exactly one history entry
    HistoryGrowsByOne,
    /// No more choices than playable stages
    HistoryWithinFlow,
    /// Terminal flag, outcome and scores agree
    TerminalMatchesOutcome,
    /// Nothing resolves after the session ended
    TerminalIsFinal,
    /// Grading the same session twice gives the same report
    GradingIsDeterministic,
    /// Replaying the transcript reproduces the report
    ReplayReproducesReport,
}

/// A violation detected during simulation
#[derive(Debug, Clone)]
pub struct Violation {
    /// Run index
    pub run: u64,
    /// Case being played
    pub case_id: CaseId,
    /// Failed check
    pub check: InvariantCheck,
    /// What was observed
    pub details: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run {} ({}): {:?}: {}", self.run, self.case_id, self.check, self.details)
    }
}

/// Statistics collected during simulation
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    /// Sessions started
    pub sessions: u64,
    /// Sessions that reached the end of the flow
    pub completed: u64,
    /// Sessions ended by the score floor
    pub failed_on_score: u64,
    /// Sessions that could not start or continue
    pub aborted: u64,
    /// Choices applied
    pub choices_resolved: u64,
    /// Bogus or late choices rejected
    pub choices_rejected: u64,
    /// Grade distribution
    pub grades: BTreeMap<Grade, u64>,
}

/// Final report from the simulator
#[derive(Debug, Clone)]
pub struct SimulatorReport {
    /// Configuration used
    pub config: SimulatorConfig,
    /// Counters
    pub stats: SessionStats,
    /// Detected violations
    pub violations: Vec<Violation>,
}

impl SimulatorReport {
    /// Check if simulation passed all criteria
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Generate a text report
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Playthrough Simulator Report ===\n\n");
        report.push_str(&format!("Seed: {}\n", self.config.seed));
        report.push_str(&format!("Sessions: {}\n", self.stats.sessions));
        report.push_str(&format!("Completed: {}\n", self.stats.completed));
        report.push_str(&format!("Failed on score: {}\n", self.stats.failed_on_score));
        report.push_str(&format!("Aborted: {}\n", self.stats.aborted));
        report.push_str(&format!("Choices resolved: {}\n", self.stats.choices_resolved));
        report.push_str(&format!("Choices rejected: {}\n", self.stats.choices_rejected));
        for (grade, count) in &self.stats.grades {
            report.push_str(&format!("  Grade {grade}: {count}\n"));
        }
        report.push_str(&format!("Violations: {}\n", self.violations.len()));

        if !self.violations.is_empty() {
            report.push_str("\n=== Violations ===\n");
            for (i, v) in self.violations.iter().enumerate() {
                report.push_str(&format!("{}. {}\n", i + 1, v));
            }
        }

        report.push_str(&format!(
            "\n=== Result: {} ===\n",
            if self.passed() { "PASS" } else { "FAIL" }
        ));

        report
    }
}

/// Run the playthrough simulator
#[must_use]
pub fn run_simulator<S: ScenarioSource>(
    engine: &ProgressionEngine<S>,
    config: SimulatorConfig,
) -> SimulatorReport {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut stats = SessionStats::default();
    let mut violations = Vec::new();

    let cases: Vec<CaseId> = engine.catalog().iter().map(|c| c.id.clone()).collect();

    if !cases.is_empty() {
        for run in 0..config.runs {
            let Some(case_id) = cases.choose(&mut rng) else {
                break;
            };
            let mut checker = RunChecker {
                engine,
                run,
                case_id,
                violations: &mut violations,
            };
            checker.play(&mut rng, &config, &mut stats);

            if config.stop_on_first_violation && !violations.is_empty() {
                break;
            }
        }
    }

    tracing::debug!(
        "Simulated {} sessions, {} violations",
        stats.sessions,
        violations.len()
    );

    SimulatorReport {
        config,
        stats,
        violations,
    }
}

struct RunChecker<'a, S: ScenarioSource> {
    engine: &'a ProgressionEngine<S>,
    run: u64,
    case_id: &'a CaseId,
    violations: &'a mut Vec<Violation>,
}

impl<S: ScenarioSource> RunChecker<'_, S> {
    fn violate(&mut self, check: InvariantCheck, details: String) {
        self.violations.push(Violation {
            run: self.run,
            case_id: self.case_id.clone(),
            check,
            details,
        });
    }

    fn play(&mut self, rng: &mut StdRng, config: &SimulatorConfig, stats: &mut SessionStats) {
        let engine = self.engine;
        let Ok((mut session, first)) = engine.start_session(self.case_id) else {
            stats.aborted += 1;
            return;
        };
        stats.sessions += 1;

        let flow_len = engine
            .catalog()
            .get(self.case_id)
            .map_or(0, ffsim_content::Case::stage_count);
        let mut view: StageView = first;

        loop {
            if rng.gen_bool(config.invalid_choice_rate) {
                self.submit_rejected(&mut session, &ChoiceId::from(BOGUS_CHOICE), stats);
            }

            let Some(choice) = view.choices.choose(rng).map(|c| c.id.clone()) else {
                stats.aborted += 1;
                return;
            };

            let before = session.clone();
            match engine.resolve_choice(&mut session, &choice) {
                Ok(transition) => {
                    stats.choices_resolved += 1;
                    self.check_step(&before, &session, transition.next.is_some(), flow_len);
                    match transition.next {
                        Some(next) => view = next,
                        None => break,
                    }
                }
                Err(err) => {
                    if session != before {
                        self.violate(
                            InvariantCheck::RejectionLeavesSessionUnchanged,
                            format!("failed transition ({err}) mutated the session"),
                        );
                    }
                    stats.aborted += 1;
                    return;
                }
            }
        }

        match session.outcome() {
            OutcomeKind::Completed => stats.completed += 1,
            OutcomeKind::FailedOnScore => stats.failed_on_score += 1,
            OutcomeKind::NotDone => {}
        }

        self.check_terminal(&mut session, stats);
    }

    fn submit_rejected(&mut self, session: &mut Session, choice: &ChoiceId, stats: &mut SessionStats) {
        let before = session.clone();
        match self.engine.resolve_choice(session, choice) {
            Err(EngineError::InvalidChoice { .. }) => stats.choices_rejected += 1,
            other => self.violate(
                InvariantCheck::RejectionLeavesSessionUnchanged,
                format!("choice {choice} was not rejected: {other:?}"),
            ),
        }
        if *session != before {
            self.violate(
                InvariantCheck::RejectionLeavesSessionUnchanged,
                format!("rejected choice {choice} mutated the session"),
            );
        }
    }

    fn check_step(&mut self, before: &Session, after: &Session, has_next: bool, flow_len: usize) {
        for (kind, value) in after.scores().iter() {
            if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
                self.violate(InvariantCheck::ScoresInBounds, format!("{kind} = {value}"));
            }
        }

        if after.history().len() != before.history().len() + 1 {
            self.violate(
                InvariantCheck::HistoryGrowsByOne,
                format!("{} -> {}", before.history().len(), after.history().len()),
            );
        }
        if after.history().len() > flow_len {
            self.violate(
                InvariantCheck::HistoryWithinFlow,
                format!("{} choices in a {flow_len}-stage case", after.history().len()),
            );
        }

        let depleted = after.scores().depleted().is_some();
        let consistent = match after.outcome() {
            OutcomeKind::NotDone => has_next && !depleted,
            OutcomeKind::FailedOnScore => !has_next && depleted,
            OutcomeKind::Completed => !has_next && !depleted && after.current_stage().is_terminal(),
        };
        if !consistent {
            self.violate(
                InvariantCheck::TerminalMatchesOutcome,
                format!("outcome {} with scores {}", after.outcome(), after.scores()),
            );
        }
    }

    fn check_terminal(&mut self, session: &mut Session, stats: &mut SessionStats) {
        let engine = self.engine;

        let before = session.clone();
        match engine.resolve_choice(session, &ChoiceId::from("A")) {
            Err(EngineError::InvalidChoice {
                reason: ChoiceRejection::SessionTerminal,
                ..
            }) => stats.choices_rejected += 1,
            other => self.violate(
                InvariantCheck::TerminalIsFinal,
                format!("choice after end returned {other:?}"),
            ),
        }
        if *session != before {
            self.violate(InvariantCheck::TerminalIsFinal, "ended session was mutated".to_string());
        }

        let (first, second) = match (engine.finalize_session(session), engine.finalize_session(session)) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(err), _) | (_, Err(err)) => {
                self.violate(InvariantCheck::GradingIsDeterministic, format!("finalize failed: {err}"));
                return;
            }
        };
        if first != second {
            self.violate(
                InvariantCheck::GradingIsDeterministic,
                format!("{} vs {}", first.total_score, second.total_score),
            );
        }
        *stats.grades.entry(first.grade).or_insert(0) += 1;

        match engine.replay(&engine.transcript(session)) {
            Ok(replay) if replay.report == first => {}
            Ok(replay) => self.violate(
                InvariantCheck::ReplayReproducesReport,
                format!("replay graded {} instead of {}", replay.report.grade, first.grade),
            ),
            Err(err) => self.violate(InvariantCheck::ReplayReproducesReport, format!("replay failed: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use ffsim_test_utils::fixture_library;

    #[test]
    fn fixture_library_passes() {
        let engine = ProgressionEngine::from_library(fixture_library(), EngineConfig::default());
        let report = run_simulator(
            &engine,
            SimulatorConfig {
                runs: 200,
                invalid_choice_rate: 0.5,
                ..Default::default()
            },
        );

        assert!(report.passed(), "{}", report.generate_text());
        assert!(report.stats.sessions + report.stats.aborted >= 200);
        assert!(report.stats.choices_rejected > 0);
    }

    #[test]
    fn same_seed_same_statistics() {
        let engine = ProgressionEngine::from_library(fixture_library(), EngineConfig::default());
        let config = SimulatorConfig {
            seed: 7,
            runs: 50,
            ..Default::default()
        };
        let a = run_simulator(&engine, config.clone());
        let b = run_simulator(&engine, config);
        assert_eq!(a.stats.choices_resolved, b.stats.choices_resolved);
        assert_eq!(a.stats.grades, b.stats.grades);
    }

    #[test]
    fn report_text_has_verdict() {
        let engine = ProgressionEngine::from_library(fixture_library(), EngineConfig::default());
        let report = run_simulator(&engine, SimulatorConfig { runs: 5, ..Default::default() });
        assert!(report.generate_text().ends_with("=== Result: PASS ===\n"));
    }
}
