//! Bounded performance scores
//!
//! Three independent scores, each kept in `[MIN_SCORE, MAX_SCORE]` by
//! construction. Deltas are truncated at the bounds, never rejected.

use ffsim_content::ScoreDelta;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound of every score; reaching it ends the session
pub const MIN_SCORE: u8 = 0;
/// Upper bound of every score
pub const MAX_SCORE: u8 = 100;
/// Value of every score when a session starts
pub const INITIAL_SCORE: u8 = 50;

/// The tracked scores
///
/// Declaration order is the tie-break precedence for advisory remarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    /// Customer trust
    Trust,
    /// Cost efficiency for the customer
    CostEfficiency,
    /// Own commission
    Commission,
}

impl ScoreKind {
    /// All kinds in precedence order
    pub const ALL: [ScoreKind; 3] = [
        ScoreKind::Trust,
        ScoreKind::CostEfficiency,
        ScoreKind::Commission,
    ];

    /// Label used on the stats panel
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScoreKind::Trust => "客户信任",
            ScoreKind::CostEfficiency => "成本控制",
            ScoreKind::Commission => "个人佣金",
        }
    }

    /// Component of a delta for this kind
    #[inline]
    #[must_use]
    pub fn delta_of(self, delta: &ScoreDelta) -> i32 {
        match self {
            ScoreKind::Trust => delta.trust,
            ScoreKind::CostEfficiency => delta.cost_efficiency,
            ScoreKind::Commission => delta.commission,
        }
    }
}

impl fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreKind::Trust => write!(f, "trust"),
            ScoreKind::CostEfficiency => write!(f, "cost efficiency"),
            ScoreKind::Commission => write!(f, "commission"),
        }
    }
}

/// Current score triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Scores {
    trust: u8,
    cost_efficiency: u8,
    commission: u8,
}

impl Default for Scores {
    fn default() -> Self {
        Self::initial()
    }
}

impl Scores {
    /// 50 / 50 / 50
    #[inline]
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            trust: INITIAL_SCORE,
            cost_efficiency: INITIAL_SCORE,
            commission: INITIAL_SCORE,
        }
    }

    /// Create from raw values, clamping each into range
    #[must_use]
    pub fn new(trust: i32, cost_efficiency: i32, commission: i32) -> Self {
        Self {
            trust: clamp(trust),
            cost_efficiency: clamp(cost_efficiency),
            commission: clamp(commission),
        }
    }

    /// Customer trust
    #[inline]
    #[must_use]
    pub fn trust(&self) -> u8 {
        self.trust
    }

    /// Cost efficiency
    #[inline]
    #[must_use]
    pub fn cost_efficiency(&self) -> u8 {
        self.cost_efficiency
    }

    /// Commission
    #[inline]
    #[must_use]
    pub fn commission(&self) -> u8 {
        self.commission
    }

    /// Value of one score
    #[inline]
    #[must_use]
    pub fn get(&self, kind: ScoreKind) -> u8 {
        match kind {
            ScoreKind::Trust => self.trust,
            ScoreKind::CostEfficiency => self.cost_efficiency,
            ScoreKind::Commission => self.commission,
        }
    }

    /// Apply a delta, clamping each field independently
    #[must_use]
    pub fn apply(&self, delta: &ScoreDelta) -> Self {
        let step = |kind: ScoreKind| clamp(i32::from(self.get(kind)).saturating_add(kind.delta_of(delta)));
        Self {
            trust: step(ScoreKind::Trust),
            cost_efficiency: step(ScoreKind::CostEfficiency),
            commission: step(ScoreKind::Commission),
        }
    }

    /// First score (in precedence order) sitting at the floor
    #[must_use]
    pub fn depleted(&self) -> Option<ScoreKind> {
        ScoreKind::ALL
            .into_iter()
            .find(|kind| self.get(*kind) == MIN_SCORE)
    }

    /// Average of the three scores, rounded to nearest
    ///
    /// The sum is an integer, so `sum / 3` never lands on a half.
    #[must_use]
    pub fn total(&self) -> u8 {
        let sum = u16::from(self.trust) + u16::from(self.cost_efficiency) + u16::from(self.commission);
        // sum <= 300, so the average fits
        u8::try_from((sum + 1) / 3).unwrap_or(MAX_SCORE)
    }

    /// Lowest score; ties go to the earlier kind in [`ScoreKind::ALL`]
    #[must_use]
    pub fn lowest(&self) -> (ScoreKind, u8) {
        ScoreKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
            .fold((ScoreKind::Trust, self.trust), |best, cur| {
                if cur.1 < best.1 {
                    cur
                } else {
                    best
                }
            })
    }

    /// Iterate `(kind, value)` in precedence order
    pub fn iter(&self) -> impl Iterator<Item = (ScoreKind, u8)> + '_ {
        ScoreKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }
}

impl fmt::Display for Scores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trust {} / cost efficiency {} / commission {}",
            self.trust, self.cost_efficiency, self.commission
        )
    }
}

fn clamp(value: i32) -> u8 {
    let bounded = value.clamp(i32::from(MIN_SCORE), i32::from(MAX_SCORE));
    u8::try_from(bounded).unwrap_or(MIN_SCORE)
}
