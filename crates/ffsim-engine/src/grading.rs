//! Final grading and debrief
//!
//! Grading is a pure function of the final scores: the same scores always
//! produce the same total, grade and comment.

use crate::scores::{ScoreKind, Scores};
use crate::session::{OutcomeKind, Session};
use ffsim_content::CaseId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    /// Outstanding
    S,
    /// Excellent
    A,
    /// Good
    B,
    /// Needs work
    C,
    /// Failed (strict table only)
    F,
}

impl Grade {
    /// Mentor comment for this grade
    #[must_use]
    pub fn comment(self) -> &'static str {
        match self {
            Grade::S => "完美的货代操作！你精准平衡了各方利益，展现了极高的专业素养。客户将成为你的忠实伙伴。",
            Grade::A => "非常优秀的操作。虽然有细微瑕疵，但整体流程把控得当，是一名值得信赖的高级业务员。",
            Grade::B => "表现合格。能完成基本运输任务，但在成本控制或风险规避上还有提升空间。",
            Grade::C => "勉强完成任务。过程中存在不少风险点，客户满意度一般，需要加强专业知识学习。",
            Grade::F => "操作彻底失败。你的决策导致了严重的后果，可能面临索赔或客户流失。请重新复盘学习。",
        }
    }

    /// One-word verdict shown next to the grade
    #[must_use]
    pub fn verdict(self) -> &'static str {
        match self {
            Grade::S => "完美",
            Grade::A => "优秀",
            Grade::B => "良好",
            Grade::C | Grade::F => "待改进",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

/// Threshold table mapping a total score to a grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradingScheme {
    /// Inclusive bounds: 90+ S, 80+ A, 60+ B, otherwise C
    #[default]
    Tiered,
    /// Exclusive bounds: >90 S, >80 A, >70 B, >60 C, otherwise F
    Strict,
}

impl GradingScheme {
    /// Grade a total score
    #[must_use]
    pub fn grade(self, total: u8) -> Grade {
        match self {
            GradingScheme::Tiered => match total {
                90.. => Grade::S,
                80..=89 => Grade::A,
                60..=79 => Grade::B,
                _ => Grade::C,
            },
            GradingScheme::Strict => match total {
                91.. => Grade::S,
                81..=90 => Grade::A,
                71..=80 => Grade::B,
                61..=70 => Grade::C,
                _ => Grade::F,
            },
        }
    }
}

impl fmt::Display for GradingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradingScheme::Tiered => write!(f, "tiered"),
            GradingScheme::Strict => write!(f, "strict"),
        }
    }
}

/// Advisory remark for a weak score
#[must_use]
pub fn advisory_remark(kind: ScoreKind) -> &'static str {
    match kind {
        ScoreKind::Trust => "特别建议：你的客户信用度过低。在货代行业，诚信是立身之本，不要为了短期利益牺牲服务质量。",
        ScoreKind::CostEfficiency => "特别建议：你的成本控制能力较弱。需要更熟悉市场价格和物流方案优化，帮客户省钱就是帮自己赚钱。",
        ScoreKind::Commission => "特别建议：你的盈利能力不足。虽然服务好了客户，但公司也需要生存。在合规的前提下学会合理定价。",
    }
}

/// Score-only part of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    /// Rounded average
    pub total_score: u8,
    /// Letter grade
    pub grade: Grade,
    /// Grade comment plus optional advisory
    pub comment: String,
    /// Score that triggered the advisory remark
    pub advisory: Option<ScoreKind>,
}

/// Grade final scores
///
/// The advisory goes to the lowest score (trust, then cost efficiency, then
/// commission on ties) when it is below `advisory_threshold`.
#[must_use]
pub fn assess(scores: &Scores, scheme: GradingScheme, advisory_threshold: u8) -> Assessment {
    let total_score = scores.total();
    let grade = scheme.grade(total_score);

    let (weakest, value) = scores.lowest();
    let advisory = (value < advisory_threshold).then_some(weakest);

    let mut comment = grade.comment().to_string();
    if let Some(kind) = advisory {
        comment.push_str("\n\n");
        comment.push_str(advisory_remark(kind));
    }

    Assessment {
        total_score,
        grade,
        comment,
        advisory,
    }
}

/// Debrief for a finished session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Case played
    pub case_id: CaseId,
    /// How the session ended
    pub outcome: OutcomeKind,
    /// Final scores
    pub scores: Scores,
    /// Rounded average
    pub total_score: u8,
    /// Letter grade
    pub grade: Grade,
    /// Table used for the grade
    pub scheme: GradingScheme,
    /// Mentor comment
    pub comment: String,
    /// Score that triggered the advisory remark
    pub advisory: Option<ScoreKind>,
    /// Stages resolved before the session ended
    pub stages_completed: usize,
}

impl Report {
    pub(crate) fn new(session: &Session, assessment: Assessment, scheme: GradingScheme) -> Self {
        Self {
            case_id: session.case_id().clone(),
            outcome: session.outcome(),
            scores: session.scores(),
            total_score: assessment.total_score,
            grade: assessment.grade,
            scheme,
            comment: assessment.comment,
            advisory: assessment.advisory,
            stages_completed: session.history().len(),
        }
    }

    /// Banner of the summary screen
    #[must_use]
    pub fn headline(&self) -> &'static str {
        if self.outcome == OutcomeKind::Completed {
            "实训结束 - 考核完成"
        } else {
            "实训结束 - 考核中止"
        }
    }

    /// Render as plain text
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== {} ===\n\n", self.headline()));
        out.push_str(&format!("Case: {}\n", self.case_id));
        out.push_str(&format!("Outcome: {}\n", self.outcome));
        out.push_str(&format!("Stages completed: {}\n", self.stages_completed));
        for (kind, value) in self.scores.iter() {
            out.push_str(&format!("  {}: {}\n", kind.label(), value));
        }
        out.push_str(&format!(
            "Total: {}  Grade: {} ({})\n\n",
            self.total_score,
            self.grade,
            self.grade.verdict()
        ));
        out.push_str(&self.comment);
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tiered_bounds_are_inclusive() {
        let s = GradingScheme::Tiered;
        assert_eq!(s.grade(100), Grade::S);
        assert_eq!(s.grade(90), Grade::S);
        assert_eq!(s.grade(89), Grade::A);
        assert_eq!(s.grade(80), Grade::A);
        assert_eq!(s.grade(79), Grade::B);
        assert_eq!(s.grade(60), Grade::B);
        assert_eq!(s.grade(59), Grade::C);
        assert_eq!(s.grade(0), Grade::C);
    }

    #[test]
    fn strict_bounds_are_exclusive() {
        let s = GradingScheme::Strict;
        assert_eq!(s.grade(91), Grade::S);
        assert_eq!(s.grade(90), Grade::A);
        assert_eq!(s.grade(81), Grade::A);
        assert_eq!(s.grade(80), Grade::B);
        assert_eq!(s.grade(71), Grade::B);
        assert_eq!(s.grade(70), Grade::C);
        assert_eq!(s.grade(61), Grade::C);
        assert_eq!(s.grade(60), Grade::F);
    }

    #[test]
    fn no_advisory_when_all_scores_reach_threshold() {
        let a = assess(&Scores::new(70, 50, 55), GradingScheme::Tiered, 50);
        assert_eq!(a.total_score, 58);
        assert_eq!(a.grade, Grade::C);
        assert_eq!(a.advisory, None);
        assert_eq!(a.comment, Grade::C.comment());
    }

    #[test]
    fn advisory_targets_lowest_score() {
        let a = assess(&Scores::new(80, 45, 30), GradingScheme::Tiered, 50);
        assert_eq!(a.advisory, Some(ScoreKind::Commission));
        assert!(a.comment.ends_with(advisory_remark(ScoreKind::Commission)));
        assert!(a.comment.contains("\n\n"));
    }

    #[test]
    fn advisory_tie_prefers_trust_over_cost() {
        let a = assess(&Scores::new(20, 20, 90), GradingScheme::Tiered, 50);
        assert_eq!(a.advisory, Some(ScoreKind::Trust));

        let b = assess(&Scores::new(90, 20, 20), GradingScheme::Tiered, 50);
        assert_eq!(b.advisory, Some(ScoreKind::CostEfficiency));
    }

    #[test]
    fn only_one_advisory_is_appended() {
        let a = assess(&Scores::new(10, 10, 10), GradingScheme::Strict, 50);
        assert_eq!(a.grade, Grade::F);
        assert_eq!(a.comment.matches("特别建议").count(), 1);
    }

    #[test]
    fn assessment_is_deterministic() {
        let scores = Scores::new(33, 67, 12);
        assert_eq!(
            assess(&scores, GradingScheme::Tiered, 50),
            assess(&scores, GradingScheme::Tiered, 50)
        );
    }

    #[test]
    fn verdicts_follow_summary_screen() {
        assert_eq!(Grade::S.verdict(), "完美");
        assert_eq!(Grade::B.verdict(), "良好");
        assert_eq!(Grade::C.verdict(), "待改进");
        assert_eq!(Grade::F.verdict(), "待改进");
    }

    #[test]
    fn scheme_parses_lowercase() {
        let s: GradingScheme = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(s, GradingScheme::Strict);
    }
}
