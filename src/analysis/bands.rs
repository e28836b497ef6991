//! 固定分数段划分
//!
//! 所有标签都是分数的单调阶梯函数，阈值在此集中定义。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::round2;

/// 报告中使用的表现等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "analysis.ts")]
pub enum PerformanceLevel {
    AtRisk,
    NeedsImprovement,
    Satisfactory,
    Good,
    Excellent,
}

impl PerformanceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 80.0 {
            Self::Good
        } else if score >= 70.0 {
            Self::Satisfactory
        } else if score >= 60.0 {
            Self::NeedsImprovement
        } else {
            Self::AtRisk
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Satisfactory => "Satisfactory",
            Self::NeedsImprovement => "Needs Improvement",
            Self::AtRisk => "At Risk",
        }
    }

    /// 学业地位描述
    pub fn standing(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent - Dean's List Level",
            Self::Good => "Good - Above Average Performance",
            Self::Satisfactory => "Satisfactory - Meets Expectations",
            Self::NeedsImprovement => "Needs Improvement",
            Self::AtRisk => "At Risk - Immediate Attention Required",
        }
    }
}

impl std::fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub fn academic_standing(average: f64) -> &'static str {
    PerformanceLevel::from_score(average).standing()
}

/// 成绩分布段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "analysis.ts")]
pub enum GradeBand {
    Excellent, // [90, 100]
    Good,      // [80, 90)
    Average,   // [70, 80)
    Pass,      // [60, 70)
    Fail,      // [0, 60)
}

impl GradeBand {
    pub const ALL: [GradeBand; 5] = [
        GradeBand::Excellent,
        GradeBand::Good,
        GradeBand::Average,
        GradeBand::Pass,
        GradeBand::Fail,
    ];

    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 80.0 {
            Self::Good
        } else if score >= 70.0 {
            Self::Average
        } else if score >= 60.0 {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "优秀",
            Self::Good => "良好",
            Self::Average => "中等",
            Self::Pass => "及格",
            Self::Fail => "不及格",
        }
    }

    pub fn range(&self) -> &'static str {
        match self {
            Self::Excellent => "90-100",
            Self::Good => "80-89",
            Self::Average => "70-79",
            Self::Pass => "60-69",
            Self::Fail => "0-59",
        }
    }
}

/// 各分数段人数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct ScoreDistribution {
    pub excellent: i64,
    pub good: i64,
    pub average: i64,
    pub pass: i64,
    pub fail: i64,
}

impl ScoreDistribution {
    pub fn from_scores<I: IntoIterator<Item = f64>>(scores: I) -> Self {
        let mut distribution = Self::default();
        for score in scores {
            distribution.add(score);
        }
        distribution
    }

    pub fn add(&mut self, score: f64) {
        match GradeBand::from_score(score) {
            GradeBand::Excellent => self.excellent += 1,
            GradeBand::Good => self.good += 1,
            GradeBand::Average => self.average += 1,
            GradeBand::Pass => self.pass += 1,
            GradeBand::Fail => self.fail += 1,
        }
    }

    pub fn count(&self, band: GradeBand) -> i64 {
        match band {
            GradeBand::Excellent => self.excellent,
            GradeBand::Good => self.good,
            GradeBand::Average => self.average,
            GradeBand::Pass => self.pass,
            GradeBand::Fail => self.fail,
        }
    }

    pub fn total(&self) -> i64 {
        self.excellent + self.good + self.average + self.pass + self.fail
    }

    pub fn passed(&self) -> i64 {
        self.total() - self.fail
    }
}

/// 单门成绩对应的绩点（4.0 制）
pub fn grade_points(score: f64) -> f64 {
    const TABLE: [(f64, f64); 9] = [
        (90.0, 4.0),
        (85.0, 3.7),
        (82.0, 3.3),
        (78.0, 3.0),
        (75.0, 2.7),
        (72.0, 2.3),
        (68.0, 2.0),
        (64.0, 1.5),
        (60.0, 1.0),
    ];

    TABLE
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map(|(_, points)| *points)
        .unwrap_or(0.0)
}

/// 学分加权 GPA，学分不大于 0 时按 1 学分计
pub fn calculate_gpa(scores: &[(f64, i32)]) -> f64 {
    let mut total_points = 0.0;
    let mut total_credits = 0.0;

    for &(score, credits) in scores {
        let credits = if credits > 0 { credits as f64 } else { 1.0 };
        total_points += grade_points(score) * credits;
        total_credits += credits;
    }

    if total_credits > 0.0 {
        round2(total_points / total_credits)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_performance_level_thresholds() {
        assert_eq!(PerformanceLevel::from_score(100.0), PerformanceLevel::Excellent);
        assert_eq!(PerformanceLevel::from_score(90.0), PerformanceLevel::Excellent);
        assert_eq!(PerformanceLevel::from_score(89.99), PerformanceLevel::Good);
        assert_eq!(PerformanceLevel::from_score(70.0), PerformanceLevel::Satisfactory);
        assert_eq!(
            PerformanceLevel::from_score(60.0),
            PerformanceLevel::NeedsImprovement
        );
        assert_eq!(PerformanceLevel::from_score(59.9), PerformanceLevel::AtRisk);
    }

    #[test]
    fn test_labels_are_monotonic() {
        let mut previous_level = PerformanceLevel::from_score(0.0);
        let mut previous_points = grade_points(0.0);
        for step in 0..=1000 {
            let score = step as f64 / 10.0;
            let level = PerformanceLevel::from_score(score);
            let points = grade_points(score);
            assert!(level >= previous_level, "level dropped at {score}");
            assert!(points >= previous_points, "points dropped at {score}");
            previous_level = level;
            previous_points = points;
        }
    }

    #[test]
    fn test_academic_standing() {
        assert_eq!(academic_standing(92.5), "Excellent - Dean's List Level");
        assert_eq!(academic_standing(81.0), "Good - Above Average Performance");
        assert_eq!(
            academic_standing(45.0),
            "At Risk - Immediate Attention Required"
        );
    }

    #[test]
    fn test_grade_points_table() {
        assert_eq!(grade_points(95.0), 4.0);
        assert_eq!(grade_points(86.0), 3.7);
        assert_eq!(grade_points(82.0), 3.3);
        assert_eq!(grade_points(81.9), 3.0);
        assert_eq!(grade_points(64.0), 1.5);
        assert_eq!(grade_points(60.0), 1.0);
        assert_eq!(grade_points(59.5), 0.0);
    }

    #[test]
    fn test_calculate_gpa_is_credit_weighted() {
        // (4.0 * 4 + 2.0 * 2) / 6 = 3.333...
        assert_eq!(calculate_gpa(&[(92.0, 4), (69.0, 2)]), 3.33);
        // 学分为 0 按 1 计
        assert_eq!(calculate_gpa(&[(92.0, 0), (50.0, 1)]), 2.0);
        assert_eq!(calculate_gpa(&[]), 0.0);
    }

    #[test]
    fn test_distribution_counts() {
        let distribution = ScoreDistribution::from_scores([95.0, 90.0, 85.0, 72.0, 61.0, 59.0]);
        assert_eq!(distribution.excellent, 2);
        assert_eq!(distribution.good, 1);
        assert_eq!(distribution.average, 1);
        assert_eq!(distribution.pass, 1);
        assert_eq!(distribution.fail, 1);
        assert_eq!(distribution.total(), 6);
        assert_eq!(distribution.passed(), 5);
        assert_eq!(GradeBand::from_score(79.99).label(), "中等");
    }
}
