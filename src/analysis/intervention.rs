//! 学业干预与预警规则

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::mean;

const TREND_SAMPLE: usize = 5;
const TREND_MIN_SAMPLE: usize = 3;
const TREND_DROP: f64 = 5.0;

/// 干预等级，严重程度递减
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "analysis.ts")]
pub enum InterventionLevel {
    Critical,
    Warning,
    Attention,
}

impl InterventionLevel {
    /// 不需要干预时返回 None
    pub fn assess(average: f64, failed: i64) -> Option<Self> {
        if average < 60.0 {
            Some(Self::Critical)
        } else if average < 70.0 || failed > 2 {
            Some(Self::Warning)
        } else if failed > 0 {
            Some(Self::Attention)
        } else {
            None
        }
    }
}

pub fn intervention_recommendations(average: f64, failed: i64) -> Vec<String> {
    let items: &[&str] = if average < 60.0 {
        &[
            "立即联系学业导师进行一对一指导",
            "制定详细的补习计划",
            "寻求心理咨询师帮助",
            "考虑调整学习负担",
        ]
    } else if failed > 2 {
        &[
            "加强基础课程复习",
            "参加学习小组",
            "寻求优秀同学帮助",
            "改进学习方法",
        ]
    } else {
        &["保持当前学习状态", "持续监控学业进展", "预防性辅导"]
    };

    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "analysis.ts")]
pub enum AlertLevel {
    Danger,
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct AcademicAlert {
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
    pub recommendations: Vec<String>,
}

impl AcademicAlert {
    fn new(level: AlertLevel, title: &str, message: String, recommendations: &[&str]) -> Self {
        Self {
            level,
            title: title.to_string(),
            message,
            recommendations: recommendations.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// 根据平均分和最近成绩生成预警
///
/// `recent_scores` 需按日期倒序排列，只取前 5 条判断趋势。
pub fn academic_alerts(average: f64, recent_scores: &[f64]) -> Vec<AcademicAlert> {
    let mut alerts = Vec::new();

    if average < 60.0 {
        alerts.push(AcademicAlert::new(
            AlertLevel::Danger,
            "学业严重困难",
            format!("平均成绩仅{average:.1}分，需要立即干预"),
            &["立即联系学业导师", "制定补习计划", "寻求心理辅导"],
        ));
    } else if average < 75.0 {
        alerts.push(AcademicAlert::new(
            AlertLevel::Warning,
            "学业需要关注",
            format!("平均成绩{average:.1}分，建议加强学习"),
            &["加强基础知识学习", "参加学习小组", "改进学习方法"],
        ));
    } else if average >= 90.0 {
        alerts.push(AcademicAlert::new(
            AlertLevel::Success,
            "学业表现优秀",
            format!("平均成绩{average:.1}分，继续保持"),
            &["参加学科竞赛", "探索进阶课程", "指导其他同学"],
        ));
    }

    let sample = &recent_scores[..recent_scores.len().min(TREND_SAMPLE)];
    if sample.len() >= TREND_MIN_SAMPLE
        && let Some(recent_average) = mean(sample)
        && recent_average < average - TREND_DROP
    {
        alerts.push(AcademicAlert::new(
            AlertLevel::Warning,
            "成绩下降趋势",
            "近期成绩有所下降，需要关注".to_string(),
            &["分析下降原因，调整学习策略"],
        ));
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intervention_levels() {
        assert_eq!(InterventionLevel::assess(55.0, 0), Some(InterventionLevel::Critical));
        assert_eq!(InterventionLevel::assess(65.0, 0), Some(InterventionLevel::Warning));
        assert_eq!(InterventionLevel::assess(85.0, 3), Some(InterventionLevel::Warning));
        assert_eq!(InterventionLevel::assess(85.0, 1), Some(InterventionLevel::Attention));
        assert_eq!(InterventionLevel::assess(85.0, 0), None);
    }

    #[test]
    fn test_intervention_recommendations() {
        assert_eq!(intervention_recommendations(50.0, 5).len(), 4);
        assert_eq!(intervention_recommendations(75.0, 3)[0], "加强基础课程复习");
        assert_eq!(intervention_recommendations(65.0, 0)[0], "保持当前学习状态");
    }

    #[test]
    fn test_alert_bands() {
        let alerts = academic_alerts(52.0, &[]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Danger);
        assert_eq!(alerts[0].message, "平均成绩仅52.0分，需要立即干预");

        assert_eq!(academic_alerts(74.9, &[])[0].level, AlertLevel::Warning);
        assert_eq!(academic_alerts(93.0, &[])[0].level, AlertLevel::Success);
        assert!(academic_alerts(80.0, &[]).is_empty());
    }

    #[test]
    fn test_declining_trend() {
        // 最近 5 条平均 72，比总平均 80 低 8 分
        let alerts = academic_alerts(80.0, &[70.0, 72.0, 74.0, 70.0, 74.0, 100.0]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "成绩下降趋势");

        // 不足 3 条不判断趋势
        assert!(academic_alerts(80.0, &[50.0, 50.0]).is_empty());
        // 下降不超过 5 分
        assert!(academic_alerts(80.0, &[76.0, 76.0, 76.0]).is_empty());
    }
}
