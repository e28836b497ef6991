use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分析类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "analysis.ts")]
pub enum AnalysisType {
    AcademicPerformance,    // 学业表现分析
    LearningProgress,       // 学习进度分析
    StrengthWeakness,       // 优势劣势分析
    ImprovementSuggestions, // 改进建议
    Comprehensive,          // 综合分析
}

impl AnalysisType {
    pub const ACADEMIC_PERFORMANCE: &'static str = "academic_performance";
    pub const LEARNING_PROGRESS: &'static str = "learning_progress";
    pub const STRENGTH_WEAKNESS: &'static str = "strength_weakness";
    pub const IMPROVEMENT_SUGGESTIONS: &'static str = "improvement_suggestions";
    pub const COMPREHENSIVE: &'static str = "comprehensive";

    pub const ALL: [AnalysisType; 5] = [
        AnalysisType::AcademicPerformance,
        AnalysisType::LearningProgress,
        AnalysisType::StrengthWeakness,
        AnalysisType::ImprovementSuggestions,
        AnalysisType::Comprehensive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::AcademicPerformance => Self::ACADEMIC_PERFORMANCE,
            AnalysisType::LearningProgress => Self::LEARNING_PROGRESS,
            AnalysisType::StrengthWeakness => Self::STRENGTH_WEAKNESS,
            AnalysisType::ImprovementSuggestions => Self::IMPROVEMENT_SUGGESTIONS,
            AnalysisType::Comprehensive => Self::COMPREHENSIVE,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AnalysisType::AcademicPerformance => "学业表现分析",
            AnalysisType::LearningProgress => "学习进度分析",
            AnalysisType::StrengthWeakness => "优势劣势分析",
            AnalysisType::ImprovementSuggestions => "改进建议",
            AnalysisType::Comprehensive => "综合分析",
        }
    }
}

impl<'de> Deserialize<'de> for AnalysisType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的分析类型: '{s}'. 支持的类型: academic_performance, learning_progress, strength_weakness, improvement_suggestions, comprehensive"
            ))
        })
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::ACADEMIC_PERFORMANCE => Ok(AnalysisType::AcademicPerformance),
            Self::LEARNING_PROGRESS => Ok(AnalysisType::LearningProgress),
            Self::STRENGTH_WEAKNESS => Ok(AnalysisType::StrengthWeakness),
            Self::IMPROVEMENT_SUGGESTIONS => Ok(AnalysisType::ImprovementSuggestions),
            Self::COMPREHENSIVE => Ok(AnalysisType::Comprehensive),
            _ => Err(format!("Invalid analysis type: {s}")),
        }
    }
}

// 分析状态：pending -> processing -> completed | failed
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "analysis.ts")]
pub enum AnalysisStatus {
    Pending,    // 待处理
    Processing, // 处理中
    Completed,  // 已完成
    Failed,     // 失败
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Processing => "processing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
        }
    }

    /// 只有待处理的分析可以执行
    pub fn can_run(&self) -> bool {
        matches!(self, AnalysisStatus::Pending)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, AnalysisStatus::Pending | AnalysisStatus::Processing)
    }

    /// 状态流转是否合法
    pub fn can_transition_to(&self, next: AnalysisStatus) -> bool {
        matches!(
            (self, next),
            (AnalysisStatus::Pending, AnalysisStatus::Processing)
                | (AnalysisStatus::Pending, AnalysisStatus::Failed)
                | (AnalysisStatus::Processing, AnalysisStatus::Completed)
                | (AnalysisStatus::Processing, AnalysisStatus::Failed)
        )
    }
}

impl<'de> Deserialize<'de> for AnalysisStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的分析状态: '{s}'. 支持的状态: pending, processing, completed, failed"
            ))
        })
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AnalysisStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AnalysisStatus::Pending),
            "processing" => Ok(AnalysisStatus::Processing),
            "completed" => Ok(AnalysisStatus::Completed),
            "failed" => Ok(AnalysisStatus::Failed),
            _ => Err(format!("Invalid analysis status: {s}")),
        }
    }
}

// 学生分析记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct StudentAnalysis {
    pub id: i64,
    pub student_id: String,
    pub analysis_type: AnalysisType,
    pub title: String,
    pub status: AnalysisStatus,
    // 提交给分析引擎的输入数据
    pub input_data: serde_json::Value,
    // markdown 格式的分析报告
    pub analysis_result: Option<String>,
    // 置信度 0-1
    pub ai_confidence: Option<f64>,
    pub prompt_template: String,
    pub actual_prompt: Option<String>,
    pub analyzed_by: String,
    pub error_message: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub analyzed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl StudentAnalysis {
    /// 报告摘要，超过 200 个字符时截断
    pub fn summary(&self) -> Option<String> {
        const LIMIT: usize = 200;
        self.analysis_result.as_ref().map(|content| {
            if content.chars().count() > LIMIT {
                let truncated: String = content.chars().take(LIMIT).collect();
                format!("{truncated}...")
            } else {
                content.clone()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_type_round_trip_names() {
        for analysis_type in AnalysisType::ALL {
            assert_eq!(analysis_type.as_str().parse::<AnalysisType>(), Ok(analysis_type));
        }
        assert!("weekly".parse::<AnalysisType>().is_err());
    }

    #[test]
    fn test_status_transitions() {
        assert!(AnalysisStatus::Pending.can_run());
        assert!(!AnalysisStatus::Completed.can_run());
        assert!(AnalysisStatus::Pending.can_transition_to(AnalysisStatus::Processing));
        assert!(AnalysisStatus::Processing.can_transition_to(AnalysisStatus::Completed));
        assert!(!AnalysisStatus::Completed.can_transition_to(AnalysisStatus::Processing));
        assert!(!AnalysisStatus::Failed.can_transition_to(AnalysisStatus::Completed));
    }

    #[test]
    fn test_summary_truncates_on_char_boundary() {
        let analysis = StudentAnalysis {
            id: 1,
            student_id: "20230001".to_string(),
            analysis_type: AnalysisType::Comprehensive,
            title: "综合分析".to_string(),
            status: AnalysisStatus::Completed,
            input_data: serde_json::Value::Null,
            analysis_result: Some("成".repeat(250)),
            ai_confidence: Some(0.8),
            prompt_template: String::new(),
            actual_prompt: None,
            analyzed_by: "Local Analysis Engine".to_string(),
            error_message: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            analyzed_at: Some(chrono::Utc::now()),
        };
        let summary = analysis.summary().unwrap();
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), 203);
    }
}
