use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{AnalysisStatus, AnalysisType, StudentAnalysis};
use crate::analysis::{AcademicAlert, DataQualityReport, InterventionLevel, ScoreDistribution};
use crate::models::common::PaginationInfo;
use crate::models::reports::responses::CategoryStats;
use crate::models::service_logs::responses::ServiceLogStats;
use crate::models::students::entities::Student;

// 各状态分析数量
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct AnalysisCounts {
    pub total: i64,
    pub pending: i64,
    pub processing: i64,
    pub completed: i64,
    pub failed: i64,
}

impl AnalysisCounts {
    pub fn record(&mut self, status: AnalysisStatus, count: i64) {
        match status {
            AnalysisStatus::Pending => self.pending += count,
            AnalysisStatus::Processing => self.processing += count,
            AnalysisStatus::Completed => self.completed += count,
            AnalysisStatus::Failed => self.failed += count,
        }
        self.total += count;
    }
}

// 分析历史列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct AnalysisListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<StudentAnalysis>,
    pub status_counts: AnalysisCounts,
}

// 分析状态响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct AnalysisStatusResponse {
    pub id: i64,
    pub status: AnalysisStatus,
    pub title: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<&StudentAnalysis> for AnalysisStatusResponse {
    fn from(analysis: &StudentAnalysis) -> Self {
        let completed = analysis.status == AnalysisStatus::Completed;
        let failed = analysis.status == AnalysisStatus::Failed;
        Self {
            id: analysis.id,
            status: analysis.status,
            title: analysis.title.clone(),
            created_at: analysis.created_at,
            analyzed_at: analysis.analyzed_at.filter(|_| completed),
            ai_confidence: analysis.ai_confidence.filter(|_| completed),
            analysis_result: analysis.analysis_result.clone().filter(|_| completed),
            error_message: analysis.error_message.clone().filter(|_| failed),
        }
    }
}

// 分析报告
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct AnalysisReport {
    pub analysis_id: i64,
    pub student: Student,
    pub analysis_type: AnalysisType,
    pub type_name: String,
    pub title: String,
    pub content: String,
    pub confidence: Option<f64>,
    pub analyzed_by: String,
    pub analyzed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub input_data: serde_json::Value,
}

impl AnalysisReport {
    pub fn new(student: Student, analysis: StudentAnalysis) -> Self {
        Self {
            analysis_id: analysis.id,
            student,
            type_name: analysis.analysis_type.display_name().to_string(),
            analysis_type: analysis.analysis_type,
            title: analysis.title,
            content: analysis.analysis_result.unwrap_or_default(),
            confidence: analysis.ai_confidence,
            analyzed_by: analysis.analyzed_by,
            analyzed_at: analysis.analyzed_at,
            input_data: analysis.input_data,
        }
    }
}

// 智能体分析响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct AgentAnalysisResponse {
    pub analysis_id: i64,
    pub status: AnalysisStatus,
    pub content: Option<String>,
    pub confidence: Option<f64>,
    pub data_quality: DataQualityReport,
}

// 已存在的进行中分析
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct ActiveAnalysisRef {
    pub analysis_id: i64,
    pub status: AnalysisStatus,
}

// 历史分析条目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct AnalysisHistoryItem {
    pub id: i64,
    pub analysis_type: AnalysisType,
    pub title: String,
    pub status: AnalysisStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub analyzed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub ai_confidence: Option<f64>,
    pub summary: Option<String>,
}

impl From<&StudentAnalysis> for AnalysisHistoryItem {
    fn from(analysis: &StudentAnalysis) -> Self {
        Self {
            id: analysis.id,
            analysis_type: analysis.analysis_type,
            title: analysis.title.clone(),
            status: analysis.status,
            created_at: analysis.created_at,
            analyzed_at: analysis.analyzed_at,
            ai_confidence: analysis.ai_confidence,
            summary: analysis.summary(),
        }
    }
}

// 学生分析历史响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct StudentHistoryResponse {
    pub student_id: String,
    pub student_name: String,
    pub items: Vec<AnalysisHistoryItem>,
}

// 学生分析概览
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct StudentAnalysisOverview {
    pub student: Student,
    pub analyses: Vec<AnalysisHistoryItem>,
    pub total_courses: i64,
    pub average_score: f64,
    pub failed_courses: i64,
    pub excellent_courses: i64,
    pub distribution: ScoreDistribution,
    pub categories: Vec<CategoryStats>,
}

// 学生快速统计
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct StudentQuickStats {
    pub student_id: String,
    pub name: String,
    pub major: String,
    pub average_score: f64,
    pub total_courses: i64,
    pub failed_courses: i64,
    pub latest_analysis_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 首页计数
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct AnalysisCountsResponse {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub failed: i64,
}

// 分析类型分布
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct TypeCount {
    pub analysis_type: AnalysisType,
    pub type_name: String,
    pub count: i64,
}

// 被标记的分析（问题学生/优秀学生）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct FlaggedAnalysis {
    pub analysis_id: i64,
    pub student_id: String,
    pub title: String,
    pub analyzed_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 月度平均分
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct MonthlyAverage {
    // YYYY-MM
    pub month: String,
    pub average_score: Option<f64>,
    pub score_count: i64,
}

// 仪表盘响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct DashboardResponse {
    pub total_students: i64,
    pub total_analyses: i64,
    pub pending_analyses: i64,
    pub processing_analyses: i64,
    pub completed_analyses: i64,
    pub failed_analyses: i64,
    pub type_distribution: Vec<TypeCount>,
    pub recent_analyses: Vec<StudentAnalysis>,
    pub problem_students: Vec<FlaggedAnalysis>,
    pub excellent_students: Vec<FlaggedAnalysis>,
    pub service_stats: ServiceLogStats,
    pub performance_trend: Vec<MonthlyAverage>,
}

// 需要干预的学生
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct InterventionStudent {
    pub student_id: String,
    pub name: String,
    pub major: String,
    pub average_score: f64,
    pub failed_count: i64,
    pub total_courses: i64,
    pub pass_rate: f64,
    pub level: InterventionLevel,
    pub recommendations: Vec<String>,
    pub latest_analysis: Option<AnalysisHistoryItem>,
}

// 干预等级统计
#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct InterventionTotals {
    pub critical: i64,
    pub warning: i64,
    pub attention: i64,
}

// 干预列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct InterventionResponse {
    pub students: Vec<InterventionStudent>,
    pub totals: InterventionTotals,
}

// 学生预警
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct StudentAlerts {
    pub student_id: String,
    pub name: String,
    pub major: String,
    pub average_score: f64,
    pub alerts: Vec<AcademicAlert>,
}

// 预警统计
#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct AlertTotals {
    pub danger: i64,
    pub warning: i64,
    pub success: i64,
}

// 学业建议响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct SuggestionsResponse {
    pub students: Vec<StudentAlerts>,
    pub totals: AlertTotals,
}
