use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::{AnalysisStatus, AnalysisType};

// 创建分析请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct CreateAnalysisRequest {
    pub student_id: String,
    pub analysis_type: AnalysisType,
    pub title: Option<String>,
}

// 分析历史查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct AnalysisListParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<String>,
    pub analysis_type: Option<AnalysisType>,
    pub status: Option<AnalysisStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl From<AnalysisListParams> for AnalysisListQuery {
    fn from(params: AnalysisListParams) -> Self {
        Self {
            page: params.page,
            size: params.size,
            student_id: params.student_id,
            analysis_type: params.analysis_type,
            status: params.status,
            date_from: params.date_from,
            date_to: params.date_to,
        }
    }
}

// 分析列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct AnalysisListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<String>,
    pub analysis_type: Option<AnalysisType>,
    pub status: Option<AnalysisStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

// 新建分析记录（用于存储层）
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub student_id: String,
    pub analysis_type: AnalysisType,
    pub title: String,
    pub input_data: serde_json::Value,
    pub prompt_template: String,
}

// 更新分析记录，None 表示不修改
#[derive(Debug, Clone, Default)]
pub struct AnalysisUpdate {
    pub status: Option<AnalysisStatus>,
    pub analysis_result: Option<String>,
    pub ai_confidence: Option<f64>,
    pub actual_prompt: Option<String>,
    pub analyzed_by: Option<String>,
    pub error_message: Option<String>,
}

// 外部服务回调结果
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct AnalysisCallbackResult {
    pub content: Option<String>,
    pub confidence: Option<f64>,
    pub error: Option<String>,
}

// 外部服务回调请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct AnalysisCallbackRequest {
    pub analysis_id: i64,
    pub status: String,
    pub result: AnalysisCallbackResult,
}

impl AnalysisCallbackRequest {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

// 生成报告请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "analysis.ts")]
pub struct GenerateReportRequest {
    pub student_id: String,
    pub analysis_type: AnalysisType,
}
