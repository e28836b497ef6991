use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 请求类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "service_log.ts")]
pub enum RequestType {
    Analysis,   // 学生分析
    Suggestion, // 学习建议
    Evaluation, // 学业评估
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Analysis => "analysis",
            RequestType::Suggestion => "suggestion",
            RequestType::Evaluation => "evaluation",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "analysis" => Ok(RequestType::Analysis),
            "suggestion" => Ok(RequestType::Suggestion),
            "evaluation" => Ok(RequestType::Evaluation),
            _ => Err(format!("Invalid request type: {s}")),
        }
    }
}

// 调用状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "service_log.ts")]
pub enum LogStatus {
    Processing,
    Success,
    Failed,
    Timeout,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Processing => "processing",
            LogStatus::Success => "success",
            LogStatus::Failed => "failed",
            LogStatus::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for LogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(LogStatus::Processing),
            "success" => Ok(LogStatus::Success),
            "failed" => Ok(LogStatus::Failed),
            "timeout" => Ok(LogStatus::Timeout),
            _ => Err(format!("Invalid log status: {s}")),
        }
    }
}

// AI 服务调用日志
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "service_log.ts")]
pub struct AiServiceLog {
    pub id: i64,
    pub request_type: RequestType,
    pub student_analysis_id: Option<i64>,
    pub request_prompt: String,
    pub request_data: serde_json::Value,
    pub response_content: Option<String>,
    // 响应耗时（秒）
    pub response_time: Option<f64>,
    pub status: LogStatus,
    pub error_message: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
