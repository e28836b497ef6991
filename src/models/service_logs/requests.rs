use serde::Deserialize;
use ts_rs::TS;

use super::entities::{LogStatus, RequestType};

// 服务日志查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "service_log.ts")]
pub struct ServiceLogListParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<LogStatus>,
}

impl From<ServiceLogListParams> for ServiceLogListQuery {
    fn from(params: ServiceLogListParams) -> Self {
        Self {
            page: params.page,
            size: params.size,
            status: params.status,
        }
    }
}

// 服务日志查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ServiceLogListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<LogStatus>,
}

// 新建调用日志
#[derive(Debug, Clone)]
pub struct NewServiceLog {
    pub request_type: RequestType,
    pub student_analysis_id: Option<i64>,
    pub request_prompt: String,
    pub request_data: serde_json::Value,
}

// 调用结束后回写的结果
#[derive(Debug, Clone)]
pub struct ServiceLogCompletion {
    pub status: LogStatus,
    pub response_content: Option<String>,
    pub response_time: f64,
    pub error_message: Option<String>,
}
