use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::AiServiceLog;
use crate::models::common::PaginatedResponse;

// 服务日志列表响应
pub type ServiceLogListResponse = PaginatedResponse<AiServiceLog>;

// 每日请求数
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "service_log.ts")]
pub struct DailyCount {
    pub date: chrono::NaiveDate,
    pub count: i64,
}

// AI 服务统计
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "service_log.ts")]
pub struct ServiceLogStats {
    pub total_requests: i64,
    pub success_requests: i64,
    // 百分比，保留一位小数
    pub success_rate: f64,
    // 平均响应时间（秒）
    pub avg_response_time: f64,
    pub daily_requests: Vec<DailyCount>,
}
