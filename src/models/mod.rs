//! 数据模型定义
//!
//! 按业务划分为 entities（业务实体）、requests（请求参数）和 responses（响应结构）。

pub mod analysis;
pub mod common;
pub mod courses;
pub mod reports;
pub mod scores;
pub mod service_logs;
pub mod students;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo};

/// 统一业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 学籍数据
    StudentNotFound = 2001,
    CourseNotFound = 2002,
    ScoreDataMissing = 2003,

    // 分析
    AnalysisNotFound = 3001,
    AnalysisInProgress = 3002,
    AnalysisInvalidState = 3003,
    AnalysisFailed = 3004,
    AnalysisEngineUnavailable = 3005,
    ReportNotFound = 3006,
}

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
