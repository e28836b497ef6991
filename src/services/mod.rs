pub mod analysis;
pub mod courses;
pub mod students;

pub use analysis::AnalysisService;
pub use courses::CourseService;
pub use students::StudentService;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};

use crate::cache::ObjectCache;
use crate::engine::{AnalysisEngine, LocalAnalysisEngine};
use crate::errors::{GradeSysError, Result};
use crate::models::scores::entities::{EnrollmentRecord, ScoreRecord};
use crate::models::students::entities::Student;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 一个学生的全部学籍数据
pub(crate) struct StudentRecords {
    pub student: Student,
    // 按日期正序
    pub scores: Vec<ScoreRecord>,
    pub enrollments: Vec<EnrollmentRecord>,
}

impl StudentRecords {
    pub async fn load(storage: &dyn Storage, student_id: &str) -> Result<Option<Self>> {
        let Some(student) = storage.get_student_by_id(student_id).await? else {
            return Ok(None);
        };
        let scores = storage.list_scores_by_student(student_id).await?;
        let enrollments = storage.list_enrollments_by_student(student_id).await?;
        Ok(Some(Self {
            student,
            scores,
            enrollments,
        }))
    }

    pub fn score_values(&self) -> Vec<f64> {
        self.scores.iter().map(|s| s.score).collect()
    }
}

/// 从 app_data 取存储，未注入时视为启动配置错误
pub(crate) fn storage_from_request(request: &HttpRequest) -> Arc<dyn Storage> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone()
}

/// 缓存是可选的，未注入时不缓存
pub(crate) fn cache_from_request(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|cache| cache.get_ref().clone())
}

/// 未注入引擎时使用本地引擎
pub(crate) fn engine_from_request(request: &HttpRequest) -> Arc<dyn AnalysisEngine> {
    request
        .app_data::<web::Data<Arc<dyn AnalysisEngine>>>()
        .map(|engine| engine.get_ref().clone())
        .unwrap_or_else(|| Arc::new(LocalAnalysisEngine))
}

/// 业务错误转换为统一 JSON 响应
pub(crate) fn error_response(err: &GradeSysError, context: &str) -> HttpResponse {
    let message = format!("{context}: {}", err.message());
    let body = |code| ApiResponse::error_empty(code, message.clone());

    match err {
        GradeSysError::NotFound(_) => HttpResponse::NotFound().json(body(ErrorCode::NotFound)),
        GradeSysError::Validation(_) | GradeSysError::DateParse(_) => {
            HttpResponse::BadRequest().json(body(ErrorCode::ValidationFailed))
        }
        GradeSysError::Conflict(_) => HttpResponse::Conflict().json(body(ErrorCode::Conflict)),
        GradeSysError::InvalidState(_) => {
            HttpResponse::Conflict().json(body(ErrorCode::AnalysisInvalidState))
        }
        GradeSysError::EngineNotConfigured(_) => {
            HttpResponse::ServiceUnavailable().json(body(ErrorCode::AnalysisEngineUnavailable))
        }
        GradeSysError::ExternalService(_) => {
            HttpResponse::BadGateway().json(body(ErrorCode::AnalysisFailed))
        }
        GradeSysError::Template(_) => {
            HttpResponse::InternalServerError().json(body(ErrorCode::AnalysisFailed))
        }
        _ => HttpResponse::InternalServerError().json(body(ErrorCode::InternalServerError)),
    }
}

pub(crate) fn student_not_found(student_id: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::StudentNotFound,
        format!("学生不存在: {student_id}"),
    ))
}

pub(crate) fn score_data_missing(student_id: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::ScoreDataMissing,
        format!("学生 {student_id} 暂无成绩数据，无法生成分析"),
    ))
}

pub(crate) fn analysis_not_found(id: i64) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AnalysisNotFound,
        format!("分析记录不存在: {id}"),
    ))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use actix_web::body::to_bytes;
    use actix_web::dev::ServiceResponse;
    use serde_json::Value;

    use chrono::NaiveDate;

    use crate::analysis::fixtures::date;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::scores::requests::{EnrollRequest, UpsertScoreRequest};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::seeded_storage;

    /// 王小明有两门成绩（其中一门不及格），李华没有成绩
    pub async fn storage_with_scores() -> Arc<dyn Storage> {
        let storage = seeded_storage().await;
        for (course_id, value, on) in [
            ("JCKC001", 55.0, date(2024, 9, 10)),
            ("ZYBX001", 92.0, date(2025, 1, 12)),
        ] {
            storage
                .upsert_score(UpsertScoreRequest {
                    student_id: "20230001".to_string(),
                    course_id: course_id.to_string(),
                    score: value,
                    date: on,
                })
                .await
                .unwrap();
            storage
                .enroll(EnrollRequest {
                    student_id: "20230001".to_string(),
                    course_id: course_id.to_string(),
                    enrollment_date: date(2024, 9, 1),
                })
                .await
                .unwrap();
        }
        Arc::new(storage)
    }

    /// 写入成绩，课程不存在时按 3 学分补建
    pub async fn add_scores(
        storage: &dyn Storage,
        student_id: &str,
        scores: &[(&str, f64, NaiveDate)],
    ) {
        for (course_id, value, on) in scores {
            if storage.get_course_by_id(course_id).await.unwrap().is_none() {
                storage
                    .create_course(CreateCourseRequest {
                        course_id: course_id.to_string(),
                        course_name: format!("课程{course_id}"),
                        credits: 3,
                    })
                    .await
                    .unwrap();
            }
            storage
                .upsert_score(UpsertScoreRequest {
                    student_id: student_id.to_string(),
                    course_id: course_id.to_string(),
                    score: *value,
                    date: *on,
                })
                .await
                .unwrap();
        }
    }

    pub async fn json_body<B>(resp: ServiceResponse<B>) -> Value
    where
        B: actix_web::body::MessageBody,
        B::Error: std::fmt::Debug,
    {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
