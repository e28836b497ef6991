use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::analysis::{mean, round2};
use crate::models::ApiResponse;
use crate::models::analysis::responses::StudentQuickStats;
use crate::services::error_response;

pub async fn get_quick_stats(
    service: &StudentService,
    request: &HttpRequest,
    student_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let records = match service.load_records(storage.as_ref(), student_id).await {
        Ok(records) => records,
        Err(resp) => return Ok(resp),
    };

    let latest_analysis_at = match storage.latest_completed_analysis(student_id, None).await {
        Ok(latest) => latest.and_then(|a| a.analyzed_at),
        Err(e) => return Ok(error_response(&e, "获取最近分析失败")),
    };

    let values = records.score_values();
    let stats = StudentQuickStats {
        student_id: records.student.student_id,
        name: records.student.name,
        major: records.student.major,
        average_score: round2(mean(&values).unwrap_or(0.0)),
        total_courses: values.len() as i64,
        failed_courses: values.iter().filter(|v| **v < 60.0).count() as i64,
        latest_analysis_at,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(stats, "获取学生统计成功")))
}
