use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;

use super::StudentService;
use crate::analysis::StudentProfile;
use crate::config::AppConfig;
use crate::models::ApiResponse;

pub async fn get_data_quality(
    service: &StudentService,
    request: &HttpRequest,
    student_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let records = match service.load_records(storage.as_ref(), student_id).await {
        Ok(records) => records,
        Err(resp) => return Ok(resp),
    };

    let config = AppConfig::get();
    let now = Utc::now();
    let profile = StudentProfile::collect(
        records.student,
        records.scores,
        records.enrollments,
        now,
        config.analysis.recent_days,
    );
    let report = profile.validate_quality(now, config.analysis.quality_window_days);

    Ok(HttpResponse::Ok().json(ApiResponse::success(report, "数据质量检查完成")))
}
