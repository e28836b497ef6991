use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::analysis::statistics::build_transcript;
use crate::models::ApiResponse;

pub async fn get_transcript(
    service: &StudentService,
    request: &HttpRequest,
    student_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match service.load_records(storage.as_ref(), student_id).await {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            build_transcript(records.student, records.scores),
            "获取成绩单成功",
        ))),
        Err(resp) => Ok(resp),
    }
}
