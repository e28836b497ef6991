use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::analysis::statistics::build_course_statistics;
use crate::errors::Result;
use crate::models::reports::responses::CourseStatisticsResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::storage::Storage;

pub async fn get_statistics(
    service: &CourseService,
    request: &HttpRequest,
    course_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match course_statistics(storage.as_ref(), course_id).await {
        Ok(Some(stats)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(stats, "获取课程统计成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            format!("课程不存在: {course_id}"),
        ))),
        Err(e) => Ok(error_response(&e, "获取课程统计失败")),
    }
}

async fn course_statistics(
    storage: &dyn Storage,
    course_id: &str,
) -> Result<Option<CourseStatisticsResponse>> {
    let Some(course) = storage.get_course_by_id(course_id).await? else {
        return Ok(None);
    };
    let enrolled = storage.count_enrollments_by_course(course_id).await?;
    let scores = storage.list_scores_by_course(course_id).await?;
    Ok(Some(build_course_statistics(course, enrolled, scores)))
}
