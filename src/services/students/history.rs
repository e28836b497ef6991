use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::config::AppConfig;
use crate::models::ApiResponse;
use crate::models::analysis::entities::AnalysisStatus;
use crate::models::analysis::responses::{AnalysisHistoryItem, StudentHistoryResponse};
use crate::services::{error_response, student_not_found};

pub async fn get_history(
    service: &StudentService,
    request: &HttpRequest,
    student_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(student_not_found(student_id)),
        Err(e) => return Ok(error_response(&e, "获取学生信息失败")),
    };

    let limit = AppConfig::get().analysis.history_page_size as usize;
    match storage
        .list_student_analyses(student_id, Some(AnalysisStatus::Completed))
        .await
    {
        Ok(analyses) => {
            let response = StudentHistoryResponse {
                student_id: student.student_id,
                student_name: student.name,
                items: analyses
                    .iter()
                    .take(limit)
                    .map(AnalysisHistoryItem::from)
                    .collect(),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "获取分析历史成功")))
        }
        Err(e) => Ok(error_response(&e, "获取分析历史失败")),
    }
}
