use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnalysisService;
use crate::models::ApiResponse;
use crate::models::analysis::responses::AnalysisCountsResponse;
use crate::services::error_response;

pub async fn get_counts(
    service: &AnalysisService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.count_analyses_by_status().await {
        Ok(counts) => {
            let response = AnalysisCountsResponse {
                total: counts.total,
                completed: counts.completed,
                pending: counts.pending,
                failed: counts.failed,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "获取分析统计成功")))
        }
        Err(e) => Ok(error_response(&e, "获取分析统计失败")),
    }
}
