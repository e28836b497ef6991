use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnalysisService;
use crate::models::ApiResponse;
use crate::models::analysis::responses::AnalysisStatusResponse;
use crate::services::{analysis_not_found, error_response};

pub async fn get_status(
    service: &AnalysisService,
    request: &HttpRequest,
    analysis_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_analysis_by_id(analysis_id).await {
        Ok(Some(analysis)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AnalysisStatusResponse::from(&analysis),
            "获取分析状态成功",
        ))),
        Ok(None) => Ok(analysis_not_found(analysis_id)),
        Err(e) => Ok(error_response(&e, "获取分析状态失败")),
    }
}
