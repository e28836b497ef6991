use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    analysis::requests::{AnalysisListParams, AnalysisListQuery},
};
use crate::services::error_response;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnalysisService;

pub async fn list_analyses(
    service: &AnalysisService,
    request: &HttpRequest,
    params: AnalysisListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let mut query = AnalysisListQuery::from(params);
    if query.size.is_none() {
        query.size = Some(AppConfig::get().analysis.history_page_size as i64);
    }
    if let (Some(from), Some(to)) = (query.date_from, query.date_to)
        && from > to
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "开始日期不能晚于结束日期",
        )));
    }

    match storage.list_analyses_with_pagination(query).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "获取分析历史成功"))),
        Err(e) => Ok(error_response(&e, "获取分析历史失败")),
    }
}
