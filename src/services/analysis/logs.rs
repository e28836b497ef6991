use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnalysisService;
use crate::models::ApiResponse;
use crate::models::service_logs::requests::{ServiceLogListParams, ServiceLogListQuery};
use crate::services::error_response;

const DEFAULT_LOG_PAGE_SIZE: i64 = 20;

pub async fn list_service_logs(
    service: &AnalysisService,
    request: &HttpRequest,
    params: ServiceLogListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let mut query = ServiceLogListQuery::from(params);
    query.size = query.size.or(Some(DEFAULT_LOG_PAGE_SIZE));

    match storage.list_service_logs_with_pagination(query).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "获取服务日志成功"))),
        Err(e) => Ok(error_response(&e, "获取服务日志失败")),
    }
}
