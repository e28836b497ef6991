use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::AnalysisService;
use super::dashboard::invalidate_dashboard;
use crate::errors::{GradeSysError, Result};
use crate::models::analysis::entities::{AnalysisStatus, StudentAnalysis};
use crate::models::analysis::requests::{AnalysisCallbackRequest, AnalysisUpdate};
use crate::models::analysis::responses::AnalysisStatusResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{analysis_not_found, error_response};
use crate::storage::Storage;

const DEFAULT_CALLBACK_ERROR: &str = "外部服务返回失败";

pub async fn handle_callback(
    service: &AnalysisService,
    request: &HttpRequest,
    req: AnalysisCallbackRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let analysis = match storage.get_analysis_by_id(req.analysis_id).await {
        Ok(Some(analysis)) => analysis,
        Ok(None) => return Ok(analysis_not_found(req.analysis_id)),
        Err(e) => return Ok(error_response(&e, "获取分析记录失败")),
    };

    if !analysis.status.is_active() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AnalysisInvalidState,
            format!("分析已结束（{}），不再接受回调", analysis.status),
        )));
    }

    if req.is_success()
        && req
            .result
            .content
            .as_deref()
            .is_none_or(|c| c.trim().is_empty())
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "成功回调必须包含分析内容",
        )));
    }

    let result = apply_callback(storage.as_ref(), analysis, req).await;
    invalidate_dashboard(service.get_cache(request)).await;

    match result {
        Ok(updated) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AnalysisStatusResponse::from(&updated),
            "回调处理成功",
        ))),
        Err(e) => Ok(error_response(&e, "回调处理失败")),
    }
}

async fn apply_callback(
    storage: &dyn Storage,
    analysis: StudentAnalysis,
    req: AnalysisCallbackRequest,
) -> Result<StudentAnalysis> {
    let id = analysis.id;
    let success = req.is_success();

    // 外部服务直接回调时，待处理的分析先进入处理中
    if success && analysis.status == AnalysisStatus::Pending {
        storage
            .update_analysis(
                id,
                AnalysisUpdate {
                    status: Some(AnalysisStatus::Processing),
                    ..Default::default()
                },
            )
            .await?;
    }

    let update = if success {
        info!("Analysis {} completed by callback", id);
        AnalysisUpdate {
            status: Some(AnalysisStatus::Completed),
            analysis_result: req.result.content,
            ai_confidence: req.result.confidence,
            ..Default::default()
        }
    } else {
        let error = req
            .result
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CALLBACK_ERROR.to_string());
        warn!("Analysis {} failed by callback: {}", id, error);
        AnalysisUpdate {
            status: Some(AnalysisStatus::Failed),
            error_message: Some(error),
            ..Default::default()
        }
    };

    storage
        .update_analysis(id, update)
        .await?
        .ok_or_else(|| GradeSysError::not_found(format!("分析记录不存在: {id}")))
}
