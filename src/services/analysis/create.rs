use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::AnalysisService;
use super::dashboard::invalidate_dashboard;
use crate::analysis::{prepare_input_data, prompt::template_for};
use crate::models::analysis::requests::{CreateAnalysisRequest, NewAnalysis};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    StudentRecords, error_response, score_data_missing, student_not_found,
};
use crate::utils::validate::validate_student_id;

pub async fn create_analysis(
    service: &AnalysisService,
    request: &HttpRequest,
    req: CreateAnalysisRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_student_id(&req.student_id) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    let records = match StudentRecords::load(storage.as_ref(), &req.student_id).await {
        Ok(Some(records)) => records,
        Ok(None) => return Ok(student_not_found(&req.student_id)),
        Err(e) => return Ok(error_response(&e, "获取学生数据失败")),
    };
    if records.scores.is_empty() {
        return Ok(score_data_missing(&req.student_id));
    }

    let input_data = prepare_input_data(
        &records.student,
        &records.scores,
        &records.enrollments,
        req.analysis_type,
        Utc::now().date_naive(),
    );
    let title = req
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "{}的{}",
                records.student.name,
                req.analysis_type.display_name()
            )
        });

    let new_analysis = NewAnalysis {
        student_id: req.student_id,
        analysis_type: req.analysis_type,
        title,
        input_data,
        prompt_template: template_for(req.analysis_type).to_string(),
    };

    match storage.create_analysis(new_analysis).await {
        Ok(analysis) => {
            info!(
                "Created {} analysis {} for student {}",
                analysis.analysis_type, analysis.id, analysis.student_id
            );
            invalidate_dashboard(service.get_cache(request)).await;
            Ok(HttpResponse::Created().json(ApiResponse::success(analysis, "分析任务创建成功")))
        }
        Err(e) => Ok(error_response(&e, "创建分析任务失败")),
    }
}
