use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::StudentService;
use crate::analysis::prompt::agent_template;
use crate::analysis::{StudentProfile, prepare_input_data};
use crate::config::AppConfig;
use crate::engine::LocalAnalysisEngine;
use crate::models::analysis::entities::{AnalysisStatus, AnalysisType};
use crate::models::analysis::requests::NewAnalysis;
use crate::models::analysis::responses::{ActiveAnalysisRef, AgentAnalysisResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::analysis::dashboard::invalidate_dashboard;
use crate::services::analysis::run::execute_analysis;
use crate::services::{error_response, score_data_missing};

/// 智能体综合分析：收集画像、检查数据质量，创建分析后立即用本地引擎执行
pub async fn run_agent_analysis(
    service: &StudentService,
    request: &HttpRequest,
    student_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let records = match service.load_records(storage.as_ref(), student_id).await {
        Ok(records) => records,
        Err(resp) => return Ok(resp),
    };

    match storage
        .find_active_analysis(student_id, AnalysisType::Comprehensive)
        .await
    {
        Ok(Some(active)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error(
                ErrorCode::AnalysisInProgress,
                ActiveAnalysisRef {
                    analysis_id: active.id,
                    status: active.status,
                },
                "该学生已有进行中的综合分析",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(error_response(&e, "查询进行中的分析失败")),
    }

    if records.scores.is_empty() {
        return Ok(score_data_missing(student_id));
    }

    let config = AppConfig::get();
    let now = Utc::now();
    let input_data = prepare_input_data(
        &records.student,
        &records.scores,
        &records.enrollments,
        AnalysisType::Comprehensive,
        now.date_naive(),
    );
    let title = format!("{}的AI智能体综合分析", records.student.name);

    let profile = StudentProfile::collect(
        records.student,
        records.scores,
        records.enrollments,
        now,
        config.analysis.recent_days,
    );
    let data_quality = profile.validate_quality(now, config.analysis.quality_window_days);

    let analysis = match storage
        .create_analysis(NewAnalysis {
            student_id: student_id.to_string(),
            analysis_type: AnalysisType::Comprehensive,
            title,
            input_data,
            prompt_template: agent_template().to_string(),
        })
        .await
    {
        Ok(analysis) => analysis,
        Err(e) => return Ok(error_response(&e, "创建综合分析失败")),
    };
    info!("Agent analysis {} started for {}", analysis.id, student_id);

    let result = execute_analysis(storage.as_ref(), &LocalAnalysisEngine, analysis).await;
    invalidate_dashboard(service.get_cache(request)).await;

    let analysis = match result {
        Ok(analysis) => analysis,
        Err(e) => return Ok(error_response(&e, "执行综合分析失败")),
    };

    let response = AgentAnalysisResponse {
        analysis_id: analysis.id,
        status: analysis.status,
        content: analysis.analysis_result,
        confidence: analysis.ai_confidence,
        data_quality,
    };

    if response.status == AnalysisStatus::Completed {
        Ok(HttpResponse::Ok().json(ApiResponse::success(response, "智能体分析完成")))
    } else {
        let message = format!(
            "智能体分析失败: {}",
            analysis.error_message.as_deref().unwrap_or("未知错误")
        );
        Ok(HttpResponse::InternalServerError().json(ApiResponse::error(
            ErrorCode::AnalysisFailed,
            response,
            message,
        )))
    }
}
