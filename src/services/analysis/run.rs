use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::{error, info};

use super::AnalysisService;
use super::dashboard::invalidate_dashboard;
use crate::analysis::StudentProfile;
use crate::analysis::prompt::{
    agent_template, comprehensive_agent_prompt, prompt_variables, render_template,
};
use crate::config::AppConfig;
use crate::engine::{AnalysisEngine, EngineOutput, EngineRequest};
use crate::errors::{GradeSysError, Result};
use crate::models::analysis::entities::{AnalysisStatus, StudentAnalysis};
use crate::models::analysis::requests::AnalysisUpdate;
use crate::models::analysis::responses::AnalysisStatusResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{StudentRecords, analysis_not_found, error_response};
use crate::storage::Storage;

pub async fn run_analysis(
    service: &AnalysisService,
    request: &HttpRequest,
    analysis_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let analysis = match storage.get_analysis_by_id(analysis_id).await {
        Ok(Some(analysis)) => analysis,
        Ok(None) => return Ok(analysis_not_found(analysis_id)),
        Err(e) => return Ok(error_response(&e, "获取分析记录失败")),
    };

    if !analysis.status.can_run() {
        let code = if analysis.status == AnalysisStatus::Processing {
            ErrorCode::AnalysisInProgress
        } else {
            ErrorCode::AnalysisInvalidState
        };
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            code,
            format!("分析状态为 {}，只有待处理的分析可以执行", analysis.status),
        )));
    }

    let engine = service.get_engine(request);
    let result = execute_analysis(storage.as_ref(), engine.as_ref(), analysis).await;
    invalidate_dashboard(service.get_cache(request)).await;

    match result {
        Ok(updated) if updated.status == AnalysisStatus::Completed => Ok(HttpResponse::Ok().json(
            ApiResponse::success(AnalysisStatusResponse::from(&updated), "分析完成"),
        )),
        Ok(updated) => {
            let message = format!(
                "分析执行失败: {}",
                updated.error_message.as_deref().unwrap_or("未知错误")
            );
            Ok(HttpResponse::InternalServerError().json(ApiResponse::error(
                ErrorCode::AnalysisFailed,
                AnalysisStatusResponse::from(&updated),
                message,
            )))
        }
        Err(e) => Ok(error_response(&e, "执行分析失败")),
    }
}

/// 执行一条待处理的分析
///
/// 先置为 processing，再渲染提示词并交给引擎生成。生成失败时记录错误并置为
/// failed，此时仍返回 `Ok`；只有状态无法写回时才返回 `Err`。
pub(crate) async fn execute_analysis(
    storage: &dyn Storage,
    engine: &dyn AnalysisEngine,
    analysis: StudentAnalysis,
) -> Result<StudentAnalysis> {
    let id = analysis.id;
    update_or_missing(
        storage,
        id,
        AnalysisUpdate {
            status: Some(AnalysisStatus::Processing),
            ..Default::default()
        },
    )
    .await?;

    let update = match generate(storage, engine, &analysis).await {
        Ok(output) => {
            info!(
                "Analysis {} completed by {} (confidence {:.2})",
                id, output.analyzed_by, output.confidence
            );
            AnalysisUpdate {
                status: Some(AnalysisStatus::Completed),
                analysis_result: Some(output.content),
                ai_confidence: Some(output.confidence),
                analyzed_by: Some(output.analyzed_by),
                ..Default::default()
            }
        }
        Err(e) => {
            error!("Analysis {} failed: {}", id, e);
            AnalysisUpdate {
                status: Some(AnalysisStatus::Failed),
                error_message: Some(e.message().to_string()),
                ..Default::default()
            }
        }
    };

    update_or_missing(storage, id, update).await
}

async fn generate(
    storage: &dyn Storage,
    engine: &dyn AnalysisEngine,
    analysis: &StudentAnalysis,
) -> Result<EngineOutput> {
    let records = StudentRecords::load(storage, &analysis.student_id)
        .await?
        .ok_or_else(|| GradeSysError::not_found(format!("学生不存在: {}", analysis.student_id)))?;

    let profile = StudentProfile::collect(
        records.student,
        records.scores,
        records.enrollments,
        Utc::now(),
        AppConfig::get().analysis.recent_days,
    );

    let prompt = if analysis.prompt_template == agent_template() {
        comprehensive_agent_prompt(&profile)?
    } else {
        render_template(
            &analysis.prompt_template,
            &prompt_variables(&analysis.input_data),
        )?
    };

    update_or_missing(
        storage,
        analysis.id,
        AnalysisUpdate {
            actual_prompt: Some(prompt.clone()),
            ..Default::default()
        },
    )
    .await?;

    engine
        .generate(
            storage,
            EngineRequest {
                analysis_id: Some(analysis.id),
                prompt,
                profile,
            },
        )
        .await
}

async fn update_or_missing(
    storage: &dyn Storage,
    id: i64,
    update: AnalysisUpdate,
) -> Result<StudentAnalysis> {
    storage
        .update_analysis(id, update)
        .await?
        .ok_or_else(|| GradeSysError::not_found(format!("分析记录不存在: {id}")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test, web};

    use super::*;
    use crate::analysis::prompt::template_for;
    use crate::engine::LocalAnalysisEngine;
    use crate::models::analysis::entities::AnalysisType;
    use crate::models::analysis::requests::NewAnalysis;
    use crate::routes::configure_analysis_routes;
    use crate::services::test_support::{json_body, storage_with_scores};

    async fn pending_analysis(storage: &dyn Storage, student_id: &str) -> StudentAnalysis {
        storage
            .create_analysis(NewAnalysis {
                student_id: student_id.to_string(),
                analysis_type: AnalysisType::AcademicPerformance,
                title: "学业表现分析".to_string(),
                input_data: serde_json::json!({}),
                prompt_template: agent_template().to_string(),
            })
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn test_execute_completes_with_local_engine() {
        let storage = storage_with_scores().await;
        let analysis = pending_analysis(storage.as_ref(), "20230001").await;

        let done = execute_analysis(storage.as_ref(), &LocalAnalysisEngine, analysis)
            .await
            .unwrap();

        assert_eq!(done.status, AnalysisStatus::Completed);
        assert!(done.analyzed_at.is_some());
        assert!(done.actual_prompt.unwrap().contains("王小明"));
        assert_eq!(done.analyzed_by, LocalAnalysisEngine::NAME);
        let confidence = done.ai_confidence.unwrap();
        assert!((0.0..=1.0).contains(&confidence));
    }

    #[actix_web::test]
    async fn test_template_error_marks_failed() {
        let storage = storage_with_scores().await;
        // 输入数据为空，模板变量缺失
        let analysis = storage
            .create_analysis(NewAnalysis {
                student_id: "20230001".to_string(),
                analysis_type: AnalysisType::AcademicPerformance,
                title: "学业表现分析".to_string(),
                input_data: serde_json::json!({}),
                prompt_template: template_for(AnalysisType::AcademicPerformance).to_string(),
            })
            .await
            .unwrap();

        let failed = execute_analysis(storage.as_ref(), &LocalAnalysisEngine, analysis)
            .await
            .unwrap();

        assert_eq!(failed.status, AnalysisStatus::Failed);
        assert!(failed.error_message.unwrap().contains("模板变量缺失"));
        assert!(failed.analysis_result.is_none());
    }

    #[actix_web::test]
    async fn test_run_endpoint_only_runs_pending_once() {
        let storage = storage_with_scores().await;
        let analysis = pending_analysis(storage.as_ref(), "20230001").await;
        let engine: Arc<dyn AnalysisEngine> = Arc::new(LocalAnalysisEngine);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(engine))
                .configure(configure_analysis_routes),
        )
        .await;

        let uri = format!("/api/v1/analysis/{}/run", analysis.id);
        let resp = test::call_service(&app, test::TestRequest::post().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), 200);
        let body = json_body(resp).await;
        assert_eq!(body["data"]["status"], "completed");
        assert!(body["data"]["analysis_result"].is_string());

        let resp = test::call_service(&app, test::TestRequest::post().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), 409);
        let body = json_body(resp).await;
        assert_eq!(body["code"], ErrorCode::AnalysisInvalidState as i32);
    }

    #[actix_web::test]
    async fn test_run_unknown_analysis_is_404() {
        let storage = storage_with_scores().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .configure(configure_analysis_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/analysis/999/run")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
