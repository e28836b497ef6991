use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnalysisService;
use crate::models::analysis::entities::AnalysisStatus;
use crate::models::analysis::requests::GenerateReportRequest;
use crate::models::analysis::responses::AnalysisReport;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{analysis_not_found, error_response, student_not_found};

/// 学生某类型最近一次已完成分析的报告
pub async fn generate_report(
    service: &AnalysisService,
    request: &HttpRequest,
    req: GenerateReportRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let student = match storage.get_student_by_id(&req.student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(student_not_found(&req.student_id)),
        Err(e) => return Ok(error_response(&e, "获取学生信息失败")),
    };

    match storage
        .latest_completed_analysis(&req.student_id, Some(req.analysis_type))
        .await
    {
        Ok(Some(analysis)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AnalysisReport::new(student, analysis),
            "获取分析报告成功",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ReportNotFound,
            format!(
                "学生 {} 暂无已完成的{}",
                req.student_id,
                req.analysis_type.display_name()
            ),
        ))),
        Err(e) => Ok(error_response(&e, "获取分析报告失败")),
    }
}

/// 单条分析的报告，只有已完成的分析可以查看
pub async fn get_report(
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

    if analysis.status != AnalysisStatus::Completed {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AnalysisInvalidState,
            format!("分析尚未完成（{}），无法查看报告", analysis.status),
        )));
    }

    match storage.get_student_by_id(&analysis.student_id).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AnalysisReport::new(student, analysis),
            "获取分析报告成功",
        ))),
        Ok(None) => Ok(student_not_found(&analysis.student_id)),
        Err(e) => Ok(error_response(&e, "获取分析报告失败")),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test, web};
    use serde_json::json;

    use crate::engine::{AnalysisEngine, LocalAnalysisEngine};
    use crate::models::ErrorCode;
    use crate::routes::configure_analysis_routes;
    use crate::services::test_support::{json_body, storage_with_scores};

    #[actix_web::test]
    async fn test_create_run_and_fetch_report() {
        let storage = storage_with_scores().await;
        let engine: Arc<dyn AnalysisEngine> = Arc::new(LocalAnalysisEngine);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(engine))
                .configure(configure_analysis_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/analysis/report")
            .set_json(json!({ "student_id": "20230001", "analysis_type": "academic_performance" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        assert_eq!(json_body(resp).await["code"], ErrorCode::ReportNotFound as i32);

        let req = test::TestRequest::post()
            .uri("/api/v1/analysis")
            .set_json(json!({ "student_id": "20230001", "analysis_type": "academic_performance" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let body = json_body(resp).await;
        let id = body["data"]["id"].as_i64().unwrap();
        assert_eq!(body["data"]["status"], "pending");
        assert_eq!(body["data"]["title"], "王小明的学业表现分析");

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/analysis/{id}/report"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/analysis/{id}/run"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/analysis/{id}/report"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body = json_body(resp).await;
        assert_eq!(body["data"]["student"]["name"], "王小明");
        assert_eq!(body["data"]["type_name"], "学业表现分析");

        let req = test::TestRequest::post()
            .uri("/api/v1/analysis/report")
            .set_json(json!({ "student_id": "20230001", "analysis_type": "academic_performance" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(json_body(resp).await["data"]["analysis_id"], id);
    }

    #[actix_web::test]
    async fn test_create_rejects_student_without_scores() {
        let storage = storage_with_scores().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .configure(configure_analysis_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/analysis")
            .set_json(json!({ "student_id": "20230002", "analysis_type": "comprehensive" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        assert_eq!(json_body(resp).await["code"], ErrorCode::ScoreDataMissing as i32);

        let req = test::TestRequest::post()
            .uri("/api/v1/analysis")
            .set_json(json!({ "student_id": "20239999", "analysis_type": "comprehensive" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
