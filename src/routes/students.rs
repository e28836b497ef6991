use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares::RateLimit;
use crate::services::StudentService;
use crate::utils::SafeStudentId;

// 懒加载的全局 StudentService 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

// 智能体综合分析
pub async fn run_agent_analysis(
    req: HttpRequest,
    path: SafeStudentId,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.run_agent_analysis(&req, &path.0).await
}

pub async fn get_history(req: HttpRequest, path: SafeStudentId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_history(&req, &path.0).await
}

pub async fn get_overview(req: HttpRequest, path: SafeStudentId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_overview(&req, &path.0).await
}

pub async fn get_quick_stats(req: HttpRequest, path: SafeStudentId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_quick_stats(&req, &path.0).await
}

// 数据质量检查
pub async fn get_data_quality(req: HttpRequest, path: SafeStudentId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_data_quality(&req, &path.0).await
}

// 成绩单
pub async fn get_transcript(req: HttpRequest, path: SafeStudentId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_transcript(&req, &path.0).await
}

// 配置路由
pub fn configure_students_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students/{student_id}")
            .wrap(middleware::Compress::default())
            .service(
                web::resource("/analysis/agent")
                    .wrap(RateLimit::agent_analysis())
                    .route(web::post().to(run_agent_analysis)),
            )
            .service(web::resource("/analysis/history").route(web::get().to(get_history)))
            .service(web::resource("/analysis/overview").route(web::get().to(get_overview)))
            .service(web::resource("/analysis/stats").route(web::get().to(get_quick_stats)))
            .service(web::resource("/analysis/quality").route(web::get().to(get_data_quality)))
            .service(web::resource("/transcript").route(web::get().to(get_transcript))),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test};
    use serde_json::json;

    use super::*;
    use crate::models::ErrorCode;
    use crate::models::analysis::entities::{AnalysisStatus, AnalysisType};
    use crate::models::analysis::requests::{AnalysisUpdate, NewAnalysis};
    use crate::services::test_support::{json_body, storage_with_scores};

    #[actix_web::test]
    async fn test_agent_analysis_then_history() {
        let storage = storage_with_scores().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .configure(configure_students_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/students/20230001/analysis/agent")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body = json_body(resp).await;
        assert_eq!(body["data"]["status"], "completed");
        assert!(body["data"]["content"].as_str().unwrap().contains("王小明"));
        assert!(body["data"]["data_quality"]["completeness_score"].is_number());

        let req = test::TestRequest::get()
            .uri("/api/v1/students/20230001/analysis/history")
            .to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        let items = body["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "王小明的AI智能体综合分析");

        let req = test::TestRequest::get()
            .uri("/api/v1/students/20230001/analysis/stats")
            .to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["average_score"], 73.5);
        assert_eq!(body["data"]["failed_courses"], 1);
        assert!(body["data"]["latest_analysis_at"].is_string());
    }

    #[actix_web::test]
    async fn test_agent_rejects_active_analysis_and_missing_scores() {
        let storage = storage_with_scores().await;
        let active = storage
            .create_analysis(NewAnalysis {
                student_id: "20230001".to_string(),
                analysis_type: AnalysisType::Comprehensive,
                title: "综合分析".to_string(),
                input_data: json!({}),
                prompt_template: String::new(),
            })
            .await
            .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .configure(configure_students_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/students/20230001/analysis/agent")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);
        let body = json_body(resp).await;
        assert_eq!(body["code"], ErrorCode::AnalysisInProgress as i32);
        assert_eq!(body["data"]["analysis_id"], active.id);

        let req = test::TestRequest::post()
            .uri("/api/v1/students/20230002/analysis/agent")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        assert_eq!(json_body(resp).await["code"], ErrorCode::ScoreDataMissing as i32);
    }

    #[actix_web::test]
    async fn test_transcript_and_path_validation() {
        let storage = storage_with_scores().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .configure(configure_students_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/students/20230001/transcript")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body = json_body(resp).await;
        assert_eq!(body["data"]["total_courses"], 2);
        assert_eq!(body["data"]["total_credits"], 7);
        assert_eq!(body["data"]["scores"][0]["course_id"], "JCKC001");
        assert_eq!(body["data"]["lowest"]["course_id"], "JCKC001");

        let req = test::TestRequest::get()
            .uri("/api/v1/students/20239999/transcript")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        assert_eq!(json_body(resp).await["code"], ErrorCode::StudentNotFound as i32);

        let req = test::TestRequest::get()
            .uri("/api/v1/students/abc/transcript")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }

    #[actix_web::test]
    async fn test_overview_stats_and_quality() {
        let storage = storage_with_scores().await;
        let analysis = storage
            .create_analysis(NewAnalysis {
                student_id: "20230001".to_string(),
                analysis_type: AnalysisType::AcademicPerformance,
                title: "学业表现分析".to_string(),
                input_data: json!({}),
                prompt_template: String::new(),
            })
            .await
            .unwrap();
        for status in [AnalysisStatus::Processing, AnalysisStatus::Completed] {
            storage
                .update_analysis(
                    analysis.id,
                    AnalysisUpdate {
                        status: Some(status),
                        analysis_result: Some("报告".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }
        let completed = storage.get_analysis_by_id(analysis.id).await.unwrap().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .configure(configure_students_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/students/20230001/analysis/overview")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let data = &json_body(resp).await["data"];
        assert_eq!(data["analyses"].as_array().unwrap().len(), 1);
        assert_eq!(data["total_courses"], 2);
        assert_eq!(data["average_score"], 73.5);
        assert_eq!(data["failed_courses"], 1);
        assert_eq!(data["excellent_courses"], 1);
        assert_eq!(data["distribution"]["excellent"], 1);
        assert_eq!(data["distribution"]["fail"], 1);
        assert_eq!(data["distribution"]["good"], 0);
        let categories = data["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0]["category"], "basic");
        assert_eq!(categories[0]["credits"], 4);
        assert_eq!(categories[0]["average_score"], 55.0);
        assert_eq!(categories[1]["category"], "major_required");
        assert_eq!(categories[1]["average_score"], 92.0);

        let req = test::TestRequest::get()
            .uri("/api/v1/students/20230001/analysis/stats")
            .to_request();
        let data = &json_body(test::call_service(&app, req).await).await["data"];
        assert_eq!(data["name"], "王小明");
        assert_eq!(data["major"], "软件工程");
        assert_eq!(data["total_courses"], 2);
        assert_eq!(data["failed_courses"], 1);
        assert_eq!(
            data["latest_analysis_at"],
            serde_json::to_value(completed.analyzed_at).unwrap()
        );

        let req = test::TestRequest::get()
            .uri("/api/v1/students/20230002/analysis/stats")
            .to_request();
        let data = &json_body(test::call_service(&app, req).await).await["data"];
        assert_eq!(data["total_courses"], 0);
        assert_eq!(data["average_score"], 0.0);
        assert!(data["latest_analysis_at"].is_null());

        // 两条旧成绩、两门课程：0.4 × 0.8 × 0.9
        let req = test::TestRequest::get()
            .uri("/api/v1/students/20230001/analysis/quality")
            .to_request();
        let data = &json_body(test::call_service(&app, req).await).await["data"];
        assert_eq!(data["is_valid"], true);
        assert_eq!(data["completeness_score"], 0.29);
        assert_eq!(data["data_issues"].as_array().unwrap().len(), 3);

        let req = test::TestRequest::get()
            .uri("/api/v1/students/20230002/analysis/quality")
            .to_request();
        let data = &json_body(test::call_service(&app, req).await).await["data"];
        assert_eq!(data["is_valid"], false);
        assert_eq!(data["completeness_score"], 0.0);
    }
}
