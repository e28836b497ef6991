use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares::RateLimit;
use crate::models::analysis::requests::{
    AnalysisCallbackRequest, AnalysisListParams, CreateAnalysisRequest, GenerateReportRequest,
};
use crate::models::service_logs::requests::ServiceLogListParams;
use crate::services::AnalysisService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AnalysisService 实例
static ANALYSIS_SERVICE: Lazy<AnalysisService> = Lazy::new(AnalysisService::new_lazy);

// 分析历史
pub async fn list_analyses(
    req: HttpRequest,
    query: web::Query<AnalysisListParams>,
) -> ActixResult<HttpResponse> {
    ANALYSIS_SERVICE
        .list_analyses(&req, query.into_inner())
        .await
}

// 创建分析任务
pub async fn create_analysis(
    req: HttpRequest,
    body: web::Json<CreateAnalysisRequest>,
) -> ActixResult<HttpResponse> {
    ANALYSIS_SERVICE
        .create_analysis(&req, body.into_inner())
        .await
}

pub async fn get_dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYSIS_SERVICE.get_dashboard(&req).await
}

pub async fn get_counts(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYSIS_SERVICE.get_counts(&req).await
}

// 需要干预的学生
pub async fn list_interventions(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYSIS_SERVICE.list_interventions(&req).await
}

// 学业预警与建议
pub async fn list_suggestions(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYSIS_SERVICE.list_suggestions(&req).await
}

// AI 服务调用日志
pub async fn list_service_logs(
    req: HttpRequest,
    query: web::Query<ServiceLogListParams>,
) -> ActixResult<HttpResponse> {
    ANALYSIS_SERVICE
        .list_service_logs(&req, query.into_inner())
        .await
}

// 外部分析服务回调
pub async fn handle_callback(
    req: HttpRequest,
    body: web::Json<AnalysisCallbackRequest>,
) -> ActixResult<HttpResponse> {
    ANALYSIS_SERVICE
        .handle_callback(&req, body.into_inner())
        .await
}

pub async fn generate_report(
    req: HttpRequest,
    body: web::Json<GenerateReportRequest>,
) -> ActixResult<HttpResponse> {
    ANALYSIS_SERVICE
        .generate_report(&req, body.into_inner())
        .await
}

pub async fn get_analysis(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ANALYSIS_SERVICE.get_analysis(&req, path.0).await
}

// 执行分析
pub async fn run_analysis(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ANALYSIS_SERVICE.run_analysis(&req, path.0).await
}

pub async fn get_status(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ANALYSIS_SERVICE.get_status(&req, path.0).await
}

pub async fn get_report(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ANALYSIS_SERVICE.get_report(&req, path.0).await
}

// 配置路由
pub fn configure_analysis_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/analysis")
            .wrap(middleware::Compress::default())
            .service(
                web::resource("")
                    .route(web::get().to(list_analyses))
                    .route(web::post().to(create_analysis)),
            )
            // 固定路径需在 /{id} 之前注册
            .service(web::resource("/dashboard").route(web::get().to(get_dashboard)))
            .service(web::resource("/counts").route(web::get().to(get_counts)))
            .service(web::resource("/intervention").route(web::get().to(list_interventions)))
            .service(web::resource("/suggestions").route(web::get().to(list_suggestions)))
            .service(web::resource("/logs").route(web::get().to(list_service_logs)))
            .service(web::resource("/callback").route(web::post().to(handle_callback)))
            .service(web::resource("/report").route(web::post().to(generate_report)))
            .service(web::resource("/{id}").route(web::get().to(get_analysis)))
            .service(
                web::resource("/{id}/run")
                    .wrap(RateLimit::analysis_run())
                    .route(web::post().to(run_analysis)),
            )
            .service(web::resource("/{id}/status").route(web::get().to(get_status)))
            .service(web::resource("/{id}/report").route(web::get().to(get_report))),
    );
}
