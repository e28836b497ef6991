pub mod callback;
pub mod counts;
pub mod create;
pub mod dashboard;
pub mod detail;
pub mod intervention;
pub mod list;
pub mod logs;
pub mod report;
pub mod run;
pub mod status;
pub mod suggestions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::engine::AnalysisEngine;
use crate::models::analysis::requests::{
    AnalysisCallbackRequest, AnalysisListParams, CreateAnalysisRequest, GenerateReportRequest,
};
use crate::models::service_logs::requests::ServiceLogListParams;
use crate::storage::Storage;

pub struct AnalysisService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnalysisService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
        super::cache_from_request(request)
    }

    pub(crate) fn get_engine(&self, request: &HttpRequest) -> Arc<dyn AnalysisEngine> {
        super::engine_from_request(request)
    }

    pub async fn list_analyses(
        &self,
        request: &HttpRequest,
        params: AnalysisListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_analyses(self, request, params).await
    }

    pub async fn create_analysis(
        &self,
        request: &HttpRequest,
        req: CreateAnalysisRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_analysis(self, request, req).await
    }

    pub async fn get_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        dashboard::get_dashboard(self, request).await
    }

    pub async fn get_counts(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        counts::get_counts(self, request).await
    }

    pub async fn list_interventions(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        intervention::list_interventions(self, request).await
    }

    pub async fn list_suggestions(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        suggestions::list_suggestions(self, request).await
    }

    pub async fn list_service_logs(
        &self,
        request: &HttpRequest,
        params: ServiceLogListParams,
    ) -> ActixResult<HttpResponse> {
        logs::list_service_logs(self, request, params).await
    }

    pub async fn handle_callback(
        &self,
        request: &HttpRequest,
        req: AnalysisCallbackRequest,
    ) -> ActixResult<HttpResponse> {
        callback::handle_callback(self, request, req).await
    }

    pub async fn generate_report(
        &self,
        request: &HttpRequest,
        req: GenerateReportRequest,
    ) -> ActixResult<HttpResponse> {
        report::generate_report(self, request, req).await
    }

    pub async fn get_analysis(
        &self,
        request: &HttpRequest,
        analysis_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_analysis(self, request, analysis_id).await
    }

    pub async fn run_analysis(
        &self,
        request: &HttpRequest,
        analysis_id: i64,
    ) -> ActixResult<HttpResponse> {
        run::run_analysis(self, request, analysis_id).await
    }

    pub async fn get_status(
        &self,
        request: &HttpRequest,
        analysis_id: i64,
    ) -> ActixResult<HttpResponse> {
        status::get_status(self, request, analysis_id).await
    }

    pub async fn get_report(
        &self,
        request: &HttpRequest,
        analysis_id: i64,
    ) -> ActixResult<HttpResponse> {
        report::get_report(self, request, analysis_id).await
    }
}
