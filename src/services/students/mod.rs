pub mod agent;
pub mod history;
pub mod overview;
pub mod quality;
pub mod stats;
pub mod transcript;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::storage::Storage;

use super::{StudentRecords, error_response, student_not_found};

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
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

    /// 加载学生数据，学生不存在或查询失败时直接给出响应
    pub(crate) async fn load_records(
        &self,
        storage: &dyn Storage,
        student_id: &str,
    ) -> Result<StudentRecords, HttpResponse> {
        match StudentRecords::load(storage, student_id).await {
            Ok(Some(records)) => Ok(records),
            Ok(None) => Err(student_not_found(student_id)),
            Err(e) => Err(error_response(&e, "获取学生数据失败")),
        }
    }

    pub async fn run_agent_analysis(
        &self,
        request: &HttpRequest,
        student_id: &str,
    ) -> ActixResult<HttpResponse> {
        agent::run_agent_analysis(self, request, student_id).await
    }

    pub async fn get_history(
        &self,
        request: &HttpRequest,
        student_id: &str,
    ) -> ActixResult<HttpResponse> {
        history::get_history(self, request, student_id).await
    }

    pub async fn get_overview(
        &self,
        request: &HttpRequest,
        student_id: &str,
    ) -> ActixResult<HttpResponse> {
        overview::get_overview(self, request, student_id).await
    }

    pub async fn get_quick_stats(
        &self,
        request: &HttpRequest,
        student_id: &str,
    ) -> ActixResult<HttpResponse> {
        stats::get_quick_stats(self, request, student_id).await
    }

    pub async fn get_data_quality(
        &self,
        request: &HttpRequest,
        student_id: &str,
    ) -> ActixResult<HttpResponse> {
        quality::get_data_quality(self, request, student_id).await
    }

    pub async fn get_transcript(
        &self,
        request: &HttpRequest,
        student_id: &str,
    ) -> ActixResult<HttpResponse> {
        transcript::get_transcript(self, request, student_id).await
    }
}
