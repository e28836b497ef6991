use std::time::Instant;

use serde_json::json;
use tracing::{error, info, warn};

use super::{AnalysisEngine, EngineOutput, EngineRequest};
use crate::analysis::{estimate_confidence, validate_response};
use crate::clients::DeepSeekClient;
use crate::errors::{GradeSysError, Result};
use crate::models::service_logs::{
    entities::{LogStatus, RequestType},
    requests::{NewServiceLog, ServiceLogCompletion},
};
use crate::storage::Storage;

/// 调用 DeepSeek 生成报告，每次调用写一条服务日志
pub struct DeepSeekAnalysisEngine {
    client: DeepSeekClient,
}

impl DeepSeekAnalysisEngine {
    pub const NAME: &'static str = "DeepSeek AI";

    pub fn new(client: DeepSeekClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl AnalysisEngine for DeepSeekAnalysisEngine {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn generate(
        &self,
        storage: &dyn Storage,
        request: EngineRequest,
    ) -> Result<EngineOutput> {
        let log = storage
            .create_service_log(NewServiceLog {
                request_type: RequestType::Analysis,
                student_analysis_id: request.analysis_id,
                request_prompt: request.prompt.clone(),
                request_data: json!({
                    "model": self.client.model(),
                    "student_id": request.profile.student.student_id,
                }),
            })
            .await?;

        let started = Instant::now();
        let result = self.client.chat(&request.prompt).await;
        let elapsed = started.elapsed().as_secs_f64();

        let completion = match &result {
            Ok(chat) => ServiceLogCompletion {
                status: LogStatus::Success,
                response_content: Some(chat.content.clone()),
                response_time: elapsed,
                error_message: None,
            },
            Err(e) => ServiceLogCompletion {
                status: if e.is_timeout() {
                    LogStatus::Timeout
                } else {
                    LogStatus::Failed
                },
                response_content: None,
                response_time: elapsed,
                error_message: Some(e.to_string()),
            },
        };
        if let Err(e) = storage.complete_service_log(log.id, completion).await {
            warn!("Failed to update service log {}: {}", log.id, e);
        }

        let chat = result.map_err(|e| {
            error!("DeepSeek request for log {} failed: {}", log.id, e);
            GradeSysError::from(e)
        })?;

        let validation = validate_response(&chat.content);
        if !validation.is_valid {
            return Err(GradeSysError::external_service(format!(
                "AI 响应内容不合格: {}",
                validation.issues.join("; ")
            )));
        }
        if !validation.issues.is_empty() {
            warn!("DeepSeek response issues: {:?}", validation.issues);
        }

        let data_size = request.profile.statistics.total_scores.max(0) as usize;
        let confidence = estimate_confidence(&chat.content, data_size);
        info!(
            "DeepSeek analysis generated in {:.2}s (model: {}, confidence: {:.2})",
            elapsed, chat.model, confidence
        );

        Ok(EngineOutput {
            content: chat.content,
            confidence,
            analyzed_by: Self::NAME.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::StudentProfile;
    use crate::analysis::fixtures::student;
    use crate::config::DeepSeekConfig;
    use crate::models::service_logs::requests::ServiceLogListQuery;
    use crate::storage::sea_orm_storage::test_support::seeded_storage;

    #[actix_web::test]
    async fn test_failed_call_is_logged() {
        let storage = seeded_storage().await;
        // 本地不存在的端口，连接会被立即拒绝
        let client = DeepSeekClient::new(&DeepSeekConfig {
            api_key: "sk-test".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            model: "deepseek-chat".to_string(),
            max_tokens: 100,
            temperature: 0.7,
            timeout: 2,
        })
        .unwrap();
        let engine = DeepSeekAnalysisEngine::new(client);

        let profile = StudentProfile::collect(student(), vec![], vec![], chrono::Utc::now(), 30);
        let err = engine
            .generate(
                &storage,
                EngineRequest {
                    analysis_id: None,
                    prompt: "分析".to_string(),
                    profile,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E013");

        let logs = storage
            .list_service_logs_with_pagination(ServiceLogListQuery::default())
            .await
            .unwrap();
        assert_eq!(logs.items.len(), 1);
        assert_ne!(logs.items[0].status, LogStatus::Processing);
        assert!(logs.items[0].error_message.is_some());
    }
}
