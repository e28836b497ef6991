//! 分析报告生成引擎
//!
//! 服务层只依赖 [`AnalysisEngine`]，启动时根据 `analysis.engine` 选择实现。

mod deepseek;
mod local;

pub use deepseek::DeepSeekAnalysisEngine;
pub use local::LocalAnalysisEngine;

use std::sync::Arc;

use tracing::warn;

use crate::analysis::StudentProfile;
use crate::clients::DeepSeekClient;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::storage::Storage;

/// 一次生成请求
#[derive(Debug, Clone)]
pub struct EngineRequest {
    pub analysis_id: Option<i64>,
    pub prompt: String,
    pub profile: StudentProfile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    pub content: String,
    pub confidence: f64,
    pub analyzed_by: String,
}

#[async_trait::async_trait]
pub trait AnalysisEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, storage: &dyn Storage, request: EngineRequest)
    -> Result<EngineOutput>;
}

/// 按配置创建引擎，DeepSeek 不可用时回退到本地引擎
pub fn create_engine(config: &AppConfig) -> Arc<dyn AnalysisEngine> {
    match config.analysis.engine.as_str() {
        "deepseek" if !config.deepseek_enabled() => {
            warn!("DeepSeek engine selected without an API key, falling back to local engine");
            Arc::new(LocalAnalysisEngine)
        }
        "deepseek" => match DeepSeekClient::new(&config.deepseek) {
            Ok(client) => Arc::new(DeepSeekAnalysisEngine::new(client)),
            Err(e) => {
                warn!("DeepSeek engine unavailable ({}), falling back to local engine", e);
                Arc::new(LocalAnalysisEngine)
            }
        },
        "local" => Arc::new(LocalAnalysisEngine),
        other => {
            warn!("Unknown analysis engine '{}', falling back to local engine", other);
            Arc::new(LocalAnalysisEngine)
        }
    }
}
