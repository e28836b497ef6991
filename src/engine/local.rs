use super::{AnalysisEngine, EngineOutput, EngineRequest};
use crate::analysis::generate_local_analysis;
use crate::errors::Result;
use crate::storage::Storage;

/// 基于固定规则的本地引擎，不读取提示词
pub struct LocalAnalysisEngine;

impl LocalAnalysisEngine {
    pub const NAME: &'static str = "Local Analysis Engine";
}

#[async_trait::async_trait]
impl AnalysisEngine for LocalAnalysisEngine {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn generate(
        &self,
        _storage: &dyn Storage,
        request: EngineRequest,
    ) -> Result<EngineOutput> {
        let report = generate_local_analysis(&request.profile);
        Ok(EngineOutput {
            content: report.content,
            confidence: report.confidence,
            analyzed_by: Self::NAME.to_string(),
        })
    }
}
