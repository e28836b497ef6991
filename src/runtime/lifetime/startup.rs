use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::engine::{AnalysisEngine, create_engine};
use crate::errors::{GradeSysError, Result};
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

use super::seed::seed_demo_data;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub engine: Arc<dyn AnalysisEngine>,
}

const FALLBACK_CACHE: &str = "moka";

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache(cache_type: &str) -> Result<Arc<dyn ObjectCache>> {
    warn!("Attempting to create {} cache backend", cache_type);

    let mut candidates = vec![cache_type];
    if cache_type != FALLBACK_CACHE {
        candidates.push(FALLBACK_CACHE);
    }

    for name in candidates {
        let Some(constructor) = get_object_cache_plugin(name) else {
            warn!("Cache backend '{}' not found in registry", name);
            continue;
        };
        match constructor().await {
            Ok(cache) => {
                warn!("Successfully created {} cache backend", name);
                return Ok(Arc::from(cache));
            }
            Err(e) => warn!("Failed to create {} cache: {}", name, e),
        }
    }

    Err(GradeSysError::cache_plugin_not_found(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

/// 准备服务器启动的上下文：存储、演示数据、缓存和分析引擎
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = AppConfig::get();

    if cfg!(debug_assertions) {
        debug!(
            "Registered object cache plugins: {:?}",
            crate::cache::register::registered_object_cache_plugins()
        );
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    if config.app.seed_demo_data
        && let Err(e) = seed_demo_data(storage.as_ref()).await
    {
        warn!("Failed to seed demo data: {}", e);
    }

    let cache = create_cache(&config.cache.cache_type)
        .await
        .expect("Failed to create cache");
    warn!("Cache backend initialized");

    let engine = create_engine(config);
    warn!("Analysis engine: {}", engine.name());

    StartupContext {
        storage,
        cache,
        engine,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_unknown_cache_falls_back_to_moka() {
        assert!(create_cache("redis").await.is_ok());
        assert!(create_cache("moka").await.is_ok());
    }
}
