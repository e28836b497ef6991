//! 对象缓存
//!
//! 后端以插件形式注册（见 [`declare_object_cache_plugin!`]），启动时按
//! `cache.type` 选择。值统一以 JSON 字符串保存。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

impl<T> CacheResult<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            CacheResult::Found(value) => Some(value),
            CacheResult::NotFound => None,
        }
    }
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    // ttl 为 0 时使用后端默认值
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 读取并反序列化，内容损坏时视为未命中
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    let raw = cache.get_raw(key).await.into_option()?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Discarding malformed cache entry '{}': {}", key, e);
            cache.remove(key).await;
            None
        }
    }
}

pub async fn insert_json<T: Serialize>(cache: &dyn ObjectCache, key: &str, value: &T, ttl: u64) {
    match serde_json::to_string(value) {
        Ok(raw) => cache.insert_raw(key.to_string(), raw, ttl).await,
        Err(e) => warn!("Failed to serialize cache entry '{}': {}", key, e),
    }
}

/// 声明缓存插件，进程启动时自动注册到插件表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        <$ty>::new()
                            .map(|cache| Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                            .map_err($crate::errors::GradeSysError::cache_connection::<String>)
                    })
                }),
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use super::object_cache::moka::MokaCacheWrapper;
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        total: i64,
    }

    #[actix_web::test]
    async fn test_json_helpers() {
        let cache = MokaCacheWrapper::with_capacity(16, 60);

        assert_eq!(get_json::<Payload>(&cache, "dashboard").await, None);
        insert_json(&cache, "dashboard", &Payload { total: 3 }, 0).await;
        assert_eq!(
            get_json::<Payload>(&cache, "dashboard").await,
            Some(Payload { total: 3 })
        );

        cache
            .insert_raw("dashboard".to_string(), "not json".to_string(), 0)
            .await;
        assert_eq!(get_json::<Payload>(&cache, "dashboard").await, None);
        assert_eq!(cache.get_raw("dashboard").await, CacheResult::NotFound);
    }

    #[test]
    fn test_moka_plugin_registered() {
        assert!(register::get_object_cache_plugin("moka").is_some());
        assert!(register::get_object_cache_plugin("redis").is_none());
    }
}
