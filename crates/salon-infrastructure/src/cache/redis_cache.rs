// ============================================================================
// Salon Infrastructure - Redis Cache
// File: crates/salon-infrastructure/src/cache/redis_cache.rs
// ============================================================================
//! TTL memoization of read results in Redis.
//!
//! The cache is an optimisation only: when Redis is unreachable or holds an
//! unreadable payload, the loader runs as if the key were absent.

use deadpool_redis::redis::AsyncCommands;
use deadpool_redis::{Config, Pool, PoolConfig, Runtime};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::future::Future;
use tracing::{debug, warn};

use salon_core::domain::TenantId;
use salon_core::error::DomainError;
use salon_shared::config::RedisSettings;

/// `prefix:salon:<tenant>:<params as JSON>`; the tenant keeps salons from sharing entries.
pub fn cache_key(prefix: &str, tenant: TenantId, params: &JsonValue) -> String {
    format!("{}:salon:{}:{}", prefix, tenant, params)
}

#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
    default_ttl_secs: u64,
}

impl RedisCache {
    pub fn new(settings: &RedisSettings) -> Result<Self, DomainError> {
        let mut config = Config::from_url(settings.url.clone());
        config.pool = Some(PoolConfig::new(settings.max_connections as usize));
        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| DomainError::InternalError(format!("Redis pool: {}", e)))?;

        Ok(Self {
            pool,
            default_ttl_secs: settings.default_ttl_secs,
        })
    }

    pub fn default_ttl_secs(&self) -> u64 {
        self.default_ttl_secs
    }

    /// Cached value of `key`, or the loader's result stored for `ttl_secs`.
    ///
    /// Loader errors are returned as-is and never cached.
    pub async fn memoize<T, F, Fut>(&self, key: &str, ttl_secs: u64, loader: F) -> Result<T, DomainError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        if let Some(hit) = self.get(key).await {
            debug!(key, "Cache hit");
            return Ok(hit);
        }

        let value = loader().await?;
        self.put(key, &value, ttl_secs).await;
        Ok(value)
    }

    pub async fn invalidate(&self, key: &str) {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(key, "Cache unavailable, skipping invalidation: {}", e);
                return;
            }
        };
        if let Err(e) = conn.del::<_, ()>(key).await {
            warn!(key, "Cache invalidation failed: {}", e);
        }
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(key, "Cache unavailable, bypassing: {}", e);
                return None;
            }
        };
        let payload: Option<String> = match conn.get(key).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key, "Cache read failed, bypassing: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&payload?) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, "Discarding unreadable cache entry: {}", e);
                None
            }
        }
    }

    async fn put<T: Serialize>(&self, key: &str, value: &T, ttl_secs: u64) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key, "Value not cacheable: {}", e);
                return;
            }
        };
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(key, "Cache unavailable, not storing: {}", e);
                return;
            }
        };
        if let Err(e) = conn.set_ex::<_, _, ()>(key, payload, ttl_secs).await {
            warn!(key, "Cache write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn unreachable_cache() -> RedisCache {
        RedisCache::new(&RedisSettings {
            url: "redis://127.0.0.1:1".into(),
            max_connections: 1,
            default_ttl_secs: 60,
        })
        .unwrap()
    }

    #[test]
    fn test_cache_key_includes_tenant() {
        let params = json!({"id": "3"});
        let five = cache_key("service_definitions", TenantId::new(5).unwrap(), &params);
        let six = cache_key("service_definitions", TenantId::new(6).unwrap(), &params);

        assert_eq!(five, r#"service_definitions:salon:5:{"id":"3"}"#);
        assert_ne!(five, six);
    }

    #[tokio::test]
    async fn test_unreachable_cache_is_bypassed() {
        let cache = unreachable_cache();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cache
                .memoize("k", cache.default_ttl_secs(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, DomainError>(vec![1, 2, 3])
                })
                .await
                .unwrap();
            assert_eq!(value, vec![1, 2, 3]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_loader_error_propagates() {
        let cache = unreachable_cache();
        let result: Result<Vec<i64>, _> = cache
            .memoize("k", 10, || async { Err(DomainError::DatabaseError("down".into())) })
            .await;

        assert!(matches!(result, Err(DomainError::DatabaseError(_))));
        cache.invalidate("k").await;
    }
}
