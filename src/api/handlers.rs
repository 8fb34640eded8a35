//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::memory::MemoryProbe;
use crate::models::{
    ClearResponse, DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse,
    StatsResponse,
};
use crate::tasks::collect_report;

/// The cache instance shared by handlers and background tasks.
pub type SharedCache = Arc<RwLock<CacheStore<String, String>>>;

/// Application state shared across all handlers.
///
/// Owns the one cache instance the server uses; nothing else holds it
/// globally.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache store
    pub cache: SharedCache,
    /// Process memory reader reused across stats requests
    pub memory: Arc<Mutex<MemoryProbe>>,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(cache: CacheStore<String, String>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            memory: Arc::new(Mutex::new(MemoryProbe::new())),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheStore::new(config.capacity, config.default_ttl()))
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair in the cache with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl();
    let evicted = {
        let mut cache = state.cache.write().await;
        cache.put(req.key.clone(), req.value, ttl)
    };

    if let Some(evicted_key) = &evicted {
        debug!(key = %req.key, evicted = %evicted_key, "Cache full, evicted oldest entry");
    }

    Ok(Json(SetResponse::new(req.key, evicted)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: an expired hit removes the entry
    let (value, ttl_remaining) = {
        let mut cache = state.cache.write().await;
        let value = cache.get(&key);
        (value, cache.ttl_remaining(&key))
    };

    let value = value.ok_or_else(|| CacheError::NotFound(key.clone()))?;
    let ttl_remaining = ttl_remaining.map(|ttl| ttl.as_secs());

    Ok(Json(GetResponse::new(key, value, ttl_remaining)))
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from the cache.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let removed = state.cache.write().await.delete(&key);
    if !removed {
        return Err(CacheError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for POST /clear
///
/// Drops every entry.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.cache.write().await.clear();
    info!(removed, "Cache cleared on request");

    Json(ClearResponse::new(removed))
}

/// Handler for GET /stats
///
/// Returns cache statistics and process memory usage.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let mut memory = state.memory.lock().await;
    Json(collect_report(&state.cache, &mut memory).await)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_state(capacity: usize) -> AppState {
        AppState::new(CacheStore::new(capacity, Duration::from_secs(300)))
    }

    fn set_request(key: &str, value: &str) -> Json<SetRequest> {
        Json(SetRequest {
            key: key.to_string(),
            value: value.to_string(),
            ttl: None,
        })
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state(100);

        let result = set_handler(State(state.clone()), set_request("test_key", "test_value")).await;
        assert!(result.is_ok());

        let response = get_handler(State(state.clone()), Path("test_key".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, "test_value");
        assert!(response.ttl_remaining.unwrap() <= 300);
    }

    #[tokio::test]
    async fn test_set_reports_eviction() {
        let state = test_state(1);

        let _first = set_handler(State(state.clone()), set_request("first", "1"))
            .await
            .unwrap();
        let response = set_handler(State(state.clone()), set_request("second", "2"))
            .await
            .unwrap();

        assert_eq!(response.evicted.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state(100);

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state(100);

        let _stored = set_handler(State(state.clone()), set_request("to_delete", "value"))
            .await
            .unwrap();

        let result = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(result.is_ok());

        let result = get_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(result.is_err());

        let result = delete_handler(State(state), Path("to_delete".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_clear_handler() {
        let state = test_state(100);

        for key in ["a", "b"] {
            let response = set_handler(State(state.clone()), set_request(key, "1"))
                .await
                .unwrap();
            assert!(response.evicted.is_none());
        }

        let response = clear_handler(State(state.clone())).await;
        assert_eq!(response.removed, 2);
        assert!(state.cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state(100);

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.capacity, 100);
    }

    #[tokio::test]
    async fn test_stats_handler_reuses_memory_reader() {
        let state = test_state(100);
        let copy = state.clone();
        assert!(Arc::ptr_eq(&state.memory, &copy.memory));

        let first = stats_handler(State(state)).await;
        let second = stats_handler(State(copy)).await;
        assert_eq!(first.memory_bytes.is_some(), second.memory_bytes.is_some());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let state = test_state(100);

        let result = set_handler(State(state), set_request("", "value")).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }
}
