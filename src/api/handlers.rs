//! API Handlers
//!
//! One handler per endpoint, each a thin call into the shared cache.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{Cache, CacheStats};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::models::{
    Ack, CleanupResponse, ExistsResponse, HealthResponse, KeysResponse, SetRequest, TtlResponse,
    ValueResponse,
};

/// State shared by all handlers. Cloning it clones the cache handle only.
#[derive(Clone)]
pub struct AppState {
    pub cache: Cache<String, String>,
}

impl AppState {
    pub fn new(cache: Cache<String, String>) -> Self {
        Self { cache }
    }

    /// Builds a fresh cache from `config`.
    pub fn from_config(config: CacheConfig) -> Result<Self> {
        Cache::with_config(config).map(Self::new)
    }
}

/// PUT /set
///
/// Rejects the request before touching the cache if the key, value or TTL is
/// invalid.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<Ack>> {
    let ttl = req.validated_ttl()?;
    let replaced = state.cache.put(req.key.clone(), req.value, ttl);
    Ok(Json(Ack::stored(req.key, replaced)))
}

/// GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ValueResponse>> {
    let value = state
        .cache
        .get(key.as_str())
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;
    Ok(Json(ValueResponse { key, value }))
}

/// DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Ack>> {
    if !state.cache.delete(key.as_str()) {
        return Err(CacheError::NotFound(key));
    }
    Ok(Json(Ack::deleted(key)))
}

/// GET /exists/:key
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ExistsResponse> {
    let exists = state.cache.exists(key.as_str());
    Json(ExistsResponse { key, exists })
}

/// GET /ttl/:key
pub async fn ttl_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<TtlResponse>> {
    let ttl = state
        .cache
        .ttl_remaining(key.as_str())
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;
    Ok(Json(TtlResponse::new(key, ttl)))
}

/// GET /keys
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    Json(state.cache.keys().into())
}

/// POST /cleanup
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<CleanupResponse> {
    let removed = state.cache.cleanup_expired();
    Json(CleanupResponse { removed })
}

/// POST /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<Ack> {
    state.cache.clear();
    Json(Ack::done("Cache cleared"))
}

/// GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

/// POST /stats/reset
pub async fn reset_stats_handler(State(state): State<AppState>) -> Json<Ack> {
    state.cache.reset_stats();
    Json(Ack::done("Statistics reset"))
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
        entries: state.cache.size(),
        sweeper_running: state.cache.is_sweeping(),
    })
}
