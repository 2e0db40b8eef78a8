//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::de::DeserializeOwned;

use crate::cache::{KeyedCache, SweepReport};
use crate::error::{ApiError, Result};
use crate::models::{
    GetResponse, HealthResponse, InvalidateAllResponse, InvalidateResponse, SetRequest,
    SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
pub struct AppState<V, E> {
    /// The hosted cache; clones share the same maps
    pub cache: KeyedCache<V, E>,
}

impl<V, E> AppState<V, E> {
    pub fn new(cache: KeyedCache<V, E>) -> Self {
        Self { cache }
    }
}

impl<V, E> Clone for AppState<V, E> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

/// Handler for PUT /entries
///
/// Stores a value in the cache with an optional TTL.
pub async fn set_handler<V, E>(
    State(state): State<AppState<V, E>>,
    Json(req): Json<SetRequest<V>>,
) -> Result<Json<SetResponse>>
where
    V: DeserializeOwned + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl_ms.map(Duration::from_millis);
    state.cache.set(req.key.clone(), req.value, ttl);

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /entries/:key
///
/// Returns the cached value, or 404 when absent or expired.
pub async fn get_handler<V, E>(
    State(state): State<AppState<V, E>>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse<V>>>
where
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    match state.cache.get(&key) {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(ApiError::NotFound(key)),
    }
}

/// Handler for DELETE /entries/:key
///
/// Invalidates one entry. Succeeds whether or not the key was present.
pub async fn invalidate_handler<V, E>(
    State(state): State<AppState<V, E>>,
    Path(key): Path<String>,
) -> Json<InvalidateResponse>
where
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    let removed = state.cache.invalidate(&key);
    Json(InvalidateResponse::new(key, removed))
}

/// Handler for DELETE /entries
pub async fn invalidate_all_handler<V, E>(
    State(state): State<AppState<V, E>>,
) -> Json<InvalidateAllResponse>
where
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    let removed = state.cache.invalidate_all();
    Json(InvalidateAllResponse { removed })
}

/// Handler for POST /sweep
///
/// Runs a sweep immediately instead of waiting for the next scheduled one.
pub async fn sweep_handler<V, E>(State(state): State<AppState<V, E>>) -> Json<SweepReport>
where
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    Json(state.cache.sweep())
}

/// Handler for GET /stats
pub async fn stats_handler<V, E>(State(state): State<AppState<V, E>>) -> Json<StatsResponse>
where
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    Json(state.cache.stats().into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
