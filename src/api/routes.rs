//! API Routes
//!
//! Configures the Axum router with all admin endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    get_handler, health_handler, invalidate_all_handler, invalidate_handler, set_handler,
    stats_handler, sweep_handler, AppState,
};
use crate::cache::KeyedCache;

/// Creates the admin router for `cache`.
///
/// # Endpoints
/// - `PUT /entries` - Store a value
/// - `GET /entries/:key` - Read a value
/// - `DELETE /entries/:key` - Invalidate one entry
/// - `DELETE /entries` - Invalidate every entry
/// - `POST /sweep` - Run a sweep now
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router<V, E>(cache: KeyedCache<V, E>) -> Router
where
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/entries",
            put(set_handler::<V, E>).delete(invalidate_all_handler::<V, E>),
        )
        .route(
            "/entries/:key",
            get(get_handler::<V, E>).delete(invalidate_handler::<V, E>),
        )
        .route("/sweep", post(sweep_handler::<V, E>))
        .route("/stats", get(stats_handler::<V, E>))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(cache))
}
