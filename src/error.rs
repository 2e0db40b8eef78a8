//! Error types for the keyed cache
//!
//! Provides unified error handling using thiserror.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Resolve Error Enum ==
/// Failure of a [`resolve`](crate::KeyedCache::resolve) call.
///
/// Every waiter of one episode observes the same `Arc<E>`, so
/// `Arc::ptr_eq` holds between the errors handed to concurrent callers.
#[derive(Error, Debug)]
pub enum ResolveError<E> {
    /// The producer for this key failed
    #[error("producer for key '{key}' failed: {source}")]
    Producer {
        key: String,
        #[source]
        source: Arc<E>,
    },

    /// The producer panicked. Nothing is cached and the next call starts over
    #[error("producer for key '{key}' panicked")]
    Panicked { key: String },

    /// The in-flight registration was reclaimed by the sweep before it settled
    #[error("in-flight request for key '{key}' abandoned after exceeding {stale_after:?}")]
    Abandoned { key: String, stale_after: Duration },
}

impl<E> ResolveError<E> {
    /// Key the failed request was made for.
    pub fn key(&self) -> &str {
        match self {
            ResolveError::Producer { key, .. }
            | ResolveError::Panicked { key }
            | ResolveError::Abandoned { key, .. } => key,
        }
    }

    /// The shared producer failure, if the producer itself failed.
    pub fn producer_error(&self) -> Option<&Arc<E>> {
        match self {
            ResolveError::Producer { source, .. } => Some(source),
            ResolveError::Panicked { .. } | ResolveError::Abandoned { .. } => None,
        }
    }

    pub fn is_panicked(&self) -> bool {
        matches!(self, ResolveError::Panicked { .. })
    }

    pub fn is_abandoned(&self) -> bool {
        matches!(self, ResolveError::Abandoned { .. })
    }
}

impl<E> Clone for ResolveError<E> {
    fn clone(&self) -> Self {
        match self {
            ResolveError::Producer { key, source } => ResolveError::Producer {
                key: key.clone(),
                source: Arc::clone(source),
            },
            ResolveError::Panicked { key } => ResolveError::Panicked { key: key.clone() },
            ResolveError::Abandoned { key, stale_after } => ResolveError::Abandoned {
                key: key.clone(),
                stale_after: *stale_after,
            },
        }
    }
}

// == Api Error Enum ==
/// Errors surfaced by the admin HTTP API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Key not present (or expired)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the admin API.
pub type Result<T> = std::result::Result<T, ApiError>;
