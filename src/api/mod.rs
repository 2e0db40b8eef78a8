//! API Module
//!
//! Admin HTTP surface over a [`KeyedCache`](crate::KeyedCache).
//!
//! # Endpoints
//! - `PUT /entries` - Store a value
//! - `GET /entries/:key` - Read a value
//! - `DELETE /entries/:key` - Invalidate one entry
//! - `DELETE /entries` - Invalidate every entry
//! - `POST /sweep` - Run a sweep now
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
