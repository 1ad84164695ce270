//! API Module
//!
//! HTTP handlers and routing for the cache admin API used by the dashboard UI.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats`, `POST /stats/refresh` - Registry statistics
//! - `/tiers/...` - Per-tier key operations, stats and clearing
//! - `POST /invalidate/{pattern,tags}` - Bulk invalidation

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
