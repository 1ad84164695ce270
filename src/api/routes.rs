//! API Routes
//!
//! Configures the Axum router with all cache admin endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_all_handler, clear_tier_handler, delete_handler, get_handler, health_handler,
    invalidate_pattern_handler, invalidate_tags_handler, refresh_stats_handler, set_handler,
    stats_handler, tier_stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check
/// - `GET /stats` - Last statistics snapshot
/// - `POST /stats/refresh` - Recompute and return the snapshot
/// - `DELETE /tiers` - Clear every tier
/// - `DELETE /tiers/:tier` - Clear one tier
/// - `GET /tiers/:tier/stats` - Live statistics of one tier
/// - `GET|PUT|DELETE /tiers/:tier/keys/:key` - Single-key operations
/// - `POST /invalidate/pattern` - Remove keys containing a substring
/// - `POST /invalidate/tags` - Remove keys containing any of several substrings
///
/// # Middleware
/// - CORS: Allows any origin (the dashboard UI is served separately)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/stats/refresh", post(refresh_stats_handler))
        .route("/tiers", delete(clear_all_handler))
        .route("/tiers/:tier", delete(clear_tier_handler))
        .route("/tiers/:tier/stats", get(tier_stats_handler))
        .route(
            "/tiers/:tier/keys/:key",
            get(get_handler).put(set_handler).delete(delete_handler),
        )
        .route("/invalidate/pattern", post(invalidate_pattern_handler))
        .route("/invalidate/tags", post(invalidate_tags_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
