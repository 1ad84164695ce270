//! API Handlers
//!
//! HTTP request handlers for each cache admin endpoint. Unknown tier names
//! resolve to the default tier, as in [`CacheRegistry::store`].

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::bindings::{FilePreferenceStore, PreferenceCache, PreferenceStore};
use crate::cache::CacheStats;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, ClearResponse, DeleteResponse, GetResponse, HealthResponse, InvalidateResponse,
    PatternRequest, SetRequest, SetResponse, TagsRequest,
};
use crate::registry::{CacheRegistry, StatsSnapshot, Tier};

/// Application state shared across all handlers.
///
/// Keys of the `user-preference` tier are read and written through
/// `preferences`, so a configured durable store sees every change.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CacheRegistry>,
    pub preferences: PreferenceCache,
}

impl AppState {
    /// Creates state whose preferences live only in the registry.
    pub fn new(registry: Arc<CacheRegistry>) -> Self {
        let preferences = PreferenceCache::in_memory(registry.clone());
        Self {
            registry,
            preferences,
        }
    }

    pub fn with_preferences(registry: Arc<CacheRegistry>, preferences: PreferenceCache) -> Self {
        Self {
            registry,
            preferences,
        }
    }

    /// Creates a new AppState with a registry sized from the Config, backed
    /// by a preference file when `preferences_path` is set.
    pub fn from_config(config: &Config) -> Self {
        let registry = Arc::new(CacheRegistry::new(config));
        match &config.preferences_path {
            Some(path) => {
                info!(path = %path.display(), "preference file attached");
                let durable: Arc<dyn PreferenceStore> = Arc::new(FilePreferenceStore::new(path));
                let preferences = PreferenceCache::with_store(registry.clone(), durable);
                Self::with_preferences(registry, preferences)
            }
            None => Self::new(registry),
        }
    }
}

/// Handler for GET /tiers/:tier/keys/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path((tier, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let tier = CacheRegistry::resolve_tier(&tier);
    let value = match tier {
        Tier::UserPreference => state.preferences.lookup::<Value>(&key).await,
        _ => state.registry.get(tier, &key).await,
    }
    .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(tier, key, value)))
}

/// Handler for PUT /tiers/:tier/keys/:key
pub async fn set_handler(
    State(state): State<AppState>,
    Path((tier, key)): Path<(String, String)>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = validate_key(&key) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let tier = CacheRegistry::resolve_tier(&tier);
    let ttl = req.ttl();
    let evicted = match tier {
        Tier::UserPreference => {
            state
                .preferences
                .set_with_ttl(&key, &req.value, ttl)
                .await?
        }
        _ => state.registry.set(tier, key.clone(), req.value, ttl).await,
    };

    Ok(Json(SetResponse::new(tier, key, evicted)))
}

/// Handler for DELETE /tiers/:tier/keys/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((tier, key)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    let tier = CacheRegistry::resolve_tier(&tier);
    let existed = match tier {
        Tier::UserPreference => state.preferences.remove(&key).await?,
        _ => state.registry.delete(tier, &key).await,
    };
    if !existed {
        return Err(CacheError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(tier, key)))
}

/// Handler for DELETE /tiers/:tier
pub async fn clear_tier_handler(
    State(state): State<AppState>,
    Path(tier): Path<String>,
) -> Json<ClearResponse> {
    let tier = CacheRegistry::resolve_tier(&tier);
    state.registry.invalidate_all(Some(tier)).await;
    Json(ClearResponse::new(Some(tier)))
}

/// Handler for DELETE /tiers
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.registry.invalidate_all(None).await;
    Json(ClearResponse::new(None))
}

/// Handler for GET /tiers/:tier/stats
pub async fn tier_stats_handler(
    State(state): State<AppState>,
    Path(tier): Path<String>,
) -> Json<CacheStats> {
    let tier = CacheRegistry::resolve_tier(&tier);
    Json(state.registry.tier_stats(tier).await)
}

/// Handler for GET /stats
///
/// Serves the last snapshot; it is refreshed by the maintenance task.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.registry.stats_snapshot().await)
}

/// Handler for POST /stats/refresh
pub async fn refresh_stats_handler(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.registry.refresh_stats().await)
}

/// Handler for POST /invalidate/pattern
pub async fn invalidate_pattern_handler(
    State(state): State<AppState>,
    Json(req): Json<PatternRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let tier = req.tier.as_deref().map(CacheRegistry::resolve_tier);
    let removed = state.registry.invalidate_by_pattern(&req.pattern, tier).await;

    Ok(Json(InvalidateResponse { removed, tier }))
}

/// Handler for POST /invalidate/tags
pub async fn invalidate_tags_handler(
    State(state): State<AppState>,
    Json(req): Json<TagsRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let tier = req.tier.as_deref().map(CacheRegistry::resolve_tier);
    let removed = state.registry.invalidate_by_tags(&req.tags, tier).await;

    Ok(Json(InvalidateResponse { removed, tier }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
