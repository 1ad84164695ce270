//! Response DTOs for the cache admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::registry::Tier;

/// Response body for GET /tiers/:tier/keys/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub tier: Tier,
    pub key: String,
    /// The cached value, possibly `null`
    pub value: Value,
}

impl GetResponse {
    pub fn new(tier: Tier, key: impl Into<String>, value: Value) -> Self {
        Self {
            tier,
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /tiers/:tier/keys/:key
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub message: String,
    pub tier: Tier,
    pub key: String,
    /// Key evicted to make room, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evicted: Option<String>,
}

impl SetResponse {
    pub fn new(tier: Tier, key: impl Into<String>, evicted: Option<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            tier,
            key,
            evicted,
        }
    }
}

/// Response body for DELETE /tiers/:tier/keys/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub tier: Tier,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(tier: Tier, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            tier,
            key,
        }
    }
}

/// Response body for DELETE /tiers and DELETE /tiers/:tier
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Cleared tier; absent when every tier was cleared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
}

impl ClearResponse {
    pub fn new(tier: Option<Tier>) -> Self {
        let message = match tier {
            Some(tier) => format!("Tier '{}' cleared", tier),
            None => "All tiers cleared".to_string(),
        };
        Self { message, tier }
    }
}

/// Response body for the invalidation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Number of keys removed
    pub removed: usize,
    /// Tier searched; absent when every tier was searched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
