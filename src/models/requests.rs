//! Request DTOs for the cache admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for PUT /tiers/:tier/keys/:key
///
/// # Fields
/// - `value`: Any JSON value, `null` included
/// - `ttl_ms`: Optional TTL in milliseconds; zero or negative means the tier default
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub value: Value,
    #[serde(default)]
    pub ttl_ms: Option<i64>,
}

impl SetRequest {
    /// TTL to hand to the store. Non-positive values become zero, which the
    /// store replaces with the tier default.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_ms.map(|ms| Duration::from_millis(ms.max(0) as u64))
    }
}

/// Request body for POST /invalidate/pattern
#[derive(Debug, Clone, Deserialize)]
pub struct PatternRequest {
    /// Literal substring to match against keys
    pub pattern: String,
    /// Tier name; every tier when absent
    #[serde(default)]
    pub tier: Option<String>,
}

impl PatternRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.pattern.is_empty() {
            return Some("Pattern cannot be empty".to_string());
        }
        None
    }
}

/// Request body for POST /invalidate/tags
#[derive(Debug, Clone, Deserialize)]
pub struct TagsRequest {
    pub tags: Vec<String>,
    #[serde(default)]
    pub tier: Option<String>,
}

impl TagsRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.tags.is_empty() {
            return Some("At least one tag is required".to_string());
        }
        if self.tags.iter().any(|tag| tag.is_empty()) {
            return Some("Tags cannot be empty".to_string());
        }
        None
    }
}

/// Validates a key taken from the request path.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}
