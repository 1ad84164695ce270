//! Configuration Module
//!
//! Handles loading tier sizes, TTLs and service settings from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::registry::Tier;

// == Tier Config ==
/// Capacity and default TTL of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierConfig {
    /// Maximum number of entries the tier can hold
    pub max_size: usize,
    /// TTL for entries stored without an explicit one
    pub ttl: Duration,
}

impl TierConfig {
    pub const fn new(max_size: usize, ttl: Duration) -> Self {
        Self { max_size, ttl }
    }

    /// Built-in defaults per tier.
    pub fn default_for(tier: Tier) -> Self {
        match tier {
            Tier::Api => Self::new(50, Duration::from_secs(5 * 60)),
            Tier::Computed => Self::new(100, Duration::from_secs(10 * 60)),
            Tier::ComponentState => Self::new(30, Duration::from_secs(15 * 60)),
            Tier::UserPreference => Self::new(20, Duration::from_secs(30 * 60)),
        }
    }

    fn from_env(tier: Tier) -> Self {
        let defaults = Self::default_for(tier);
        let prefix = env_prefix(tier);
        Self {
            max_size: positive_env(&format!("{prefix}_CACHE_MAX_SIZE")).unwrap_or(defaults.max_size),
            ttl: positive_env(&format!("{prefix}_CACHE_TTL_MS"))
                .map(Duration::from_millis)
                .unwrap_or(defaults.ttl),
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub api: TierConfig,
    pub computed: TierConfig,
    pub component_state: TierConfig,
    pub user_preference: TierConfig,
    /// HTTP server port
    pub server_port: u16,
    /// Interval between expiry sweeps and stats refreshes
    pub maintenance_interval: Duration,
    /// JSON file backing user preferences; in-memory when unset
    pub preferences_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `{API,COMPUTED,COMPONENT_STATE,USER_PREFERENCE}_CACHE_MAX_SIZE` - tier capacity
    /// - `{API,COMPUTED,COMPONENT_STATE,USER_PREFERENCE}_CACHE_TTL_MS` - tier default TTL
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MAINTENANCE_INTERVAL_MS` - sweep and stats interval (default: 10000)
    /// - `PREFERENCES_PATH` - preference file (default: none)
    ///
    /// Missing, unparseable or zero values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api: TierConfig::from_env(Tier::Api),
            computed: TierConfig::from_env(Tier::Computed),
            component_state: TierConfig::from_env(Tier::ComponentState),
            user_preference: TierConfig::from_env(Tier::UserPreference),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            maintenance_interval: positive_env("MAINTENANCE_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.maintenance_interval),
            preferences_path: env::var("PREFERENCES_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Configuration of one tier.
    pub fn tier(&self, tier: Tier) -> TierConfig {
        match tier {
            Tier::Api => self.api,
            Tier::Computed => self.computed,
            Tier::ComponentState => self.component_state,
            Tier::UserPreference => self.user_preference,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: TierConfig::default_for(Tier::Api),
            computed: TierConfig::default_for(Tier::Computed),
            component_state: TierConfig::default_for(Tier::ComponentState),
            user_preference: TierConfig::default_for(Tier::UserPreference),
            server_port: 3000,
            maintenance_interval: Duration::from_secs(10),
            preferences_path: None,
        }
    }
}

fn env_prefix(tier: Tier) -> &'static str {
    match tier {
        Tier::Api => "API",
        Tier::Computed => "COMPUTED",
        Tier::ComponentState => "COMPONENT_STATE",
        Tier::UserPreference => "USER_PREFERENCE",
    }
}

fn positive_env<T>(name: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v > T::default())
}
