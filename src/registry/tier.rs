//! Tier identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

// == Tier ==
/// The fixed set of cache tiers owned by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    /// Responses of backend API calls
    Api,
    /// Derived values memoized from their inputs
    Computed,
    /// Transient per-component UI state
    ComponentState,
    /// User preferences backed by a durable store
    UserPreference,
}

impl Tier {
    /// Every tier, in registry order.
    pub const ALL: [Tier; 4] = [
        Tier::Api,
        Tier::Computed,
        Tier::ComponentState,
        Tier::UserPreference,
    ];

    /// Tier that unrecognized names resolve to in the registry.
    pub const DEFAULT: Tier = Tier::Api;

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Api => "api",
            Tier::Computed => "computed",
            Tier::ComponentState => "component-state",
            Tier::UserPreference => "user-preference",
        }
    }

    /// Position of the tier in [`Tier::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Tier::Api => 0,
            Tier::Computed => 1,
            Tier::ComponentState => 2,
            Tier::UserPreference => 3,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "api" => Ok(Tier::Api),
            "computed" => Ok(Tier::Computed),
            "component-state" => Ok(Tier::ComponentState),
            "user-preference" => Ok(Tier::UserPreference),
            other => Err(CacheError::InvalidRequest(format!("Unknown tier: {other}"))),
        }
    }
}
