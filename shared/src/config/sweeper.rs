//! Expiry sweeper scheduling

use serde::{Deserialize, Serialize};

/// How often overdue medicines are moved to `expired`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SweeperConfig {
    /// Seconds between sweeps
    pub interval_seconds: u64,
    /// Whether the background sweep runs at all
    pub enabled: bool,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // hourly
            enabled: true,
        }
    }
}

impl SweeperConfig {
    /// Load from `SWEEP_INTERVAL_SECONDS` and `SWEEPER_ENABLED`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            interval_seconds: std::env::var("SWEEP_INTERVAL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(defaults.interval_seconds),
            enabled: std::env::var("SWEEPER_ENABLED")
                .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no" | "off"))
                .unwrap_or(defaults.enabled),
        }
    }
}
