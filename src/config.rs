//! Configuration Module
//!
//! Loads the mesh layout and node parameters from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Runtime configuration for a mesh of cache nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries each node can hold
    pub max_entries: usize,
    /// TTL in seconds applied to writes made by the demo driver
    pub default_ttl: u64,
    /// Expiry sweeper interval in seconds, 0 = lazy expiration only
    pub sweep_interval: u64,
    /// One cache node is created per region
    pub regions: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Per-node capacity (default: 100)
    /// - `DEFAULT_TTL` - Write TTL in seconds (default: 30)
    /// - `SWEEP_INTERVAL` - Sweeper frequency in seconds (default: 0, disabled)
    /// - `REGIONS` - Comma-separated node names (default: montreal,ny,paris)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            sweep_interval: parse_var("SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            regions: env::var("REGIONS")
                .ok()
                .map(|v| parse_regions(&v))
                .unwrap_or(defaults.regions),
        }
    }

    /// Rejects layouts that cannot hold any data.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "MAX_ENTRIES must be at least 1".to_string(),
            ));
        }
        if self.regions.is_empty() {
            return Err(CacheError::InvalidConfig(
                "REGIONS must name at least one region".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    /// Sweeper interval, or None when lazy expiration alone is wanted.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval > 0).then(|| Duration::from_secs(self.sweep_interval))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 100,
            default_ttl: 30,
            sweep_interval: 0,
            regions: vec!["montreal".to_string(), "ny".to_string(), "paris".to_string()],
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_regions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}
