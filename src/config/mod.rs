use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::pipeline::SortKey;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub cache: CacheConfig,
    pub ticker: TickerConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

/// Simulated latency and batch sizes of the mock feed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    pub delay_ms: u64,
    pub by_id_delay_ms: u64,
    pub new_pairs: usize,
    pub final_stretch: usize,
    pub migrated: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            delay_ms: 100,
            by_id_delay_ms: 200,
            new_pairs: 10,
            final_stretch: 10,
            migrated: 10,
        }
    }
}

impl FeedConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn by_id_delay(&self) -> Duration {
        Duration::from_millis(self.by_id_delay_ms)
    }

    pub fn total(&self) -> usize {
        self.new_pairs + self.final_stretch + self.migrated
    }
}

/// Query cache policy: how long a snapshot is fresh, how long it is kept at all.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub stale_time_secs: u64,
    pub gc_time_secs: u64,
    pub retry: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time_secs: 5 * 60,
            gc_time_secs: 10 * 60,
            retry: 0,
        }
    }
}

impl CacheConfig {
    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_secs)
    }

    pub fn gc_time(&self) -> Duration {
        Duration::from_secs(self.gc_time_secs)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TickerConfig {
    pub interval_ms: u64,
    pub tokens_per_tick: usize,
    pub max_move_pct: f64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1500,
            tokens_per_tick: 3,
            max_move_pct: 2.0,
        }
    }
}

impl TickerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub default_sort: SortKey,
    pub rows_per_panel: usize,
    pub refresh_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_sort: SortKey::MarketCap,
            rows_per_panel: 10,
            refresh_ms: 1000,
        }
    }
}

impl DashboardConfig {
    pub fn refresh(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        fs::write(path, config_str)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache.gc_time_secs < self.cache.stale_time_secs {
            return Err(Error::ConfigError(format!(
                "cache.gc_time_secs ({}) must not be shorter than cache.stale_time_secs ({})",
                self.cache.gc_time_secs, self.cache.stale_time_secs
            )));
        }
        if self.ticker.interval_ms == 0 {
            return Err(Error::ConfigError("ticker.interval_ms must be positive".to_string()));
        }
        if !(self.ticker.max_move_pct > 0.0 && self.ticker.max_move_pct < 100.0) {
            return Err(Error::ConfigError(format!(
                "ticker.max_move_pct must be within (0, 100), got {}",
                self.ticker.max_move_pct
            )));
        }
        if self.dashboard.rows_per_panel == 0 {
            return Err(Error::ConfigError("dashboard.rows_per_panel must be positive".to_string()));
        }
        if self.dashboard.refresh_ms == 0 {
            return Err(Error::ConfigError("dashboard.refresh_ms must be positive".to_string()));
        }
        Ok(())
    }
}
