#![allow(dead_code)]

use prometheus::Registry;
use pulse_feed::config::{Config, FeedConfig};
use pulse_feed::metrics::FeedMetrics;
use std::sync::Arc;

// Small, fast config for integration tests
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.feed = FeedConfig {
        delay_ms: 50,
        by_id_delay_ms: 25,
        new_pairs: 4,
        final_stretch: 3,
        migrated: 2,
    };
    config.cache.stale_time_secs = 30;
    config.cache.gc_time_secs = 60;
    config.ticker.interval_ms = 100;
    config.ticker.tokens_per_tick = 2;
    config.dashboard.rows_per_panel = 3;
    config
}

pub fn shared_config() -> Arc<Config> {
    Arc::new(create_test_config())
}

pub fn create_test_metrics() -> FeedMetrics {
    FeedMetrics::new(Registry::new()).expect("fresh registry accepts metrics")
}
