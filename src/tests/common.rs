use prometheus::Registry;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{CacheConfig, FeedConfig};
use crate::metrics::FeedMetrics;
use crate::models::{Badge, BadgeType, TokenPair, TokenStatus, Txns};

// Helper to create a fixed token
pub fn create_test_token(id: &str, status: TokenStatus) -> TokenPair {
    TokenPair {
        id: id.to_string(),
        symbol: "TEST".to_string(),
        name: "Test Token".to_string(),
        image: "https://example.com/test.png".to_string(),
        status,
        price: 0.0042,
        price_change_24h: 12.5,
        market_cap: 250_000.0,
        volume_24h: 80_000.0,
        holders: 420,
        txns: Txns { buys: 300, sells: 120 },
        age: "5m".to_string(),
        badges: vec![Badge {
            badge_type: BadgeType::Verified,
            label: "Verified".to_string(),
        }],
    }
}

pub fn create_test_feed_config(new_pairs: usize, final_stretch: usize, migrated: usize) -> FeedConfig {
    FeedConfig {
        delay_ms: 10,
        by_id_delay_ms: 20,
        new_pairs,
        final_stretch,
        migrated,
    }
}

// One-minute stale time, two-minute gc time
pub fn create_test_cache_config(retry: u32) -> CacheConfig {
    CacheConfig {
        stale_time_secs: 60,
        gc_time_secs: 120,
        retry,
    }
}

// Each call gets its own registry so counters start at zero
pub fn create_test_metrics() -> FeedMetrics {
    FeedMetrics::new(Registry::new()).expect("fresh registry accepts metrics")
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
