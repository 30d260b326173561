use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod market;

pub use market::{Badge, BadgeType, TokenPair, TokenStatus, Txns};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceDirection {
    Up,
    Down,
}

/// Display-only override of a token's price produced by a price tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub direction: PriceDirection,
    pub price: f64,
}

impl PriceUpdate {
    /// Builds the update for moving from `previous` to `price`. A flat move counts as up.
    pub fn between(previous: f64, price: f64) -> Self {
        let direction = if price < previous {
            PriceDirection::Down
        } else {
            PriceDirection::Up
        };
        Self { direction, price }
    }
}

/// The token set produced by one fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub tokens: Vec<TokenPair>,
    pub fetched_at: DateTime<Utc>,
}

impl FeedSnapshot {
    pub fn new(tokens: Vec<TokenPair>) -> Self {
        Self {
            tokens,
            fetched_at: Utc::now(),
        }
    }
}
