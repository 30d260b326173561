use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Lifecycle bucket a pair is assigned to at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenStatus {
    New,
    FinalStretch,
    Migrated,
}

impl TokenStatus {
    pub const ALL: [TokenStatus; 3] = [
        TokenStatus::New,
        TokenStatus::FinalStretch,
        TokenStatus::Migrated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenStatus::New => "new",
            TokenStatus::FinalStretch => "final-stretch",
            TokenStatus::Migrated => "migrated",
        }
    }

    /// Column heading shown on the dashboard.
    pub fn title(&self) -> &'static str {
        match self {
            TokenStatus::New => "New Pairs",
            TokenStatus::FinalStretch => "Final Stretch",
            TokenStatus::Migrated => "Migrated",
        }
    }
}

impl fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(TokenStatus::New),
            "final-stretch" | "final_stretch" => Ok(TokenStatus::FinalStretch),
            "migrated" => Ok(TokenStatus::Migrated),
            other => Err(Error::ParseError(format!("unknown token status '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeType {
    Verified,
    Hot,
    Trending,
    New,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    #[serde(rename = "type")]
    pub badge_type: BadgeType,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Txns {
    pub buys: u64,
    pub sells: u64,
}

impl Txns {
    pub fn total(&self) -> u64 {
        self.buys + self.sells
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: String,
    pub status: TokenStatus,
    pub price: f64,
    pub price_change_24h: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub holders: u64,
    pub txns: Txns,
    pub age: String,
    pub badges: Vec<Badge>,
}

impl TokenPair {
    pub fn is_verified(&self) -> bool {
        self.badges.iter().any(|b| b.badge_type == BadgeType::Verified)
    }
}
