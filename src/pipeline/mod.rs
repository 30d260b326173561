//! Partitioning of a flat token list into status buckets and ordering of
//! each bucket by a selectable key.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::models::{TokenPair, TokenStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "mc", alias = "marketCap")]
    MarketCap,
    #[serde(rename = "volume")]
    Volume,
    #[serde(rename = "price")]
    Price,
    #[serde(rename = "age")]
    Age,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::MarketCap, SortKey::Volume, SortKey::Price, SortKey::Age];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::MarketCap => "mc",
            SortKey::Volume => "volume",
            SortKey::Price => "price",
            SortKey::Age => "age",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mc" | "marketCap" | "market-cap" => Ok(SortKey::MarketCap),
            "volume" => Ok(SortKey::Volume),
            "price" => Ok(SortKey::Price),
            "age" => Ok(SortKey::Age),
            other => Err(Error::ParseError(format!("unknown sort key '{}'", other))),
        }
    }
}

/// Seconds represented by an age string such as "45s", "5m", "2h" or "1d".
///
/// The last character is the unit and the leading digits before it the count,
/// so "1.5h" reads as one hour. An unknown unit or a count without leading
/// digits yields 0.
pub fn parse_age(age: &str) -> u64 {
    let age = age.trim();
    let Some(unit) = age.chars().last() else {
        return 0;
    };
    let factor = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3600,
        'd' => 86_400,
        _ => return 0,
    };
    let count = age[..age.len() - unit.len_utf8()].trim();
    let digits = count.find(|c: char| !c.is_ascii_digit()).unwrap_or(count.len());
    let value: u64 = match count[..digits].parse() {
        Ok(v) => v,
        Err(_) => return 0,
    };
    value.saturating_mul(factor)
}

fn compare_desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

fn compare(a: &TokenPair, b: &TokenPair, key: SortKey) -> Ordering {
    match key {
        SortKey::MarketCap => compare_desc(a.market_cap, b.market_cap),
        SortKey::Volume => compare_desc(a.volume_24h, b.volume_24h),
        SortKey::Price => compare_desc(a.price, b.price),
        SortKey::Age => parse_age(&a.age).cmp(&parse_age(&b.age)),
    }
}

/// Orders tokens in place: numeric keys descending, age ascending.
/// The sort is stable, so equal keys keep their input order.
pub fn sort_tokens(tokens: &mut [TokenPair], key: SortKey) {
    tokens.sort_by(|a, b| compare(a, b, key));
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Buckets {
    pub new_pairs: Vec<TokenPair>,
    pub final_stretch: Vec<TokenPair>,
    pub migrated: Vec<TokenPair>,
}

impl Buckets {
    pub fn get(&self, status: TokenStatus) -> &[TokenPair] {
        match status {
            TokenStatus::New => &self.new_pairs,
            TokenStatus::FinalStretch => &self.final_stretch,
            TokenStatus::Migrated => &self.migrated,
        }
    }

    fn get_mut(&mut self, status: TokenStatus) -> &mut Vec<TokenPair> {
        match status {
            TokenStatus::New => &mut self.new_pairs,
            TokenStatus::FinalStretch => &mut self.final_stretch,
            TokenStatus::Migrated => &mut self.migrated,
        }
    }

    pub fn total(&self) -> usize {
        self.new_pairs.len() + self.final_stretch.len() + self.migrated.len()
    }

    pub fn sort_by(&mut self, key: SortKey) {
        for status in TokenStatus::ALL {
            sort_tokens(self.get_mut(status), key);
        }
    }
}

/// Splits tokens by status, preserving input order inside each bucket.
pub fn partition(tokens: &[TokenPair]) -> Buckets {
    let mut buckets = Buckets::default();
    for token in tokens {
        buckets.get_mut(token.status).push(token.clone());
    }
    buckets
}

pub fn categorize(tokens: &[TokenPair], key: SortKey) -> Buckets {
    let mut buckets = partition(tokens);
    buckets.sort_by(key);
    buckets
}
