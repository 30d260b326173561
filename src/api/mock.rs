use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Badge, BadgeType, TokenPair, TokenStatus, Txns};

const SYMBOLS: &[&str] = &[
    "PEPE", "BONK", "WIF", "MOON", "FROG", "DOGE", "CAT", "SHIB", "TURBO", "MEW",
    "POPCAT", "GIGA", "FWOG", "CHAD", "BOME", "SLERF", "PNUT", "GOAT", "ZERO", "MOODENG",
];

const NAMES: &[&str] = &[
    "Pepe Classic", "Bonk Inu", "Dog Wif Hat", "To The Moon", "Froggy", "Doge Killer",
    "Cat In A Box", "Shiba Saga", "Turbo Toad", "Cat In Dogs World", "Pop Cat", "Gigachad",
    "Fwog Coin", "Chad Token", "Book Of Meme", "Slerf", "Peanut Squirrel", "Goatseus",
    "Zero Gravity", "Moo Deng",
];

struct StatusProfile {
    /// Base-10 exponent range of the price.
    price_exp: (f64, f64),
    market_cap: (f64, f64),
    holders: (u64, u64),
}

fn profile(status: TokenStatus) -> StatusProfile {
    match status {
        TokenStatus::New => StatusProfile {
            price_exp: (-8.0, -4.0),
            market_cap: (5_000.0, 100_000.0),
            holders: (1, 250),
        },
        TokenStatus::FinalStretch => StatusProfile {
            price_exp: (-6.0, -2.0),
            market_cap: (50_000.0, 500_000.0),
            holders: (200, 3_000),
        },
        TokenStatus::Migrated => StatusProfile {
            price_exp: (-4.0, 1.0),
            market_cap: (500_000.0, 50_000_000.0),
            holders: (2_000, 60_000),
        },
    }
}

fn random_age<R: Rng + ?Sized>(rng: &mut R, status: TokenStatus) -> String {
    let coarse = rng.gen_bool(0.5);
    match (status, coarse) {
        (TokenStatus::New, false) => format!("{}s", rng.gen_range(1..60)),
        (TokenStatus::New, true) => format!("{}m", rng.gen_range(1..30)),
        (TokenStatus::FinalStretch, false) => format!("{}m", rng.gen_range(5..60)),
        (TokenStatus::FinalStretch, true) => format!("{}h", rng.gen_range(1..12)),
        (TokenStatus::Migrated, false) => format!("{}h", rng.gen_range(1..24)),
        (TokenStatus::Migrated, true) => format!("{}d", rng.gen_range(1..30)),
    }
}

fn random_badges<R: Rng + ?Sized>(rng: &mut R, token: &TokenPair) -> Vec<Badge> {
    let mut badges = Vec::new();
    if rng.gen_bool(0.3) {
        badges.push(Badge {
            badge_type: BadgeType::Verified,
            label: "Verified".to_string(),
        });
    }
    if token.price_change_24h > 100.0 {
        badges.push(Badge {
            badge_type: BadgeType::Hot,
            label: "Hot".to_string(),
        });
    }
    if token.volume_24h > token.market_cap {
        badges.push(Badge {
            badge_type: BadgeType::Trending,
            label: "Trending".to_string(),
        });
    }
    if token.status == TokenStatus::New && token.age.ends_with('s') {
        badges.push(Badge {
            badge_type: BadgeType::New,
            label: "New".to_string(),
        });
    }
    badges
}

fn random_token<R: Rng + ?Sized>(rng: &mut R, index: usize, status: TokenStatus) -> TokenPair {
    let profile = profile(status);
    let symbol = SYMBOLS.choose(rng).copied().unwrap_or("TOKEN");
    let name = NAMES.choose(rng).copied().unwrap_or("Token");

    let price = 10f64.powf(rng.gen_range(profile.price_exp.0..profile.price_exp.1));
    let market_cap = rng.gen_range(profile.market_cap.0..profile.market_cap.1);
    let volume_24h = market_cap * rng.gen_range(0.05..1.5);
    let holders = rng.gen_range(profile.holders.0..profile.holders.1);
    let txns = Txns {
        buys: rng.gen_range(0..holders * 3),
        sells: rng.gen_range(0..holders * 2),
    };

    let mut token = TokenPair {
        id: format!("{}-{}", status, index),
        symbol: symbol.to_string(),
        name: name.to_string(),
        image: format!("https://api.dicebear.com/7.x/identicon/svg?seed={}{}", symbol, index),
        status,
        price,
        price_change_24h: rng.gen_range(-80.0..300.0),
        market_cap,
        volume_24h,
        holders,
        txns,
        age: random_age(rng, status),
        badges: Vec::new(),
    };
    token.badges = random_badges(rng, &token);
    token
}

/// Generates `count` synthetic pairs with the given status from `rng`.
pub fn generate_mock_tokens_with<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    status: TokenStatus,
) -> Vec<TokenPair> {
    (0..count).map(|index| random_token(rng, index, status)).collect()
}

pub fn generate_mock_tokens(count: usize, status: TokenStatus) -> Vec<TokenPair> {
    generate_mock_tokens_with(&mut rand::thread_rng(), count, status)
}
