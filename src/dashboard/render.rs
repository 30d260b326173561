use rand::Rng;
use std::collections::HashMap;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{PriceDirection, PriceUpdate, TokenPair};
use crate::utils::format::{format_compact, format_number, format_price};

/// Cosmetic indicator percentages drawn fresh for every row on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeValues {
    pub top_holder: u8,
    pub liquidity: u8,
    pub holder_distribution: u8,
    pub burn_rate: u8,
    pub whale_activity: u8,
}

impl BadgeValues {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            top_holder: rng.gen_range(0..70),
            liquidity: rng.gen_range(0..30),
            holder_distribution: rng.gen_range(0..90),
            burn_rate: rng.gen_range(0..90),
            whale_activity: rng.gen_range(0..30),
        }
    }

    /// Label, value and whether the value reads as healthy.
    pub fn indicators(&self) -> [(&'static str, u8, bool); 5] {
        [
            ("TH", self.top_holder, self.top_holder <= 30),
            ("LQ", self.liquidity, self.liquidity > 15),
            ("HD", self.holder_distribution, self.holder_distribution > 40),
            ("BR", self.burn_rate, self.burn_rate > 40),
            ("WA", self.whale_activity, self.whale_activity <= 15),
        ]
    }

    pub fn label(&self) -> String {
        self.indicators()
            .iter()
            .map(|(name, value, healthy)| {
                format!("{}{}{}%", name, if *healthy { ' ' } else { '!' }, value)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Tabled)]
struct PanelRow {
    #[tabled(rename = "Token")]
    token: String,
    #[tabled(rename = "Age")]
    age: String,
    #[tabled(rename = "Holders")]
    holders: String,
    #[tabled(rename = "TX")]
    txns: String,
    #[tabled(rename = "MC")]
    market_cap: String,
    #[tabled(rename = "V")]
    volume: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Signals")]
    signals: String,
}

pub fn price_cell(token: &TokenPair, update: Option<&PriceUpdate>) -> String {
    match update {
        Some(u) => {
            let marker = match u.direction {
                PriceDirection::Up => '▲',
                PriceDirection::Down => '▼',
            };
            format!("{} {}", format_price(u.price), marker)
        }
        None => format_price(token.price),
    }
}

fn token_cell(token: &TokenPair) -> String {
    let mut cell = format!("{} {}", token.symbol, token.name);
    if token.is_verified() {
        cell.push_str(" ✓");
    }
    cell
}

fn panel_row<R: Rng + ?Sized>(
    token: &TokenPair,
    updates: &HashMap<String, PriceUpdate>,
    rng: &mut R,
) -> PanelRow {
    PanelRow {
        token: token_cell(token),
        age: token.age.clone(),
        holders: format_compact(token.holders),
        txns: format_compact(token.txns.total()),
        market_cap: format_number(token.market_cap),
        volume: format_number(token.volume_24h),
        price: price_cell(token, updates.get(&token.id)),
        signals: BadgeValues::draw(rng).label(),
    }
}

/// One status panel as a table.
pub fn render_panel<R: Rng + ?Sized>(
    tokens: &[TokenPair],
    updates: &HashMap<String, PriceUpdate>,
    rng: &mut R,
) -> String {
    let rows: Vec<PanelRow> = tokens.iter().map(|t| panel_row(t, updates, rng)).collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table.to_string()
}

/// Places already rendered panels side by side under their titles.
pub fn render_columns(titles: &[String], panels: &[String]) -> String {
    let mut builder = Builder::default();
    builder.push_record(titles.iter().cloned());
    builder.push_record(panels.iter().cloned());
    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenStatus;
    use crate::tests::common::{create_test_token, seeded_rng};

    #[test]
    fn test_badge_values_stay_in_range() {
        let mut rng = seeded_rng(21);
        for _ in 0..200 {
            let values = BadgeValues::draw(&mut rng);
            assert!(values.top_holder < 70);
            assert!(values.liquidity < 30);
            assert!(values.holder_distribution < 90);
            assert!(values.burn_rate < 90);
            assert!(values.whale_activity < 30);
        }
    }

    #[test]
    fn test_badge_values_follow_injected_rng() {
        assert_eq!(
            BadgeValues::draw(&mut seeded_rng(4)),
            BadgeValues::draw(&mut seeded_rng(4))
        );
    }

    #[test]
    fn test_unhealthy_indicators_are_flagged() {
        let values = BadgeValues {
            top_holder: 55,
            liquidity: 20,
            holder_distribution: 10,
            burn_rate: 60,
            whale_activity: 3,
        };
        assert_eq!(values.label(), "TH!55% LQ 20% HD!10% BR 60% WA 3%");
    }

    #[test]
    fn test_price_cell_uses_update() {
        let token = create_test_token("a", TokenStatus::New);
        assert_eq!(price_cell(&token, None), format_price(token.price));

        let up = PriceUpdate { direction: PriceDirection::Up, price: 2.5 };
        assert_eq!(price_cell(&token, Some(&up)), "$2.50 ▲");
        let down = PriceUpdate { direction: PriceDirection::Down, price: 0.5 };
        assert_eq!(price_cell(&token, Some(&down)), "$0.5000 ▼");
    }

    #[test]
    fn test_panel_lists_every_token() {
        let tokens = vec![
            create_test_token("a", TokenStatus::Migrated),
            create_test_token("b", TokenStatus::Migrated),
        ];
        let text = render_panel(&tokens, &HashMap::new(), &mut seeded_rng(2));
        assert!(text.contains("Token"));
        assert!(text.contains("MC"));
        assert_eq!(text.matches(&tokens[0].symbol).count(), 2);
    }
}
