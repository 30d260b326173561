use log::debug;
use rand::Rng;
use std::collections::HashMap;

use crate::models::{FeedSnapshot, PriceUpdate, TokenPair, TokenStatus};
use crate::pipeline::{categorize, Buckets, SortKey};

pub mod render;

pub use render::BadgeValues;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// All three buckets side by side.
    Columns,
    /// Only the active tab.
    Tab,
}

/// View state of the pulse dashboard.
#[derive(Debug, Clone)]
pub struct Dashboard {
    sort_key: SortKey,
    active_tab: TokenStatus,
    scroll: HashMap<TokenStatus, usize>,
    rows_per_panel: usize,
    snapshot: Option<FeedSnapshot>,
    buckets: Buckets,
}

impl Dashboard {
    pub fn new(sort_key: SortKey, rows_per_panel: usize) -> Self {
        Self {
            sort_key,
            active_tab: TokenStatus::New,
            scroll: HashMap::new(),
            rows_per_panel: rows_per_panel.max(1),
            snapshot: None,
            buckets: Buckets::default(),
        }
    }

    /// Replaces the token set wholesale.
    pub fn load(&mut self, snapshot: FeedSnapshot) {
        self.buckets = categorize(&snapshot.tokens, self.sort_key);
        self.snapshot = Some(snapshot);
        for status in TokenStatus::ALL {
            let max = self.max_offset(status);
            if let Some(offset) = self.scroll.get_mut(&status) {
                *offset = (*offset).min(max);
            }
        }
    }

    pub fn snapshot(&self) -> Option<&FeedSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        if key == self.sort_key {
            return;
        }
        debug!("Sort key changed {} -> {}", self.sort_key, key);
        self.sort_key = key;
        self.buckets.sort_by(key);
    }

    pub fn active_tab(&self) -> TokenStatus {
        self.active_tab
    }

    /// Switches tabs; the newly active tab starts scrolled to the top.
    pub fn set_active_tab(&mut self, tab: TokenStatus) {
        if tab != self.active_tab {
            debug!("Active tab changed {} -> {}", self.active_tab, tab);
        }
        self.active_tab = tab;
        self.scroll.insert(tab, 0);
    }

    pub fn scroll_offset(&self, status: TokenStatus) -> usize {
        self.scroll.get(&status).copied().unwrap_or(0)
    }

    fn max_offset(&self, status: TokenStatus) -> usize {
        self.buckets.get(status).len().saturating_sub(1)
    }

    /// Scrolls the active tab by `delta` rows, clamped to its bucket.
    pub fn scroll(&mut self, delta: isize) {
        let status = self.active_tab;
        let max = self.max_offset(status);
        let current = self.scroll_offset(status);
        let next = if delta.is_negative() {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as usize).min(max)
        };
        self.scroll.insert(status, next);
    }

    /// Rows of `status` currently in view.
    pub fn visible(&self, status: TokenStatus) -> &[TokenPair] {
        let bucket = self.buckets.get(status);
        let start = self.scroll_offset(status).min(bucket.len());
        let end = start.saturating_add(self.rows_per_panel).min(bucket.len());
        &bucket[start..end]
    }

    fn header(&self) -> String {
        let fetched = self
            .snapshot
            .as_ref()
            .map(|s| s.fetched_at.format("%H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "never".to_string());
        format!(
            "Pulse | sort: {} | pairs: {} | fetched: {}",
            self.sort_key,
            self.buckets.total(),
            fetched
        )
    }

    fn title(&self, status: TokenStatus) -> String {
        format!("{} ({})", status.title(), self.buckets.get(status).len())
    }

    pub fn render<R: Rng + ?Sized>(
        &self,
        layout: Layout,
        updates: &HashMap<String, PriceUpdate>,
        rng: &mut R,
    ) -> String {
        let body = match layout {
            Layout::Columns => {
                let titles: Vec<String> = TokenStatus::ALL.iter().map(|s| self.title(*s)).collect();
                let panels: Vec<String> = TokenStatus::ALL
                    .iter()
                    .map(|s| render::render_panel(self.visible(*s), updates, rng))
                    .collect();
                render::render_columns(&titles, &panels)
            }
            Layout::Tab => {
                let tabs: Vec<String> = TokenStatus::ALL
                    .iter()
                    .map(|s| {
                        if *s == self.active_tab {
                            format!("[{}]", s.title())
                        } else {
                            s.title().to_string()
                        }
                    })
                    .collect();
                format!(
                    "{}\n{}",
                    tabs.join("  "),
                    render::render_panel(self.visible(self.active_tab), updates, rng)
                )
            }
        };
        format!("{}\n{}", self.header(), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::generate_mock_tokens_with;
    use crate::models::PriceDirection;
    use crate::pipeline::parse_age;
    use crate::tests::common::seeded_rng;

    fn loaded_dashboard(rows: usize) -> Dashboard {
        let mut rng = seeded_rng(8);
        let mut tokens = Vec::new();
        for status in TokenStatus::ALL {
            tokens.extend(generate_mock_tokens_with(&mut rng, 6, status));
        }
        let mut dashboard = Dashboard::new(SortKey::MarketCap, rows);
        dashboard.load(FeedSnapshot::new(tokens));
        dashboard
    }

    #[test]
    fn test_load_partitions_and_sorts() {
        let dashboard = loaded_dashboard(10);
        assert_eq!(dashboard.buckets().total(), 18);
        let caps: Vec<f64> = dashboard.buckets().new_pairs.iter().map(|t| t.market_cap).collect();
        assert!(caps.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_sort_key_change_resorts() {
        let mut dashboard = loaded_dashboard(10);
        dashboard.set_sort_key(SortKey::Age);
        for status in TokenStatus::ALL {
            let ages: Vec<u64> = dashboard.buckets().get(status).iter().map(|t| parse_age(&t.age)).collect();
            assert!(ages.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_tab_change_resets_scroll() {
        let mut dashboard = loaded_dashboard(2);
        dashboard.set_active_tab(TokenStatus::Migrated);
        dashboard.scroll(3);
        assert_eq!(dashboard.scroll_offset(TokenStatus::Migrated), 3);

        dashboard.set_active_tab(TokenStatus::New);
        dashboard.set_active_tab(TokenStatus::Migrated);
        assert_eq!(dashboard.scroll_offset(TokenStatus::Migrated), 0);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut dashboard = loaded_dashboard(2);
        dashboard.scroll(-4);
        assert_eq!(dashboard.scroll_offset(TokenStatus::New), 0);
        dashboard.scroll(100);
        assert_eq!(dashboard.scroll_offset(TokenStatus::New), 5);
        assert_eq!(dashboard.visible(TokenStatus::New).len(), 1);
    }

    #[test]
    fn test_reload_with_fewer_tokens_clamps_scroll() {
        let mut dashboard = loaded_dashboard(2);
        dashboard.scroll(5);
        let mut rng = seeded_rng(9);
        dashboard.load(FeedSnapshot::new(generate_mock_tokens_with(&mut rng, 2, TokenStatus::New)));
        assert_eq!(dashboard.scroll_offset(TokenStatus::New), 1);
    }

    #[test]
    fn test_unbounded_rows_show_rest_of_bucket() {
        let mut rng = seeded_rng(12);
        let mut dashboard = Dashboard::new(SortKey::MarketCap, usize::MAX);
        dashboard.load(FeedSnapshot::new(generate_mock_tokens_with(&mut rng, 3, TokenStatus::New)));
        dashboard.scroll(1);

        let visible = dashboard.visible(TokenStatus::New);
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].id, dashboard.buckets().new_pairs[1].id);
    }

    #[test]
    fn test_visible_window() {
        let mut dashboard = loaded_dashboard(4);
        assert_eq!(dashboard.visible(TokenStatus::FinalStretch).len(), 4);
        dashboard.set_active_tab(TokenStatus::FinalStretch);
        dashboard.scroll(1);
        assert_eq!(
            dashboard.visible(TokenStatus::FinalStretch)[0].id,
            dashboard.buckets().final_stretch[1].id
        );
    }

    #[test]
    fn test_render_columns_shows_all_titles() {
        let dashboard = loaded_dashboard(3);
        let text = dashboard.render(Layout::Columns, &HashMap::new(), &mut seeded_rng(1));
        assert!(text.contains("New Pairs (6)"));
        assert!(text.contains("Final Stretch (6)"));
        assert!(text.contains("Migrated (6)"));
        assert!(text.contains("sort: mc"));
    }

    #[test]
    fn test_render_tab_marks_active_and_flashes_updates() {
        let mut dashboard = loaded_dashboard(3);
        dashboard.set_active_tab(TokenStatus::FinalStretch);
        let top = dashboard.visible(TokenStatus::FinalStretch)[0].clone();
        let mut updates = HashMap::new();
        updates.insert(top.id.clone(), PriceUpdate { direction: PriceDirection::Down, price: 3.0 });

        let text = dashboard.render(Layout::Tab, &updates, &mut seeded_rng(1));

        assert!(text.contains("[Final Stretch]"));
        assert!(text.contains("$3.00 ▼"));
        assert_eq!(dashboard.buckets().final_stretch[0], top);
    }

    #[test]
    fn test_empty_dashboard_renders() {
        let dashboard = Dashboard::new(SortKey::Volume, 5);
        let text = dashboard.render(Layout::Columns, &HashMap::new(), &mut seeded_rng(1));
        assert!(text.contains("fetched: never"));
    }
}
