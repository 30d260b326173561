use log::{debug, info};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::api::{SimulatedTokenFeed, TokenFeed, TokenQuery};
use crate::config::Config;
use crate::dashboard::{Dashboard, Layout};
use crate::error::{Error, Result};
use crate::metrics::FeedMetrics;
use crate::models::TokenPair;
use crate::pipeline::SortKey;
use crate::ticker::{PriceTicker, PriceUpdates};

/// Composition root wiring the feed, query cache, price ticker and dashboard.
pub struct PulseApp<F: TokenFeed> {
    config: Arc<Config>,
    query: TokenQuery<F>,
    updates: PriceUpdates,
    dashboard: Dashboard,
    metrics: FeedMetrics,
    shutdown: CancellationToken,
    ticker: Option<PriceTicker>,
}

impl PulseApp<SimulatedTokenFeed> {
    /// App backed by the simulated feed. Cancelling `shutdown` aborts pending fetches.
    pub fn simulated(config: Arc<Config>, metrics: FeedMetrics, shutdown: CancellationToken) -> Self {
        let feed = SimulatedTokenFeed::with_cancellation(config.feed.clone(), shutdown.clone());
        Self::new(Arc::new(feed), config, metrics, shutdown)
    }
}

impl<F: TokenFeed> PulseApp<F> {
    pub fn new(feed: Arc<F>, config: Arc<Config>, metrics: FeedMetrics, shutdown: CancellationToken) -> Self {
        let dashboard = Dashboard::new(config.dashboard.default_sort, config.dashboard.rows_per_panel);
        Self {
            query: TokenQuery::new(feed, &config.cache, metrics.clone()),
            updates: PriceUpdates::new(),
            dashboard,
            metrics,
            shutdown,
            ticker: None,
            config,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    pub fn price_updates(&self) -> &PriceUpdates {
        &self.updates
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.dashboard.set_sort_key(key);
    }

    /// Loads tokens into the dashboard. A new token set restarts the price ticker
    /// and drops updates that belonged to the previous set.
    pub async fn refresh(&mut self) -> Result<()> {
        let snapshot = self.query.tokens(None).await?;
        let changed = self
            .dashboard
            .snapshot()
            .map(|current| current.fetched_at != snapshot.fetched_at)
            .unwrap_or(true);
        if changed {
            info!("Loaded {} tokens fetched at {}", snapshot.tokens.len(), snapshot.fetched_at);
            let tokens = snapshot.tokens.clone();
            self.dashboard.load(snapshot);
            self.restart_ticker(tokens).await;
        }
        Ok(())
    }

    /// Like [`refresh`](Self::refresh), but a cancelled fetch during shutdown is
    /// `Ok(false)` rather than an error.
    pub async fn refresh_unless_shutdown(&mut self) -> Result<bool> {
        match self.refresh().await {
            Ok(()) => Ok(true),
            Err(Error::Cancelled(what)) if self.shutdown.is_cancelled() => {
                debug!("Refresh abandoned during shutdown ({})", what);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn restart_ticker(&mut self, tokens: Vec<TokenPair>) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop().await;
        }
        self.updates.clear().await;
        self.ticker = Some(PriceTicker::spawn(
            tokens,
            self.updates.clone(),
            self.config.ticker.clone(),
            self.shutdown.child_token(),
            self.metrics.clone(),
        ));
    }

    pub async fn render_frame(&self, layout: Layout) -> String {
        let updates = self.updates.snapshot().await;
        self.dashboard.render(layout, &updates, &mut rand::thread_rng())
    }

    pub async fn lookup(&self, id: &str) -> Result<TokenPair> {
        self.query.token_by_id_required(id).await
    }

    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(ticker) = self.ticker.take() {
            ticker.stop().await;
        }
        let purged = self.query.collect_garbage().await;
        info!("Pulse app shut down ({} cached snapshots expired)", purged);
    }
}
