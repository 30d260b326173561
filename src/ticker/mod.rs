use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::TickerConfig;
use crate::metrics::FeedMetrics;
use crate::models::{PriceUpdate, TokenPair};

/// Latest simulated price per token id. Writes replace the previous entry.
#[derive(Debug, Clone, Default)]
pub struct PriceUpdates {
    inner: Arc<RwLock<HashMap<String, PriceUpdate>>>,
}

impl PriceUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, id: String, update: PriceUpdate) {
        self.inner.write().await.insert(id, update);
    }

    pub async fn get(&self, id: &str) -> Option<PriceUpdate> {
        self.inner.read().await.get(id).copied()
    }

    pub async fn display_price(&self, token: &TokenPair) -> f64 {
        self.get(&token.id).await.map(|u| u.price).unwrap_or(token.price)
    }

    /// Copy of the map for a single render pass.
    pub async fn snapshot(&self) -> HashMap<String, PriceUpdate> {
        self.inner.read().await.clone()
    }

    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// Moves `price` by a uniform random percentage in `[-max_move_pct, max_move_pct]`.
pub fn next_price<R: Rng + ?Sized>(rng: &mut R, price: f64, max_move_pct: f64) -> f64 {
    let pct = rng.gen_range(-max_move_pct..=max_move_pct);
    (price * (1.0 + pct / 100.0)).max(f64::MIN_POSITIVE)
}

/// Applies one tick to `tokens` and returns how many updates were written.
pub async fn apply_tick<R: Rng + ?Sized>(
    rng: &mut R,
    tokens: &[TokenPair],
    updates: &PriceUpdates,
    config: &TickerConfig,
) -> usize {
    let picked: Vec<&TokenPair> = tokens
        .choose_multiple(rng, config.tokens_per_tick.min(tokens.len()))
        .collect();
    let mut moves = Vec::with_capacity(picked.len());
    for token in picked {
        let current = updates.display_price(token).await;
        let price = next_price(rng, current, config.max_move_pct);
        moves.push((token.id.clone(), PriceUpdate::between(current, price)));
    }

    let written = moves.len();
    for (id, update) in moves {
        updates.set(id, update).await;
    }
    written
}

/// Background task emitting simulated price ticks until cancelled.
pub struct PriceTicker {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl PriceTicker {
    pub fn spawn(
        tokens: Vec<TokenPair>,
        updates: PriceUpdates,
        config: TickerConfig,
        cancel: CancellationToken,
        metrics: FeedMetrics,
    ) -> Self {
        let task_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            let mut ticks = interval(config.interval());
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(
                "Price ticker started for {} tokens every {:?}",
                tokens.len(),
                config.interval()
            );

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = ticks.tick() => {
                        let written = apply_tick(&mut rng, &tokens, &updates, &config).await;
                        metrics.price_ticks.inc_by(written as f64);
                        debug!("Price tick wrote {} updates", written);
                    }
                }
            }
            info!("Price ticker stopped");
        });

        Self { handle, cancel }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Cancels the task and waits for it to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            log::error!("Price ticker task failed: {}", e);
        }
    }
}
