use log::{debug, warn};
use std::sync::Arc;
use tokio::time::Instant;

use crate::api::TokenFeed;
use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::metrics::FeedMetrics;
use crate::models::{FeedSnapshot, TokenPair, TokenStatus};
use crate::utils::Cache;

fn cache_key(status: Option<TokenStatus>) -> String {
    match status {
        Some(s) => format!("tokens:{}", s),
        None => "tokens:all".to_string(),
    }
}

/// Caching front for a [`TokenFeed`], answering from a fresh snapshot when one exists.
pub struct TokenQuery<F: TokenFeed> {
    feed: Arc<F>,
    cache: Cache<FeedSnapshot>,
    retry: u32,
    metrics: FeedMetrics,
}

impl<F: TokenFeed> TokenQuery<F> {
    pub fn new(feed: Arc<F>, config: &CacheConfig, metrics: FeedMetrics) -> Self {
        Self {
            feed,
            cache: Cache::from_config(config),
            retry: config.retry,
            metrics,
        }
    }

    /// Cached snapshot if still fresh, otherwise a new fetch.
    pub async fn tokens(&self, status: Option<TokenStatus>) -> Result<FeedSnapshot> {
        let key = cache_key(status);
        if let Some(snapshot) = self.cache.get_fresh(&key).await {
            debug!("Serving {} from cache", key);
            self.metrics.cache_hits.inc();
            return Ok(snapshot);
        }
        self.fetch_into_cache(status, key).await
    }

    /// Fetches regardless of freshness. On failure a snapshot still inside the gc
    /// window is returned instead of the error.
    pub async fn refetch(&self, status: Option<TokenStatus>) -> Result<FeedSnapshot> {
        let key = cache_key(status);
        match self.fetch_into_cache(status, key.clone()).await {
            Ok(snapshot) => Ok(snapshot),
            Err(Error::Cancelled(what)) => Err(Error::Cancelled(what)),
            Err(e) => match self.cache.get_stale(&key).await {
                Some(snapshot) => {
                    warn!("Refetch of {} failed ({}), keeping stale snapshot", key, e);
                    Ok(snapshot)
                }
                None => Err(e),
            },
        }
    }

    pub async fn token_by_id(&self, id: &str) -> Result<Option<TokenPair>> {
        self.metrics.fetches.inc();
        self.feed.fetch_token_by_id(id).await
    }

    pub async fn token_by_id_required(&self, id: &str) -> Result<TokenPair> {
        self.token_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("token {}", id)))
    }

    /// Drops snapshots past their gc time.
    pub async fn collect_garbage(&self) -> usize {
        self.cache.purge().await
    }

    pub async fn invalidate(&self, status: Option<TokenStatus>) {
        self.cache.invalidate(&cache_key(status)).await;
    }

    async fn fetch_into_cache(&self, status: Option<TokenStatus>, key: String) -> Result<FeedSnapshot> {
        let snapshot = FeedSnapshot::new(self.fetch_with_retry(status).await?);
        self.cache.set(key, snapshot.clone()).await;
        Ok(snapshot)
    }

    async fn fetch_with_retry(&self, status: Option<TokenStatus>) -> Result<Vec<TokenPair>> {
        let mut attempt = 0;
        loop {
            self.metrics.fetches.inc();
            let started = Instant::now();
            let result = self.feed.fetch_tokens(status).await;
            self.metrics.fetch_latency.observe(started.elapsed().as_secs_f64());

            match result {
                Ok(tokens) => return Ok(tokens),
                Err(e) => {
                    self.metrics.fetch_errors.inc();
                    if !e.is_transient() || attempt >= self.retry {
                        return Err(e);
                    }
                    attempt += 1;
                    warn!("Token fetch failed ({}), retry {}/{}", e, attempt, self.retry);
                }
            }
        }
    }
}
