use async_trait::async_trait;
use log::{debug, info};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::FeedConfig;
use crate::error::{Error, Result};
use crate::models::{TokenPair, TokenStatus};

pub mod mock;
pub mod query;

pub use query::TokenQuery;

/// Source of token pairs for the dashboard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenFeed: Send + Sync {
    /// All pairs, or only those with `status` when given.
    async fn fetch_tokens(&self, status: Option<TokenStatus>) -> Result<Vec<TokenPair>>;

    async fn fetch_token_by_id(&self, id: &str) -> Result<Option<TokenPair>>;
}

/// Feed that fabricates a fresh token set on every call after a simulated delay.
#[derive(Debug, Clone)]
pub struct SimulatedTokenFeed {
    config: FeedConfig,
    cancel: CancellationToken,
}

impl SimulatedTokenFeed {
    pub fn new(config: FeedConfig) -> Self {
        Self::with_cancellation(config, CancellationToken::new())
    }

    /// Pending delays resolve to `Error::Cancelled` once `cancel` fires.
    pub fn with_cancellation(config: FeedConfig, cancel: CancellationToken) -> Self {
        Self { config, cancel }
    }

    async fn delay(&self, duration: Duration, what: &str) -> Result<()> {
        tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!("Simulated {} request cancelled", what);
                Err(Error::Cancelled(what.to_string()))
            }
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }

    fn batch_size(&self, status: TokenStatus) -> usize {
        match status {
            TokenStatus::New => self.config.new_pairs,
            TokenStatus::FinalStretch => self.config.final_stretch,
            TokenStatus::Migrated => self.config.migrated,
        }
    }

    fn generate(&self, status: Option<TokenStatus>) -> Vec<TokenPair> {
        let statuses: &[TokenStatus] = match &status {
            Some(s) => std::slice::from_ref(s),
            None => &TokenStatus::ALL,
        };
        let mut rng = rand::thread_rng();
        statuses
            .iter()
            .flat_map(|s| mock::generate_mock_tokens_with(&mut rng, self.batch_size(*s), *s))
            .collect()
    }
}

#[async_trait]
impl TokenFeed for SimulatedTokenFeed {
    async fn fetch_tokens(&self, status: Option<TokenStatus>) -> Result<Vec<TokenPair>> {
        self.delay(self.config.delay(), "fetch_tokens").await?;
        let tokens = self.generate(status);
        info!(
            "Generated {} mock tokens ({})",
            tokens.len(),
            status.map(|s| s.to_string()).unwrap_or_else(|| "all statuses".to_string())
        );
        Ok(tokens)
    }

    async fn fetch_token_by_id(&self, id: &str) -> Result<Option<TokenPair>> {
        self.delay(self.config.by_id_delay(), "fetch_token_by_id").await?;
        let tokens = self.fetch_tokens(None).await?;
        let found = tokens.into_iter().find(|t| t.id == id);
        if found.is_none() {
            debug!("Token {} not present in freshly generated set", id);
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::create_test_feed_config;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_fetch_tokens_waits_and_returns_all_batches() {
        let feed = SimulatedTokenFeed::new(FeedConfig::default());
        let start = Instant::now();

        let tokens = feed.fetch_tokens(None).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(100));
        assert_eq!(tokens.len(), 30);
        for status in TokenStatus::ALL {
            assert_eq!(tokens.iter().filter(|t| t.status == status).count(), 10);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_batches_are_concatenated_in_status_order() {
        let feed = SimulatedTokenFeed::new(create_test_feed_config(2, 3, 1));
        let tokens = feed.fetch_tokens(None).await.unwrap();

        let statuses: Vec<TokenStatus> = tokens.iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![
                TokenStatus::New,
                TokenStatus::New,
                TokenStatus::FinalStretch,
                TokenStatus::FinalStretch,
                TokenStatus::FinalStretch,
                TokenStatus::Migrated,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_filter_returns_single_batch() {
        let feed = SimulatedTokenFeed::new(create_test_feed_config(2, 3, 4));
        let tokens = feed.fetch_tokens(Some(TokenStatus::Migrated)).await.unwrap();
        assert_eq!(tokens.len(), 4);
        assert!(tokens.iter().all(|t| t.status == TokenStatus::Migrated));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_id_is_none() {
        let feed = SimulatedTokenFeed::new(FeedConfig::default());
        let start = Instant::now();

        let found = feed.fetch_token_by_id("does-not-exist").await.unwrap();

        assert!(found.is_none());
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_known_id_is_found() {
        let feed = SimulatedTokenFeed::new(FeedConfig::default());
        let first = feed.fetch_tokens(None).await.unwrap();
        let wanted = &first[12];

        let found = feed.fetch_token_by_id(&wanted.id).await.unwrap().unwrap();

        assert_eq!(found.id, wanted.id);
        assert_eq!(found.status, wanted.status);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_fetch_returns_error() {
        let cancel = CancellationToken::new();
        let feed = SimulatedTokenFeed::with_cancellation(FeedConfig::default(), cancel.clone());
        let handle = tokio::spawn(async move { feed.fetch_tokens(None).await });

        cancel.cancel();

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(Error::Cancelled(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_sized_batches() {
        let feed = SimulatedTokenFeed::new(create_test_feed_config(0, 0, 0));
        assert!(feed.fetch_tokens(None).await.unwrap().is_empty());
    }
}
