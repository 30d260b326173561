use prometheus::{Counter, Encoder, Histogram, HistogramOpts, Registry, TextEncoder};

use crate::error::Result;

#[derive(Clone)]
pub struct FeedMetrics {
    registry: Registry,
    pub fetches: Counter,
    pub fetch_errors: Counter,
    pub cache_hits: Counter,
    pub price_ticks: Counter,
    pub fetch_latency: Histogram,
}

impl FeedMetrics {
    pub fn new(registry: Registry) -> Result<Self> {
        let metrics = Self {
            fetches: Counter::new("feed_fetches_total", "Total number of feed fetches")?,
            fetch_errors: Counter::new("feed_fetch_errors_total", "Total number of failed feed fetches")?,
            cache_hits: Counter::new("feed_cache_hits_total", "Queries answered from the cache")?,
            price_ticks: Counter::new("price_ticks_total", "Simulated price updates emitted")?,
            fetch_latency: Histogram::with_opts(
                HistogramOpts::new("feed_fetch_latency_seconds", "Feed fetch latency in seconds")
                    .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.0]),
            )?,
            registry,
        };

        metrics.registry.register(Box::new(metrics.fetches.clone()))?;
        metrics.registry.register(Box::new(metrics.fetch_errors.clone()))?;
        metrics.registry.register(Box::new(metrics.cache_hits.clone()))?;
        metrics.registry.register(Box::new(metrics.price_ticks.clone()))?;
        metrics.registry.register(Box::new(metrics.fetch_latency.clone()))?;
        Ok(metrics)
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl std::fmt::Debug for FeedMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedMetrics")
            .field("fetches", &self.fetches.get())
            .field("cache_hits", &self.cache_hits.get())
            .field("price_ticks", &self.price_ticks.get())
            .finish()
    }
}
