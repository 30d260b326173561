use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::CacheConfig;

#[derive(Debug, Clone)]
pub struct Cache<T> {
    data: Arc<Mutex<HashMap<String, (T, Instant)>>>,
    stale_time: Duration,
    gc_time: Duration,
}

impl<T: Clone> Cache<T> {
    pub fn new(stale_time: Duration, gc_time: Duration) -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            stale_time,
            gc_time,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.stale_time(), config.gc_time())
    }

    /// Value younger than the stale time.
    pub async fn get_fresh(&self, key: &str) -> Option<T> {
        self.get_within(key, self.stale_time).await
    }

    /// Value younger than the gc time, fresh or not.
    pub async fn get_stale(&self, key: &str) -> Option<T> {
        self.get_within(key, self.gc_time).await
    }

    async fn get_within(&self, key: &str, max_age: Duration) -> Option<T> {
        let data = self.data.lock().await;
        if let Some((value, timestamp)) = data.get(key) {
            if timestamp.elapsed() < max_age {
                return Some(value.clone());
            }
        }
        None
    }

    pub async fn set(&self, key: String, value: T) {
        let mut data = self.data.lock().await;
        data.insert(key, (value, Instant::now()));
    }

    pub async fn invalidate(&self, key: &str) {
        self.data.lock().await.remove(key);
    }

    /// Drops entries past the gc time and returns how many were removed.
    pub async fn purge(&self) -> usize {
        let mut data = self.data.lock().await;
        let before = data.len();
        let gc_time = self.gc_time;
        data.retain(|_, (_, timestamp)| timestamp.elapsed() < gc_time);
        before - data.len()
    }

    pub async fn len(&self) -> usize {
        self.data.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.lock().await.is_empty()
    }
}
