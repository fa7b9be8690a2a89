//! In-memory rate limiter.
//!
//! Sliding-window log: each key keeps the instants of the requests it was
//! allowed, and entries older than the window are dropped on access. Unlike
//! a fixed window this never admits a burst of twice the limit across a
//! window boundary. Keys whose log has emptied stay in the map until
//! `purge_idle` drops them. Not shared across processes.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

use super::config::{RateLimitConfig, WindowLimit};

#[derive(Debug, Clone)]
pub struct InMemoryRateLimiter {
    config: RateLimitConfig,
    /// Allowed request instants per key, oldest first.
    logs: Arc<RwLock<HashMap<RateLimitKey, VecDeque<Timestamp>>>>,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            logs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RateLimitConfig::default())
    }

    /// `check` evaluated at an explicit instant.
    pub async fn check_at(&self, key: &RateLimitKey, now: Timestamp) -> RateLimitResult {
        let WindowLimit { limit, window_secs } = self.config.limit_for(key.scope);
        let mut logs = self.logs.write().await;
        let log = logs.entry(key.clone()).or_default();
        prune(log, now, window_secs);

        if log.len() as u32 >= limit {
            let retry_after_secs = log
                .front()
                .map(|oldest| oldest.plus_secs(window_secs).secs_until(&now))
                .unwrap_or(window_secs)
                .max(1);
            return RateLimitResult::Denied(RateLimitDenied {
                limit,
                retry_after_secs,
                scope: key.scope,
            });
        }

        log.push_back(now);
        RateLimitResult::Allowed(status_of(log, limit, window_secs, now))
    }

    /// `status` evaluated at an explicit instant.
    pub async fn status_at(&self, key: &RateLimitKey, now: Timestamp) -> RateLimitStatus {
        let WindowLimit { limit, window_secs } = self.config.limit_for(key.scope);
        let logs = self.logs.read().await;
        let live: VecDeque<Timestamp> = logs
            .get(key)
            .map(|log| {
                log.iter()
                    .copied()
                    .filter(|t| t.plus_secs(window_secs).is_after(&now))
                    .collect()
            })
            .unwrap_or_default();
        status_of(&live, limit, window_secs, now)
    }

    /// `purge_idle` evaluated at an explicit instant.
    pub async fn purge_idle_at(&self, now: Timestamp) -> usize {
        let mut logs = self.logs.write().await;
        let before = logs.len();
        logs.retain(|key, log| {
            prune(log, now, self.config.limit_for(key.scope).window_secs);
            !log.is_empty()
        });
        before - logs.len()
    }

    /// Number of keys currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.logs.read().await.len()
    }
}

fn prune(log: &mut VecDeque<Timestamp>, now: Timestamp, window_secs: u64) {
    while log
        .front()
        .is_some_and(|t| !t.plus_secs(window_secs).is_after(&now))
    {
        log.pop_front();
    }
}

fn status_of(log: &VecDeque<Timestamp>, limit: u32, window_secs: u64, now: Timestamp) -> RateLimitStatus {
    let reset_at = log
        .front()
        .map(|oldest| oldest.plus_secs(window_secs))
        .unwrap_or(now);
    RateLimitStatus {
        limit,
        remaining: limit.saturating_sub(log.len() as u32),
        reset_at,
        window_secs,
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        Ok(self.check_at(&key, Timestamp::now()).await)
    }

    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError> {
        Ok(self.status_at(&key, Timestamp::now()).await)
    }

    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError> {
        self.logs.write().await.remove(&key);
        Ok(())
    }

    async fn purge_idle(&self) -> Result<usize, RateLimitError> {
        Ok(self.purge_idle_at(Timestamp::now()).await)
    }
}
