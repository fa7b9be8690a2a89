//! ExpirySweeper - Background removal of dead OTP challenges, tokens and
//! idle rate limit keys.
//!
//! Expired entries are already unusable; the sweeper only keeps the stores
//! from growing without bound.
//!
//! ## Graceful Shutdown
//!
//! The sweeper listens for a shutdown signal and runs one final sweep
//! before stopping.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::application::{PurgeExpiredHandler, PurgeExpiredResult};
use crate::domain::session::SessionError;

/// Periodically runs the purge handler.
pub struct ExpirySweeper {
    purge: PurgeExpiredHandler,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(purge: PurgeExpiredHandler, interval: Duration) -> Self {
        Self { purge, interval }
    }

    /// Runs until the shutdown channel flips to `true`.
    ///
    /// A failed sweep is logged and retried on the next tick.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.sweep_logged().await;
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.sweep_logged().await;
                }
            }
        }
    }

    /// Runs exactly one sweep.
    pub async fn sweep_once(&self) -> Result<PurgeExpiredResult, SessionError> {
        self.purge.handle().await
    }

    async fn sweep_logged(&self) {
        if let Err(e) = self.sweep_once().await {
            tracing::warn!(error = %e.message(), "expiry sweep failed");
        }
    }
}
