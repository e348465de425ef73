use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    time::{self, MissedTickBehavior},
};

use crate::{
    core::configuration::ConfigMessage,
    ports::config_provider::ConfigProvider,
    utils::graceful_shutdown::ShutdownToken,
};

/// Re-runs a provider on a fixed interval.
///
/// Providers perform a single cycle per call; this is the caller that turns
/// them into a refreshing source. A failed cycle is logged and retried on the
/// next tick.
pub struct CycleScheduler {
    provider: Arc<dyn ConfigProvider>,
    interval: Duration,
}

/// Counters returned when the scheduler stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub succeeded: u64,
    pub failed: u64,
}

impl CycleScheduler {
    pub fn new(provider: Arc<dyn ConfigProvider>, interval: Duration) -> Self {
        Self { provider, interval }
    }

    /// Run a cycle immediately and then once per interval until shutdown or
    /// until the configuration channel closes.
    pub async fn run(
        &self,
        configuration_tx: mpsc::Sender<ConfigMessage>,
        mut shutdown: ShutdownToken,
    ) -> SchedulerStats {
        let mut stats = SchedulerStats::default();
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!("Provider scheduler started, interval {:?}", self.interval);
        loop {
            tokio::select! {
                biased;
                _ = shutdown.wait_for_shutdown() => {
                    tracing::info!("Provider scheduler stopping on shutdown");
                    break;
                }
                _ = ticker.tick() => {}
            }

            if configuration_tx.is_closed() {
                tracing::info!("Configuration channel closed, stopping provider scheduler");
                break;
            }

            match self.provider.provide(&configuration_tx).await {
                Ok(()) => stats.succeeded += 1,
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!(
                        "Provider cycle failed, retrying in {:?}: {}",
                        self.interval,
                        e
                    );
                }
            }
        }

        tracing::info!(
            succeeded = stats.succeeded,
            failed = stats.failed,
            "Provider scheduler stopped"
        );
        stats
    }
}
