//! Metrics helpers for provider cycles.
//!
//! Thin wrappers over the `metrics` crate macros. No exporter is embedded; the
//! host process installs whatever recorder it uses and these calls become
//! no-ops without one.
//!
//! Provided metrics:
//! * `cosmosdb_provider_cycles_total` (counter, labels: `provider`, `outcome`)
//! * `cosmosdb_provider_cycle_duration_seconds` (histogram, label: `provider`)
//! * `cosmosdb_provider_documents_fetched` (gauge, labels: `provider`, `kind`)
//! * `cosmosdb_provider_snapshot_entries` (gauge, labels: `provider`, `kind`)
//!
//! [`CycleTimer`] records the cycle duration on `Drop`, so early returns are
//! measured too.
use std::time::Instant;

use metrics::{Unit, counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::Lazy;

pub const CYCLES_TOTAL: &str = "cosmosdb_provider_cycles_total";
pub const CYCLE_DURATION_SECONDS: &str = "cosmosdb_provider_cycle_duration_seconds";
pub const DOCUMENTS_FETCHED: &str = "cosmosdb_provider_documents_fetched";
pub const SNAPSHOT_ENTRIES: &str = "cosmosdb_provider_snapshot_entries";

static DESCRIPTIONS: Lazy<()> = Lazy::new(|| {
    describe_counter!(
        CYCLES_TOTAL,
        Unit::Count,
        "Provider cycles run, labelled by outcome (done / failed state)."
    );
    describe_histogram!(
        CYCLE_DURATION_SECONDS,
        Unit::Seconds,
        "Wall time of a provider cycle from connect to publish."
    );
    describe_gauge!(
        DOCUMENTS_FETCHED,
        "Documents returned by the last successful fetch, by kind."
    );
    describe_gauge!(
        SNAPSHOT_ENTRIES,
        "Entries in the last published snapshot, by kind."
    );
});

/// Register metric descriptions (idempotent).
pub fn init_metrics() -> eyre::Result<()> {
    Lazy::force(&DESCRIPTIONS);
    tracing::debug!("Provider metric descriptions registered");
    Ok(())
}

/// Count a finished cycle under `outcome`.
pub fn increment_cycle_total(provider: &str, outcome: &str) {
    counter!(
        CYCLES_TOTAL,
        "provider" => provider.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record how many documents of each kind the last fetch returned.
pub fn set_documents_fetched(provider: &str, backends: usize, frontends: usize) {
    gauge!(DOCUMENTS_FETCHED, "provider" => provider.to_string(), "kind" => "backend")
        .set(backends as f64);
    gauge!(DOCUMENTS_FETCHED, "provider" => provider.to_string(), "kind" => "frontend")
        .set(frontends as f64);
}

/// Record the size of the snapshot that was published.
pub fn set_snapshot_entries(provider: &str, backends: usize, frontends: usize) {
    gauge!(SNAPSHOT_ENTRIES, "provider" => provider.to_string(), "kind" => "backend")
        .set(backends as f64);
    gauge!(SNAPSHOT_ENTRIES, "provider" => provider.to_string(), "kind" => "frontend")
        .set(frontends as f64);
}

/// RAII helper measuring cycle duration.
pub struct CycleTimer {
    start: Instant,
    provider: String,
}

impl CycleTimer {
    pub fn new(provider: &str) -> Self {
        Self {
            start: Instant::now(),
            provider: provider.to_string(),
        }
    }
}

impl Drop for CycleTimer {
    fn drop(&mut self) {
        histogram!(CYCLE_DURATION_SECONDS, "provider" => self.provider.clone())
            .record(self.start.elapsed().as_secs_f64());
    }
}
