use std::{fmt, sync::Arc};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::{
    core::{configuration::ConfigMessage, mapper::map_configuration, store_client},
    metrics,
    ports::{
        config_provider::{ConfigProvider, ProviderError, ProviderResult},
        document_store::DocumentStore,
    },
};

/// Name under which this provider publishes its snapshots.
pub const PROVIDER_NAME: &str = "cosmosdb";

/// States of a single provider cycle.
///
/// `Done` and `Failed` are terminal; whether a new cycle starts is up to the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Connecting,
    Fetching,
    Mapping,
    Publishing,
    Done,
    Failed,
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleState::Idle => "idle",
            CycleState::Connecting => "connecting",
            CycleState::Fetching => "fetching",
            CycleState::Mapping => "mapping",
            CycleState::Publishing => "publishing",
            CycleState::Done => "done",
            CycleState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Provider reading backends and frontends from a document store.
///
/// Each call to [`ConfigProvider::provide`] runs exactly one
/// connect → fetch → map → publish cycle. There is no polling or retry here;
/// see [`crate::utils::CycleScheduler`] for repeated cycles.
pub struct CosmosDbProvider {
    store: Arc<dyn DocumentStore>,
}

impl CosmosDbProvider {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn run_cycle(&self, configuration_tx: &mpsc::Sender<ConfigMessage>) -> ProviderResult<()> {
        tracing::debug!(state = %CycleState::Connecting, "CosmosDB provider cycle started");
        let fetched = store_client::fetch_documents(self.store.as_ref()).await?;
        tracing::debug!(
            "Got {} backends, {} frontends",
            fetched.backends.len(),
            fetched.frontends.len()
        );
        metrics::set_documents_fetched(PROVIDER_NAME, fetched.backends.len(), fetched.frontends.len());

        tracing::debug!(state = %CycleState::Mapping, "Mapping documents");
        let configuration = map_configuration(fetched.backends, fetched.frontends);
        for (frontend, backend) in configuration.dangling_backend_refs() {
            tracing::debug!(frontend, backend, "Frontend references an unknown backend");
        }
        let (backends, frontends) = (configuration.backends.len(), configuration.frontends.len());

        tracing::debug!(state = %CycleState::Publishing, "Publishing configuration");
        configuration_tx
            .send(ConfigMessage {
                provider_name: PROVIDER_NAME.to_string(),
                configuration,
            })
            .await
            .map_err(|_| ProviderError::ChannelClosed {
                provider: PROVIDER_NAME.to_string(),
            })?;
        metrics::set_snapshot_entries(PROVIDER_NAME, backends, frontends);

        Ok(())
    }
}

#[async_trait]
impl ConfigProvider for CosmosDbProvider {
    async fn provide(&self, configuration_tx: &mpsc::Sender<ConfigMessage>) -> ProviderResult<()> {
        let span = tracing::info_span!(
            "provider_cycle",
            provider = PROVIDER_NAME,
            store.address = %self.store.address(),
        );
        let _timer = metrics::CycleTimer::new(PROVIDER_NAME);

        let result = self.run_cycle(configuration_tx).instrument(span).await;
        match &result {
            Ok(()) => {
                tracing::info!(provider = PROVIDER_NAME, state = %CycleState::Done, "Configuration published");
                metrics::increment_cycle_total(PROVIDER_NAME, "done");
            }
            Err(e) => {
                let failed_in = e.failed_state();
                tracing::error!(
                    provider = PROVIDER_NAME,
                    state = %CycleState::Failed,
                    failed_in = %failed_in,
                    "Provider cycle failed: {}",
                    e
                );
                metrics::increment_cycle_total(PROVIDER_NAME, &failed_in.to_string());
            }
        }
        result
    }
}
