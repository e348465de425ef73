use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    core::{configuration::ConfigMessage, provider::CycleState},
    ports::document_store::StoreError,
};

/// Error type for a provider cycle
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ProviderError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The receiving side of the configuration channel is gone
    #[error("Configuration channel closed before '{provider}' could publish")]
    ChannelClosed { provider: String },
}

impl ProviderError {
    /// The cycle state in which this error aborted the cycle.
    pub fn failed_state(&self) -> CycleState {
        match self {
            ProviderError::Store(StoreError::Connection { .. }) => CycleState::Connecting,
            ProviderError::Store(StoreError::Query { .. }) => CycleState::Fetching,
            ProviderError::ChannelClosed { .. } => CycleState::Publishing,
        }
    }
}

/// Result type alias for provider cycles
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Trait for configuration providers that publish a configuration snapshot
/// onto a channel shared with the aggregation side.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Run one cycle and publish its snapshot on `configuration_tx`.
    /// Nothing is published when the cycle fails.
    async fn provide(&self, configuration_tx: &mpsc::Sender<ConfigMessage>) -> ProviderResult<()>;
}
