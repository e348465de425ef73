pub mod config_provider;
pub mod document_store;

pub use config_provider::{ConfigProvider, ProviderError, ProviderResult};
pub use document_store::{DocumentStore, StoreError, StoreResult, StoreSession};
