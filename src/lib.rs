//! cosmosdb-provider - reverse-proxy routing rules from a document store.
//!
//! This crate reads backend and frontend definitions stored as documents in a
//! MongoDB-compatible store (Azure Cosmos DB's Mongo API included), maps them
//! into a [`Configuration`] snapshot and publishes that snapshot on a channel
//! owned by the proxy's configuration aggregation.
//!
//! # Quick Example
//! ```no_run
//! use std::sync::Arc;
//!
//! use cosmosdb_provider::{
//!     ConfigProvider, CosmosDbProvider, DialParams, MongoDocumentStore, config,
//! };
//!
//! # #[tokio::main] async fn main() -> eyre::Result<()> {
//! let cfg = config::load_config("cosmosdb.toml").await?;
//! let params = DialParams::try_from(&cfg.provider)?;
//! let provider = CosmosDbProvider::new(Arc::new(MongoDocumentStore::new(params)));
//!
//! let (tx, mut rx) = tokio::sync::mpsc::channel(1);
//! provider.provide(&tx).await?;
//! let message = rx.recv().await.expect("snapshot published");
//! println!("{} backends", message.configuration.backends.len());
//! # Ok(()) }
//! ```
//!
//! # Architecture
//! **Ports** (traits) in [`ports`] are separated from **adapters** in
//! [`adapters`]; the fetch / map / publish logic lives in [`core`] and does not
//! know about the driver.
//!
//! A provider call runs exactly one cycle: connect, query backends, query
//! frontends, map, publish. There is no polling inside a provider;
//! [`utils::CycleScheduler`] re-invokes it on an interval when continuous
//! refresh is wanted.
//!
//! # Error Handling
//! Ports return `thiserror` enums ([`StoreError`], [`ProviderError`]);
//! configuration loading returns `eyre::Result` with `WrapErr` context.
pub mod adapters;
pub mod config;
pub mod core;
pub mod metrics;
pub mod ports;
pub mod tracing_setup;
pub mod utils;

pub use crate::{
    adapters::{DialParams, MongoDocumentStore},
    core::{ConfigMessage, Configuration, CosmosDbProvider, CycleState, PROVIDER_NAME},
    ports::{ConfigProvider, DocumentStore, ProviderError, StoreError, StoreSession},
    utils::{CycleScheduler, GracefulShutdown},
};
