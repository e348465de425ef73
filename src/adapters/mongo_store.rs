use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection,
    bson::{Document, doc},
    options::{ClientOptions, Credential, ServerAddress},
};
use serde::de::DeserializeOwned;

use crate::{
    config::models::CosmosDbConfig,
    core::documents::{BackendDocument, DocumentKind, FrontendDocument},
    ports::document_store::{DocumentStore, StoreError, StoreResult, StoreSession},
};

const APP_NAME: &str = "cosmosdb-provider";

/// Parameters for opening a session
#[derive(Clone)]
pub struct DialParams {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub collection_name: String,
    pub timeout: Duration,
}

impl DialParams {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl std::fmt::Debug for DialParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialParams")
            .field("address", &self.address())
            .field("username", &self.username)
            .field("database", &self.database)
            .field("collection_name", &self.collection_name)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl TryFrom<&CosmosDbConfig> for DialParams {
    type Error = humantime::DurationError;

    fn try_from(config: &CosmosDbConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            host: config.host.clone(),
            port: config.port,
            username: config.username.clone(),
            password: config.password.clone(),
            database: config.database.clone(),
            collection_name: config.collection_name.clone(),
            timeout: config.dial_timeout()?,
        })
    }
}

/// Filter selecting documents in which `kind`'s field exists.
pub fn exists_filter(kind: DocumentKind) -> Document {
    let mut filter = Document::new();
    filter.insert(kind.field(), doc! { "$exists": true });
    filter
}

/// Document store speaking the MongoDB wire protocol (Cosmos DB's Mongo API
/// included).
pub struct MongoDocumentStore {
    params: DialParams,
}

impl MongoDocumentStore {
    pub fn new(params: DialParams) -> Self {
        Self { params }
    }

    fn connection_error(&self, reason: impl std::fmt::Display) -> StoreError {
        StoreError::Connection {
            address: self.params.address(),
            reason: reason.to_string(),
        }
    }

    /// Driver options for a single-host deployment. The credential is
    /// authenticated against the target database.
    pub fn client_options(&self) -> StoreResult<ClientOptions> {
        let address = ServerAddress::parse(self.params.address())
            .map_err(|e| self.connection_error(e))?;

        let mut options = ClientOptions::default();
        options.hosts = vec![address];
        options.app_name = Some(APP_NAME.to_string());
        options.connect_timeout = Some(self.params.timeout);
        options.server_selection_timeout = Some(self.params.timeout);

        if !self.params.username.is_empty() {
            let mut credential = Credential::default();
            credential.username = Some(self.params.username.clone());
            credential.password = Some(self.params.password.clone());
            credential.source = Some(self.params.database.clone());
            options.credential = Some(credential);
        }

        Ok(options)
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn connect(&self) -> StoreResult<Box<dyn StoreSession>> {
        let client =
            Client::with_options(self.client_options()?).map_err(|e| self.connection_error(e))?;

        // The driver connects lazily; a ping forces dial and authentication.
        let database = client.database(&self.params.database);
        match tokio::time::timeout(self.params.timeout, database.run_command(doc! { "ping": 1 }))
            .await
        {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                client.shutdown().await;
                return Err(self.connection_error(e));
            }
            Err(_) => {
                client.shutdown().await;
                return Err(self.connection_error(format!(
                    "timed out after {:?}",
                    self.params.timeout
                )));
            }
        }

        tracing::debug!("Connected to {}", self.params.address());
        Ok(Box::new(MongoSession {
            client: Some(client),
            database: self.params.database.clone(),
            collection_name: self.params.collection_name.clone(),
        }))
    }

    fn address(&self) -> String {
        self.params.address()
    }
}

/// Session holding a connected client until [`StoreSession::close`].
/// Dropping it without closing still releases the client in the background.
pub struct MongoSession {
    client: Option<Client>,
    database: String,
    collection_name: String,
}

impl MongoSession {
    async fn find_all<T>(&self, kind: DocumentKind) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let query_error = |reason: String| StoreError::Query {
            collection: self.collection_name.clone(),
            kind,
            reason,
        };

        let client = self
            .client
            .as_ref()
            .ok_or_else(|| query_error("session already closed".to_string()))?;
        let collection: Collection<T> = client
            .database(&self.database)
            .collection(&self.collection_name);

        let cursor = collection
            .find(exists_filter(kind))
            .await
            .map_err(|e| query_error(e.to_string()))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| query_error(e.to_string()))
    }
}

#[async_trait]
impl StoreSession for MongoSession {
    async fn find_backends(&self) -> StoreResult<Vec<BackendDocument>> {
        self.find_all(DocumentKind::Backend).await
    }

    async fn find_frontends(&self) -> StoreResult<Vec<FrontendDocument>> {
        self.find_all(DocumentKind::Frontend).await
    }

    async fn close(&mut self) {
        if let Some(client) = self.client.take() {
            client.shutdown().await;
            tracing::debug!("Closed document store session");
        }
    }
}
