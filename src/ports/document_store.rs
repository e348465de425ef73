use async_trait::async_trait;
use thiserror::Error;

use crate::core::documents::{BackendDocument, DocumentKind, FrontendDocument};

/// Error type for document store operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// Dial, authentication or timeout failure while opening a session
    #[error("Connection error for {address}: {reason}")]
    Connection {
        /// The `host:port` that was dialed
        address: String,
        reason: String,
    },

    /// A find against the collection failed or returned undecodable documents
    #[error("Query error on collection '{collection}' ({kind} documents): {reason}")]
    Query {
        collection: String,
        kind: DocumentKind,
        reason: String,
    },
}

/// Result type alias for document store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// DocumentStore defines the port for opening sessions against the store
/// holding routing documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Open a session
    ///
    /// # Returns
    /// A live session, or [`StoreError::Connection`] on dial, authentication or
    /// timeout failure
    async fn connect(&self) -> StoreResult<Box<dyn StoreSession>>;

    /// The `host:port` this store dials, used for diagnostics
    fn address(&self) -> String;
}

/// An open session against the configured collection
#[async_trait]
pub trait StoreSession: Send + Sync {
    /// All documents in which the backend field exists
    async fn find_backends(&self) -> StoreResult<Vec<BackendDocument>>;

    /// All documents in which the frontend field exists
    async fn find_frontends(&self) -> StoreResult<Vec<FrontendDocument>>;

    /// Release the session. Calling it more than once is a no-op.
    async fn close(&mut self);
}
