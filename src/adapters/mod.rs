pub mod mongo_store;

/// Re-export commonly used types from adapters
pub use mongo_store::{DialParams, MongoDocumentStore};
