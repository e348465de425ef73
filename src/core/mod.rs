pub mod configuration;
pub mod decode;
pub mod documents;
pub mod mapper;
pub mod provider;
pub mod store_client;

pub use configuration::{ConfigMessage, Configuration};
pub use mapper::map_configuration;
pub use provider::{CosmosDbProvider, CycleState, PROVIDER_NAME};
