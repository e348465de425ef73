use crate::{
    core::{documents::FetchedDocuments, provider::CycleState},
    ports::document_store::{DocumentStore, StoreResult, StoreSession},
};

/// Run the backend query and then the frontend query on an open session.
///
/// The queries are issued one after the other so that their log lines keep a
/// stable order. The first failure aborts the fetch and no partial lists are
/// returned.
pub async fn fetch(session: &dyn StoreSession) -> StoreResult<FetchedDocuments> {
    let backends = session.find_backends().await?;
    tracing::debug!("Retrieved {} backend docs", backends.len());

    let frontends = session.find_frontends().await?;
    tracing::debug!("Retrieved {} frontend docs", frontends.len());

    Ok(FetchedDocuments {
        backends,
        frontends,
    })
}

/// Open a session, fetch both document sets and release the session.
///
/// The session is closed before returning on every path, including query
/// failures.
pub async fn fetch_documents(store: &dyn DocumentStore) -> StoreResult<FetchedDocuments> {
    tracing::debug!("Connecting to {}", store.address());
    let mut session = store.connect().await?;
    tracing::debug!(state = %CycleState::Fetching, "Querying backends and frontends");

    let result = fetch(session.as_ref()).await;
    session.close().await;

    result
}
