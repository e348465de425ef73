// Round trip against a live MongoDB / Cosmos DB Mongo API endpoint.
//
// Run with:
//   COSMOSDB_TEST_HOST=127.0.0.1 COSMOSDB_TEST_PORT=27017 cargo test -- --ignored
#[cfg(test)]
mod test {
    use std::{sync::Arc, time::Duration};

    use cosmosdb_provider::{ConfigProvider, CosmosDbProvider, DialParams, MongoDocumentStore};
    use mongodb::{
        Client,
        bson::{Document, doc, oid::ObjectId},
    };
    use tokio::sync::mpsc;

    fn dial_params(collection_name: &str) -> DialParams {
        DialParams {
            host: std::env::var("COSMOSDB_TEST_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("COSMOSDB_TEST_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(27017),
            username: std::env::var("COSMOSDB_TEST_USERNAME").unwrap_or_default(),
            password: std::env::var("COSMOSDB_TEST_PASSWORD").unwrap_or_default(),
            database: "test".to_string(),
            collection_name: collection_name.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB endpoint"]
    async fn test_fetch_whoami_from_live_store() {
        let collection_name = format!("traefik_{}", ObjectId::new().to_hex());
        let params = dial_params(&collection_name);
        let store = MongoDocumentStore::new(params.clone());

        let client = Client::with_options(store.client_options().unwrap()).unwrap();
        let collection = client
            .database(&params.database)
            .collection::<Document>(&collection_name);
        collection
            .insert_many(vec![
                doc! {
                    "name": "whoami",
                    "backend": {
                        "servers": {
                            "whoami1": { "url": "http://10.0.0.2:80" },
                            "whoami2": { "url": "http://10.0.0.3:80" },
                            "whoami3": { "url": "http://10.0.0.4:80" },
                        },
                    },
                },
                doc! {
                    "name": "whoami",
                    "frontend": {
                        "entryPoints": ["http"],
                        "backend": "whoami",
                        "routes": { "hostRule": { "rule": "Host:test.traefik.io" } },
                    },
                },
            ])
            .await
            .unwrap();

        let provider = CosmosDbProvider::new(Arc::new(store));
        let (tx, mut rx) = mpsc::channel(1);
        let result = provider.provide(&tx).await;

        collection.drop().await.unwrap();
        client.shutdown().await;

        result.unwrap();
        let message = rx.recv().await.unwrap();
        assert_eq!(message.configuration.backends["whoami"].servers.len(), 3);
        assert_eq!(
            message.configuration.frontends["whoami"].routes["hostRule"].rule,
            "Host:test.traefik.io"
        );
    }
}
