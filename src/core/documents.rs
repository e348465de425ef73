use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

use crate::core::{
    configuration::{Backend, Frontend},
    decode,
};

/// Which of the two document families a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Backend,
    Frontend,
}

impl DocumentKind {
    /// Field whose presence selects documents of this kind.
    pub fn field(self) -> &'static str {
        match self {
            DocumentKind::Backend => "backend",
            DocumentKind::Frontend => "frontend",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field())
    }
}

/// Stored record describing one backend.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct BackendDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Bson>,
    #[serde(default, deserialize_with = "decode::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "decode::null_as_default")]
    pub backend: Backend,
}

/// Stored record describing one frontend.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct FrontendDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Bson>,
    #[serde(default, deserialize_with = "decode::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "decode::null_as_default")]
    pub frontend: Frontend,
}

/// Raw result of one fetch, in store iteration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedDocuments {
    pub backends: Vec<BackendDocument>,
    pub frontends: Vec<FrontendDocument>,
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{self, doc, oid::ObjectId};

    use super::*;

    #[test]
    fn test_backend_document_from_bson() {
        let oid = ObjectId::new();
        let raw = doc! {
            "_id": oid,
            "name": "whoami",
            "backend": {
                "servers": {
                    "whoami1": { "url": "http://10.0.0.2:80", "weight": 10 },
                },
                "healthcheck": { "path": "/health", "interval": "10s" },
                "loadbalancer": { "method": "drr" },
            },
        };

        let document: BackendDocument = bson::from_document(raw).unwrap();

        assert_eq!(document.id, Some(Bson::ObjectId(oid)));
        assert_eq!(document.name, "whoami");
        assert_eq!(
            document.backend.servers["whoami1"].url,
            "http://10.0.0.2:80"
        );
        assert_eq!(document.backend.servers["whoami1"].weight, 10);
        let health_check = document.backend.health_check.unwrap();
        assert_eq!(health_check.path, "/health");
        assert_eq!(health_check.interval.as_deref(), Some("10s"));
        assert_eq!(document.backend.load_balancer.unwrap().method, "drr");
    }

    #[test]
    fn test_frontend_document_from_bson() {
        let raw = doc! {
            "name": "whoami",
            "frontend": {
                "entryPoints": ["http", "https"],
                "backend": "whoami",
                "routes": { "hostRule": { "rule": "Host:test.traefik.io" } },
                "unknownField": true,
            },
        };

        let document: FrontendDocument = bson::from_document(raw).unwrap();

        assert!(document.id.is_none());
        assert_eq!(document.frontend.entry_points, vec!["http", "https"]);
        assert_eq!(document.frontend.backend, "whoami");
        assert_eq!(
            document.frontend.routes["hostRule"].rule,
            "Host:test.traefik.io"
        );
    }

    #[test]
    fn test_documents_accept_double_numbers() {
        let backend: BackendDocument = bson::from_document(doc! {
            "name": "whoami",
            "backend": {
                "servers": { "s1": { "url": "http://10.0.0.2:80", "weight": 1.0 } },
                "healthCheck": { "path": "/health", "port": 8080.0 },
                "maxConn": { "amount": 10.0, "extractorFunc": "client.ip" },
            },
        })
        .unwrap();
        let frontend: FrontendDocument = bson::from_document(doc! {
            "name": "whoami",
            "frontend": { "backend": "whoami", "priority": 10.0 },
        })
        .unwrap();

        assert_eq!(backend.backend.servers["s1"].weight, 1);
        assert_eq!(backend.backend.health_check.unwrap().port, Some(8080));
        assert_eq!(backend.backend.max_conn.unwrap().amount, 10);
        assert_eq!(frontend.frontend.priority, 10);
    }

    #[test]
    fn test_documents_accept_int64_numbers() {
        let frontend: FrontendDocument = bson::from_document(doc! {
            "name": "whoami",
            "frontend": { "priority": 5_i64 },
        })
        .unwrap();

        assert_eq!(frontend.frontend.priority, 5);
    }

    #[test]
    fn test_null_sub_documents_read_as_empty() {
        let backend: BackendDocument =
            bson::from_document(doc! { "name": "n", "backend": Bson::Null }).unwrap();
        let frontend: FrontendDocument = bson::from_document(doc! {
            "name": "n",
            "frontend": { "backend": Bson::Null, "routes": Bson::Null, "entryPoints": Bson::Null },
        })
        .unwrap();

        assert_eq!(backend.backend, Backend::default());
        assert_eq!(frontend.frontend, Frontend::default());
    }

    #[test]
    fn test_null_name_reads_as_empty() {
        let document: BackendDocument =
            bson::from_document(doc! { "name": Bson::Null, "backend": {} }).unwrap();

        assert!(document.name.is_empty());
    }

    #[test]
    fn test_document_kind_field() {
        assert_eq!(DocumentKind::Backend.field(), "backend");
        assert_eq!(DocumentKind::Frontend.to_string(), "frontend");
    }
}
