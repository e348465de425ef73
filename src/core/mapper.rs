//! Mapping of raw store documents into a [`Configuration`] snapshot.
use std::collections::HashMap;

use crate::core::{
    configuration::Configuration,
    documents::{BackendDocument, FrontendDocument},
};

/// Build a snapshot from backend and frontend documents.
///
/// Documents are inserted by name in input order, so when two documents of the
/// same kind share a name the later one replaces the earlier one. Documents
/// with an empty name are skipped. Frontend backend references are passed
/// through unchecked.
pub fn map_configuration(
    backend_docs: Vec<BackendDocument>,
    frontend_docs: Vec<FrontendDocument>,
) -> Configuration {
    let mut backends = HashMap::with_capacity(backend_docs.len());
    for doc in backend_docs {
        if doc.name.is_empty() {
            tracing::warn!(id = ?doc.id, "Skipping backend document without a name");
            continue;
        }
        if backends.insert(doc.name.clone(), doc.backend).is_some() {
            tracing::warn!(name = %doc.name, "Duplicate backend name, last document wins");
        }
    }

    let mut frontends = HashMap::with_capacity(frontend_docs.len());
    for doc in frontend_docs {
        if doc.name.is_empty() {
            tracing::warn!(id = ?doc.id, "Skipping frontend document without a name");
            continue;
        }
        if frontends.insert(doc.name.clone(), doc.frontend).is_some() {
            tracing::warn!(name = %doc.name, "Duplicate frontend name, last document wins");
        }
    }

    Configuration {
        backends,
        frontends,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::core::configuration::{Backend, Frontend, HealthCheck, Route, Server};

    fn backend_doc(name: &str, url: &str) -> BackendDocument {
        BackendDocument {
            id: None,
            name: name.to_string(),
            backend: Backend {
                servers: HashMap::from([(
                    "server1".to_string(),
                    Server {
                        url: url.to_string(),
                        weight: 0,
                    },
                )]),
                ..Backend::default()
            },
        }
    }

    fn frontend_doc(name: &str, backend: &str) -> FrontendDocument {
        FrontendDocument {
            id: None,
            name: name.to_string(),
            frontend: Frontend {
                entry_points: vec!["http".to_string()],
                backend: backend.to_string(),
                ..Frontend::default()
            },
        }
    }

    #[test]
    fn test_map_whoami_scenario() {
        let backend_docs = vec![BackendDocument {
            id: None,
            name: "whoami".to_string(),
            backend: Backend {
                servers: HashMap::from([(
                    "whoami1".to_string(),
                    Server {
                        url: "http://10.0.0.2:80".to_string(),
                        weight: 0,
                    },
                )]),
                ..Backend::default()
            },
        }];
        let frontend_docs = vec![FrontendDocument {
            id: None,
            name: "whoami".to_string(),
            frontend: Frontend {
                entry_points: vec!["http".to_string()],
                backend: "whoami".to_string(),
                routes: HashMap::from([(
                    "hostRule".to_string(),
                    Route {
                        rule: "Host:test.traefik.io".to_string(),
                    },
                )]),
                ..Frontend::default()
            },
        }];

        let config = map_configuration(backend_docs, frontend_docs);

        assert_eq!(
            config.backends["whoami"].servers["whoami1"].url,
            "http://10.0.0.2:80"
        );
        assert_eq!(
            config.frontends["whoami"].routes["hostRule"].rule,
            "Host:test.traefik.io"
        );
        assert_eq!(config.frontends["whoami"].entry_points, vec!["http"]);
    }

    #[test]
    fn test_map_keeps_specs_intact() {
        let backend = Backend {
            health_check: Some(HealthCheck {
                path: "/build".to_string(),
                ..HealthCheck::default()
            }),
            servers: HashMap::from([(
                "server1".to_string(),
                Server {
                    url: "http://test.traefik.io".to_string(),
                    weight: 0,
                },
            )]),
            ..Backend::default()
        };
        let frontend = Frontend {
            entry_points: vec!["http".to_string()],
            backend: "test.traefik.io".to_string(),
            routes: HashMap::from([(
                "route1".to_string(),
                Route {
                    rule: "Host:test.traefik.io".to_string(),
                },
            )]),
            ..Frontend::default()
        };

        let config = map_configuration(
            vec![BackendDocument {
                id: None,
                name: "backend0".to_string(),
                backend: backend.clone(),
            }],
            vec![FrontendDocument {
                id: None,
                name: "frontend0".to_string(),
                frontend: frontend.clone(),
            }],
        );

        let expected = Configuration {
            backends: HashMap::from([("backend0".to_string(), backend)]),
            frontends: HashMap::from([("frontend0".to_string(), frontend)]),
        };
        assert_eq!(config, expected);
    }

    #[test]
    fn test_map_empty_inputs() {
        let config = map_configuration(Vec::new(), Vec::new());

        assert!(config.backends.is_empty());
        assert!(config.frontends.is_empty());
    }

    #[test]
    fn test_map_unique_names_key_sets_match() {
        let backend_names = ["a", "b", "c", "d"];
        let frontend_names = ["x", "y", "z"];

        let config = map_configuration(
            backend_names
                .iter()
                .map(|n| backend_doc(n, "http://10.0.0.1"))
                .collect(),
            frontend_names.iter().map(|n| frontend_doc(n, "a")).collect(),
        );

        assert_eq!(config.backends.len(), backend_names.len());
        assert_eq!(config.frontends.len(), frontend_names.len());
        let backend_keys: HashSet<&str> = config.backends.keys().map(String::as_str).collect();
        let frontend_keys: HashSet<&str> = config.frontends.keys().map(String::as_str).collect();
        assert_eq!(backend_keys, HashSet::from(backend_names));
        assert_eq!(frontend_keys, HashSet::from(frontend_names));
    }

    #[test]
    fn test_map_duplicate_names_last_wins() {
        let config = map_configuration(
            vec![
                backend_doc("api", "http://first"),
                backend_doc("other", "http://other"),
                backend_doc("api", "http://second"),
            ],
            vec![frontend_doc("web", "first"), frontend_doc("web", "second")],
        );

        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.backends["api"].servers["server1"].url, "http://second");
        assert_eq!(config.frontends.len(), 1);
        assert_eq!(config.frontends["web"].backend, "second");
    }

    #[test]
    fn test_map_skips_unnamed_documents() {
        let config = map_configuration(
            vec![backend_doc("", "http://nameless"), backend_doc("api", "http://api")],
            vec![frontend_doc("", "api")],
        );

        assert_eq!(config.backends.len(), 1);
        assert!(config.backends.contains_key("api"));
        assert!(config.frontends.is_empty());
    }

    #[test]
    fn test_map_passes_dangling_backend_reference_through() {
        let config = map_configuration(Vec::new(), vec![frontend_doc("web", "nowhere")]);

        assert_eq!(config.frontends["web"].backend, "nowhere");
        assert_eq!(config.dangling_backend_refs(), vec![("web", "nowhere")]);
    }
}
