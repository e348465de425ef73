//! Dynamic configuration types published by providers.
//!
//! A [`Configuration`] is the point-in-time snapshot of one provider cycle. The
//! structures are serde-friendly so they can be decoded straight from BSON
//! documents and re-encoded as JSON for the CLI. Field names accept both the
//! camelCase spelling and the all-lowercase spelling older writers produced.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::decode;

/// A single upstream server of a backend.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Server {
    pub url: String,
    #[serde(default, deserialize_with = "decode::integer")]
    pub weight: i32,
}

/// Active health check settings for a backend.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthCheck {
    pub scheme: Option<String>,
    pub path: String,
    #[serde(deserialize_with = "decode::optional_integer")]
    pub port: Option<i32>,
    pub interval: Option<String>,
    pub hostname: Option<String>,
    pub headers: HashMap<String, String>,
}

/// Sticky session settings.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Stickiness {
    #[serde(alias = "cookiename")]
    pub cookie_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadBalancer {
    /// Balancing method, e.g. `wrr` or `drr`.
    pub method: String,
    pub sticky: bool,
    pub stickiness: Option<Stickiness>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct MaxConn {
    #[serde(deserialize_with = "decode::integer")]
    pub amount: i64,
    #[serde(alias = "extractorfunc")]
    pub extractor_func: String,
}

/// A named set of upstream servers.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Backend {
    #[serde(deserialize_with = "decode::null_as_default")]
    pub servers: HashMap<String, Server>,
    #[serde(alias = "healthcheck", skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
    #[serde(alias = "loadbalancer", skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<LoadBalancer>,
    #[serde(alias = "maxconn", skip_serializing_if = "Option::is_none")]
    pub max_conn: Option<MaxConn>,
}

/// A routing rule, e.g. `Host:example.com`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Route {
    pub rule: String,
}

/// A named routing rule set directing traffic to a backend.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Frontend {
    #[serde(alias = "entrypoints", deserialize_with = "decode::null_as_default")]
    pub entry_points: Vec<String>,
    /// Name of the target backend. Not checked against the backend map.
    #[serde(deserialize_with = "decode::null_as_default")]
    pub backend: String,
    #[serde(deserialize_with = "decode::null_as_default")]
    pub routes: HashMap<String, Route>,
    #[serde(alias = "passhostheader")]
    pub pass_host_header: bool,
    #[serde(deserialize_with = "decode::integer")]
    pub priority: i32,
}

/// Snapshot produced by one provider cycle.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    pub backends: HashMap<String, Backend>,
    pub frontends: HashMap<String, Frontend>,
}

impl Configuration {
    /// Frontends whose backend reference has no entry in `backends`, as
    /// `(frontend, backend)` pairs sorted by frontend name.
    pub fn dangling_backend_refs(&self) -> Vec<(&str, &str)> {
        let mut dangling: Vec<(&str, &str)> = self
            .frontends
            .iter()
            .filter(|(_, frontend)| !self.backends.contains_key(&frontend.backend))
            .map(|(name, frontend)| (name.as_str(), frontend.backend.as_str()))
            .collect();
        dangling.sort_unstable();
        dangling
    }
}

/// Message handed to the aggregation side of the host process.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMessage {
    pub provider_name: String,
    pub configuration: Configuration,
}
