//! Connector plugins.
//!
//! A connector knows how to reach one flavour of Solr deployment and report
//! on it. Connectors are registered in a [`ConnectorRegistry`] at startup;
//! nothing is discovered at runtime.
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │        ConnectorRegistry         │
//! │  ┌────────────┐ ┌─────────────┐  │
//! │  │  pantheon  │ │   custom    │  │
//! │  │ (built-in) │ │  (Rust)     │  │
//! │  └────────────┘ └─────────────┘  │
//! └───────────────┬──────────────────┘
//!                 ▼
//!        diagnostics → server_info()
//! ```
//!
//! # Usage
//!
//! ```rust
//! use pantheon_search::traits::ConnectorRegistry;
//!
//! let mut connectors = ConnectorRegistry::new();
//! // connectors.register(Box::new(MyConnector::new()));
//! assert!(connectors.create_instance("pantheon").is_err());
//! ```

use anyhow::Result;
use std::path::PathBuf;

use crate::config::IndexEnv;
use crate::endpoint::{Endpoint, PANTHEON_ENDPOINT_KEY};
use crate::error::Error;
use crate::http::{build_client, HttpClientOptions};
use crate::solr::{ServerInfo, SolrClient};

/// Name the built-in hosted-core connector is registered under.
pub const PANTHEON_CONNECTOR: &str = "pantheon";

// ═══════════════════════════════════════════════════════════════════════
// Connector Trait
// ═══════════════════════════════════════════════════════════════════════

/// A Solr connector plugin.
///
/// # Example
///
/// ```rust
/// use anyhow::Result;
/// use pantheon_search::solr::ServerInfo;
/// use pantheon_search::traits::SolrConnector;
///
/// struct Static;
///
/// impl SolrConnector for Static {
///     fn name(&self) -> &str { "static" }
///     fn description(&self) -> &str { "Always reports the same version" }
///
///     fn server_info(&self) -> Result<ServerInfo> {
///         Ok(ServerInfo::from_json(serde_json::json!({
///             "lucene": { "solr-spec-version": "9.4.0" }
///         })))
///     }
/// }
/// ```
pub trait SolrConnector: Send + Sync {
    /// Registry key, e.g. `"pantheon"`.
    fn name(&self) -> &str;

    /// One-line description for listings.
    fn description(&self) -> &str;

    /// Ask the server what it is running.
    fn server_info(&self) -> Result<ServerInfo>;
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in connector
// ═══════════════════════════════════════════════════════════════════════

/// Connector for the hosted search core described by `PANTHEON_INDEX_*`.
///
/// The endpoint and HTTP client are built on each call, so a broken
/// environment shows up as a `server_info` error rather than at
/// registration.
pub struct PantheonConnector {
    env: IndexEnv,
    home: Option<PathBuf>,
    verbose: bool,
}

impl PantheonConnector {
    pub fn new(env: IndexEnv, home: Option<PathBuf>, verbose: bool) -> Self {
        Self { env, home, verbose }
    }

    fn client(&self) -> crate::error::Result<SolrClient> {
        let endpoint = Endpoint::pantheon(&self.env)?;
        let options = HttpClientOptions::discover(&endpoint, self.home.as_deref(), self.verbose);
        let mut client = SolrClient::new(build_client(&options)?);
        client.add_endpoint(endpoint);
        Ok(client)
    }
}

impl SolrConnector for PantheonConnector {
    fn name(&self) -> &str {
        PANTHEON_CONNECTOR
    }

    fn description(&self) -> &str {
        "Hosted Solr core configured through PANTHEON_INDEX_* variables"
    }

    fn server_info(&self) -> Result<ServerInfo> {
        Ok(self.client()?.server_info(PANTHEON_ENDPOINT_KEY)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

pub struct ConnectorRegistry {
    connectors: Vec<Box<dyn SolrConnector>>,
}

impl ConnectorRegistry {
    /// Create an empty connector registry.
    pub fn new() -> Self {
        Self {
            connectors: Vec::new(),
        }
    }

    /// Registry holding the built-in `pantheon` connector.
    pub fn with_builtins(env: IndexEnv, home: Option<PathBuf>, verbose: bool) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PantheonConnector::new(env, home, verbose)));
        registry
    }

    /// Register a connector. A later registration with the same name
    /// replaces the earlier one.
    pub fn register(&mut self, connector: Box<dyn SolrConnector>) {
        self.connectors.retain(|c| c.name() != connector.name());
        self.connectors.push(connector);
    }

    /// Names of all registered connectors.
    pub fn definitions(&self) -> Vec<&str> {
        self.connectors.iter().map(|c| c.name()).collect()
    }

    pub fn create_instance(&self, name: &str) -> crate::error::Result<&dyn SolrConnector> {
        self.connectors
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
            .ok_or_else(|| Error::UnknownPlugin(name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
