//! Connection descriptor for a Solr core.
//!
//! An [`Endpoint`] carries everything [`SolrClient`](crate::solr::SolrClient)
//! needs to build request URIs for one core: scheme, host, port, base path,
//! and core name, plus the fixed protocol parameters used by the hosted
//! search service.

use std::time::Duration;

use crate::config::{validate_scheme, IndexEnv, ENV_HOST, ENV_PORT};
use crate::error::{Error, Result};

/// Key under which the hosted-core endpoint is registered.
pub const PANTHEON_ENDPOINT_KEY: &str = "pantheon";

/// URIs longer than this are sent as POST when the method is [`HttpMethod::Auto`].
const AUTO_POST_THRESHOLD: usize = 1960;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Auto,
    Get,
    Post,
}

impl HttpMethod {
    /// Pick the concrete method for a request URI of `uri_len` bytes.
    pub fn resolve(self, uri_len: usize) -> HttpMethod {
        match self {
            HttpMethod::Auto if uri_len > AUTO_POST_THRESHOLD => HttpMethod::Post,
            HttpMethod::Auto => HttpMethod::Get,
            other => other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Endpoint {
    pub key: String,
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
    pub core: Option<String>,
    pub collection: Option<String>,
    pub leader: bool,
    pub timeout: Duration,
    pub solr_version: String,
    pub http_method: HttpMethod,
    pub commit_within: Duration,
    pub jmx: bool,
    pub solr_install_dir: String,
    pub skip_schema_check: bool,
    pub verify_tls: bool,
}

impl Endpoint {
    /// The hosted-core endpoint described by the `PANTHEON_INDEX_*`
    /// environment, with the service's fixed protocol parameters.
    pub fn pantheon(env: &IndexEnv) -> Result<Self> {
        validate_scheme(&env.scheme).map_err(Error::Config)?;

        let host = env
            .host
            .clone()
            .ok_or_else(|| Error::Config(format!("{} is not set", ENV_HOST)))?;

        let port = match &env.port {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|_| {
                Error::Config(format!("{} is not a valid port: '{}'", ENV_PORT, raw))
            })?),
            None => None,
        };

        Ok(Self {
            key: PANTHEON_ENDPOINT_KEY.to_string(),
            scheme: env.scheme.clone(),
            host,
            port,
            path: env.path.clone(),
            core: env.core.clone(),
            collection: None,
            leader: false,
            timeout: Duration::from_secs(5),
            solr_version: "8".to_string(),
            http_method: HttpMethod::Auto,
            commit_within: Duration::from_millis(1000),
            jmx: false,
            solr_install_dir: String::new(),
            skip_schema_check: false,
            verify_tls: false,
        })
    }

    /// `scheme://host[:port]/path/`, always ending in a slash.
    pub fn server_uri(&self) -> String {
        let authority = match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        };
        let trimmed = self.path.trim_matches('/');
        if trimmed.is_empty() {
            format!("{}://{}/", self.scheme, authority)
        } else {
            format!("{}://{}/{}/", self.scheme, authority, trimmed)
        }
    }

    /// Server URI plus the core (or collection) segment, ending in a slash.
    pub fn core_base_uri(&self) -> String {
        let mut uri = self.server_uri();
        if let Some(core) = self
            .collection
            .as_deref()
            .or(self.core.as_deref())
            .filter(|c| !c.is_empty())
        {
            uri.push_str(core.trim_matches('/'));
            uri.push('/');
        }
        uri
    }
}
