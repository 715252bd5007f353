use std::path::PathBuf;

use crate::config::IndexEnv;
use crate::endpoint::{Endpoint, PANTHEON_ENDPOINT_KEY};
use crate::error::Result;
use crate::http::{build_client, HttpClientOptions};
use crate::solr::{PingResult, SolrClient};

/// Something that can run a single health check against the core.
pub trait Prober {
    fn ping(&self) -> Result<PingResult>;
}

/// Pings the hosted core from the environment, presenting the client
/// certificate under `home` when there is one.
pub struct SolrProber {
    env: IndexEnv,
    home: Option<PathBuf>,
    verbose: bool,
}

impl SolrProber {
    pub fn new(env: IndexEnv, home: Option<PathBuf>, verbose: bool) -> Self {
        Self { env, home, verbose }
    }
}

impl Prober for SolrProber {
    fn ping(&self) -> Result<PingResult> {
        let endpoint = Endpoint::pantheon(&self.env)?;
        let options = HttpClientOptions::discover(&endpoint, self.home.as_deref(), self.verbose);
        if let Some(cert) = &options.client_cert {
            tracing::debug!(cert = %cert.display(), "using client certificate");
        }

        let mut client = SolrClient::new(build_client(&options)?);
        client.add_endpoint(endpoint);
        client.ping(PANTHEON_ENDPOINT_KEY)
    }
}
