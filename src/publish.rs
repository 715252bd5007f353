//! Schema publishing.
//!
//! [`post_schema`] is the command entry point: it hands the server
//! identifier to a [`SchemaPublisher`] and turns whatever goes wrong into a
//! single error-level log line plus a typed [`Error`].
//!
//! [`ConfigSetPublisher`] is the built-in publisher. It zips the current
//! schema files and uploads them through Solr's Configsets API:
//!
//! ```text
//! POST {server_uri}admin/configs?action=UPLOAD&name=<configset>&overwrite=true&cleanup=true
//! Content-Type: application/octet-stream
//! <zip bytes>
//! ```

use anyhow::Result as AnyResult;
use std::path::PathBuf;

use crate::bundle::zip_bytes;
use crate::config::{Config, IndexEnv};
use crate::error::{Error, Result};
use crate::http::{build_client, HttpClientOptions};
use crate::logger::Logger;
use crate::schema_files::SchemaFileProvider;
use crate::solr::SolrClient;

/// Pushes the schema for a named server.
pub trait SchemaPublisher {
    fn publish_schema(&self, server_id: &str) -> AnyResult<()>;
}

/// Publish the schema for `server_id`.
///
/// The publisher is called exactly once. Any failure is logged once at
/// error level and returned; nothing panics past this point.
pub fn post_schema(
    publisher: &dyn SchemaPublisher,
    server_id: &str,
    logger: &dyn Logger,
) -> Result<()> {
    let outcome = if server_id.trim().is_empty() {
        Err(Error::Config("server identifier must not be empty".into()))
    } else {
        publisher
            .publish_schema(server_id)
            .map_err(|e| Error::from_delegate("publish schema", e))
    };

    match outcome {
        Ok(()) => {
            logger.notice(&format!("Schema posted to server '{}'", server_id));
            Ok(())
        }
        Err(e) => {
            logger.error(&format!(
                "Posting schema to '{}' failed ({}): {}",
                server_id,
                e.kind().as_str(),
                e
            ));
            Err(e)
        }
    }
}

pub struct ConfigSetPublisher {
    config: Config,
    env: IndexEnv,
    files: Box<dyn SchemaFileProvider>,
    home: Option<PathBuf>,
    verbose: bool,
}

impl ConfigSetPublisher {
    pub fn new(
        config: Config,
        env: IndexEnv,
        files: Box<dyn SchemaFileProvider>,
        home: Option<PathBuf>,
        verbose: bool,
    ) -> Self {
        Self {
            config,
            env,
            files,
            home,
            verbose,
        }
    }
}

impl SchemaPublisher for ConfigSetPublisher {
    fn publish_schema(&self, server_id: &str) -> AnyResult<()> {
        let server = self.config.server(server_id)?;
        let endpoint = server.endpoint(&self.env)?;
        let configset = server.configset_name(&endpoint)?;

        let files = self.files.schema_files()?;
        let archive = zip_bytes(&files)?;
        tracing::debug!(
            server = server_id,
            configset = %configset,
            files = files.len(),
            "publishing config-set"
        );

        let options = HttpClientOptions::discover(&endpoint, self.home.as_deref(), self.verbose);
        let key = endpoint.key.clone();
        let mut client = SolrClient::new(build_client(&options)?);
        client.add_endpoint(endpoint);
        client.upload_configset(&key, &configset, archive)?;
        Ok(())
    }
}
