//! HTTP client construction.
//!
//! The hosted search service authenticates clients with a certificate
//! dropped at `$HOME/certs/binding.pem`. When that file exists it is
//! presented during the TLS handshake; otherwise the client connects
//! without one. Server certificates are not verified unless the endpoint
//! asks for it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::endpoint::Endpoint;
use crate::error::{Error, Result};

/// Location of the client certificate relative to the home directory.
pub const CLIENT_CERT_RELATIVE: &str = "certs/binding.pem";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientOptions {
    pub verify_tls: bool,
    pub client_cert: Option<PathBuf>,
    pub verbose: bool,
    pub timeout: Duration,
}

impl Default for HttpClientOptions {
    fn default() -> Self {
        Self {
            verify_tls: false,
            client_cert: None,
            verbose: false,
            timeout: Duration::from_secs(5),
        }
    }
}

impl HttpClientOptions {
    /// Options for talking to `endpoint`, picking up the client certificate
    /// under `home` if one is present.
    pub fn discover(endpoint: &Endpoint, home: Option<&Path>, verbose: bool) -> Self {
        Self {
            verify_tls: endpoint.verify_tls,
            client_cert: home.and_then(client_cert_path),
            verbose,
            timeout: endpoint.timeout,
        }
    }
}

/// `<home>/certs/binding.pem` if it is a regular file.
pub fn client_cert_path(home: &Path) -> Option<PathBuf> {
    let candidate = home.join(CLIENT_CERT_RELATIVE);
    candidate.is_file().then_some(candidate)
}

pub fn build_client(options: &HttpClientOptions) -> Result<reqwest::blocking::Client> {
    let mut builder = reqwest::blocking::Client::builder()
        .danger_accept_invalid_certs(!options.verify_tls)
        .timeout(options.timeout)
        .connection_verbose(options.verbose);

    if let Some(cert) = &options.client_cert {
        builder = builder.identity(load_identity(cert)?);
    }

    builder
        .build()
        .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))
}

fn load_identity(path: &Path) -> Result<reqwest::Identity> {
    let pem = std::fs::read(path).map_err(|e| Error::Certificate {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    reqwest::Identity::from_pem(&pem).map_err(|e| Error::Certificate {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexEnv;
    use tempfile::TempDir;

    fn endpoint() -> Endpoint {
        Endpoint::pantheon(&IndexEnv {
            scheme: "https".into(),
            host: Some("localhost".into()),
            port: None,
            core: None,
            path: "/".into(),
        })
        .unwrap()
    }

    #[test]
    fn no_certificate_when_fixture_absent() {
        let home = TempDir::new().unwrap();
        let opts = HttpClientOptions::discover(&endpoint(), Some(home.path()), false);
        assert!(opts.client_cert.is_none());
        assert!(!opts.verify_tls);
        assert_eq!(opts.timeout, Duration::from_secs(5));
        assert!(build_client(&opts).is_ok());
    }

    #[test]
    fn certificate_picked_up_when_fixture_present() {
        let home = TempDir::new().unwrap();
        std::fs::create_dir_all(home.path().join("certs")).unwrap();
        let cert = home.path().join(CLIENT_CERT_RELATIVE);
        std::fs::write(&cert, "placeholder").unwrap();

        let opts = HttpClientOptions::discover(&endpoint(), Some(home.path()), true);
        assert_eq!(opts.client_cert.as_deref(), Some(cert.as_path()));
        assert!(opts.verbose);
    }

    #[test]
    fn client_built_with_certificate_identity() {
        let home = TempDir::new().unwrap();
        std::fs::create_dir_all(home.path().join("certs")).unwrap();
        std::fs::write(
            home.path().join(CLIENT_CERT_RELATIVE),
            include_bytes!("../tests/fixtures/binding.pem"),
        )
        .unwrap();

        let opts = HttpClientOptions::discover(&endpoint(), Some(home.path()), false);
        assert!(opts.client_cert.is_some());
        assert!(build_client(&opts).is_ok());
    }

    #[test]
    fn directory_at_cert_path_is_ignored() {
        let home = TempDir::new().unwrap();
        std::fs::create_dir_all(home.path().join(CLIENT_CERT_RELATIVE)).unwrap();
        assert!(client_cert_path(home.path()).is_none());
    }

    #[test]
    fn no_home_means_no_certificate() {
        let opts = HttpClientOptions::discover(&endpoint(), None, false);
        assert!(opts.client_cert.is_none());
    }

    #[test]
    fn invalid_certificate_is_config_error() {
        let home = TempDir::new().unwrap();
        std::fs::create_dir_all(home.path().join("certs")).unwrap();
        std::fs::write(home.path().join(CLIENT_CERT_RELATIVE), "not a pem").unwrap();

        let opts = HttpClientOptions::discover(&endpoint(), Some(home.path()), false);
        let err = build_client(&opts).unwrap_err();
        assert!(matches!(err, Error::Certificate { .. }));
        assert_eq!(err.exit_code(), 78);
    }
}
