use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::endpoint::Endpoint;
use crate::error::{Error, Result};

/// Server identifier used when none is given on the command line.
pub const DEFAULT_SERVER_ID: &str = "pantheon_solr8";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub schema: SchemaConfig,
    #[serde(default)]
    pub servers: BTreeMap<String, ServerConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchemaConfig {
    #[serde(default = "default_schema_dir")]
    pub dir: PathBuf,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            dir: default_schema_dir(),
        }
    }
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("./solr-conf")
}

/// One `[servers.<id>]` entry. Unset connection fields come from the
/// `PANTHEON_INDEX_*` environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub core: Option<String>,
    #[serde(default)]
    pub configset: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub verify_tls: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            scheme: None,
            host: None,
            port: None,
            path: None,
            core: None,
            configset: None,
            timeout_secs: default_timeout_secs(),
            verify_tls: false,
        }
    }
}

fn default_timeout_secs() -> u64 {
    5
}

impl ServerConfig {
    /// Resolve this entry into an endpoint, filling gaps from `env`.
    pub fn endpoint(&self, env: &IndexEnv) -> Result<Endpoint> {
        let mut merged = env.clone();
        if let Some(scheme) = &self.scheme {
            merged.scheme = scheme.clone();
        }
        if let Some(host) = &self.host {
            merged.host = Some(host.clone());
        }
        if let Some(port) = self.port {
            merged.port = Some(port.to_string());
        }
        if let Some(path) = &self.path {
            merged.path = path.clone();
        }
        if let Some(core) = &self.core {
            merged.core = Some(core.clone());
        }

        let mut endpoint = Endpoint::pantheon(&merged)?;
        endpoint.timeout = std::time::Duration::from_secs(self.timeout_secs);
        endpoint.verify_tls = self.verify_tls;
        Ok(endpoint)
    }

    /// Name of the config-set to upload to; falls back to the core name.
    pub fn configset_name(&self, endpoint: &Endpoint) -> Result<String> {
        self.configset
            .clone()
            .or_else(|| endpoint.core.clone())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                Error::Config(format!(
                    "no `configset` set and {} is empty",
                    ENV_CORE
                ))
            })
    }
}

impl Config {
    /// Config used when no file is present: one default server, taken
    /// entirely from the environment.
    pub fn minimal() -> Self {
        let mut servers = BTreeMap::new();
        servers.insert(DEFAULT_SERVER_ID.to_string(), ServerConfig::default());
        Self {
            schema: SchemaConfig::default(),
            servers,
        }
    }

    pub fn server(&self, server_id: &str) -> Result<&ServerConfig> {
        self.servers
            .get(server_id)
            .ok_or_else(|| Error::UnknownServer(server_id.to_string()))
    }
}

/// Load `path` if it exists, otherwise fall back to [`Config::minimal`].
pub fn load_or_minimal(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::minimal())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("failed to read config file {}: {}", path.display(), e))
    })?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;

    for (id, server) in &config.servers {
        if id.trim().is_empty() {
            return Err(Error::Config("server identifiers must not be empty".into()));
        }
        if server.timeout_secs == 0 {
            return Err(Error::Config(format!(
                "servers.{}.timeout_secs must be > 0",
                id
            )));
        }
        if let Some(scheme) = &server.scheme {
            validate_scheme(scheme)
                .map_err(|msg| Error::Config(format!("servers.{}.scheme: {}", id, msg)))?;
        }
    }

    Ok(config)
}

pub(crate) fn validate_scheme(scheme: &str) -> std::result::Result<(), String> {
    match scheme {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}', expected http or https", other)),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Environment
// ═══════════════════════════════════════════════════════════════════════

pub const ENV_SCHEME: &str = "PANTHEON_INDEX_SCHEME";
pub const ENV_HOST: &str = "PANTHEON_INDEX_HOST";
pub const ENV_PORT: &str = "PANTHEON_INDEX_PORT";
pub const ENV_CORE: &str = "PANTHEON_INDEX_CORE";
pub const ENV_PATH: &str = "PANTHEON_INDEX_PATH";

/// Snapshot of the `PANTHEON_INDEX_*` variables describing the target core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEnv {
    pub scheme: String,
    pub host: Option<String>,
    pub port: Option<String>,
    pub core: Option<String>,
    pub path: String,
}

impl IndexEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            scheme: get(ENV_SCHEME).unwrap_or_else(|| "https".to_string()),
            host: get(ENV_HOST),
            port: get(ENV_PORT),
            core: get(ENV_CORE),
            path: get(ENV_PATH).unwrap_or_else(|| "/".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> IndexEnv {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        IndexEnv::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn env_defaults_when_unset() {
        let env = env_of(&[]);
        assert_eq!(env.scheme, "https");
        assert_eq!(env.path, "/");
        assert!(env.host.is_none());
        assert!(env.port.is_none());
        assert!(env.core.is_none());
    }

    #[test]
    fn empty_env_values_count_as_unset() {
        let env = env_of(&[(ENV_HOST, ""), (ENV_SCHEME, "")]);
        assert!(env.host.is_none());
        assert_eq!(env.scheme, "https");
    }

    #[test]
    fn server_fields_override_env() {
        let env = env_of(&[
            (ENV_HOST, "env-host"),
            (ENV_PORT, "449"),
            (ENV_CORE, "env-core"),
        ]);
        let server = ServerConfig {
            host: Some("cfg-host".into()),
            port: Some(8983),
            timeout_secs: 9,
            ..ServerConfig::default()
        };
        let endpoint = server.endpoint(&env).unwrap();
        assert_eq!(endpoint.host, "cfg-host");
        assert_eq!(endpoint.port, Some(8983));
        assert_eq!(endpoint.core.as_deref(), Some("env-core"));
        assert_eq!(endpoint.timeout.as_secs(), 9);
        assert_eq!(server.configset_name(&endpoint).unwrap(), "env-core");
    }

    #[test]
    fn load_config_parses_servers() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("pantheon.toml");
        std::fs::write(
            &path,
            r#"
[schema]
dir = "/srv/solr-conf"

[servers.pantheon_solr8]
scheme = "http"
host = "localhost"
port = 8983
core = "drupal"
configset = "drupal_conf"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.schema.dir, PathBuf::from("/srv/solr-conf"));
        let server = config.server(DEFAULT_SERVER_ID).unwrap();
        assert_eq!(server.timeout_secs, 5);
        assert_eq!(server.configset.as_deref(), Some("drupal_conf"));
    }

    #[test]
    fn load_config_rejects_bad_scheme() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("pantheon.toml");
        std::fs::write(&path, "[servers.x]\nscheme = \"ftp\"\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn missing_file_falls_back_to_minimal() {
        let config = load_or_minimal(Path::new("/definitely/not/here.toml")).unwrap();
        assert!(config.server(DEFAULT_SERVER_ID).is_ok());
        assert!(matches!(
            config.server("other"),
            Err(Error::UnknownServer(_))
        ));
    }
}
