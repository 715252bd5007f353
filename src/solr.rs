//! Minimal blocking Solr client.
//!
//! Speaks only the three admin calls this tool needs: ping, system info,
//! and config-set upload. Endpoints are registered by key, the same way a
//! full client library keeps several cores side by side.

use std::collections::HashMap;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::endpoint::{Endpoint, HttpMethod};
use crate::error::{Error, Result};

/// Outcome of an `admin/ping` call.
#[derive(Debug, Clone, PartialEq)]
pub struct PingResult {
    pub http_status: u16,
    /// `responseHeader.status`; `0` means the engine reported no issue.
    pub status: Option<i64>,
    pub qtime: Option<i64>,
    /// Top-level `status` field, usually `"OK"`.
    pub ping_status: Option<String>,
}

impl PingResult {
    pub fn http_ok(&self) -> bool {
        self.http_status == 200
    }

    pub fn engine_ok(&self) -> bool {
        self.status == Some(0)
    }
}

/// Subset of `admin/info/system` we report on.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerInfo {
    pub solr_spec_version: Option<String>,
    pub lucene_spec_version: Option<String>,
    pub raw: Value,
}

impl ServerInfo {
    pub fn from_json(raw: Value) -> Self {
        let lucene = |field: &str| {
            raw.get("lucene")
                .and_then(|l| l.get(field))
                .and_then(|v| v.as_str())
                .map(String::from)
        };
        Self {
            solr_spec_version: lucene("solr-spec-version"),
            lucene_spec_version: lucene("lucene-spec-version"),
            raw,
        }
    }
}

pub struct SolrClient {
    http: Client,
    endpoints: HashMap<String, Endpoint>,
}

impl SolrClient {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            endpoints: HashMap::new(),
        }
    }

    pub fn add_endpoint(&mut self, endpoint: Endpoint) {
        self.endpoints.insert(endpoint.key.clone(), endpoint);
    }

    pub fn endpoint(&self, key: &str) -> Result<&Endpoint> {
        self.endpoints
            .get(key)
            .ok_or_else(|| Error::Config(format!("no endpoint registered under '{}'", key)))
    }

    pub fn ping(&self, key: &str) -> Result<PingResult> {
        let endpoint = self.endpoint(key)?;
        let url = format!("{}admin/ping?wt=json", endpoint.core_base_uri());
        let (http_status, body) = self.execute(endpoint, &url)?;

        let json = serde_json::from_str::<Value>(&body).ok();
        let header = json.as_ref().and_then(|j| j.get("responseHeader"));
        Ok(PingResult {
            http_status,
            status: header.and_then(|h| h.get("status")).and_then(|v| v.as_i64()),
            qtime: header.and_then(|h| h.get("QTime")).and_then(|v| v.as_i64()),
            ping_status: json
                .as_ref()
                .and_then(|j| j.get("status"))
                .and_then(|v| v.as_str())
                .map(String::from),
        })
    }

    pub fn server_info(&self, key: &str) -> Result<ServerInfo> {
        let endpoint = self.endpoint(key)?;
        let url = format!("{}admin/info/system?wt=json", endpoint.core_base_uri());
        let (status, body) = self.execute(endpoint, &url)?;
        if !(200..300).contains(&status) {
            return Err(protocol(&url, status, &body));
        }
        let json: Value = serde_json::from_str(&body).map_err(|e| Error::Protocol {
            url: url.clone(),
            detail: format!("invalid JSON: {}", e),
        })?;
        Ok(ServerInfo::from_json(json))
    }

    /// Upload a zipped config-set through the Configsets API.
    pub fn upload_configset(&self, key: &str, name: &str, archive: Vec<u8>) -> Result<()> {
        let endpoint = self.endpoint(key)?;
        let base = format!("{}admin/configs", endpoint.server_uri());
        let url = reqwest::Url::parse_with_params(
            &base,
            &[
                ("action", "UPLOAD"),
                ("name", name),
                ("overwrite", "true"),
                ("cleanup", "true"),
                ("wt", "json"),
            ],
        )
        .map_err(|e| Error::Config(format!("invalid server URI {}: {}", base, e)))?
        .to_string();
        tracing::debug!(url = %url, bytes = archive.len(), "uploading config-set");

        let response = self
            .http
            .post(&url)
            .timeout(endpoint.timeout)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(archive)
            .send()
            .map_err(|source| Error::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        if !(200..300).contains(&status) {
            return Err(protocol(&url, status, &body));
        }

        // Solr may answer 200 while reporting a failure in the header.
        if let Ok(json) = serde_json::from_str::<Value>(&body) {
            let engine_status = json
                .get("responseHeader")
                .and_then(|h| h.get("status"))
                .and_then(|v| v.as_i64())
                .unwrap_or(0);
            if engine_status != 0 {
                return Err(Error::Protocol {
                    url,
                    detail: format!("engine status {}", engine_status),
                });
            }
        }
        Ok(())
    }

    fn execute(&self, endpoint: &Endpoint, url: &str) -> Result<(u16, String)> {
        let request = self.request(endpoint, url);
        let response = request.send().map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })?;
        tracing::debug!(url = %url, status, "solr response");
        Ok((status, body))
    }

    fn request(&self, endpoint: &Endpoint, url: &str) -> RequestBuilder {
        let builder = match endpoint.http_method.resolve(url.len()) {
            HttpMethod::Post => {
                let (base, query) = url.split_once('?').unwrap_or((url, ""));
                self.http
                    .post(base)
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(query.to_string())
            }
            _ => self.http.get(url),
        };
        builder.timeout(endpoint.timeout)
    }
}

fn protocol(url: &str, status: u16, body: &str) -> Error {
    let snippet: String = body.chars().take(200).collect();
    Error::Protocol {
        url: url.to_string(),
        detail: format!("HTTP {}: {}", status, snippet.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexEnv;
    use crate::endpoint::PANTHEON_ENDPOINT_KEY;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(server: &Server, method: HttpMethod) -> SolrClient {
        let (host, port) = server
            .host_with_port()
            .rsplit_once(':')
            .map(|(h, p)| (h.to_string(), p.to_string()))
            .unwrap();
        let mut endpoint = Endpoint::pantheon(&IndexEnv {
            scheme: "http".into(),
            host: Some(host),
            port: Some(port),
            core: Some("drupal".into()),
            path: "/".into(),
        })
        .unwrap();
        endpoint.http_method = method;

        let mut client = SolrClient::new(Client::new());
        client.add_endpoint(endpoint);
        client
    }

    #[test]
    fn upload_encodes_reserved_characters_in_name() {
        let mut server = Server::new();
        let upload = server
            .mock("POST", "/admin/configs")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("action".into(), "UPLOAD".into()),
                Matcher::UrlEncoded("name".into(), "drupal#1 &x".into()),
                Matcher::UrlEncoded("overwrite".into(), "true".into()),
                Matcher::UrlEncoded("cleanup".into(), "true".into()),
                Matcher::UrlEncoded("wt".into(), "json".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"responseHeader":{"status":0}}"#)
            .create();

        let client = client_for(&server, HttpMethod::Auto);
        client
            .upload_configset(PANTHEON_ENDPOINT_KEY, "drupal#1 &x", b"PK".to_vec())
            .unwrap();
        upload.assert();
    }

    #[test]
    fn post_method_sends_query_as_form_body() {
        let mut server = Server::new();
        let ping = server
            .mock("POST", "/drupal/admin/ping")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body("wt=json")
            .with_status(200)
            .with_body(r#"{"responseHeader":{"status":0,"QTime":2},"status":"OK"}"#)
            .create();

        let client = client_for(&server, HttpMethod::Post);
        let result = client.ping(PANTHEON_ENDPOINT_KEY).unwrap();
        assert!(result.http_ok() && result.engine_ok());
        ping.assert();
    }

    #[test]
    fn auto_method_uses_get_for_admin_calls() {
        let mut server = Server::new();
        let ping = server
            .mock("GET", "/drupal/admin/ping")
            .match_query(Matcher::UrlEncoded("wt".into(), "json".into()))
            .with_status(500)
            .with_body(r#"{"responseHeader":{"status":0,"QTime":0}}"#)
            .create();

        let client = client_for(&server, HttpMethod::Auto);
        let result = client.ping(PANTHEON_ENDPOINT_KEY).unwrap();
        assert!(!result.http_ok());
        assert!(result.engine_ok());
        ping.assert();
    }

    #[test]
    fn server_info_reads_lucene_versions() {
        let info = ServerInfo::from_json(json!({
            "lucene": {
                "solr-spec-version": "8.11.2",
                "lucene-spec-version": "8.11.2"
            }
        }));
        assert_eq!(info.solr_spec_version.as_deref(), Some("8.11.2"));
        assert_eq!(info.lucene_spec_version.as_deref(), Some("8.11.2"));
    }

    #[test]
    fn server_info_tolerates_missing_fields() {
        let info = ServerInfo::from_json(json!({ "mode": "std" }));
        assert!(info.solr_spec_version.is_none());
    }

    #[test]
    fn ping_result_checks() {
        let ok = PingResult {
            http_status: 200,
            status: Some(0),
            qtime: Some(1),
            ping_status: Some("OK".into()),
        };
        assert!(ok.http_ok() && ok.engine_ok());

        let failing = PingResult {
            http_status: 500,
            status: None,
            ..ok
        };
        assert!(!failing.http_ok());
        assert!(!failing.engine_ok());
    }

    #[test]
    fn unknown_endpoint_key_is_config_error() {
        let client = SolrClient::new(Client::new());
        assert!(matches!(client.ping("nope"), Err(Error::Config(_))));
    }
}
