//! Shared helpers for standing up a mock Solr server.

#![allow(dead_code)]

use mockito::{Matcher, Mock, Server, ServerGuard};

pub const PING_OK: &str =
    r#"{"responseHeader":{"zkConnected":null,"status":0,"QTime":1},"status":"OK"}"#;
pub const SYSTEM_INFO: &str = r#"{"responseHeader":{"status":0,"QTime":3},"lucene":{"solr-spec-version":"8.11.2","lucene-spec-version":"8.11.2"}}"#;

/// Starts a mock server on localhost.
pub fn solr_server() -> ServerGuard {
    Server::new()
}

/// Port the mock server listens on.
pub fn port(server: &Server) -> u16 {
    server
        .host_with_port()
        .rsplit(':')
        .next()
        .and_then(|p| p.parse().ok())
        .expect("mock server address has a port")
}

/// `GET <path>?wt=json` answered with `status` and a JSON body.
pub fn admin_mock(server: &mut Server, path: &str, status: usize, body: &str) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::UrlEncoded("wt".into(), "json".into()))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}

/// Config-set upload of `name`, answered with `status` and a JSON body.
/// Only matches when the request body is a zip archive with `entries` files.
pub fn upload_mock(
    server: &mut Server,
    name: &str,
    entries: usize,
    status: usize,
    body: &str,
) -> Mock {
    server
        .mock("POST", "/admin/configs")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("action".into(), "UPLOAD".into()),
            Matcher::UrlEncoded("name".into(), name.into()),
            Matcher::UrlEncoded("overwrite".into(), "true".into()),
            Matcher::UrlEncoded("cleanup".into(), "true".into()),
            Matcher::UrlEncoded("wt".into(), "json".into()),
        ]))
        .match_header("content-type", "application/octet-stream")
        .match_request(move |request| {
            request
                .body()
                .ok()
                .and_then(|bytes| zip::ZipArchive::new(std::io::Cursor::new(bytes.clone())).ok())
                .is_some_and(|archive| archive.len() == entries)
        })
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}
