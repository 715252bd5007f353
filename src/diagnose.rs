//! Connection diagnostics.
//!
//! [`Diagnostics::run`] is a straight line of independent checks, each
//! reported on its own log line with a ✅ or ❌:
//!
//! 1. Echo the `PANTHEON_INDEX_*` environment.
//! 2. Ping the core and inspect the HTTP and engine status.
//! 3. Look up the `pantheon` connector plugin and ask it for server info.
//!
//! A failing check never stops the ones after it. The collected
//! [`DiagnosticReport`] decides the exit code.

use crate::config::IndexEnv;
use crate::error::{Error, Result};
use crate::logger::Logger;
use crate::probe::Prober;
use crate::traits::{ConnectorRegistry, PANTHEON_CONNECTOR};

const PASS: &str = "✅";
const FAIL: &str = "❌";
const NOT_SET: &str = "(not set)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub label: String,
    pub passed: bool,
}

#[derive(Debug, Default)]
pub struct DiagnosticReport {
    pub checks: Vec<Check>,
    pub errors: Vec<Error>,
    pub solr_version: Option<String>,
}

impl DiagnosticReport {
    pub fn check(&self, label: &str) -> Option<bool> {
        self.checks
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.passed)
    }

    pub fn all_passed(&self) -> bool {
        self.errors.is_empty() && self.checks.iter().all(|c| c.passed)
    }

    /// `Ok` if everything passed, otherwise the first recorded error, or a
    /// protocol error naming the first failed check.
    pub fn outcome(self) -> Result<()> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }
        match self.checks.into_iter().find(|c| !c.passed) {
            Some(failed) => Err(Error::Protocol {
                url: "diagnostics".into(),
                detail: format!("check failed: {}", failed.label),
            }),
            None => Ok(()),
        }
    }
}

pub const CHECK_PING: &str = "Ping Received Response?";
pub const CHECK_HTTP_200: &str = "Response http status == 200?";
pub const CHECK_ENGINE_STATUS: &str = "Response status == 0 (no issue)?";
pub const CHECK_PLUGIN_EXISTS: &str = "Pantheon Connector Plugin Exists?";
pub const CHECK_PLUGIN_INSTANCE: &str = "Connector Plugin Instance created";

pub struct Diagnostics<'a> {
    env: &'a IndexEnv,
    prober: &'a dyn Prober,
    connectors: &'a ConnectorRegistry,
    logger: &'a dyn Logger,
}

impl<'a> Diagnostics<'a> {
    pub fn new(
        env: &'a IndexEnv,
        prober: &'a dyn Prober,
        connectors: &'a ConnectorRegistry,
        logger: &'a dyn Logger,
    ) -> Self {
        Self {
            env,
            prober,
            connectors,
            logger,
        }
    }

    pub fn run(&self) -> DiagnosticReport {
        let mut report = DiagnosticReport::default();

        self.report_env();
        self.check_ping(&mut report);
        self.check_connector(&mut report);

        self.logger
            .notice("If there's an issue with the connection, it would have shown up here.");
        report
    }

    fn report_env(&self) {
        let shown = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_SET.to_string());
        let log = self.logger;
        log.notice(&format!("Index SCHEME Value: {}", self.env.scheme));
        log.notice(&format!("Index HOST Value:   {}", shown(&self.env.host)));
        log.notice(&format!("Index PORT Value:   {}", shown(&self.env.port)));
        log.notice(&format!("Index CORE Value:   {}", shown(&self.env.core)));
        log.notice(&format!("Index PATH Value:   {}", self.env.path));
    }

    fn check_ping(&self, report: &mut DiagnosticReport) {
        self.logger.notice("Testing bare Connection...");
        match self.prober.ping() {
            Ok(ping) => {
                self.record(report, CHECK_PING, true);
                self.record(report, CHECK_HTTP_200, ping.http_ok());
                self.record(report, CHECK_ENGINE_STATUS, ping.engine_ok());
                if let Some(qtime) = ping.qtime {
                    self.logger.debug(&format!("Ping QTime: {}ms", qtime));
                }
            }
            Err(e) => {
                self.logger
                    .error(&format!("Ping failed ({}): {}", e.kind().as_str(), e));
                self.record(report, CHECK_PING, false);
                self.record(report, CHECK_HTTP_200, false);
                self.record(report, CHECK_ENGINE_STATUS, false);
                report.errors.push(e);
            }
        }
    }

    fn check_connector(&self, report: &mut DiagnosticReport) {
        self.logger.notice("Solr connector plugins...");
        let exists = self.connectors.definitions().contains(&PANTHEON_CONNECTOR);
        self.record(report, CHECK_PLUGIN_EXISTS, exists);

        // Attempted even when the definition is missing.
        let connector = match self.connectors.create_instance(PANTHEON_CONNECTOR) {
            Ok(connector) => {
                self.record(report, CHECK_PLUGIN_INSTANCE, true);
                connector
            }
            Err(e) => {
                self.record(report, CHECK_PLUGIN_INSTANCE, false);
                self.logger.notice(&format!("Solr Server Version {}", FAIL));
                report.errors.push(e);
                return;
            }
        };

        self.logger.notice("Using connector plugin to fetch server info...");
        let version = match connector.server_info() {
            Ok(info) => info.solr_spec_version,
            Err(e) => {
                let e = Error::from_delegate("fetch server info", e);
                self.logger.error(&format!(
                    "Server info failed ({}): {}",
                    e.kind().as_str(),
                    e
                ));
                report.errors.push(e);
                None
            }
        };
        self.logger.notice(&format!(
            "Solr Server Version {}",
            version.as_deref().unwrap_or(FAIL)
        ));
        report.solr_version = version;
    }

    fn record(&self, report: &mut DiagnosticReport, label: &str, passed: bool) {
        self.logger.notice(&format!(
            "{} {}",
            label,
            if passed { PASS } else { FAIL }
        ));
        report.checks.push(Check {
            label: label.to_string(),
            passed,
        });
    }
}
