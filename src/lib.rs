//! # pantheon-search
//!
//! Operator tooling for a hosted Solr search core: publish the schema
//! config-set, bundle the schema files into a zip, and diagnose
//! connectivity.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────┐   ┌─────────────┐
//! │ SchemaFile   │──▶│   bundle   │──▶│   publish   │──▶ admin/configs
//! │ Provider     │   │   (zip)    │   │ (Configsets)│
//! └──────────────┘   └────────────┘   └─────────────┘
//!
//! ┌──────────────┐   ┌────────────┐   ┌─────────────┐
//! │ PANTHEON_    │──▶│   probe    │──▶│  diagnose   │──▶ ✅ / ❌ log lines
//! │ INDEX_* env  │   │  (ping)    │   │ + connectors│
//! └──────────────┘   └────────────┘   └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! psearch test-connection            # env + ping + connector checks
//! psearch bundle-schema-files        # writes $TMPDIR/search_api_pantheon-<id>.zip
//! psearch publish-schema             # uploads to the pantheon_solr8 server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and `PANTHEON_INDEX_*` environment |
//! | [`endpoint`] | Solr core connection descriptor |
//! | [`http`] | HTTP client with optional client certificate |
//! | [`solr`] | Ping, system info, and config-set upload |
//! | [`schema_files`] | Schema file providers |
//! | [`bundle`] | Zip archive of schema files |
//! | [`publish`] | Schema publishing command |
//! | [`probe`] | Single health check against the core |
//! | [`diagnose`] | Connection diagnostics command |
//! | [`traits`] | Connector plugin trait and registry |
//! | [`logger`] | Injected log sink |
//! | [`error`] | Error taxonomy and exit codes |

pub mod bundle;
pub mod config;
pub mod diagnose;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod logger;
pub mod probe;
pub mod publish;
pub mod schema_files;
pub mod solr;
pub mod traits;
