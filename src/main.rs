//! # pantheon-search CLI (`psearch`)
//!
//! ## Usage
//!
//! ```bash
//! psearch --config ./config/pantheon.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Aliases | Description |
//! |---------|---------|-------------|
//! | `psearch publish-schema [server]` | `sapps` | Upload the schema config-set to a server |
//! | `psearch bundle-schema-files` | `sapgsf` | Write the schema files to a zip archive |
//! | `psearch test-connection` | `sapt` | Report environment, ping, and connector status |
//!
//! Exit codes follow `sysexits.h`: 78 configuration, 69 transport,
//! 76 protocol, 70 collaborator failure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use pantheon_search::bundle::{bundle_schema_files, temp_base_dir};
use pantheon_search::config::{self, IndexEnv, DEFAULT_SERVER_ID};
use pantheon_search::diagnose::Diagnostics;
use pantheon_search::error::Error;
use pantheon_search::logger::{Logger, TracingLogger};
use pantheon_search::probe::SolrProber;
use pantheon_search::publish::{post_schema, ConfigSetPublisher};
use pantheon_search::schema_files::DirectoryFileProvider;
use pantheon_search::traits::ConnectorRegistry;

/// Publish schemas to a hosted Solr core and diagnose the connection.
#[derive(Parser)]
#[command(name = "psearch", version)]
struct Cli {
    /// Path to configuration file (TOML). Optional: without it the default
    /// server is taken from the PANTHEON_INDEX_* environment.
    #[arg(long, global = true, default_value = "./config/pantheon.toml")]
    config: PathBuf,

    /// Debug logging, including HTTP connection traces.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Post the latest schema to the given server.
    #[command(visible_alias = "sapps", alias = "postSchema")]
    PublishSchema {
        /// Server identifier, as in `[servers.<id>]`.
        #[arg(default_value = DEFAULT_SERVER_ID)]
        server_id: String,
    },

    /// Write the current schema files to a zip archive and print its path.
    #[command(visible_alias = "sapgsf", alias = "getSchemaFiles")]
    BundleSchemaFiles {
        /// Accepted for compatibility; ignored.
        #[arg(hide = true)]
        files: Vec<String>,
    },

    /// Check environment, connectivity, and the connector plugin.
    #[command(visible_alias = "sapt", alias = "test")]
    TestConnection,
}

fn init_tracing(verbose: bool) {
    // reqwest's connection_verbose records land at TRACE under this target.
    let directives = if verbose {
        "debug,reqwest::connect::verbose=trace"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let logger = TracingLogger;

    match run(cli, &logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(e.exit_code()),
    }
}

/// Dispatch a command. Commands log their own failures.
fn run(cli: Cli, logger: &dyn Logger) -> Result<(), Error> {
    let env = IndexEnv::from_env();
    let home = dirs::home_dir();

    match cli.command {
        Commands::PublishSchema { server_id } => {
            let cfg = load_config(&cli.config, logger)?;
            let files = Box::new(DirectoryFileProvider::new(cfg.schema.dir.clone()));
            let publisher = ConfigSetPublisher::new(cfg, env, files, home, cli.verbose);
            post_schema(&publisher, &server_id, logger)
        }
        Commands::BundleSchemaFiles { files: _ } => {
            let cfg = load_config(&cli.config, logger)?;
            let provider = DirectoryFileProvider::new(cfg.schema.dir);
            let base_dir = temp_base_dir().inspect_err(|e| logger.error(&e.to_string()))?;
            let bundle = bundle_schema_files(&provider, &base_dir, logger)?;
            println!("{}", bundle.archive_path().display());
            Ok(())
        }
        Commands::TestConnection => {
            let prober = SolrProber::new(env.clone(), home.clone(), cli.verbose);
            let connectors = ConnectorRegistry::with_builtins(env.clone(), home, cli.verbose);
            Diagnostics::new(&env, &prober, &connectors, logger)
                .run()
                .outcome()
        }
    }
}

fn load_config(path: &std::path::Path, logger: &dyn Logger) -> Result<config::Config, Error> {
    config::load_or_minimal(path).inspect_err(|e| logger.error(&e.to_string()))
}
