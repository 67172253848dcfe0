//! urlshort server
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request           ┌──────────────────────────────────────────────┐
//!     ─────────────────────────┼─▶ http server ──▶ mapping file table ──┐     │
//!                              │                        │ hit            │ miss│
//!     302 Found ◀──────────────┼────────────────────────┘                ▼     │
//!                              │                        ┌──── inline table     │
//!     302 Found ◀──────────────┼────────────────────────┘ hit     │ miss       │
//!                              │                                  ▼            │
//!     Fallback response ◀──────┼──────────────────────── fixed fallback        │
//!                              │                                               │
//!                              │  watcher: mapping file change → new table,    │
//!                              │  swapped in atomically                        │
//!                              └──────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::StatusCode;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use urlshort::config::loader::{inline_table, read_mapping_file};
use urlshort::config::validation::validate_config;
use urlshort::config::watcher::ConfigWatcher;
use urlshort::config::{load_config, load_mapping_file, ConfigError, ServerConfig};
use urlshort::http::{FallbackHandler, FixedResponse, HttpServer, NotFound};
use urlshort::observability::init_logging;
use urlshort::routing::{LookupTable, RedirectHandler, Resolution};
use urlshort::Shutdown;

#[derive(Parser)]
#[command(name = "urlshort")]
#[command(about = "Redirect request paths to configured URLs", long_about = None, version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the redirect server
    Serve {
        /// Server configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override listener.bind_address
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Parse a mapping document and print the resulting table
    Check {
        /// Mapping document (YAML, or JSON with a .json extension)
        file: PathBuf,
    },
    /// Show how a mapping document resolves a path
    Resolve {
        /// Mapping document (YAML, or JSON with a .json extension)
        file: PathBuf,

        /// Request path, e.g. /urlshort
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, bind } => serve(config.as_deref(), bind).await,
        Commands::Check { file } => {
            init_logging("warn")?;
            check(&file)
        }
        Commands::Resolve { file, path } => {
            init_logging("warn")?;
            resolve(&file, &path)
        }
    }
}

async fn serve(
    config_path: Option<&Path>,
    bind: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    init_logging(&config.observability.log_level)?;
    tracing::info!("urlshort v{} starting", env!("CARGO_PKG_VERSION"));

    // Mapping file misses fall through to the inline table, then to the
    // fixed fallback response.
    let default_fallback: Arc<dyn FallbackHandler> = Arc::new(FixedResponse::new(
        StatusCode::from_u16(config.fallback.status)?,
        config.fallback.body.clone(),
    ));
    let inline: RedirectHandler =
        RedirectHandler::with_shared_fallback(inline_table(&config.redirects), default_fallback);
    let inline_fallback: Arc<dyn FallbackHandler> = Arc::new(inline.clone());

    tracing::info!(
        bind_address = %config.listener.bind_address,
        inline_redirects = inline.resolver().table().len(),
        mapping_file = ?config.mappings.file,
        "Configuration loaded"
    );

    let handler = match &config.mappings.file {
        Some(file) => load_mapping_file(Path::new(file), inline_fallback.clone())?.into_dyn(),
        None => inline,
    };

    let (watcher, updates) = match (&config.mappings.file, config.mappings.watch) {
        (Some(file), true) => {
            let (watcher, updates) = ConfigWatcher::new(Path::new(file), inline_fallback);
            (Some(watcher.run()?), updates)
        }
        _ => (None, mpsc::unbounded_channel().1),
    };

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(&config, handler);
    server.run(listener, updates, shutdown.subscribe()).await?;

    drop(watcher);
    tracing::info!("Shutdown complete");
    Ok(())
}

fn check(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mapping = read_mapping_file(file)?;
    let records = mapping.len();
    let table = LookupTable::fold(mapping);

    let mut entries: Vec<_> = table.iter().collect();
    entries.sort_unstable();
    for (path, destination) in &entries {
        println!("{path} -> {destination}");
    }
    println!(
        "{}: {} records, {} paths ({} overridden)",
        file.display(),
        records,
        table.len(),
        records - table.len()
    );
    Ok(())
}

fn resolve(file: &Path, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let handler = load_mapping_file(file, NotFound)?;
    match handler.resolve(path) {
        Resolution::Redirect(destination) => println!("302 Found -> {destination}"),
        Resolution::Delegate => println!("no mapping for {path}; fallback handles it"),
    }
    Ok(())
}
