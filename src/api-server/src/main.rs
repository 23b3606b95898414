//! Role Sync API Server
//!
//! Serves `POST /update_roles`, which reconciles a user's Azure AD role names
//! against the internal role codes tracked for that user.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (0.0.0.0:3000, built-in role mapping)
//! cargo run
//!
//! # Custom port and role mapping file
//! cargo run -- --port 9090 --role-map roles.json
//!
//! # Print the OpenAPI document
//! cargo run -- --openapi
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging level (trace, debug, info, warn, error)
//! - `ROLESYNC_HOST`: Server host (default: 0.0.0.0)
//! - `ROLESYNC_PORT`: Server port (default: 3000)
//! - `ROLESYNC_ROLE_MAP`: JSON file mapping Azure AD role names to role codes
//! - `ROLESYNC_JSON_LOGS`: Emit JSON logs

use anyhow::Result;
use api_server::{routes::ApiDoc, server::ServerBuilder, state::AppState, ServiceConfig};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

/// Role Sync API Server
#[derive(Parser, Debug)]
#[command(
    name = "rolesync-server",
    version,
    about = "Reconciles Azure AD role names against internal role codes",
    long_about = None
)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "ROLESYNC_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short = 'p', long, default_value = "3000", env = "ROLESYNC_PORT")]
    port: u16,

    /// JSON file mapping Azure AD role names to internal role codes
    #[arg(long, env = "ROLESYNC_ROLE_MAP")]
    role_map: Option<PathBuf>,

    /// Enable JSON logging format
    #[arg(long, env = "ROLESYNC_JSON_LOGS")]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Print the OpenAPI document and exit
    #[arg(long)]
    openapi: bool,
}

impl From<Args> for ServiceConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            role_map: args.role_map,
            log_level: args.log_level,
            json_logs: args.json_logs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.openapi {
        println!("{}", ApiDoc::openapi().to_pretty_json()?);
        return Ok(());
    }

    let config = ServiceConfig::from(args);
    init_tracing(&config)?;

    info!("Starting Role Sync API Server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mapping = config.load_mapping()?;
    info!(entries = mapping.len(), "Role mapping loaded");

    let state = Arc::new(AppState::in_memory(mapping));
    let server = ServerBuilder::new().config(config).state(state).build()?;

    if let Err(e) = server.run().await {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize tracing/logging subsystem
fn init_tracing(config: &ServiceConfig) -> Result<()> {
    let log_level = config.log_level.parse::<tracing::Level>().unwrap_or_else(|_| {
        eprintln!("Invalid log level '{}', using 'info'", config.log_level);
        tracing::Level::INFO
    });

    let dependency_level = if log_level <= tracing::Level::DEBUG {
        "info"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "api_server={level},rolesync_server={level},rolesync_core={level},tower_http={dep},axum={dep}",
            level = log_level,
            dep = dependency_level,
        )
        .into()
    });

    if config.json_logs {
        // JSON structured logging for production
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()?;
    }

    Ok(())
}
