//! wpm-course - WordPress course service
//!
//! Startup order: tracing, build identification, bootstrap config, root
//! folder, database, optional seed, HTTP server.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wpm_common::config::{
    RootFolderInitializer, RootFolderResolver, TomlConfig, ENV_CONFIG_FILE, ENV_PORT,
};
use wpm_common::db::init_database;
use wpm_course::{build_router, seed, AppState};

const MODULE_NAME: &str = "wpm-course";

#[derive(Debug, Parser)]
#[command(name = "wpm-course", version, about = "WordPress course service")]
struct Args {
    /// Root folder holding the database
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Explicit TOML config file
    #[arg(long, env = ENV_CONFIG_FILE)]
    config: Option<PathBuf>,

    /// HTTP port (overrides config)
    #[arg(long, env = ENV_PORT)]
    port: Option<u16>,

    /// Bind address (overrides config)
    #[arg(long)]
    bind: Option<String>,

    /// Load the bundled curriculum and demo users before serving
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing so its log level can seed the filter
    let config_result = TomlConfig::load_for_module(args.config.as_deref(), MODULE_NAME);
    let default_level = config_result
        .as_ref()
        .map(|(config, _)| config.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_level)),
        )
        .init();

    info!(
        "Starting wpm-course v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let (config, config_path) = config_result.context("Failed to load configuration")?;
    match &config_path {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => warn!("No config file found, using built-in defaults"),
    }

    let root_folder = RootFolderResolver::new(MODULE_NAME).resolve(args.root_folder.as_deref(), &config);
    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path(&config.database_file);
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path, config.busy_timeout_ms)
        .await
        .context("Failed to initialize database")?;

    if args.seed || config.seed_on_startup {
        seed::seed(&pool).await.context("Failed to seed curriculum")?;
    }

    let state = AppState::new(pool, config.stats.clone());
    let app = build_router(state);

    let bind = args.bind.unwrap_or(config.bind_address);
    let port = args.port.unwrap_or(config.port);
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("wpm-course listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
