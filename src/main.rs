//! Projeta server entrypoint
//!
//! The heavy lifting (initialization, middleware wiring, graceful shutdown)
//! lives in dedicated modules so this file remains a thin orchestrator.

use anyhow::Result;
use log::info;
use projeta::config::ServerConfig;
use projeta::{lifecycle, logging};

#[actix_web::main]
async fn main() -> Result<()> {
    let main_start = std::time::Instant::now();

    // Load configuration (fallback to defaults when config file missing)
    let config_path = "config.toml";
    let config = match ServerConfig::load(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("FATAL: Failed to load {}: {}", config_path, e);
            std::process::exit(1);
        }
    };

    // Logging before any other side effects
    logging::init_logging(
        &config.logging.level,
        &config.logging.file_path,
        config.logging.log_to_console,
        Some(&config.logging.targets),
        &config.logging.format,
    )?;

    info!("Projeta Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Host: {}  Port: {}", config.server.host, config.server.port);

    // Build application state, then run the HTTP server until a termination
    // signal is received
    let app_context = lifecycle::bootstrap(&config).await?;
    lifecycle::run(&config, app_context, main_start).await
}
