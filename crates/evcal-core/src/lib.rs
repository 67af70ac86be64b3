pub mod config;
pub mod error;

pub use config::{
    Config, DataConfig, HostConfig, MissingDataPolicy, StyleConfig, ValidationResult, ViewConfig,
};
pub use error::{AppError, ConfigError, DataError, HostError};

use anyhow::Result;

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

/// Initialize logging for a standalone process.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("Evcal core initialized");
    Ok(())
}
