//! KNX/HomeKit Common Library
//!
//! This crate provides shared types and utilities for the KNX to HomeKit bridge:
//!
//! - [`value`] - Field value model shared by both protocol sides (`FieldValue`)
//! - [`dpt`] - KNX datapoint type tags (`Dpt`)
//! - [`address`] - KNX three-level group addresses (`GroupAddress`)
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`error`] - Error types

pub mod address;
pub mod config;
pub mod dpt;
pub mod error;
pub mod value;

// Re-export commonly used types at the crate root
pub use address::GroupAddress;
pub use config::{LogFormat, LoggingConfig, load_config, parse_config};
pub use dpt::Dpt;
pub use error::{Error, Result};
pub use value::FieldValue;

/// Initialize tracing with the given configuration.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Example
///
/// ```ignore
/// use knx_homekit_common::{LoggingConfig, LogFormat, init_tracing};
///
/// let config = LoggingConfig {
///     level: "debug".to_string(),
///     format: LogFormat::Json,
/// };
/// init_tracing(&config)?;
/// ```
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    // Logs go to stderr so that report output on stdout stays machine readable.
    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
