//! Structured logging setup.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the host. [`init_logging`] is a convenience for hosts and tools that do
//! not bring their own. `RUST_LOG` overrides the configured level.

use crate::config::LoggingConfig;
use crate::error::{ProtocolError, Result};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Build the filter for `config`, preferring `RUST_LOG` when it is set.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(config.log_level).into())
    })
}

/// Install a global fmt subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(true);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| {
        ProtocolError::ConfigError(format!("Failed to install tracing subscriber: {e}"))
    })?;

    info!(app = %config.app_name, json = config.json_format, "Logging initialized");
    Ok(())
}
