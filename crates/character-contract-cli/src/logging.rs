// crates/character-contract-cli/src/logging.rs
// ============================================================================
// Module: CLI Logging
// Description: Tracing subscriber setup for the contract runner.
// Purpose: Route client and suite events to stderr as text or JSON.
// Dependencies: clap, tracing-subscriber
// ============================================================================

//! ## Overview
//! Logging goes to stderr so stdout carries only command output. `RUST_LOG`
//! overrides the default filter.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "character_contract=info,character_client=info";

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Builds the effective filter from `RUST_LOG` or the default.
#[must_use]
pub fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns a message when a global subscriber is already installed.
pub fn init(format: LogFormat) -> Result<(), String> {
    let registry = tracing_subscriber::registry().with(filter());
    let installed = match format {
        LogFormat::Text => {
            registry.with(fmt::layer().with_writer(std::io::stderr).with_target(true)).try_init()
        }
        LogFormat::Json => registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init(),
    };
    installed.map_err(|err| format!("failed to initialize logging: {err}"))
}
