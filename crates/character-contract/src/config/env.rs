// crates/character-contract/src/config/env.rs
// ============================================================================
// Module: Contract Environment
// Description: Environment keys and strict parsers for config overrides.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 and blank values fail closed.

use std::time::Duration;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys recognized by the contract runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractEnv {
    /// Config file path.
    Config,
    /// Service base address.
    BaseUrl,
    /// Basic-auth login.
    Login,
    /// Basic-auth password.
    Password,
    /// Request timeout in seconds (positive integer).
    TimeoutSeconds,
    /// Seed for random record selection.
    Seed,
}

impl ContractEnv {
    /// Every recognized key.
    pub const ALL: [Self; 6] =
        [Self::Config, Self::BaseUrl, Self::Login, Self::Password, Self::TimeoutSeconds, Self::Seed];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "CHARACTER_CONTRACT_CONFIG",
            Self::BaseUrl => "CHARACTER_CONTRACT_BASE_URL",
            Self::Login => "CHARACTER_CONTRACT_LOGIN",
            Self::Password => "CHARACTER_CONTRACT_PASSWORD",
            Self::TimeoutSeconds => "CHARACTER_CONTRACT_TIMEOUT_SEC",
            Self::Seed => "CHARACTER_CONTRACT_SEED",
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
pub fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive timeout in whole seconds.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
pub(crate) fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

/// Parses an unsigned 64-bit seed.
///
/// # Errors
///
/// Returns an error when the value is not an unsigned integer.
pub(crate) fn parse_seed(name: &str, raw: &str) -> Result<u64, String> {
    raw.trim().parse().map_err(|_| format!("{name} must be an unsigned integer"))
}
