// system-tests/src/settings.rs
// ============================================================================
// Module: Run Settings
// Description: Where system-test artifacts go and how long clients may wait.
// Purpose: Turn the CHARACTER_CONTRACT_SYSTEM_TEST_* variables into settings.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`RunSettings`] holds the three knobs a developer can turn when running the
//! system tests: a fixed artifact root, a floor for client timeouts and
//! whether an artifact root that already holds a summary may be reused.
//! Settings are read through a lookup function so they can be built from
//! the process environment or from a plain table in tests.
//! Invariants:
//! - A variable that is set must be non-blank UTF-8; otherwise loading fails.
//! - Without a fixed root, each run writes under a fresh timestamped root.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

// ============================================================================
// SECTION: Keys
// ============================================================================

/// Variables read by [`RunSettings::from_env`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSettingKey {
    /// Directory that receives one sub-directory per test.
    RunRoot,
    /// Minimum client timeout, in whole seconds.
    TimeoutFloor,
    /// Whether a root holding an earlier summary may be written again.
    ReuseRunRoot,
}

impl RunSettingKey {
    /// Every key, in documentation order.
    pub const ALL: [Self; 3] = [Self::RunRoot, Self::TimeoutFloor, Self::ReuseRunRoot];

    /// Returns the environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunRoot => "CHARACTER_CONTRACT_SYSTEM_TEST_RUN_ROOT",
            Self::TimeoutFloor => "CHARACTER_CONTRACT_SYSTEM_TEST_TIMEOUT_SEC",
            Self::ReuseRunRoot => "CHARACTER_CONTRACT_SYSTEM_TEST_REUSE_RUN_ROOT",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// A run setting that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The value is not UTF-8.
    #[error("{} must be valid UTF-8", .0.as_str())]
    NotUtf8(RunSettingKey),
    /// The value is set but blank.
    #[error("{} must not be blank", .0.as_str())]
    Blank(RunSettingKey),
    /// The timeout floor is not a positive number of seconds.
    #[error("{} must be a positive number of seconds, got {value:?}", .key.as_str())]
    Timeout {
        /// Offending key.
        key: RunSettingKey,
        /// Raw value.
        value: String,
    },
    /// The reuse flag is not a boolean literal.
    #[error("{} must be one of 1, 0, true, false, got {value:?}", .key.as_str())]
    Flag {
        /// Offending key.
        key: RunSettingKey,
        /// Raw value.
        value: String,
    },
}

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Artifact and timeout settings for one system-test process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSettings {
    /// Fixed artifact root; `None` picks a timestamped one.
    pub run_root: Option<PathBuf>,
    /// Lower bound applied to every client timeout.
    pub timeout_floor: Option<Duration>,
    /// Whether a test may overwrite an earlier summary.
    pub reuse_run_root: bool,
}

impl RunSettings {
    /// Reads the settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] for the first malformed variable.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var_os(key.as_str()))
    }

    /// Reads the settings through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] for the first malformed value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(RunSettingKey) -> Option<OsString>,
    {
        let text = |key: RunSettingKey| -> Result<Option<String>, SettingsError> {
            let Some(raw) = lookup(key) else {
                return Ok(None);
            };
            let value = raw.into_string().map_err(|_| SettingsError::NotUtf8(key))?;
            if value.trim().is_empty() {
                return Err(SettingsError::Blank(key));
            }
            Ok(Some(value))
        };
        let run_root = text(RunSettingKey::RunRoot)?.map(PathBuf::from);
        let timeout_floor = text(RunSettingKey::TimeoutFloor)?.map(parse_seconds).transpose()?;
        let reuse_run_root = text(RunSettingKey::ReuseRunRoot)?.map(parse_flag).transpose()?;
        Ok(Self {
            run_root,
            timeout_floor,
            reuse_run_root: reuse_run_root.unwrap_or(false),
        })
    }

    /// Returns the artifact directory of `test_name`; `stamp` names the
    /// run directory when no fixed root is set.
    #[must_use]
    pub fn test_root(&self, test_name: &str, stamp: u128) -> PathBuf {
        self.run_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("target/system-tests").join(format!("run_{stamp}")))
            .join(test_name)
    }

    /// Raises `requested` to the configured floor.
    #[must_use]
    pub fn timeout(&self, requested: Duration) -> Duration {
        self.timeout_floor.map_or(requested, |floor| requested.max(floor))
    }
}

// ============================================================================
// SECTION: Parsers
// ============================================================================

/// Parses a positive whole number of seconds.
fn parse_seconds(value: String) -> Result<Duration, SettingsError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(SettingsError::Timeout {
            key: RunSettingKey::TimeoutFloor,
            value,
        }),
    }
}

/// Parses `1`, `0`, `true` or `false`, ignoring case.
fn parse_flag(value: String) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(SettingsError::Flag {
            key: RunSettingKey::ReuseRunRoot,
            value,
        }),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
