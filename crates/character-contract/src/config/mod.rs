// crates/character-contract/src/config/mod.rs
// ============================================================================
// Module: Contract Configuration
// Description: Configuration loading and validation for contract runs.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: character-client, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is read from a TOML file, then overridden field by field
//! from `CHARACTER_CONTRACT_*` environment variables, then validated.
//! Credentials are never compiled in; they must come from the file or the
//! environment. Environment values are untrusted: invalid UTF-8, empty values
//! and malformed numbers fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use character_client::ClientConfig;
use character_client::Credentials;
use character_client::endpoint::parse_base_url;
use serde::Deserialize;
use thiserror::Error;

pub use self::env::ContractEnv;
pub use self::env::read_env_nonempty;
pub use self::env::read_env_strict;
use self::env::parse_seed;
use self::env::parse_timeout_seconds;
use crate::policy::ContractPolicy;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "character-contract.toml";
/// Default directory for report artifacts.
pub const DEFAULT_REPORT_DIR: &str = "character-contract-report";
/// Default whole-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Maximum config file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of one path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum length of a whole path.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Service location and transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Base address of the service.
    pub base_url: Option<String>,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Basic-auth credentials.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CredentialsConfig {
    /// Login name.
    pub login: Option<String>,
    /// Password; may be empty but must be present.
    pub password: Option<String>,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Report artifact settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Directory receiving `report.json`, `report.md` and `transcript.json`.
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_REPORT_DIR),
        }
    }
}

/// Complete contract-run configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContractConfig {
    /// Service settings.
    pub service: ServiceConfig,
    /// Credentials.
    pub credentials: CredentialsConfig,
    /// Suite expectations.
    pub policy: ContractPolicy,
    /// Report settings.
    pub report: ReportConfig,
}

impl ContractConfig {
    /// Loads, overrides from the environment and validates configuration.
    ///
    /// The file is `path` when given, else `CHARACTER_CONTRACT_CONFIG`, else
    /// `character-contract.toml`. Only the implicit default may be absent, in
    /// which case configuration comes from the environment alone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, an
    /// environment value is malformed, or the result fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        let mut config = if explicit || resolved.exists() {
            Self::read(&resolved)?
        } else {
            Self::default()
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses one config file without validating it.
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses configuration from TOML text without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown keys.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies `CHARACTER_CONTRACT_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is malformed.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| read_env_nonempty(key.as_str()))
    }

    /// Applies overrides from `lookup`, keyed by [`ContractEnv`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `lookup` fails or a value is
    /// malformed.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(ContractEnv) -> Result<Option<String>, String>,
    {
        let read = |key: ContractEnv| lookup(key).map_err(ConfigError::Invalid);
        if let Some(base_url) = read(ContractEnv::BaseUrl)? {
            self.service.base_url = Some(base_url);
        }
        if let Some(login) = read(ContractEnv::Login)? {
            self.credentials.login = Some(login);
        }
        if let Some(password) = read(ContractEnv::Password)? {
            self.credentials.password = Some(password);
        }
        if let Some(raw) = read(ContractEnv::TimeoutSeconds)? {
            let timeout = parse_timeout_seconds(ContractEnv::TimeoutSeconds.as_str(), &raw)
                .map_err(ConfigError::Invalid)?;
            self.service.timeout_secs = timeout.as_secs();
        }
        if let Some(raw) = read(ContractEnv::Seed)? {
            self.policy.seed =
                parse_seed(ContractEnv::Seed.as_str(), &raw).map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.service.base_url.as_deref().ok_or_else(|| {
            ConfigError::Invalid(format!(
                "service.base_url is required (or set {})",
                ContractEnv::BaseUrl.as_str()
            ))
        })?;
        parse_base_url(base_url).map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if self.service.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "service.timeout_secs must be greater than zero".to_string(),
            ));
        }
        match self.credentials.login.as_deref() {
            Some(login) if !login.trim().is_empty() => {}
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "credentials.login is required (or set {})",
                    ContractEnv::Login.as_str()
                )));
            }
        }
        if self.credentials.password.is_none() {
            return Err(ConfigError::Invalid(format!(
                "credentials.password is required (or set {})",
                ContractEnv::Password.as_str()
            )));
        }
        self.policy.validate().map_err(ConfigError::Invalid)?;
        validate_path_string("report.output_dir", &self.report.output_dir.to_string_lossy())
    }

    /// Builds the client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when required settings are missing.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        self.validate()?;
        let base_url = self.service.base_url.clone().unwrap_or_default();
        let login = self.credentials.login.clone().unwrap_or_default();
        let password = self.credentials.password.clone().unwrap_or_default();
        Ok(ClientConfig {
            base_url,
            credentials: Credentials::new(login, password),
            timeout: Duration::from_secs(self.service.timeout_secs),
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path; the flag reports whether it was requested.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Some(env_path) =
        read_env_nonempty(ContractEnv::Config.as_str()).map_err(ConfigError::Invalid)?
    {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path string against length limits.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
