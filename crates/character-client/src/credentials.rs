// crates/character-client/src/credentials.rs
// ============================================================================
// Module: Credentials
// Description: HTTP Basic login/password pair.
// Purpose: Carry credentials without leaking the password into logs.
// Dependencies: serde
// ============================================================================

use std::fmt;

use serde::Deserialize;

/// Login and password sent as HTTP Basic authentication on every request.
///
/// # Invariants
/// - `Debug` output never contains the password.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// Account login.
    login: String,
    /// Account password.
    password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Returns the login.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns a copy with the same login and a different password.
    #[must_use]
    pub fn with_password(&self, password: impl Into<String>) -> Self {
        Self {
            login: self.login.clone(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}
