// crates/character-contract/src/session.rs
// ============================================================================
// Module: Contract Session
// Description: Session-scoped client guard with guaranteed reset.
// Purpose: Leave the shared collection at its baseline after every run.
// Dependencies: character-client, tracing
// ============================================================================

//! ## Overview
//! A [`Session`] owns the authenticated client for one run. Closing it resets
//! the collection and reports the outcome; dropping it unclosed (for example
//! while unwinding from a panic) still issues the reset.

use character_client::ApiResponse;
use character_client::CharacterApi;
use character_client::ClientError;

/// Client guard that resets the collection when the run ends.
#[derive(Debug)]
pub struct Session {
    /// Authenticated client for the run.
    api: CharacterApi,
    /// Whether the drop-time reset is still owed.
    armed: bool,
}

impl Session {
    /// Opens a session around `api`.
    #[must_use]
    pub const fn new(api: CharacterApi) -> Self {
        Self {
            api,
            armed: true,
        }
    }

    /// Returns the session client.
    #[must_use]
    pub const fn api(&self) -> &CharacterApi {
        &self.api
    }

    /// Resets the collection and disarms the drop-time reset.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the reset request fails in transport.
    pub fn close(mut self) -> Result<ApiResponse, ClientError> {
        self.armed = false;
        self.api.reset_collection()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match self.api.reset_collection() {
            Ok(response) if response.is_success() => {
                tracing::info!(status = response.status, "session teardown reset");
            }
            Ok(response) => {
                tracing::warn!(status = response.status, "session teardown reset refused");
            }
            Err(err) => tracing::warn!(error = %err, "session teardown reset failed"),
        }
    }
}
