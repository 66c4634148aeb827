// crates/character-contract/src/outcome.rs
// ============================================================================
// Module: Service Outcomes
// Description: Documented response bodies and their classification.
// Purpose: Name the service's error signals in one place for all scenarios.
// Dependencies: character-client, serde, serde_json
// ============================================================================

//! ## Overview
//! The service signals its outcomes unevenly: authentication failure and
//! capacity overflow use fixed error bodies, a missing record is a 200 with a
//! sentinel body, and a duplicate name is only visible as a message
//! substring. [`ServiceOutcome::classify`] maps a raw response onto that
//! taxonomy for reporting; the client itself never interprets responses.

use character_client::ApiResponse;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::policy::ContractPolicy;

// ============================================================================
// SECTION: Documented Messages
// ============================================================================

/// Error message returned for rejected credentials.
pub const AUTH_ERROR_MESSAGE: &str = "You have to login with proper credentials";
/// Sentinel result for a name that is not in the collection.
pub const NO_SUCH_NAME: &str = "No such name";
/// Suffix of the duplicate-name message.
pub const DUPLICATE_SUFFIX: &str = "is already exists";
/// Marker in the body of a successful delete.
pub const DELETED_MARKER: &str = "is deleted";

/// Body returned for rejected credentials.
#[must_use]
pub fn auth_error_body() -> Value {
    json!({ "error": AUTH_ERROR_MESSAGE })
}

/// Body returned when a name is not in the collection.
#[must_use]
pub fn not_found_body() -> Value {
    json!({ "result": NO_SUCH_NAME })
}

/// Message returned when the collection is full.
#[must_use]
pub fn capacity_error_message(capacity: usize) -> String {
    format!("Collection can't contain more than {capacity} items")
}

/// Body returned when the collection is full.
#[must_use]
pub fn capacity_error_body(capacity: usize) -> Value {
    json!({ "error": capacity_error_message(capacity) })
}

/// Message fragment returned when `name` is already taken.
#[must_use]
pub fn duplicate_message(name: &str) -> String {
    format!("{name} {DUPLICATE_SUFFIX}")
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// How the service answered a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceOutcome {
    /// 2xx without one of the sentinel bodies.
    Success,
    /// 401 with the uniform credential error.
    AuthenticationFailure,
    /// A configured malformed-payload status.
    ValidationFailure,
    /// 200 with the "No such name" sentinel.
    NotFound,
    /// Body reports a duplicate name.
    Conflict,
    /// 400 with the collection ceiling error.
    CapacityExceeded,
    /// Anything else.
    Unexpected,
}

impl ServiceOutcome {
    /// Classifies a response under the given policy.
    #[must_use]
    pub fn classify(response: &ApiResponse, policy: &ContractPolicy) -> Self {
        let body = response.json().ok();
        if response.status == 401 && body.as_ref() == Some(&auth_error_body()) {
            return Self::AuthenticationFailure;
        }
        if response.status == 400 && body.as_ref() == Some(&capacity_error_body(policy.capacity)) {
            return Self::CapacityExceeded;
        }
        if response.body_contains(DUPLICATE_SUFFIX) {
            return Self::Conflict;
        }
        if response.status == 200 && body.as_ref() == Some(&not_found_body()) {
            return Self::NotFound;
        }
        if policy.is_malformed_status(response.status) {
            return Self::ValidationFailure;
        }
        if response.is_success() {
            return Self::Success;
        }
        Self::Unexpected
    }

    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::AuthenticationFailure => "authentication_failure",
            Self::ValidationFailure => "validation_failure",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::Unexpected => "unexpected",
        }
    }
}
