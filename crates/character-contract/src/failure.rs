// crates/character-contract/src/failure.rs
// ============================================================================
// Module: Contract Failures
// Description: Failure taxonomy for contract checks.
// Purpose: Carry the literal response that broke a check into the report.
// Dependencies: character-client, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`ContractFailure`] describes why one case failed. Every variant that
//! stems from a service response keeps a [`CapturedResponse`] so the report
//! shows exactly what came back, not only what was expected.

use std::fmt;

use character_client::ApiResponse;
use character_client::ClientError;
use serde::Serialize;
use thiserror::Error;

/// Maximum number of body bytes rendered in failure messages.
const BODY_PREVIEW_LIMIT: usize = 512;

// ============================================================================
// SECTION: Captured Responses
// ============================================================================

/// Response attached to a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapturedResponse {
    /// HTTP method of the request.
    pub method: String,
    /// Request URL.
    pub url: String,
    /// Response status.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl From<&ApiResponse> for CapturedResponse {
    fn from(response: &ApiResponse) -> Self {
        Self {
            method: response.method.clone(),
            url: response.url.clone(),
            status: response.status,
            body: response.body.clone(),
        }
    }
}

impl fmt::Display for CapturedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {} ", self.method, self.url, self.status)?;
        if self.body.len() <= BODY_PREVIEW_LIMIT {
            return write!(f, "{}", self.body);
        }
        let mut cut = BODY_PREVIEW_LIMIT;
        while !self.body.is_char_boundary(cut) {
            cut -= 1;
        }
        write!(f, "{}...", &self.body[.. cut])
    }
}

/// Statuses a check accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedStatuses {
    /// Any 2xx status.
    Success,
    /// One of the listed statuses.
    OneOf(Vec<u16>),
    /// Any 2xx status or one of the listed statuses.
    SuccessOr(Vec<u16>),
}

impl fmt::Display for ExpectedStatuses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "2xx"),
            Self::OneOf(statuses) => match statuses.as_slice() {
                [single] => write!(f, "{single}"),
                many => write!(f, "one of [{}]", render(many)),
            },
            Self::SuccessOr(statuses) => write!(f, "2xx or one of [{}]", render(statuses)),
        }
    }
}

/// Renders statuses as a comma-separated list.
fn render(statuses: &[u16]) -> String {
    statuses.iter().map(u16::to_string).collect::<Vec<_>>().join(", ")
}

// ============================================================================
// SECTION: Failure Taxonomy
// ============================================================================

/// Reason a contract case failed.
#[derive(Debug, Error)]
pub enum ContractFailure {
    /// Status outside the accepted set.
    #[error("expected status {expected}, got {response}")]
    UnexpectedStatus {
        /// Accepted statuses.
        expected: ExpectedStatuses,
        /// Offending response.
        response: CapturedResponse,
    },
    /// Body did not meet an expectation.
    #[error("{expectation}; got {response}")]
    UnexpectedBody {
        /// What the body should have been.
        expectation: String,
        /// Offending response.
        response: CapturedResponse,
    },
    /// Body could not be decoded into the expected shape.
    #[error("undecodable body ({reason}); got {response}")]
    Decode {
        /// Decoder message.
        reason: String,
        /// Offending response.
        response: CapturedResponse,
    },
    /// A cross-request property did not hold.
    #[error("contract violated: {0}")]
    Invariant(String),
    /// A stage ran without state an earlier stage should have left.
    #[error("missing {0} from an earlier stage")]
    MissingState(&'static str),
    /// The request never produced a response.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl ContractFailure {
    /// Returns the response behind the failure, if any.
    #[must_use]
    pub const fn response(&self) -> Option<&CapturedResponse> {
        match self {
            Self::UnexpectedStatus {
                response, ..
            }
            | Self::UnexpectedBody {
                response, ..
            }
            | Self::Decode {
                response, ..
            } => Some(response),
            Self::Invariant(_) | Self::MissingState(_) | Self::Client(_) => None,
        }
    }

    /// Builds an [`ContractFailure::UnexpectedBody`] for `response`.
    #[must_use]
    pub fn body(expectation: impl Into<String>, response: &ApiResponse) -> Self {
        Self::UnexpectedBody {
            expectation: expectation.into(),
            response: response.into(),
        }
    }

    /// Builds a [`ContractFailure::Decode`] for `response`.
    #[must_use]
    pub fn decode(reason: impl fmt::Display, response: &ApiResponse) -> Self {
        Self::Decode {
            reason: reason.to_string(),
            response: response.into(),
        }
    }
}
