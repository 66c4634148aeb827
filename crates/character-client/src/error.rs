// crates/character-client/src/error.rs
// ============================================================================
// Module: Client Errors
// Description: Failures that prevent an HTTP exchange from completing.
// Purpose: Keep transport problems separate from service responses.
// Dependencies: reqwest, thiserror
// ============================================================================

//! ## Overview
//! [`ClientError`] covers configuration and transport failures only. Any HTTP
//! response the service returns, including 4xx and 5xx, is a successful
//! exchange from the client's point of view.

use thiserror::Error;

/// Errors raised before or while exchanging a request with the service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base address cannot be used to build endpoint URLs.
    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl {
        /// Base address as configured.
        url: String,
        /// Why the address was rejected.
        reason: String,
    },
    /// The name cannot be carried as a single URL path segment.
    #[error("character name `{0}` cannot be addressed as a path segment")]
    UnaddressableName(String),
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    /// The request could not be sent or no response arrived.
    #[error("{method} {url} failed: {source}")]
    Transport {
        /// HTTP method of the failed request.
        method: String,
        /// Full request URL.
        url: String,
        /// Transport failure reported by reqwest.
        #[source]
        source: reqwest::Error,
    },
    /// A response arrived but its body could not be read.
    #[error("failed to read response body for {method} {url}: {source}")]
    Body {
        /// HTTP method of the request.
        method: String,
        /// Full request URL.
        url: String,
        /// Body read failure reported by reqwest.
        #[source]
        source: reqwest::Error,
    },
}
