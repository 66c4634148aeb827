// crates/character-client/src/lib.rs
// ============================================================================
// Module: Character Client
// Description: Blocking HTTP client for the character collection service.
// Purpose: Map the six collection operations onto HTTP requests verbatim.
// Dependencies: reqwest, serde, serde_json, thiserror, tracing, url
// ============================================================================

//! ## Overview
//! This crate wraps the character collection REST service behind
//! [`CharacterApi`], one method per operation (list, get, create, update,
//! delete, reset). Every request carries HTTP Basic credentials and every HTTP
//! response, whatever its status, is returned untouched as an
//! [`ApiResponse`]. Interpretation of statuses and bodies belongs to callers.
//! Invariants:
//! - Non-2xx responses are `Ok`; only transport and configuration problems are errors.
//! - Character names are percent-encoded as exactly one path segment.
//! - Requests are synchronous, one in flight per call, never retried.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod record;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::ApiResponse;
pub use client::CharacterApi;
pub use client::ClientConfig;
pub use client::DEFAULT_TIMEOUT;
pub use client::TranscriptEntry;
pub use credentials::Credentials;
pub use endpoint::Endpoint;
pub use endpoint::is_addressable;
pub use error::ClientError;
pub use record::Character;
pub use record::CharacterField;
pub use record::FIELD_COUNT;
pub use record::has_exact_fields;
