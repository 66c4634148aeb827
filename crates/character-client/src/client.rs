// crates/character-client/src/client.rs
// ============================================================================
// Module: Character API Client
// Description: One method per character service operation.
// Purpose: Issue authenticated requests and hand back raw responses.
// Dependencies: reqwest, serde, serde_json, tracing, url
// ============================================================================

//! ## Overview
//! [`CharacterApi`] performs exactly one blocking HTTP request per call and
//! returns the status and body as an [`ApiResponse`]. It never inspects the
//! status: a 401 or a 400 is as much a result as a 200. Each exchange is
//! appended to an in-memory transcript so failing checks can show the literal
//! traffic that led to them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use reqwest::Method;
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::credentials::Credentials;
use crate::endpoint::Endpoint;
use crate::endpoint::parse_base_url;
use crate::error::ClientError;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default whole-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Placeholder for requests without a body.
const NO_BODY: Option<&Value> = None;

/// Settings needed to reach the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base address, e.g. `http://rest.example.test/`.
    pub base_url: String,
    /// Basic-auth credentials attached to every request.
    pub credentials: Credentials,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a config with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// One completed exchange: what was asked and what came back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse {
    /// HTTP method of the request.
    pub method: String,
    /// Full request URL.
    pub url: String,
    /// Response status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl ApiResponse {
    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when the body is not valid JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns true when the body text contains `needle`.
    #[must_use]
    pub fn body_contains(&self, needle: &str) -> bool {
        self.body.contains(needle)
    }
}

/// Transcript record of one exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    /// 1-based position in the transcript.
    pub sequence: u64,
    /// The exchange.
    pub response: ApiResponse,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Blocking client for the character collection service.
///
/// # Invariants
/// - Every request carries the configured Basic credentials.
/// - Clones share the HTTP connection pool and the transcript.
#[derive(Clone)]
pub struct CharacterApi {
    /// Base address all endpoints are resolved against.
    base_url: Url,
    /// Credentials attached to every request.
    credentials: Credentials,
    /// Underlying HTTP client.
    client: Client,
    /// Exchanges issued through this client and its clones.
    transcript: Arc<Mutex<Vec<TranscriptEntry>>>,
}

impl CharacterApi {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the base address is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client =
            Client::builder().timeout(config.timeout).build().map_err(ClientError::Build)?;
        Ok(Self::with_client(base_url, config.credentials, client))
    }

    /// Builds a client around an existing reqwest client.
    #[must_use]
    pub fn with_client(base_url: Url, credentials: Credentials, client: Client) -> Self {
        Self {
            base_url,
            credentials,
            client,
            transcript: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a client for the same service with other credentials.
    ///
    /// The HTTP connection pool is shared; the transcript is not.
    #[must_use]
    pub fn with_credentials(&self, credentials: Credentials) -> Self {
        Self::with_client(self.base_url.clone(), credentials, self.client.clone())
    }

    /// Returns the base address.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the credentials in use.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns a snapshot of the transcript.
    #[must_use]
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// `GET /characters`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure.
    pub fn list_characters(&self) -> Result<ApiResponse, ClientError> {
        self.send(Method::GET, Endpoint::Characters, NO_BODY)
    }

    /// `GET /character/{name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or an unaddressable name.
    pub fn get_character(&self, name: &str) -> Result<ApiResponse, ClientError> {
        self.send(Method::GET, Endpoint::Character(name), NO_BODY)
    }

    /// `POST /character` with `record` as the JSON body.
    ///
    /// Any serializable body is accepted so incomplete records can be sent.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure.
    pub fn create_character<B>(&self, record: &B) -> Result<ApiResponse, ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, Endpoint::NewCharacter, Some(record))
    }

    /// `PUT /character/{name}` with `record` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or an unaddressable name.
    pub fn update_character<B>(&self, name: &str, record: &B) -> Result<ApiResponse, ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, Endpoint::Character(name), Some(record))
    }

    /// `DELETE /character/{name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or an unaddressable name.
    pub fn delete_character(&self, name: &str) -> Result<ApiResponse, ClientError> {
        self.send(Method::DELETE, Endpoint::Character(name), NO_BODY)
    }

    /// `POST /reset`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure.
    pub fn reset_collection(&self) -> Result<ApiResponse, ClientError> {
        self.send(Method::POST, Endpoint::Reset, NO_BODY)
    }

    /// Sends one request and captures the response verbatim.
    fn send<B>(
        &self,
        method: Method,
        endpoint: Endpoint<'_>,
        body: Option<&B>,
    ) -> Result<ApiResponse, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = endpoint.url(&self.base_url)?;
        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .basic_auth(self.credentials.login(), Some(self.credentials.password()));
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request.send().map_err(|source| ClientError::Transport {
            method: method.to_string(),
            url: url.to_string(),
            source,
        })?;
        let status = response.status().as_u16();
        let text = response.text().map_err(|source| ClientError::Body {
            method: method.to_string(),
            url: url.to_string(),
            source,
        })?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(method = %method, path = url.path(), status, elapsed_ms, "service exchange");
        tracing::trace!(body = %text, "service response body");

        let captured = ApiResponse {
            method: method.to_string(),
            url: url.to_string(),
            status,
            body: text,
        };
        self.record(captured.clone());
        Ok(captured)
    }

    /// Appends an exchange to the transcript.
    fn record(&self, response: ApiResponse) {
        let Ok(mut guard) = self.transcript.lock() else {
            return;
        };
        let sequence = u64::try_from(guard.len()).unwrap_or(u64::MAX).saturating_add(1);
        guard.push(TranscriptEntry {
            sequence,
            response,
        });
    }
}

impl fmt::Debug for CharacterApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharacterApi")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
