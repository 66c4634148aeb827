// crates/character-client/src/endpoint.rs
// ============================================================================
// Module: Endpoints
// Description: URL construction for the character service routes.
// Purpose: Append route paths to the base address with safe name encoding.
// Dependencies: url
// ============================================================================

//! ## Overview
//! Each [`Endpoint`] resolves to a URL below the configured base address.
//! Character names are pushed as a single path segment, so reserved
//! characters such as `/`, `?`, `#` and `%` are percent-encoded and cannot
//! change which route is addressed.

use url::Url;

use crate::error::ClientError;

/// Route of the character service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `/characters`: the whole collection.
    Characters,
    /// `/character`: record creation.
    NewCharacter,
    /// `/character/{name}`: one record by name.
    Character(&'a str),
    /// `/reset`: restore the baseline collection.
    Reset,
}

impl Endpoint<'_> {
    /// Resolves the endpoint against a base address.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] when the base cannot carry a
    /// path, and [`ClientError::UnaddressableName`] for names rejected by
    /// [`is_addressable`].
    pub fn url(&self, base: &Url) -> Result<Url, ClientError> {
        if let Self::Character(name) = self
            && !is_addressable(name)
        {
            return Err(ClientError::UnaddressableName((*name).to_string()));
        }
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segments = url.path_segments_mut().map_err(|()| ClientError::InvalidBaseUrl {
                url: base.to_string(),
                reason: "address cannot be a base".to_string(),
            })?;
            segments.pop_if_empty();
            match self {
                Self::Characters => {
                    segments.push("characters");
                }
                Self::NewCharacter => {
                    segments.push("character");
                }
                Self::Character(name) => {
                    segments.push("character").push(name);
                }
                Self::Reset => {
                    segments.push("reset");
                }
            }
        }
        Ok(url)
    }
}

/// Returns true when `name` survives URL parsing as one distinct segment.
///
/// `.` and `..` are collapsed into the parent route and ASCII tab, line feed
/// and carriage return are stripped by URL parsers, so such names would reach
/// a different resource than the one asked for.
#[must_use]
pub fn is_addressable(name: &str) -> bool {
    !matches!(name, "." | "..") && !name.contains(['\t', '\n', '\r'])
}

/// Parses and checks a base address.
///
/// # Errors
///
/// Returns [`ClientError::InvalidBaseUrl`] when the address does not parse or
/// is not an `http`/`https` URL.
pub fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw.trim()).map_err(|err| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "address cannot be a base".to_string(),
        });
    }
    Ok(url)
}
