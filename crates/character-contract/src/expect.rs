// crates/character-contract/src/expect.rs
// ============================================================================
// Module: Response Expectations
// Description: Assertion helpers over raw service responses.
// Purpose: Turn each documented response shape into one reusable check.
// Dependencies: character-client, serde_json
// ============================================================================

//! ## Overview
//! Every helper returns `Result<_, ContractFailure>` so scenarios chain
//! checks with `?` and the first broken expectation ends the case with the
//! offending response attached.

use std::fmt::Debug;

use character_client::ApiResponse;
use character_client::Character;
use serde_json::Value;

use crate::failure::ContractFailure;
use crate::failure::ExpectedStatuses;
use crate::outcome::not_found_body;

// ============================================================================
// SECTION: Status Checks
// ============================================================================

/// Requires the status to be one of `accepted`.
///
/// # Errors
///
/// Returns [`ContractFailure::UnexpectedStatus`] otherwise.
pub fn status_in(response: &ApiResponse, accepted: &[u16]) -> Result<(), ContractFailure> {
    if accepted.contains(&response.status) {
        return Ok(());
    }
    Err(ContractFailure::UnexpectedStatus {
        expected: ExpectedStatuses::OneOf(accepted.to_vec()),
        response: response.into(),
    })
}

/// Requires a 2xx status.
///
/// # Errors
///
/// Returns [`ContractFailure::UnexpectedStatus`] otherwise.
pub fn success(response: &ApiResponse) -> Result<(), ContractFailure> {
    if response.is_success() {
        return Ok(());
    }
    Err(ContractFailure::UnexpectedStatus {
        expected: ExpectedStatuses::Success,
        response: response.into(),
    })
}

// ============================================================================
// SECTION: Body Checks
// ============================================================================

/// Parses the body as JSON.
///
/// # Errors
///
/// Returns [`ContractFailure::Decode`] when the body is not JSON.
pub fn json_body(response: &ApiResponse) -> Result<Value, ContractFailure> {
    response.json().map_err(|err| ContractFailure::decode(err, response))
}

/// Requires the body to equal `expected` as JSON.
///
/// # Errors
///
/// Returns a failure when the body is not JSON or differs.
pub fn json_eq(response: &ApiResponse, expected: &Value) -> Result<(), ContractFailure> {
    if json_body(response)? == *expected {
        return Ok(());
    }
    Err(ContractFailure::body(format!("expected body {expected}"), response))
}

/// Requires the body text to contain `needle`.
///
/// # Errors
///
/// Returns [`ContractFailure::UnexpectedBody`] otherwise.
pub fn body_contains(response: &ApiResponse, needle: &str) -> Result<(), ContractFailure> {
    if response.body_contains(needle) {
        return Ok(());
    }
    Err(ContractFailure::body(format!("expected body containing `{needle}`"), response))
}

/// Requires status 200 and the exact "No such name" sentinel body.
///
/// # Errors
///
/// Returns a failure when either part differs.
pub fn not_found(response: &ApiResponse) -> Result<(), ContractFailure> {
    status_in(response, &[200])?;
    json_eq(response, &not_found_body())
}

/// Extracts the `result` member of the body.
fn result_member(response: &ApiResponse) -> Result<Value, ContractFailure> {
    let mut body = json_body(response)?;
    body.get_mut("result")
        .map(Value::take)
        .ok_or_else(|| ContractFailure::body("expected a `result` member", response))
}

/// Extracts the `result` array of a listing.
///
/// # Errors
///
/// Returns a failure when `result` is missing or not an array.
pub fn result_list(response: &ApiResponse) -> Result<Vec<Value>, ContractFailure> {
    match result_member(response)? {
        Value::Array(items) => Ok(items),
        _ => Err(ContractFailure::body("expected `result` to be an array", response)),
    }
}

/// Decodes `result[0]` of a single-record lookup.
///
/// # Errors
///
/// Returns a failure when the list is empty or the entry is not a record.
pub fn single_record(response: &ApiResponse) -> Result<Character, ContractFailure> {
    let first = result_list(response)?
        .into_iter()
        .next()
        .ok_or_else(|| ContractFailure::body("expected a non-empty `result` array", response))?;
    Character::from_value(first).map_err(|err| ContractFailure::decode(err, response))
}

/// Decodes the record echoed in `result` by create.
///
/// # Errors
///
/// Returns a failure when `result` is not a complete record.
pub fn echoed_record(response: &ApiResponse) -> Result<Character, ContractFailure> {
    let result = result_member(response)?;
    Character::from_value(result).map_err(|err| ContractFailure::decode(err, response))
}

// ============================================================================
// SECTION: Invariants
// ============================================================================

/// Requires `condition`, failing with `message` otherwise.
///
/// # Errors
///
/// Returns [`ContractFailure::Invariant`] when the condition is false.
pub fn require(condition: bool, message: impl Into<String>) -> Result<(), ContractFailure> {
    if condition { Ok(()) } else { Err(ContractFailure::Invariant(message.into())) }
}

/// Requires `actual == expected`.
///
/// # Errors
///
/// Returns [`ContractFailure::Invariant`] naming both values otherwise.
pub fn require_eq<T>(actual: &T, expected: &T, context: &str) -> Result<(), ContractFailure>
where
    T: PartialEq + Debug + ?Sized,
{
    if actual == expected {
        return Ok(());
    }
    Err(ContractFailure::Invariant(format!(
        "{context}: expected {expected:?}, got {actual:?}"
    )))
}
