// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for character contract system-tests.
// Purpose: Provide the service double, suite wiring, and artifact utilities.
// Dependencies: system-tests, character-client, character-contract
// ============================================================================

//! ## Overview
//! Shared helpers for character contract system-tests.
//! Invariants:
//! - Every test owns its service double; no state crosses tests.
//! - Every test writes a summary under its run root.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]
#![allow(
    clippy::missing_docs_in_private_items,
    clippy::panic,
    reason = "Test helpers favor brevity and fail loudly on misconfiguration."
)]

pub mod artifacts;
pub mod harness;
