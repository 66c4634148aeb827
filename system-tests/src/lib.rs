// system-tests/src/lib.rs
// ============================================================================
// Module: Character Contract System Tests Library
// Description: Run settings shared by the system-test binaries.
// Purpose: Keep artifact-root and timeout settings in one typed place.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! This crate hosts the run settings shared by the system-test binaries in
//! `system-tests/tests`. The binaries drive the contract suite against an
//! in-process service double and, behind the `live-service` feature, against
//! a deployed service.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod settings;
