// crates/character-contract/src/lib.rs
// ============================================================================
// Module: Character Contract
// Description: Contract suite for the character collection service.
// Purpose: Check a live service against its documented REST contract.
// Dependencies: character-client, jsonschema, rand, serde, serde_jcs, thiserror, toml, tracing
// ============================================================================

//! ## Overview
//! The suite drives a [`character_client::CharacterApi`] through sixteen
//! ordered [`Stage`]s: authentication failure, collection read and
//! validation, single-record CRUD, duplicate and missing-field rejection,
//! value-type handling, reset-to-baseline and its idempotence, and the
//! collection ceiling. Stages share data only through [`SuiteState`], declare
//! their dependencies, and are skipped when a dependency did not pass.
//! Invariants:
//! - Stages run sequentially on one thread; the collection is shared state.
//! - Every run ends with a reset of the collection, even when unwinding.
//! - Unsettled service behavior is a [`ContractPolicy`] parameter.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cases;
pub mod config;
pub mod expect;
pub mod failure;
pub mod outcome;
pub mod policy;
pub mod report;
pub mod runner;
pub mod scenarios;
pub mod schema;
pub mod session;
pub mod stage;
pub mod state;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::ContractConfig;
pub use failure::CapturedResponse;
pub use failure::ContractFailure;
pub use outcome::ServiceOutcome;
pub use policy::ContractPolicy;
pub use policy::NameCoverage;
pub use report::ReportError;
pub use report::StageStatus;
pub use report::SuiteReport;
pub use runner::ContractSuite;
pub use runner::RunError;
pub use session::Session;
pub use stage::PlanError;
pub use stage::Stage;
pub use state::SuiteState;
