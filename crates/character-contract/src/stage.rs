// crates/character-contract/src/stage.rs
// ============================================================================
// Module: Contract Stages
// Description: Canonical stage catalog, dependencies, and run planning.
// Purpose: Make scenario ordering and shared-state hand-offs explicit.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The suite runs in stages against one shared collection. Each [`Stage`]
//! declares the stages whose results it consumes; [`plan`] turns a selection
//! into an ordered run list and [`validate_order`] rejects any order that
//! would run a stage before one of its dependencies.
//! Invariants:
//! - [`Stage::ALL`] is a valid order: every dependency precedes its dependant.
//! - A planned run contains each stage at most once.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Stage Catalog
// ============================================================================

/// One group of contract scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Every operation is refused under a wrong password.
    BadCredentials,
    /// The listing is fetched and kept as the baseline snapshot.
    ListCollection,
    /// The snapshot is checked for size, completeness and unique names.
    ValidateCollection,
    /// A random baseline record is fetched by name.
    FetchExisting,
    /// An absent name yields the "No such name" sentinel.
    FetchMissing,
    /// Valid records round-trip through create, get and delete.
    CreateValid,
    /// Free-form field values are accepted and round-trip, or rejected.
    CreateValueTypes,
    /// A create with a taken name is refused without side effects.
    CreateDuplicate,
    /// A create lacking any one field is refused.
    CreateMissingField,
    /// Each non-name field of a baseline record can be rewritten.
    UpdateExisting,
    /// An update lacking any one field is refused without side effects.
    UpdateMissingField,
    /// A baseline record is deleted.
    DeleteExisting,
    /// Deleting an absent name changes nothing.
    DeleteMissing,
    /// Reset restores the baseline and drops additions.
    ResetCollection,
    /// Two consecutive resets yield the same baseline.
    ResetIdempotence,
    /// The collection ceiling is enforced exactly.
    CapacityCeiling,
}

impl Stage {
    /// Canonical run order.
    pub const ALL: [Self; 16] = [
        Self::BadCredentials,
        Self::ListCollection,
        Self::ValidateCollection,
        Self::FetchExisting,
        Self::FetchMissing,
        Self::CreateValid,
        Self::CreateValueTypes,
        Self::CreateDuplicate,
        Self::CreateMissingField,
        Self::UpdateExisting,
        Self::UpdateMissingField,
        Self::DeleteExisting,
        Self::DeleteMissing,
        Self::ResetCollection,
        Self::ResetIdempotence,
        Self::CapacityCeiling,
    ];

    /// Returns the stable kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadCredentials => "bad-credentials",
            Self::ListCollection => "list-collection",
            Self::ValidateCollection => "validate-collection",
            Self::FetchExisting => "fetch-existing",
            Self::FetchMissing => "fetch-missing",
            Self::CreateValid => "create-valid",
            Self::CreateValueTypes => "create-value-types",
            Self::CreateDuplicate => "create-duplicate",
            Self::CreateMissingField => "create-missing-field",
            Self::UpdateExisting => "update-existing",
            Self::UpdateMissingField => "update-missing-field",
            Self::DeleteExisting => "delete-existing",
            Self::DeleteMissing => "delete-missing",
            Self::ResetCollection => "reset-collection",
            Self::ResetIdempotence => "reset-idempotence",
            Self::CapacityCeiling => "capacity-ceiling",
        }
    }

    /// Returns the stages whose results this stage consumes.
    #[must_use]
    pub const fn dependencies(self) -> &'static [Self] {
        match self {
            Self::BadCredentials
            | Self::ListCollection
            | Self::FetchMissing
            | Self::CreateValid
            | Self::CreateValueTypes
            | Self::CreateMissingField
            | Self::DeleteMissing => &[],
            Self::ValidateCollection => &[Self::ListCollection],
            Self::FetchExisting
            | Self::CreateDuplicate
            | Self::UpdateExisting
            | Self::UpdateMissingField
            | Self::DeleteExisting
            | Self::CapacityCeiling => &[Self::ValidateCollection],
            Self::ResetCollection => &[Self::DeleteExisting],
            Self::ResetIdempotence => &[Self::ResetCollection],
        }
    }

    /// Returns a one-line description of what the stage checks.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::BadCredentials => "every operation answers 401 to a wrong password",
            Self::ListCollection => "listing answers 200 with a result array",
            Self::ValidateCollection => "baseline records are complete and uniquely named",
            Self::FetchExisting => "a baseline record is returned unchanged by name",
            Self::FetchMissing => "an absent name answers the no-such-name sentinel",
            Self::CreateValid => "valid records round-trip through create, get, delete",
            Self::CreateValueTypes => "free-form values are stored verbatim or refused",
            Self::CreateDuplicate => "a taken name is refused without side effects",
            Self::CreateMissingField => "a create lacking a field is refused",
            Self::UpdateExisting => "each non-name field can be rewritten",
            Self::UpdateMissingField => "an update lacking a field is refused",
            Self::DeleteExisting => "a baseline record can be deleted",
            Self::DeleteMissing => "deleting an absent name changes nothing",
            Self::ResetCollection => "reset restores the baseline and drops additions",
            Self::ResetIdempotence => "consecutive resets yield the same baseline",
            Self::CapacityCeiling => "the collection ceiling is enforced exactly",
        }
    }

    /// Position in [`Stage::ALL`].
    fn rank(self) -> usize {
        Self::ALL.iter().position(|stage| *stage == self).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = PlanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == value)
            .ok_or_else(|| PlanError::UnknownStage(value.to_string()))
    }
}

// ============================================================================
// SECTION: Planning
// ============================================================================

/// Errors raised while ordering stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// No stage has this name.
    #[error("unknown stage `{0}`")]
    UnknownStage(String),
    /// A dependency appears after the stage that needs it.
    #[error("stage {stage} is ordered before its dependency {dependency}")]
    DependencyAfter {
        /// Dependant stage.
        stage: Stage,
        /// Dependency ordered too late.
        dependency: Stage,
    },
    /// A dependency is absent from the order.
    #[error("stage {stage} depends on {dependency}, which is not planned")]
    DependencyMissing {
        /// Dependant stage.
        stage: Stage,
        /// Missing dependency.
        dependency: Stage,
    },
    /// A stage appears more than once.
    #[error("stage {0} is planned more than once")]
    Duplicate(Stage),
}

/// Checks that `order` lists each stage once and after its dependencies.
///
/// # Errors
///
/// Returns the first [`PlanError`] found scanning `order` front to back.
pub fn validate_order(order: &[Stage]) -> Result<(), PlanError> {
    let mut seen = BTreeSet::new();
    for stage in order {
        if !seen.insert(*stage) {
            return Err(PlanError::Duplicate(*stage));
        }
        for dependency in stage.dependencies() {
            if seen.contains(dependency) {
                continue;
            }
            if order.contains(dependency) {
                return Err(PlanError::DependencyAfter {
                    stage: *stage,
                    dependency: *dependency,
                });
            }
            return Err(PlanError::DependencyMissing {
                stage: *stage,
                dependency: *dependency,
            });
        }
    }
    Ok(())
}

/// Expands a selection with its transitive dependencies in canonical order.
///
/// An empty selection plans every stage.
///
/// # Errors
///
/// Returns [`PlanError`] if the expanded order fails validation.
pub fn plan(selected: &[Stage]) -> Result<Vec<Stage>, PlanError> {
    if selected.is_empty() {
        let order = Stage::ALL.to_vec();
        validate_order(&order)?;
        return Ok(order);
    }
    let mut included = BTreeSet::new();
    let mut pending: Vec<Stage> = selected.to_vec();
    while let Some(stage) = pending.pop() {
        if included.insert(stage) {
            pending.extend_from_slice(stage.dependencies());
        }
    }
    let mut order: Vec<Stage> = included.into_iter().collect();
    order.sort_by_key(|stage| stage.rank());
    validate_order(&order)?;
    Ok(order)
}
