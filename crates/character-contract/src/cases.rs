// crates/character-contract/src/cases.rs
// ============================================================================
// Module: Case Tables
// Description: Table-driven generators for parametrized scenarios.
// Purpose: Keep scenario inputs declarative and separate from the checks.
// Dependencies: character-client, serde_json
// ============================================================================

//! ## Overview
//! Each generator yields the inputs of one parametrized stage: names to
//! create, (field, value) pairs to type-check, fields to omit, and fields to
//! update. Scenarios iterate the tables and record one case per entry.

use std::collections::BTreeSet;

use character_client::CharacterField;
use character_client::is_addressable;
use serde_json::Value;
use serde_json::json;

use crate::policy::NameCoverage;
use crate::policy::REPRESENTATIVE_NAMES;

// ============================================================================
// SECTION: Fixed Names
// ============================================================================

/// Name used to exercise operations under wrong credentials.
pub const SAMPLE_NAME: &str = "dude";
/// Value written by update scenarios.
pub const CHANGED_VALUE: &str = "i am changed";
/// Value carried by updates that must be refused as a whole.
pub const REFUSED_VALUE: &str = "i must not be stored";
/// Name used by create scenarios that must fail.
pub const REJECTED_NAME: &str = "failanyway";
/// Name inserted before a reset and expected to vanish.
pub const TRANSIENT_NAME: &str = "to_be_deleted";
/// Preferred name known not to exist.
pub const ABSENT_NAME: &str = "i_do_not_exist";
/// Prefix of the filler records of the capacity scenario.
pub const FILLER_PREFIX: &str = "dummy";
/// Name of the create expected to exceed capacity.
pub const OVERFLOW_NAME: &str = "failing";

// ============================================================================
// SECTION: Names
// ============================================================================

/// Returns the names exercised by create scenarios.
#[must_use]
pub fn name_cases(coverage: &NameCoverage) -> Vec<String> {
    match coverage {
        NameCoverage::Representative => {
            REPRESENTATIVE_NAMES.iter().map(ToString::to_string).collect()
        }
        NameCoverage::CodePoints {
            start,
            end,
        } => (*start ..= *end)
            .filter_map(char::from_u32)
            .map(String::from)
            .filter(|name| is_addressable(name))
            .collect(),
    }
}

/// Returns a name that is not in `known`.
#[must_use]
pub fn absent_name<'a>(known: impl IntoIterator<Item = &'a str>) -> String {
    unused_name(ABSENT_NAME, known)
}

/// Returns `base`, or `base_N` with the smallest `N` that is not in `known`.
#[must_use]
pub fn unused_name<'a>(base: &str, known: impl IntoIterator<Item = &'a str>) -> String {
    let known: BTreeSet<&str> = known.into_iter().collect();
    let mut candidate = base.to_string();
    let mut attempt = 0_u32;
    while known.contains(candidate.as_str()) {
        attempt += 1;
        candidate = format!("{base}_{attempt}");
    }
    candidate
}

/// Returns the name of the filler record at `index`.
#[must_use]
pub fn filler_name(index: usize) -> String {
    format!("{FILLER_PREFIX}{index}")
}

// ============================================================================
// SECTION: Values
// ============================================================================

/// One value-type case.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCase {
    /// Field receiving the value.
    pub field: CharacterField,
    /// Short label of the value kind.
    pub kind: &'static str,
    /// Sample value.
    pub value: Value,
}

impl ValueCase {
    /// Label used in reports, e.g. `height=null`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}={}", self.field, self.kind)
    }

    /// Name of the record carrying the sample.
    #[must_use]
    pub fn record_name(&self) -> String {
        format!("sample_{}_{}", self.field, self.kind)
    }
}

/// Returns the sample values with their labels.
#[must_use]
pub fn sample_values() -> Vec<(&'static str, Value)> {
    vec![
        ("empty_string", json!("")),
        ("large_integer", json!(i64::MAX)),
        ("float", json!(1.5)),
        ("null", Value::Null),
        ("mapping", json!({ "nested": { "depth": 2 } })),
        ("sequence", json!(["first", 2, null])),
    ]
}

/// Returns every non-name field crossed with every sample value.
#[must_use]
pub fn value_cases() -> Vec<ValueCase> {
    CharacterField::attributes()
        .flat_map(|field| {
            sample_values().into_iter().map(move |(kind, value)| ValueCase {
                field,
                kind,
                value,
            })
        })
        .collect()
}

// ============================================================================
// SECTION: Fields
// ============================================================================

/// Fields omitted one at a time by the missing-field scenarios.
#[must_use]
pub fn missing_field_cases() -> Vec<CharacterField> {
    CharacterField::ALL.to_vec()
}

/// Fields rewritten one at a time by the update scenarios.
#[must_use]
pub fn update_cases() -> Vec<CharacterField> {
    CharacterField::attributes().collect()
}
