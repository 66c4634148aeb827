// crates/character-contract/src/state.rs
// ============================================================================
// Module: Suite State
// Description: Values handed from one stage to later stages.
// Purpose: Replace implicit fixture mutation with an explicit state object.
// Dependencies: character-client, rand, serde_json
// ============================================================================

//! ## Overview
//! [`SuiteState`] carries the baseline snapshot, the validated baseline
//! records, the record removed by the delete stage, and the seeded RNG used
//! for every random pick. The snapshot is written once and never mutated.

use std::collections::BTreeSet;

use character_client::Character;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde_json::Value;

use crate::failure::ContractFailure;

/// State shared across the stages of one run.
#[derive(Debug)]
pub struct SuiteState {
    /// Raw listing captured by the list stage.
    snapshot: Option<Vec<Value>>,
    /// Snapshot entries decoded after validation.
    baseline: Option<Vec<Character>>,
    /// Baseline record removed by the delete stage.
    deleted: Option<Character>,
    /// Source of every random choice.
    rng: StdRng,
}

impl SuiteState {
    /// Creates empty state with a seeded RNG.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            snapshot: None,
            baseline: None,
            deleted: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Stores the raw baseline listing.
    pub fn set_snapshot(&mut self, snapshot: Vec<Value>) {
        self.snapshot = Some(snapshot);
    }

    /// Returns the raw baseline listing.
    ///
    /// # Errors
    ///
    /// Returns [`ContractFailure::MissingState`] before the list stage ran.
    pub fn snapshot(&self) -> Result<&[Value], ContractFailure> {
        self.snapshot.as_deref().ok_or(ContractFailure::MissingState("collection snapshot"))
    }

    /// Stores the validated baseline records.
    pub fn set_baseline(&mut self, baseline: Vec<Character>) {
        self.baseline = Some(baseline);
    }

    /// Returns the validated baseline records.
    ///
    /// # Errors
    ///
    /// Returns [`ContractFailure::MissingState`] before validation passed.
    pub fn baseline(&self) -> Result<&[Character], ContractFailure> {
        self.baseline.as_deref().ok_or(ContractFailure::MissingState("validated baseline"))
    }

    /// Picks a random baseline record.
    ///
    /// # Errors
    ///
    /// Returns a failure when no baseline exists or it is empty.
    pub fn pick(&mut self) -> Result<Character, ContractFailure> {
        let baseline =
            self.baseline.as_deref().ok_or(ContractFailure::MissingState("validated baseline"))?;
        baseline
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| ContractFailure::Invariant("baseline collection is empty".to_string()))
    }

    /// Remembers the record removed by the delete stage.
    pub fn set_deleted(&mut self, record: Character) {
        self.deleted = Some(record);
    }

    /// Returns the record removed by the delete stage.
    ///
    /// # Errors
    ///
    /// Returns [`ContractFailure::MissingState`] before the delete stage ran.
    pub fn deleted(&self) -> Result<&Character, ContractFailure> {
        self.deleted.as_ref().ok_or(ContractFailure::MissingState("deleted record"))
    }

    /// Returns the baseline names known so far.
    #[must_use]
    pub fn known_names(&self) -> BTreeSet<String> {
        if let Some(baseline) = &self.baseline {
            return baseline.iter().map(|record| record.name.clone()).collect();
        }
        self.snapshot
            .iter()
            .flatten()
            .filter_map(|entry| entry.get("name").and_then(Value::as_str))
            .map(ToString::to_string)
            .collect()
    }
}
