// crates/character-contract/src/scenarios.rs
// ============================================================================
// Module: Contract Scenarios
// Description: The checks each stage runs against the service.
// Purpose: Drive the client and assert documented statuses and bodies.
// Dependencies: character-client, serde_json, tracing
// ============================================================================

//! ## Overview
//! Each stage is one function that records one or more cases. A case fails
//! on its first broken expectation; the remaining cases of the stage still
//! run. Stages only read and write shared data through [`SuiteState`].
//! Invariants:
//! - Create cases only use names the collection does not hold; a name that
//!   is taken is skipped or suffixed.
//! - A case deletes only a record its own create stored; the closing reset
//!   removes anything left behind.
//! - Random record choices come from the seeded RNG in [`SuiteState`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use character_client::ApiResponse;
use character_client::Character;
use character_client::CharacterApi;
use character_client::CharacterField;
use character_client::ClientError;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::cases::CHANGED_VALUE;
use crate::cases::OVERFLOW_NAME;
use crate::cases::SAMPLE_NAME;
use crate::cases::REFUSED_VALUE;
use crate::cases::REJECTED_NAME;
use crate::cases::TRANSIENT_NAME;
use crate::cases::ValueCase;
use crate::cases::absent_name;
use crate::cases::filler_name;
use crate::cases::missing_field_cases;
use crate::cases::name_cases;
use crate::cases::unused_name;
use crate::cases::update_cases;
use crate::cases::value_cases;
use crate::expect::body_contains;
use crate::expect::echoed_record;
use crate::expect::json_eq;
use crate::expect::not_found;
use crate::expect::require;
use crate::expect::require_eq;
use crate::expect::result_list;
use crate::expect::single_record;
use crate::expect::status_in;
use crate::expect::success;
use crate::failure::ContractFailure;
use crate::failure::ExpectedStatuses;
use crate::outcome::DELETED_MARKER;
use crate::outcome::NO_SUCH_NAME;
use crate::outcome::ServiceOutcome;
use crate::outcome::auth_error_body;
use crate::outcome::capacity_error_body;
use crate::outcome::duplicate_message;
use crate::policy::ContractPolicy;
use crate::report::CaseResult;
use crate::report::FailureRecord;
use crate::schema::RecordShape;
use crate::stage::Stage;
use crate::state::SuiteState;

// ============================================================================
// SECTION: Context
// ============================================================================

/// Everything a stage may use.
pub struct StageContext<'a> {
    /// Client with valid credentials.
    pub api: &'a CharacterApi,
    /// Client with invalid credentials.
    pub intruder: &'a CharacterApi,
    /// Expectations in force.
    pub policy: &'a ContractPolicy,
    /// Compiled record schemas.
    pub shape: &'a RecordShape,
    /// State handed between stages.
    pub state: &'a mut SuiteState,
}

/// Collects case results for one stage.
#[derive(Debug)]
pub struct CaseRecorder {
    /// Stage the cases belong to.
    stage: Stage,
    /// Results so far.
    cases: Vec<CaseResult>,
}

impl CaseRecorder {
    /// Starts an empty recorder.
    #[must_use]
    pub const fn new(stage: Stage) -> Self {
        Self {
            stage,
            cases: Vec::new(),
        }
    }

    /// Records one case outcome and hands back its value on success.
    pub fn record<T>(
        &mut self,
        label: impl Into<String>,
        result: Result<T, ContractFailure>,
    ) -> Option<T> {
        let label = label.into();
        match result {
            Ok(value) => {
                tracing::debug!(stage = %self.stage, case = %label, "case passed");
                self.cases.push(CaseResult {
                    label,
                    passed: true,
                    failure: None,
                });
                Some(value)
            }
            Err(failure) => {
                tracing::warn!(stage = %self.stage, case = %label, error = %failure, "case failed");
                self.cases.push(CaseResult {
                    label,
                    passed: false,
                    failure: Some(FailureRecord::from(&failure)),
                });
                None
            }
        }
    }

    /// Returns the recorded results.
    #[must_use]
    pub fn finish(self) -> Vec<CaseResult> {
        self.cases
    }
}

/// Runs the scenarios of `stage`.
pub fn run_stage(stage: Stage, ctx: &mut StageContext<'_>, cases: &mut CaseRecorder) {
    match stage {
        Stage::BadCredentials => bad_credentials(ctx, cases),
        Stage::ListCollection => {
            cases.record(stage.as_str(), list_collection(ctx));
        }
        Stage::ValidateCollection => validate_collection(ctx, cases),
        Stage::FetchExisting => {
            cases.record(stage.as_str(), fetch_existing(ctx));
        }
        Stage::FetchMissing => {
            cases.record(stage.as_str(), fetch_missing(ctx));
        }
        Stage::CreateValid => create_valid(ctx, cases),
        Stage::CreateValueTypes => create_value_types(ctx, cases),
        Stage::CreateDuplicate => {
            cases.record(stage.as_str(), create_duplicate(ctx));
        }
        Stage::CreateMissingField => create_missing_field(ctx, cases),
        Stage::UpdateExisting => update_existing(ctx, cases),
        Stage::UpdateMissingField => update_missing_field(ctx, cases),
        Stage::DeleteExisting => {
            cases.record(stage.as_str(), delete_existing(ctx));
        }
        Stage::DeleteMissing => {
            cases.record(stage.as_str(), delete_missing(ctx));
        }
        Stage::ResetCollection => {
            cases.record(stage.as_str(), reset_collection(ctx));
        }
        Stage::ResetIdempotence => {
            cases.record(stage.as_str(), reset_idempotence(ctx));
        }
        Stage::CapacityCeiling => capacity_ceiling(ctx, cases),
    }
}

// ============================================================================
// SECTION: Authentication
// ============================================================================

/// Service operations, each invoked once under wrong credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `GET /characters`.
    List,
    /// `GET /character/{name}`.
    Get,
    /// `POST /character`.
    Create,
    /// `PUT /character/{name}`.
    Update,
    /// `DELETE /character/{name}`.
    Delete,
    /// `POST /reset`.
    Reset,
}

impl Operation {
    /// Every operation.
    pub const ALL: [Self; 6] =
        [Self::List, Self::Get, Self::Create, Self::Update, Self::Delete, Self::Reset];

    /// Returns the operation label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Reset => "reset",
        }
    }

    /// Invokes the operation with the sample record where one is needed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure.
    pub fn invoke(self, api: &CharacterApi) -> Result<ApiResponse, ClientError> {
        let sample = Character::template(SAMPLE_NAME);
        match self {
            Self::List => api.list_characters(),
            Self::Get => api.get_character(SAMPLE_NAME),
            Self::Create => api.create_character(&sample),
            Self::Update => api.update_character(SAMPLE_NAME, &sample),
            Self::Delete => api.delete_character(SAMPLE_NAME),
            Self::Reset => api.reset_collection(),
        }
    }
}

/// Every operation answers 401 with the uniform credential error.
fn bad_credentials(ctx: &StageContext<'_>, cases: &mut CaseRecorder) {
    for operation in Operation::ALL {
        let result = operation.invoke(ctx.intruder).map_err(ContractFailure::from).and_then(
            |response| {
                status_in(&response, &[401])?;
                json_eq(&response, &auth_error_body())
            },
        );
        cases.record(operation.as_str(), result);
    }
}

// ============================================================================
// SECTION: Collection
// ============================================================================

/// Lists the collection and stores the snapshot.
fn list_collection(ctx: &mut StageContext<'_>) -> Result<(), ContractFailure> {
    let response = ctx.api.list_characters()?;
    status_in(&response, &[200])?;
    let envelope = response.json().map_err(|err| ContractFailure::decode(err, &response))?;
    ctx.shape.check_collection(&envelope).map_err(|reason| {
        ContractFailure::body(format!("expected a listing envelope ({reason})"), &response)
    })?;
    let snapshot = result_list(&response)?;
    tracing::info!(records = snapshot.len(), "baseline snapshot captured");
    ctx.state.set_snapshot(snapshot);
    Ok(())
}

/// Checks size, completeness and name uniqueness of the snapshot.
fn validate_collection(ctx: &mut StageContext<'_>, cases: &mut CaseRecorder) {
    let snapshot = match ctx.state.snapshot() {
        Ok(snapshot) => snapshot.to_vec(),
        Err(failure) => {
            cases.record("snapshot", Err::<(), _>(failure));
            return;
        }
    };
    let minimum = ctx.policy.min_collection_size;
    let sized = cases.record(
        "minimum-size",
        require(
            snapshot.len() >= minimum,
            format!("collection holds {} records, expected at least {minimum}", snapshot.len()),
        ),
    );
    let records = cases.record("complete-records", complete_records(ctx.shape, &snapshot));
    let unique = cases.record("unique-names", unique_names(&snapshot));
    if let (Some(()), Some(records), Some(())) = (sized, records, unique) {
        ctx.state.set_baseline(records);
    }
}

/// Checks every entry against the record schema and decodes it.
fn complete_records(
    shape: &RecordShape,
    snapshot: &[Value],
) -> Result<Vec<Character>, ContractFailure> {
    snapshot
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            shape.check_record(entry).map_err(|reason| {
                ContractFailure::Invariant(format!(
                    "collection entry {index} is not a complete record: {reason}"
                ))
            })?;
            Character::from_value(entry.clone()).map_err(|err| {
                ContractFailure::Invariant(format!("collection entry {index} does not decode: {err}"))
            })
        })
        .collect()
}

/// Checks that no two entries share a name.
fn unique_names(snapshot: &[Value]) -> Result<(), ContractFailure> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for entry in snapshot {
        *counts.entry(name_key(entry)).or_default() += 1;
    }
    let duplicated: Vec<String> =
        counts.into_iter().filter(|(_, count)| *count > 1).map(|(name, _)| name).collect();
    require(duplicated.is_empty(), format!("names occur more than once: {}", duplicated.join(", ")))
}

// ============================================================================
// SECTION: Reads
// ============================================================================

/// A random baseline record reads back unchanged.
fn fetch_existing(ctx: &mut StageContext<'_>) -> Result<(), ContractFailure> {
    let record = ctx.state.pick()?;
    let fetched = fetch_record(ctx.api, &record.name)?;
    require_eq(&fetched, &record, "fetched baseline record")
}

/// An absent name reads back as the exact sentinel.
fn fetch_missing(ctx: &StageContext<'_>) -> Result<(), ContractFailure> {
    let name = absent_name_for(ctx)?;
    not_found(&ctx.api.get_character(&name)?)
}

// ============================================================================
// SECTION: Creates
// ============================================================================

/// Each free candidate name round-trips through create, get and delete.
fn create_valid(ctx: &StageContext<'_>, cases: &mut CaseRecorder) {
    let Some(occupied) = occupied_or_record(ctx, cases) else {
        return;
    };
    for name in name_cases(&ctx.policy.name_coverage) {
        if occupied.contains(&name) {
            tracing::info!(name = %name, "name already taken, create case skipped");
            continue;
        }
        let mut stored = false;
        let result = create_round_trip(ctx.api, &name, &mut stored);
        if result.is_err() && stored {
            discard(ctx.api, &name);
        }
        cases.record(name, result);
    }
}

/// Creates, reads, deletes and re-reads one template record.
///
/// `stored` is set when the create answered 2xx.
fn create_round_trip(
    api: &CharacterApi,
    name: &str,
    stored: &mut bool,
) -> Result<(), ContractFailure> {
    let record = Character::template(name);
    let created = api.create_character(&record)?;
    *stored = created.is_success();
    success(&created)?;
    require_eq(&echoed_record(&created)?, &record, "record echoed by create")?;
    require_eq(&fetch_record(api, name)?, &record, "record read after create")?;
    let deleted = api.delete_character(name)?;
    body_contains(&deleted, DELETED_MARKER)?;
    not_found(&api.get_character(name)?)
}

/// Each (field, value) sample is stored verbatim or refused cleanly.
fn create_value_types(ctx: &StageContext<'_>, cases: &mut CaseRecorder) {
    let Some(occupied) = occupied_or_record(ctx, cases) else {
        return;
    };
    for case in value_cases() {
        let name = unused_name(&case.record_name(), occupied.iter().map(String::as_str));
        let mut stored = false;
        let result = value_round_trip(ctx.api, ctx.policy, &case, &name, &mut stored);
        if result.is_err() && stored {
            discard(ctx.api, &name);
        }
        cases.record(case.label(), result);
    }
}

/// Creates one record named `name` carrying a sample value and checks the
/// outcome; `stored` is set when the create answered 2xx.
fn value_round_trip(
    api: &CharacterApi,
    policy: &ContractPolicy,
    case: &ValueCase,
    name: &str,
    stored: &mut bool,
) -> Result<(), ContractFailure> {
    let record = Character::template(name).with_attribute(case.field, case.value.clone());
    let created = api.create_character(&record)?;
    *stored = created.is_success();
    match ServiceOutcome::classify(&created, policy) {
        ServiceOutcome::Success => {
            require_eq(&echoed_record(&created)?, &record, "record echoed by create")?;
            require_eq(&fetch_record(api, name)?, &record, "record read after create")?;
            body_contains(&api.delete_character(name)?, DELETED_MARKER)
        }
        ServiceOutcome::ValidationFailure => not_found(&api.get_character(name)?),
        _ => Err(ContractFailure::UnexpectedStatus {
            expected: ExpectedStatuses::SuccessOr(policy.malformed_payload_statuses.clone()),
            response: (&created).into(),
        }),
    }
}

/// A taken name is refused and nothing changes.
fn create_duplicate(ctx: &mut StageContext<'_>) -> Result<(), ContractFailure> {
    let existing = ctx.state.pick()?;
    let size_before = collection_size(ctx.api)?;
    let stored_before = fetch_record(ctx.api, &existing.name)?;
    let response = ctx.api.create_character(&Character::template(existing.name.as_str()))?;
    body_contains(&response, &duplicate_message(&existing.name))?;
    require_eq(&collection_size(ctx.api)?, &size_before, "collection size after duplicate create")?;
    require_eq(
        &fetch_record(ctx.api, &existing.name)?,
        &stored_before,
        "stored record after duplicate create",
    )
}

/// A create lacking any one field is refused and nothing is stored.
fn create_missing_field(ctx: &StageContext<'_>, cases: &mut CaseRecorder) {
    let Some(occupied) = occupied_or_record(ctx, cases) else {
        return;
    };
    let name = unused_name(REJECTED_NAME, occupied.iter().map(String::as_str));
    for field in missing_field_cases() {
        let payload = Character::template(name.as_str()).without(field);
        let mut stored = false;
        let result = refused_create(ctx, &payload, &name, &mut stored);
        if stored {
            discard(ctx.api, &name);
        }
        cases.record(format!("without {field}"), result);
    }
}

/// Sends an incomplete create and requires it to be refused and not stored.
///
/// `stored` is set when the create answered 2xx.
fn refused_create(
    ctx: &StageContext<'_>,
    payload: &Map<String, Value>,
    name: &str,
    stored: &mut bool,
) -> Result<(), ContractFailure> {
    let response = ctx.api.create_character(payload)?;
    *stored = response.is_success();
    status_in(&response, &ctx.policy.malformed_payload_statuses)?;
    not_found(&ctx.api.get_character(name)?)
}

// ============================================================================
// SECTION: Updates
// ============================================================================

/// Each non-name field of a baseline record can be rewritten.
fn update_existing(ctx: &mut StageContext<'_>, cases: &mut CaseRecorder) {
    for field in update_cases() {
        let result = ctx.state.pick().and_then(|target| {
            let current = fetch_record(ctx.api, &target.name)?;
            let updated = current.with_attribute(field, json!(CHANGED_VALUE));
            status_in(&ctx.api.update_character(&target.name, &updated)?, &[200])?;
            require_eq(&fetch_record(ctx.api, &target.name)?, &updated, "record read after update")
        });
        cases.record(field.as_str(), result);
    }
}

/// An update lacking any one field is refused as a whole: none of the
/// fields it does carry are applied.
fn update_missing_field(ctx: &mut StageContext<'_>, cases: &mut CaseRecorder) {
    for field in missing_field_cases() {
        let result = ctx.state.pick().and_then(|target| {
            let before = fetch_record(ctx.api, &target.name)?;
            let response = ctx.api.update_character(&target.name, &refused_update(&before, field))?;
            status_in(&response, &ctx.policy.malformed_payload_statuses)?;
            require_eq(
                &fetch_record(ctx.api, &target.name)?,
                &before,
                "record read after refused update",
            )
        });
        cases.record(format!("without {field}"), result);
    }
}

/// Returns `record` with every attribute rewritten and `field` removed.
fn refused_update(record: &Character, field: CharacterField) -> Map<String, Value> {
    update_cases()
        .into_iter()
        .fold(record.clone(), |changed, attribute| {
            changed.with_attribute(attribute, json!(REFUSED_VALUE))
        })
        .without(field)
}

// ============================================================================
// SECTION: Deletes
// ============================================================================

/// A random baseline record is deleted and remembered.
fn delete_existing(ctx: &mut StageContext<'_>) -> Result<(), ContractFailure> {
    let record = ctx.state.pick()?;
    body_contains(&ctx.api.delete_character(&record.name)?, DELETED_MARKER)?;
    body_contains(&ctx.api.get_character(&record.name)?, NO_SUCH_NAME)?;
    tracing::info!(name = %record.name, "baseline record deleted");
    ctx.state.set_deleted(record);
    Ok(())
}

/// Deleting an absent name reports it and changes nothing.
fn delete_missing(ctx: &StageContext<'_>) -> Result<(), ContractFailure> {
    let name = absent_name_for(ctx)?;
    let size_before = collection_size(ctx.api)?;
    body_contains(&ctx.api.delete_character(&name)?, NO_SUCH_NAME)?;
    require_eq(&collection_size(ctx.api)?, &size_before, "collection size after deleting absent name")
}

// ============================================================================
// SECTION: Reset
// ============================================================================

/// Reset restores the deleted record and drops the added one.
fn reset_collection(ctx: &StageContext<'_>) -> Result<(), ContractFailure> {
    let deleted = ctx.state.deleted()?;
    let snapshot = ctx.state.snapshot()?;
    let occupied = occupied_names(ctx)?;
    let transient = unused_name(TRANSIENT_NAME, occupied.iter().map(String::as_str));
    success(&ctx.api.create_character(&Character::template(transient.as_str()))?)?;
    success(&ctx.api.reset_collection()?)?;
    require_eq(&fetch_record(ctx.api, &deleted.name)?, deleted, "deleted record after reset")?;
    body_contains(&ctx.api.get_character(&transient)?, NO_SUCH_NAME)?;
    require_same_collection(&listing(ctx.api)?, snapshot, "collection after reset")
}

/// Two consecutive resets yield identical baselines.
fn reset_idempotence(ctx: &StageContext<'_>) -> Result<(), ContractFailure> {
    let snapshot = ctx.state.snapshot()?;
    success(&ctx.api.reset_collection()?)?;
    let first = listing(ctx.api)?;
    success(&ctx.api.reset_collection()?)?;
    let second = listing(ctx.api)?;
    require_same_collection(&second, &first, "collection after second reset")?;
    require_same_collection(&first, snapshot, "collection after first reset")
}

// ============================================================================
// SECTION: Capacity
// ============================================================================

/// Fills the collection to the ceiling and tries one past it.
fn capacity_ceiling(ctx: &StageContext<'_>, cases: &mut CaseRecorder) {
    let capacity = ctx.policy.capacity;
    let Some(occupied) = occupied_or_record(ctx, cases) else {
        return;
    };
    let Some(next_index) =
        cases.record("fill", fill_to(ctx, &occupied, capacity.saturating_sub(1)))
    else {
        return;
    };
    tracing::info!(capacity, "collection filled up to its last free slot");
    let (_, last_name) = next_filler(&occupied, next_index);
    if cases.record("last-slot", create_and_read(ctx.api, &last_name)).is_none() {
        return;
    }
    let overflow_name = unused_name(OVERFLOW_NAME, occupied.iter().map(String::as_str));
    cases.record("overflow", overflow(ctx.api, &overflow_name, capacity));
}

/// Creates filler records until the collection holds `target` records.
///
/// Returns the filler index to continue from.
fn fill_to(
    ctx: &StageContext<'_>,
    occupied: &BTreeSet<String>,
    target: usize,
) -> Result<usize, ContractFailure> {
    let mut size = collection_size(ctx.api)?;
    require(size <= target, format!("collection already holds {size} records, above {target}"))?;
    let mut index = 0;
    while size < target {
        let (used, name) = next_filler(occupied, index);
        success(&ctx.api.create_character(&Character::template(name.as_str()))?)?;
        index = used + 1;
        size += 1;
    }
    require_eq(&collection_size(ctx.api)?, &target, "collection size after filling")?;
    Ok(index)
}

/// Returns the first filler index at or after `from` whose name is unused.
fn next_filler(occupied: &BTreeSet<String>, from: usize) -> (usize, String) {
    let mut index = from;
    loop {
        let name = filler_name(index);
        if !occupied.contains(&name) {
            return (index, name);
        }
        index += 1;
    }
}

/// Creates a template record and reads it back.
fn create_and_read(api: &CharacterApi, name: &str) -> Result<(), ContractFailure> {
    let record = Character::template(name);
    success(&api.create_character(&record)?)?;
    require_eq(&fetch_record(api, name)?, &record, "record read in last free slot")
}

/// One create past the ceiling is refused and not stored.
fn overflow(api: &CharacterApi, name: &str, capacity: usize) -> Result<(), ContractFailure> {
    let response = api.create_character(&Character::template(name))?;
    status_in(&response, &[400])?;
    json_eq(&response, &capacity_error_body(capacity))?;
    not_found(&api.get_character(name)?)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Lists the collection, requiring 200 and a `result` array.
fn listing(api: &CharacterApi) -> Result<Vec<Value>, ContractFailure> {
    let response = api.list_characters()?;
    status_in(&response, &[200])?;
    result_list(&response)
}

/// Returns the current collection size.
fn collection_size(api: &CharacterApi) -> Result<usize, ContractFailure> {
    Ok(listing(api)?.len())
}

/// Reads one record, requiring 200 and a decodable `result[0]`.
fn fetch_record(api: &CharacterApi, name: &str) -> Result<Character, ContractFailure> {
    let response = api.get_character(name)?;
    status_in(&response, &[200])?;
    single_record(&response)
}

/// Returns the names held right now together with the known baseline names.
fn occupied_names(ctx: &StageContext<'_>) -> Result<BTreeSet<String>, ContractFailure> {
    let mut names = ctx.state.known_names();
    names.extend(
        listing(ctx.api)?
            .iter()
            .filter_map(|entry| entry.get("name").and_then(Value::as_str))
            .map(ToString::to_string),
    );
    Ok(names)
}

/// Like [`occupied_names`], recording a failed case when the listing fails.
fn occupied_or_record(
    ctx: &StageContext<'_>,
    cases: &mut CaseRecorder,
) -> Option<BTreeSet<String>> {
    match occupied_names(ctx) {
        Ok(names) => Some(names),
        Err(failure) => cases.record("occupied-names", Err(failure)),
    }
}

/// Returns a name the collection does not hold.
fn absent_name_for(ctx: &StageContext<'_>) -> Result<String, ContractFailure> {
    let occupied = occupied_names(ctx)?;
    Ok(absent_name(occupied.iter().map(String::as_str)))
}

/// Best-effort removal of a record a failed case may have left behind.
fn discard(api: &CharacterApi, name: &str) {
    match api.delete_character(name) {
        Ok(response) => tracing::debug!(name, status = response.status, "discarded case record"),
        Err(err) => tracing::debug!(name, error = %err, "discard failed"),
    }
}

/// Returns the sort key of a listing entry.
fn name_key(entry: &Value) -> String {
    match entry.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
        None => entry.to_string(),
    }
}

/// Requires two listings to hold the same records regardless of order.
fn require_same_collection(
    actual: &[Value],
    expected: &[Value],
    context: &str,
) -> Result<(), ContractFailure> {
    let index = |entries: &[Value]| -> BTreeMap<String, Vec<Value>> {
        let mut map: BTreeMap<String, Vec<Value>> = BTreeMap::new();
        for entry in entries {
            map.entry(name_key(entry)).or_default().push(entry.clone());
        }
        map
    };
    let actual = index(actual);
    let expected = index(expected);
    if actual == expected {
        return Ok(());
    }
    let missing: Vec<&str> =
        expected.keys().filter(|name| !actual.contains_key(*name)).map(String::as_str).collect();
    let extra: Vec<&str> =
        actual.keys().filter(|name| !expected.contains_key(*name)).map(String::as_str).collect();
    let changed: Vec<&str> = expected
        .iter()
        .filter(|(name, records)| actual.get(*name).is_some_and(|found| found != *records))
        .map(|(name, _)| name.as_str())
        .collect();
    Err(ContractFailure::Invariant(format!(
        "{context} differs from the baseline: missing [{}], unexpected [{}], changed [{}]",
        missing.join(", "),
        extra.join(", "),
        changed.join(", ")
    )))
}
