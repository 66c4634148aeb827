// system-tests/tests/suites/conformance.rs
// ============================================================================
// Module: Conformance Tests
// Description: Full contract runs against a service that honors the contract.
// Purpose: Prove the suite passes, plans and tears down as documented.
// Dependencies: character-client, character-contract, helpers
// ============================================================================

//! ## Overview
//! Every test starts its own compliant service double, runs some or all of
//! the contract stages and checks the report, the transcript and the state
//! the double is left in.
//! Invariants:
//! - A compliant service passes every stage.
//! - The collection is back at its baseline after every run.

use character_client::Character;
use character_contract::NameCoverage;
use character_contract::Stage;
use character_contract::StageStatus;
use character_contract::cases::OVERFLOW_NAME;
use character_contract::cases::REJECTED_NAME;
use character_contract::outcome::not_found_body;
use serde_json::json;

use crate::helpers::artifacts::TestReporter;
use crate::helpers::harness::api_for;
use crate::helpers::harness::failing_stages;
use crate::helpers::harness::policy_with_capacity;
use crate::helpers::harness::request_lines;
use crate::helpers::harness::status_of;
use crate::helpers::harness::suite_for;
use crate::helpers::service_double::DoubleBehavior;
use crate::helpers::service_double::ServiceDouble;
use crate::helpers::service_double::default_baseline;

#[test]
fn full_contract_passes_at_default_capacity() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("full_contract_passes_at_default_capacity")?;
    let double = ServiceDouble::start()?;
    let suite = suite_for(&double, character_contract::ContractPolicy::default())?;

    let report = suite.run(&[])?;
    let artifacts = reporter.artifacts().write_report(&report, &suite.api().transcript())?;

    require(report.passed(), format!("suite failed: {:?}", failing_stages(&report)))?;
    require_eq(&report.planned, &Stage::ALL.to_vec(), "planned stages")?;
    require_eq(&report.counts().passed, &Stage::ALL.len(), "passed stage count")?;
    require_eq(&report.teardown.status, &Some(200), "teardown status")?;
    require(double.at_baseline(), "collection left away from its baseline")?;
    require(!double.names().iter().any(|name| name == OVERFLOW_NAME), "overflow record stored")?;

    reporter.finish(
        "pass",
        vec!["compliant double passes every stage at capacity 500".to_string()],
        artifacts,
    )?;
    Ok(())
}

#[test]
fn full_contract_passes_at_small_capacity() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("full_contract_passes_at_small_capacity")?;
    let behavior = DoubleBehavior {
        capacity: 8,
        ..DoubleBehavior::default()
    };
    let double = ServiceDouble::with_behavior(behavior, default_baseline())?;
    let suite = suite_for(&double, policy_with_capacity(8))?;

    let report = suite.run(&[Stage::CapacityCeiling])?;
    let artifacts = reporter.artifacts().write_report(&report, &suite.api().transcript())?;

    require(report.passed(), format!("suite failed: {:?}", failing_stages(&report)))?;
    let ceiling = report.stage(Stage::CapacityCeiling).ok_or("capacity stage missing")?;
    let labels: Vec<&str> = ceiling.cases.iter().map(|case| case.label.as_str()).collect();
    require_eq(&labels, &vec!["fill", "last-slot", "overflow"], "capacity case labels")?;
    require(double.at_baseline(), "collection left away from its baseline")?;

    reporter.finish("pass", vec!["ceiling checked at capacity 8".to_string()], artifacts)?;
    Ok(())
}

#[test]
fn selection_pulls_in_dependencies_in_canonical_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("selection_pulls_in_dependencies_in_canonical_order")?;
    let double = ServiceDouble::start()?;
    let suite = suite_for(&double, character_contract::ContractPolicy::default())?;

    let report = suite.run(&[Stage::ResetCollection])?;

    require_eq(
        &report.planned,
        &vec![
            Stage::ListCollection,
            Stage::ValidateCollection,
            Stage::DeleteExisting,
            Stage::ResetCollection,
        ],
        "planned stages",
    )?;
    require(report.passed(), format!("suite failed: {:?}", failing_stages(&report)))?;
    require_eq(&status_of(&report, Stage::CreateValid), &None, "unselected stage status")?;

    reporter.finish("pass", vec!["dependencies planned ahead of reset".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn same_seed_issues_the_same_requests() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("same_seed_issues_the_same_requests")?;
    let selection =
        [Stage::FetchExisting, Stage::UpdateExisting, Stage::DeleteExisting, Stage::CreateDuplicate];
    let mut runs = Vec::new();
    for _ in 0 .. 2 {
        let double = ServiceDouble::start()?;
        let mut policy = character_contract::ContractPolicy::default();
        policy.seed = 42;
        let suite = suite_for(&double, policy)?;
        let report = suite.run(&selection)?;
        require(report.passed(), format!("suite failed: {:?}", failing_stages(&report)))?;
        runs.push(request_lines(&suite.api().transcript(), double.base_url()));
    }

    require(!runs[0].is_empty(), "no requests recorded")?;
    require_eq(&runs[0], &runs[1], "request sequences for seed 42")?;
    let path = reporter.artifacts().write_json("requests.json", &runs[0])?;

    reporter.finish(
        "pass",
        vec!["two seeded runs issued identical requests".to_string()],
        vec![path.display().to_string()],
    )?;
    Ok(())
}

#[test]
fn code_point_names_are_exercised() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("code_point_names_are_exercised")?;
    let double = ServiceDouble::start()?;
    let mut policy = character_contract::ContractPolicy::default();
    policy.name_coverage = NameCoverage::CodePoints {
        start: 0x41,
        end: 0x5a,
    };
    let suite = suite_for(&double, policy)?;

    let report = suite.run(&[Stage::CreateValid])?;

    require(report.passed(), format!("suite failed: {:?}", failing_stages(&report)))?;
    let create = report.stage(Stage::CreateValid).ok_or("create stage missing")?;
    require_eq(&create.cases.len(), &26, "one case per letter")?;
    require_eq(&status_of(&report, Stage::CreateValid), &Some(StageStatus::Passed), "status")?;

    reporter.finish("pass", vec!["A through Z round-trip".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn dude_round_trips_through_the_client() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("dude_round_trips_through_the_client")?;
    let double = ServiceDouble::start()?;
    let api = api_for(&double)?;
    let dude = json!({
        "name": "dude",
        "education": "",
        "height": 0,
        "identity": "",
        "other_aliases": "",
        "universe": "",
        "weight": 0
    });
    require_eq(&Character::template("dude"), &Character::from_value(dude.clone())?, "template")?;

    let created = api.create_character(&dude)?;
    require_eq(&created.status, &200, "create status")?;
    let fetched = api.get_character("dude")?.json()?;
    require_eq(&fetched, &json!({ "result": [dude] }), "record after create")?;
    let deleted = api.delete_character("dude")?;
    require(deleted.body_contains("dude is deleted"), format!("delete body: {}", deleted.body))?;
    let gone = api.get_character("dude")?;
    require_eq(&gone.status, &200, "status after delete")?;
    require_eq(&gone.json()?, &not_found_body(), "body after delete")?;

    let path = reporter.artifacts().write_json("transcript.json", &api.transcript())?;
    reporter.finish(
        "pass",
        vec!["create, get, delete, get for dude".to_string()],
        vec![path.display().to_string()],
    )?;
    Ok(())
}

#[test]
fn names_with_spaces_are_addressable() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("names_with_spaces_are_addressable")?;
    let double = ServiceDouble::start()?;
    let api = api_for(&double)?;

    let response = api.get_character("Black Widow")?;
    let record = response.json()?;
    let name = record.pointer("/result/0/name").cloned();
    require_eq(&name, &Some(json!("Black Widow")), "record fetched by spaced name")?;
    require(
        double.requests().iter().any(|line| line == "GET /character/Black%20Widow"),
        format!("space not percent-encoded: {:?}", double.requests()),
    )?;

    reporter.finish("pass", vec!["space encoded as %20".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn create_stages_leave_taken_names_alone() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("create_stages_leave_taken_names_alone")?;
    let taken = ["G", REJECTED_NAME, "sample_height_null"];
    let mut baseline = default_baseline();
    baseline.extend(taken.into_iter().map(Character::template));
    let double = ServiceDouble::with_behavior(DoubleBehavior::default(), baseline)?;
    let suite = suite_for(&double, character_contract::ContractPolicy::default())?;

    let report = suite.run(&[
        Stage::CreateValid,
        Stage::CreateMissingField,
        Stage::CreateValueTypes,
        Stage::CreateDuplicate,
    ])?;
    let artifacts = reporter.artifacts().write_report(&report, &suite.api().transcript())?;

    require(report.passed(), format!("suite failed: {:?}", failing_stages(&report)))?;
    let create_valid = report.stage(Stage::CreateValid).ok_or("create stage missing")?;
    let labels: Vec<&str> = create_valid.cases.iter().map(|case| case.label.as_str()).collect();
    require_eq(&labels, &vec!["dude", "Good_Name", "11111", "10g"], "create cases")?;
    let requests = double.requests();
    for name in taken {
        let delete = format!("DELETE /character/{name}");
        require(!requests.contains(&delete), format!("taken name deleted: {delete}"))?;
    }
    for line in ["GET /character/failanyway_1", "DELETE /character/sample_height_null_1"] {
        require(requests.iter().any(|request| request == line), format!("missing request: {line}"))?;
    }
    require(double.at_baseline(), "collection left away from its baseline")?;

    reporter.finish(
        "pass",
        vec!["taken names skipped or suffixed, baseline records kept".to_string()],
        artifacts,
    )?;
    Ok(())
}

fn require(condition: bool, message: impl Into<String>) -> Result<(), Box<dyn std::error::Error>> {
    if condition { Ok(()) } else { Err(message.into().into()) }
}

fn require_eq<T: PartialEq + std::fmt::Debug>(
    left: &T,
    right: &T,
    context: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if left == right {
        Ok(())
    } else {
        Err(format!("{context}: left={left:?} right={right:?}").into())
    }
}
