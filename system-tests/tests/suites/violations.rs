// system-tests/tests/suites/violations.rs
// ============================================================================
// Module: Violation Tests
// Description: Contract runs against services that break one rule each.
// Purpose: Prove each departure fails the right stage and nothing else.
// Dependencies: character-contract, helpers
// ============================================================================

//! ## Overview
//! Each test flips one [`DoubleBehavior`] knob (or empties the baseline),
//! runs the stages that cover the rule and checks which stages fail, which
//! are skipped, and that teardown still ran.
//! Invariants:
//! - A departure is reported as a failed stage, never as a run error.
//! - Teardown runs whatever the stage outcome.

use character_client::FIELD_COUNT;
use character_contract::ContractPolicy;
use character_contract::Stage;
use character_contract::StageStatus;
use character_contract::cases::OVERFLOW_NAME;

use crate::helpers::artifacts::TestReporter;
use crate::helpers::harness::policy_with_capacity;
use crate::helpers::harness::status_of;
use crate::helpers::harness::suite_for;
use crate::helpers::service_double::DoubleBehavior;
use crate::helpers::service_double::ServiceDouble;
use crate::helpers::service_double::default_baseline;

#[test]
fn reset_that_keeps_changes_fails_reset_stage() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("reset_that_keeps_changes_fails_reset_stage")?;
    let behavior = DoubleBehavior {
        reset_restores: false,
        ..DoubleBehavior::default()
    };
    let double = ServiceDouble::with_behavior(behavior, default_baseline())?;
    let suite = suite_for(&double, ContractPolicy::default())?;

    let report = suite.run(&[Stage::ResetIdempotence])?;
    let artifacts = reporter.artifacts().write_report(&report, &suite.api().transcript())?;

    require(!report.passed(), "broken reset passed")?;
    require_eq(
        &status_of(&report, Stage::DeleteExisting),
        &Some(StageStatus::Passed),
        "delete stage",
    )?;
    require_eq(
        &status_of(&report, Stage::ResetCollection),
        &Some(StageStatus::Failed),
        "reset stage",
    )?;
    let idempotence = report.stage(Stage::ResetIdempotence).ok_or("idempotence stage missing")?;
    require_eq(&idempotence.status, &StageStatus::Skipped, "idempotence stage")?;
    require_eq(&idempotence.skipped_because, &Some(Stage::ResetCollection), "skip reason")?;
    require_eq(&report.teardown.status, &Some(200), "teardown status")?;

    reporter.finish("pass", vec!["non-restoring reset detected".to_string()], artifacts)?;
    Ok(())
}

#[test]
fn accepted_duplicate_fails_duplicate_stage() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("accepted_duplicate_fails_duplicate_stage")?;
    let behavior = DoubleBehavior {
        allow_duplicates: true,
        ..DoubleBehavior::default()
    };
    let double = ServiceDouble::with_behavior(behavior, default_baseline())?;
    let suite = suite_for(&double, ContractPolicy::default())?;

    let report = suite.run(&[Stage::CreateDuplicate])?;

    require_eq(
        &status_of(&report, Stage::CreateDuplicate),
        &Some(StageStatus::Failed),
        "duplicate stage",
    )?;
    require_eq(
        &status_of(&report, Stage::ValidateCollection),
        &Some(StageStatus::Passed),
        "validate stage",
    )?;
    require(double.at_baseline(), "teardown did not restore the baseline")?;

    reporter.finish("pass", vec!["duplicate create detected".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn malformed_status_follows_policy() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("malformed_status_follows_policy")?;
    let selection = [Stage::CreateMissingField, Stage::UpdateMissingField];
    let behavior = DoubleBehavior {
        malformed_status: 500,
        ..DoubleBehavior::default()
    };

    let strict = ServiceDouble::with_behavior(behavior.clone(), default_baseline())?;
    let report = suite_for(&strict, ContractPolicy::default())?.run(&selection)?;
    for stage in selection {
        require_eq(&status_of(&report, stage), &Some(StageStatus::Failed), stage.as_str())?;
    }

    let lenient = ServiceDouble::with_behavior(behavior, default_baseline())?;
    let policy = ContractPolicy {
        malformed_payload_statuses: vec![400, 500],
        ..ContractPolicy::default()
    };
    let report = suite_for(&lenient, policy)?.run(&selection)?;
    require(report.passed(), "500 refused although the policy accepts it")?;

    reporter.finish(
        "pass",
        vec!["500 fails under [400] and passes under [400, 500]".to_string()],
        Vec::new(),
    )?;
    Ok(())
}

#[test]
fn missing_auth_fails_every_operation() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("missing_auth_fails_every_operation")?;
    let behavior = DoubleBehavior {
        enforce_auth: false,
        ..DoubleBehavior::default()
    };
    let double = ServiceDouble::with_behavior(behavior, default_baseline())?;
    let suite = suite_for(&double, ContractPolicy::default())?;

    let report = suite.run(&[Stage::BadCredentials])?;

    let stage = report.stage(Stage::BadCredentials).ok_or("credentials stage missing")?;
    require_eq(&stage.status, &StageStatus::Failed, "credentials stage")?;
    require_eq(&stage.failures().count(), &6, "failed operations")?;

    reporter.finish("pass", vec!["unauthenticated access detected".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn larger_ceiling_fails_overflow_case() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("larger_ceiling_fails_overflow_case")?;
    let behavior = DoubleBehavior {
        capacity: 10,
        ..DoubleBehavior::default()
    };
    let double = ServiceDouble::with_behavior(behavior, default_baseline())?;
    let suite = suite_for(&double, policy_with_capacity(8))?;

    let report = suite.run(&[Stage::CapacityCeiling])?;

    let stage = report.stage(Stage::CapacityCeiling).ok_or("capacity stage missing")?;
    require_eq(&stage.status, &StageStatus::Failed, "capacity stage")?;
    let failed: Vec<&str> = stage.failures().map(|case| case.label.as_str()).collect();
    require_eq(&failed, &vec!["overflow"], "failed capacity cases")?;
    require(!double.names().iter().any(|name| name == OVERFLOW_NAME), "overflow survived reset")?;

    reporter.finish("pass", vec!["ceiling above policy detected".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn empty_collection_skips_dependent_stages() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("empty_collection_skips_dependent_stages")?;
    let double = ServiceDouble::with_behavior(DoubleBehavior::default(), Vec::new())?;
    let suite = suite_for(&double, ContractPolicy::default())?;

    let report = suite.run(&[])?;
    let artifacts = reporter.artifacts().write_report(&report, &suite.api().transcript())?;

    require_eq(
        &status_of(&report, Stage::ValidateCollection),
        &Some(StageStatus::Failed),
        "validate stage",
    )?;
    for stage in [
        Stage::FetchExisting,
        Stage::CreateDuplicate,
        Stage::UpdateExisting,
        Stage::UpdateMissingField,
        Stage::DeleteExisting,
        Stage::CapacityCeiling,
        Stage::ResetCollection,
        Stage::ResetIdempotence,
    ] {
        require_eq(&status_of(&report, stage), &Some(StageStatus::Skipped), stage.as_str())?;
    }
    for stage in [
        Stage::BadCredentials,
        Stage::ListCollection,
        Stage::FetchMissing,
        Stage::CreateValid,
        Stage::CreateValueTypes,
        Stage::CreateMissingField,
        Stage::DeleteMissing,
    ] {
        require_eq(&status_of(&report, stage), &Some(StageStatus::Passed), stage.as_str())?;
    }
    require_eq(&report.counts().skipped, &8, "skipped stage count")?;

    reporter.finish("pass", vec!["dependents of validation skipped".to_string()], artifacts)?;
    Ok(())
}

#[test]
fn unreachable_service_records_teardown_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("unreachable_service_records_teardown_error")?;
    let double = ServiceDouble::start()?;
    let suite = suite_for(&double, ContractPolicy::default())?;
    drop(double);

    let report = suite.run(&[Stage::ListCollection])?;

    require_eq(
        &status_of(&report, Stage::ListCollection),
        &Some(StageStatus::Failed),
        "list stage",
    )?;
    require_eq(&report.teardown.status, &None, "teardown status")?;
    require(report.teardown.error.is_some(), "teardown error missing")?;
    require(!report.passed(), "unreachable service passed")?;

    reporter.finish("pass", vec!["transport failure reported per stage".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn partial_update_fails_update_missing_field_stage() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("partial_update_fails_update_missing_field_stage")?;
    let behavior = DoubleBehavior {
        partial_updates: true,
        ..DoubleBehavior::default()
    };
    let double = ServiceDouble::with_behavior(behavior, default_baseline())?;
    let suite = suite_for(&double, ContractPolicy::default())?;

    let report = suite.run(&[Stage::UpdateMissingField])?;

    let stage = report.stage(Stage::UpdateMissingField).ok_or("update stage missing")?;
    require_eq(&stage.status, &StageStatus::Failed, "update stage")?;
    let first = stage.cases.first().ok_or("no update cases")?;
    require(!first.passed, format!("refused update applied but passed: {}", first.label))?;
    require(double.at_baseline(), "teardown did not restore the baseline")?;

    reporter.finish("pass", vec!["refused update that still applied detected".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn stored_incomplete_create_fails_create_missing_field_stage() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("stored_incomplete_create_fails_create_missing_field_stage")?;
    let behavior = DoubleBehavior {
        persist_incomplete: true,
        ..DoubleBehavior::default()
    };
    let double = ServiceDouble::with_behavior(behavior, default_baseline())?;
    let suite = suite_for(&double, ContractPolicy::default())?;

    let report = suite.run(&[Stage::CreateMissingField])?;

    let stage = report.stage(Stage::CreateMissingField).ok_or("create stage missing")?;
    require_eq(&stage.status, &StageStatus::Failed, "create stage")?;
    let failed: Vec<&str> = stage.failures().map(|case| case.label.as_str()).collect();
    require(!failed.contains(&"without name"), format!("nameless create cannot be stored: {failed:?}"))?;
    require_eq(&failed.len(), &(FIELD_COUNT - 1), "stored incomplete records")?;
    require(double.at_baseline(), "teardown did not restore the baseline")?;

    reporter.finish("pass", vec!["refused create that was stored detected".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn delete_missing_side_effect_fails_delete_missing_stage() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("delete_missing_side_effect_fails_delete_missing_stage")?;
    let behavior = DoubleBehavior {
        delete_missing_side_effect: true,
        ..DoubleBehavior::default()
    };
    let double = ServiceDouble::with_behavior(behavior, default_baseline())?;
    let suite = suite_for(&double, ContractPolicy::default())?;

    let report = suite.run(&[Stage::DeleteMissing])?;

    require_eq(
        &status_of(&report, Stage::DeleteMissing),
        &Some(StageStatus::Failed),
        "delete-missing stage",
    )?;
    require(double.at_baseline(), "teardown did not restore the baseline")?;

    reporter.finish("pass", vec!["delete of an absent name removed a record".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn refused_null_values_follow_malformed_policy() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("refused_null_values_follow_malformed_policy")?;
    let behavior = DoubleBehavior {
        reject_null_values: true,
        ..DoubleBehavior::default()
    };
    let null_cases = FIELD_COUNT - 1;

    let documented = ServiceDouble::with_behavior(behavior.clone(), default_baseline())?;
    let report = suite_for(&documented, ContractPolicy::default())?.run(&[Stage::CreateValueTypes])?;
    require(report.passed(), "clean refusal of null values failed the stage")?;
    let stage = report.stage(Stage::CreateValueTypes).ok_or("value stage missing")?;
    let passed_nulls =
        stage.cases.iter().filter(|case| case.passed && case.label.ends_with("=null")).count();
    require_eq(&passed_nulls, &null_cases, "refused null cases")?;
    require(documented.at_baseline(), "refused null record left behind")?;

    let wrong_status = DoubleBehavior {
        malformed_status: 500,
        ..behavior
    };
    let double = ServiceDouble::with_behavior(wrong_status, default_baseline())?;
    let report = suite_for(&double, ContractPolicy::default())?.run(&[Stage::CreateValueTypes])?;
    let stage = report.stage(Stage::CreateValueTypes).ok_or("value stage missing")?;
    require_eq(&stage.status, &StageStatus::Failed, "value stage")?;
    let failed: Vec<&str> = stage.failures().map(|case| case.label.as_str()).collect();
    require_eq(&failed.len(), &null_cases, "failed cases")?;
    require(
        failed.iter().all(|label| label.ends_with("=null")),
        format!("only null cases may fail: {failed:?}"),
    )?;

    reporter.finish(
        "pass",
        vec!["null refused with 400 passes, with 500 fails under [400]".to_string()],
        Vec::new(),
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
