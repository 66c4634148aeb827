// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: Suite Harness
// Description: Wires the client and the contract suite to a service double.
// Purpose: Keep suite setup identical across system-test binaries.
// Dependencies: character-client, character-contract
// ============================================================================

use std::time::Duration;

use character_client::CharacterApi;
use character_client::ClientConfig;
use character_client::TranscriptEntry;
use character_contract::ContractPolicy;
use character_contract::ContractSuite;
use character_contract::Stage;
use character_contract::StageStatus;
use character_contract::SuiteReport;

use super::service_double::ServiceDouble;
use super::timeouts::resolve_timeout;

/// Client timeout against the in-process double.
const DOUBLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds a client with valid credentials for `double`.
pub fn api_for(double: &ServiceDouble) -> Result<CharacterApi, Box<dyn std::error::Error>> {
    let mut config = ClientConfig::new(double.base_url(), double.credentials());
    config.timeout = resolve_timeout(DOUBLE_TIMEOUT);
    Ok(CharacterApi::new(config)?)
}

/// Builds a suite bound to `double` under `policy`.
pub fn suite_for(
    double: &ServiceDouble,
    policy: ContractPolicy,
) -> Result<ContractSuite, Box<dyn std::error::Error>> {
    Ok(ContractSuite::new(api_for(double)?, policy))
}

/// Default policy with a different capacity.
#[must_use]
pub fn policy_with_capacity(capacity: usize) -> ContractPolicy {
    ContractPolicy {
        capacity,
        ..ContractPolicy::default()
    }
}

/// Returns the recorded status of `stage`, if it was planned.
#[must_use]
pub fn status_of(report: &SuiteReport, stage: Stage) -> Option<StageStatus> {
    report.stage(stage).map(|result| result.status)
}

/// Returns `METHOD path` for each exchange, with the base address stripped.
#[must_use]
pub fn request_lines(transcript: &[TranscriptEntry], base_url: &str) -> Vec<String> {
    transcript
        .iter()
        .map(|entry| {
            let path = entry.response.url.strip_prefix(base_url).unwrap_or(&entry.response.url);
            format!("{} /{path}", entry.response.method)
        })
        .collect()
}

/// Lists stages that did not pass, with their first failure message.
#[must_use]
pub fn failing_stages(report: &SuiteReport) -> Vec<String> {
    report
        .stages
        .iter()
        .filter(|result| result.status != StageStatus::Passed)
        .map(|result| {
            let reason = result
                .failures()
                .next()
                .and_then(|case| case.failure.as_ref())
                .map_or_else(
                    || result.skipped_because.map(|dep| format!("skipped after {dep}")),
                    |failure| Some(failure.message.clone()),
                )
                .unwrap_or_default();
            format!("{}: {} ({reason})", result.stage, result.status.as_str())
        })
        .collect()
}
