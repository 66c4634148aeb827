// crates/character-contract/src/runner.rs
// ============================================================================
// Module: Suite Runner
// Description: Plans stages, runs them in order and closes the session.
// Purpose: Produce one report per run with guaranteed teardown.
// Dependencies: character-client, tracing
// ============================================================================

//! ## Overview
//! [`ContractSuite`] owns the valid client, a derived client with a wrong
//! password, and the policy. [`ContractSuite::run`] validates the stage plan,
//! runs each stage whose dependencies passed, and resets the collection at
//! the end. A stage with a dependency that failed or was skipped is reported
//! as skipped and never touches the service.

use std::collections::BTreeMap;
use std::time::Instant;

use character_client::CharacterApi;

use crate::policy::ContractPolicy;
use crate::report::StageResult;
use crate::report::StageStatus;
use crate::report::SuiteReport;
use crate::report::TeardownRecord;
use crate::scenarios::CaseRecorder;
use crate::scenarios::StageContext;
use crate::scenarios::run_stage;
use crate::schema::RecordShape;
use crate::session::Session;
use crate::stage::PlanError;
use crate::stage::Stage;
use crate::stage::plan;
use crate::state::SuiteState;

/// Password substituted when the configured password is itself empty.
const WRONG_PASSWORD: &str = "not-the-password";

/// Errors that prevent a run from starting.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The stage selection cannot be ordered.
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// The record schemas did not compile.
    #[error("{0}")]
    Schema(String),
}

/// The contract suite bound to one service.
#[derive(Debug, Clone)]
pub struct ContractSuite {
    /// Client with valid credentials.
    api: CharacterApi,
    /// Same login with a wrong password.
    intruder: CharacterApi,
    /// Expectations in force.
    policy: ContractPolicy,
}

impl ContractSuite {
    /// Binds the suite to `api`.
    ///
    /// The wrong-credential client keeps the login and drops the password.
    #[must_use]
    pub fn new(api: CharacterApi, policy: ContractPolicy) -> Self {
        let wrong = if api.credentials().password().is_empty() { WRONG_PASSWORD } else { "" };
        let intruder = api.with_credentials(api.credentials().with_password(wrong));
        Self {
            api,
            intruder,
            policy,
        }
    }

    /// Returns the client with valid credentials.
    #[must_use]
    pub const fn api(&self) -> &CharacterApi {
        &self.api
    }

    /// Returns the policy in force.
    #[must_use]
    pub const fn policy(&self) -> &ContractPolicy {
        &self.policy
    }

    /// Runs `selected` stages (all stages when empty) and their dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] when the plan is invalid; stage failures are
    /// reported in the [`SuiteReport`], not as errors.
    pub fn run(&self, selected: &[Stage]) -> Result<SuiteReport, RunError> {
        let planned = plan(selected)?;
        let shape = RecordShape::new().map_err(|err| RunError::Schema(err.to_string()))?;
        let started = Instant::now();
        tracing::info!(
            base_url = %self.api.base_url(),
            stages = planned.len(),
            seed = self.policy.seed,
            "contract run started"
        );

        let session = Session::new(self.api.clone());
        let mut state = SuiteState::new(self.policy.seed);
        let mut statuses: BTreeMap<Stage, StageStatus> = BTreeMap::new();
        let mut stages = Vec::with_capacity(planned.len());
        for stage in &planned {
            let stage = *stage;
            let blocker = stage
                .dependencies()
                .iter()
                .copied()
                .find(|dependency| statuses.get(dependency) != Some(&StageStatus::Passed));
            let result = if let Some(dependency) = blocker {
                tracing::warn!(%stage, %dependency, "stage skipped");
                StageResult::skipped(stage, dependency)
            } else {
                let mut ctx = StageContext {
                    api: session.api(),
                    intruder: &self.intruder,
                    policy: &self.policy,
                    shape: &shape,
                    state: &mut state,
                };
                run_one(stage, &mut ctx)
            };
            statuses.insert(stage, result.status);
            stages.push(result);
        }

        let teardown = match session.close() {
            Ok(response) => {
                if !response.is_success() {
                    tracing::warn!(status = response.status, "teardown reset refused");
                }
                TeardownRecord {
                    status: Some(response.status),
                    error: None,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "teardown reset failed");
                TeardownRecord {
                    status: None,
                    error: Some(err.to_string()),
                }
            }
        };
        let report = SuiteReport {
            base_url: self.api.base_url().to_string(),
            policy: self.policy.clone(),
            planned,
            stages,
            teardown,
            duration_ms: elapsed_ms(started),
        };
        let counts = report.counts();
        tracing::info!(
            passed = counts.passed,
            failed = counts.failed,
            skipped = counts.skipped,
            verdict = if report.passed() { "passed" } else { "failed" },
            "contract run finished"
        );
        Ok(report)
    }
}

/// Runs one stage and times it.
fn run_one(stage: Stage, ctx: &mut StageContext<'_>) -> StageResult {
    tracing::info!(%stage, "stage started");
    let started = Instant::now();
    let mut cases = CaseRecorder::new(stage);
    run_stage(stage, ctx, &mut cases);
    let result = StageResult::completed(stage, cases.finish(), elapsed_ms(started));
    tracing::info!(
        %stage,
        status = result.status.as_str(),
        cases = result.cases.len(),
        duration_ms = result.duration_ms,
        "stage finished"
    );
    result
}

/// Milliseconds since `started`, saturating.
fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
