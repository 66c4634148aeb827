// crates/character-contract/src/report.rs
// ============================================================================
// Module: Suite Report
// Description: Per-stage outcomes and their on-disk artifacts.
// Purpose: Record what ran, what failed and the exact responses involved.
// Dependencies: character-client, serde, serde_jcs, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`SuiteReport`] is the result of one run. It serializes to canonical
//! JSON (`serde_jcs`) so identical runs produce byte-identical reports, and
//! renders to Markdown for humans. The session transcript is written next to
//! it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use character_client::TranscriptEntry;
use serde::Serialize;
use thiserror::Error;

use crate::failure::CapturedResponse;
use crate::failure::ContractFailure;
use crate::policy::ContractPolicy;
use crate::stage::Stage;

/// File name of the JSON report.
pub const REPORT_JSON: &str = "report.json";
/// File name of the Markdown report.
pub const REPORT_MARKDOWN: &str = "report.md";
/// File name of the session transcript.
pub const TRANSCRIPT_JSON: &str = "transcript.json";

// ============================================================================
// SECTION: Results
// ============================================================================

/// Outcome of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Every case passed.
    Passed,
    /// At least one case failed.
    Failed,
    /// Not run because a dependency did not pass.
    Skipped,
}

impl StageStatus {
    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// Failure details kept in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    /// Rendered failure message.
    pub message: String,
    /// Response that broke the check, when one exists.
    pub response: Option<CapturedResponse>,
}

impl From<&ContractFailure> for FailureRecord {
    fn from(failure: &ContractFailure) -> Self {
        Self {
            message: failure.to_string(),
            response: failure.response().cloned(),
        }
    }
}

/// Result of one parametrized case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseResult {
    /// Case label, e.g. a name or `field=kind`.
    pub label: String,
    /// Whether the case passed.
    pub passed: bool,
    /// Failure details for failed cases.
    pub failure: Option<FailureRecord>,
}

/// Result of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageResult {
    /// Stage that ran.
    pub stage: Stage,
    /// Stage outcome.
    pub status: StageStatus,
    /// Wall time in milliseconds.
    pub duration_ms: u64,
    /// Per-case results.
    pub cases: Vec<CaseResult>,
    /// Dependency that did not pass, for skipped stages.
    pub skipped_because: Option<Stage>,
}

impl StageResult {
    /// Builds a skipped result.
    #[must_use]
    pub const fn skipped(stage: Stage, dependency: Stage) -> Self {
        Self {
            stage,
            status: StageStatus::Skipped,
            duration_ms: 0,
            cases: Vec::new(),
            skipped_because: Some(dependency),
        }
    }

    /// Builds a result from completed cases.
    #[must_use]
    pub fn completed(stage: Stage, cases: Vec<CaseResult>, duration_ms: u64) -> Self {
        let status = if cases.iter().all(|case| case.passed) {
            StageStatus::Passed
        } else {
            StageStatus::Failed
        };
        Self {
            stage,
            status,
            duration_ms,
            cases,
            skipped_because: None,
        }
    }

    /// Returns the failed cases.
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.cases.iter().filter(|case| !case.passed)
    }
}

/// Outcome of the closing reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeardownRecord {
    /// Reset status, when a response arrived.
    pub status: Option<u16>,
    /// Transport error, when none did.
    pub error: Option<String>,
}

impl TeardownRecord {
    /// Returns true when the reset answered 2xx.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status.is_some_and(|status| (200 .. 300).contains(&status))
    }
}

/// Stage counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    /// Passed stages.
    pub passed: usize,
    /// Failed stages.
    pub failed: usize,
    /// Skipped stages.
    pub skipped: usize,
}

/// Result of one suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Service base address.
    pub base_url: String,
    /// Policy the run applied.
    pub policy: ContractPolicy,
    /// Stages in run order.
    pub planned: Vec<Stage>,
    /// Results in run order.
    pub stages: Vec<StageResult>,
    /// Closing reset outcome.
    pub teardown: TeardownRecord,
    /// Wall time in milliseconds.
    pub duration_ms: u64,
}

impl SuiteReport {
    /// Returns true when every planned stage passed and teardown succeeded.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.stages.len() == self.planned.len()
            && self.stages.iter().all(|result| result.status == StageStatus::Passed)
            && self.teardown.succeeded()
    }

    /// Counts stages by status.
    #[must_use]
    pub fn counts(&self) -> StageCounts {
        self.stages.iter().fold(StageCounts::default(), |mut counts, result| {
            match result.status {
                StageStatus::Passed => counts.passed += 1,
                StageStatus::Failed => counts.failed += 1,
                StageStatus::Skipped => counts.skipped += 1,
            }
            counts
        })
    }

    /// Returns the result of `stage`, if it was planned.
    #[must_use]
    pub fn stage(&self, stage: Stage) -> Option<&StageResult> {
        self.stages.iter().find(|result| result.stage == stage)
    }

    /// Renders the report as Markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let counts = self.counts();
        let mut out = String::new();
        out.push_str("# Character Contract Report\n\n");
        out.push_str("## Summary\n\n");
        out.push_str(&format!("- Service: {}\n", self.base_url));
        out.push_str(&format!("- Result: {}\n", if self.passed() { "passed" } else { "failed" }));
        out.push_str(&format!(
            "- Stages: {} passed, {} failed, {} skipped\n",
            counts.passed, counts.failed, counts.skipped
        ));
        out.push_str(&format!("- Duration (ms): {}\n", self.duration_ms));
        match (&self.teardown.status, &self.teardown.error) {
            (Some(status), _) => out.push_str(&format!("- Teardown reset: {status}\n")),
            (None, Some(error)) => out.push_str(&format!("- Teardown reset: failed ({error})\n")),
            (None, None) => out.push_str("- Teardown reset: not attempted\n"),
        }
        out.push_str("\n## Stages\n\n");
        out.push_str("| Stage | Status | Cases | Duration (ms) |\n");
        out.push_str("|---|---|---|---|\n");
        for result in &self.stages {
            let status = match result.skipped_because {
                Some(dependency) => format!("skipped ({dependency} did not pass)"),
                None => result.status.as_str().to_string(),
            };
            let passed = result.cases.iter().filter(|case| case.passed).count();
            out.push_str(&format!(
                "| {} | {} | {}/{} | {} |\n",
                result.stage,
                status,
                passed,
                result.cases.len(),
                result.duration_ms
            ));
        }
        let failed: Vec<&StageResult> =
            self.stages.iter().filter(|result| result.status == StageStatus::Failed).collect();
        if !failed.is_empty() {
            out.push_str("\n## Failures\n");
            for result in failed {
                out.push_str(&format!("\n### {}\n\n", result.stage));
                for case in result.failures() {
                    let message =
                        case.failure.as_ref().map_or("no details", |failure| failure.message.as_str());
                    out.push_str(&format!("- `{}`: {}\n", case.label, message));
                }
            }
        }
        out
    }

    /// Writes `report.json`, `report.md` and `transcript.json` into `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the directory or a file cannot be written.
    pub fn write(
        &self,
        dir: &Path,
        transcript: &[TranscriptEntry],
    ) -> Result<Vec<PathBuf>, ReportError> {
        fs::create_dir_all(dir).map_err(|source| ReportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let json = serde_jcs::to_vec(self).map_err(|err| ReportError::Serialize(err.to_string()))?;
        let transcript_json =
            serde_jcs::to_vec(transcript).map_err(|err| ReportError::Serialize(err.to_string()))?;
        let files = [
            (REPORT_JSON, json),
            (REPORT_MARKDOWN, self.to_markdown().into_bytes()),
            (TRANSCRIPT_JSON, transcript_json),
        ];
        let mut written = Vec::with_capacity(files.len());
        for (name, bytes) in files {
            let path = dir.join(name);
            fs::write(&path, bytes).map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;
            written.push(path);
        }
        Ok(written)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Report artifact errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem failure.
    #[error("failed to write report artifact {}: {source}", path.display())]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Serialization failure.
    #[error("failed to serialize report: {0}")]
    Serialize(String),
}
