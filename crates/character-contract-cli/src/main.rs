// crates/character-contract-cli/src/main.rs
// ============================================================================
// Module: Character Contract CLI Entry Point
// Description: Command dispatcher for contract runs against a live service.
// Purpose: Load config, run stages, write reports and map verdicts to exit codes.
// Dependencies: character-client, character-contract, clap, tracing
// ============================================================================

//! ## Overview
//! `character-contract run` executes the planned stages against the
//! configured service and writes `report.json`, `report.md` and
//! `transcript.json`. Exit codes: 0 when every planned stage passed and the
//! closing reset succeeded, 1 when the service broke the contract or could
//! not be reached, 2 when configuration or arguments are invalid.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod logging;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use character_client::CharacterApi;
use character_contract::ContractConfig;
use character_contract::ContractSuite;
use character_contract::Stage;
use character_contract::SuiteReport;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

use crate::logging::LogFormat;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "character-contract", version, about = "Contract tests for the character service")]
struct Cli {
    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,
    /// Selected subcommand.
    #[command(subcommand)]
    command: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run contract stages against the configured service.
    Run(RunCommand),
    /// List stages in canonical order with their dependencies.
    Stages,
    /// Reset the collection to its baseline.
    Reset(ConfigArgs),
}

/// Config file selection shared by service-facing commands.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Config file (default: `CHARACTER_CONTRACT_CONFIG` or `character-contract.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Config selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Stage to run with its dependencies; repeatable; all when omitted.
    #[arg(long = "stage", value_name = "STAGE", value_parser = parse_stage)]
    stages: Vec<Stage>,
    /// Report directory (overrides `report.output_dir`).
    #[arg(long, value_name = "DIR")]
    report_dir: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Exit status for configuration and argument errors.
const EXIT_CONFIG: u8 = 2;

/// Failure that ends the command.
#[derive(Debug)]
enum CliError {
    /// Configuration or arguments are unusable.
    Config(String),
    /// The run could not complete.
    Run(String),
}

impl CliError {
    /// Exit code for the failure.
    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::from(EXIT_CONFIG),
            Self::Run(_) => ExitCode::FAILURE,
        }
    }

    /// Message for stderr.
    fn message(&self) -> &str {
        match self {
            Self::Config(message) | Self::Run(message) => message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Parses arguments, installs logging and runs the command.
fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(message) = logging::init(cli.log_format) {
        let _ = write_stderr_line(&message);
    }
    match dispatch(cli.command) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = err.message(), "command failed");
            let _ = write_stderr_line(err.message());
            err.exit_code()
        }
    }
}

/// Executes one subcommand.
fn dispatch(command: Commands) -> CliResult<ExitCode> {
    match command {
        Commands::Run(command) => command_run(&command),
        Commands::Stages => command_stages(),
        Commands::Reset(args) => command_reset(&args),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Runs the planned stages and writes the report.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let api = build_api(&config)?;
    let suite = ContractSuite::new(api, config.policy.clone());
    let report = suite.run(&command.stages).map_err(|err| CliError::Config(err.to_string()))?;
    let report_dir = command.report_dir.clone().unwrap_or_else(|| config.report.output_dir.clone());
    let written = report
        .write(&report_dir, &suite.api().transcript())
        .map_err(|err| CliError::Run(err.to_string()))?;
    write_stdout_line(&summary_line(&report))?;
    for path in written {
        write_stdout_line(&format!("wrote {}", path.display()))?;
    }
    Ok(verdict(&report))
}

/// Prints the canonical stage order.
fn command_stages() -> CliResult<ExitCode> {
    for line in stage_lines() {
        write_stdout_line(&line)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Issues one reset call.
fn command_reset(args: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(args)?;
    let api = build_api(&config)?;
    let response = api.reset_collection().map_err(|err| CliError::Run(err.to_string()))?;
    write_stdout_line(&format!("reset: {}", response.status))?;
    Ok(if response.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a stage name for clap.
fn parse_stage(raw: &str) -> Result<Stage, String> {
    raw.parse::<Stage>().map_err(|err| err.to_string())
}

/// Loads and validates configuration.
fn load_config(args: &ConfigArgs) -> CliResult<ContractConfig> {
    ContractConfig::load(args.config.as_deref()).map_err(|err| CliError::Config(err.to_string()))
}

/// Builds the service client from configuration.
fn build_api(config: &ContractConfig) -> CliResult<CharacterApi> {
    let client_config = config.client_config().map_err(|err| CliError::Config(err.to_string()))?;
    CharacterApi::new(client_config).map_err(|err| CliError::Config(err.to_string()))
}

/// Maps a report to the process exit code.
fn verdict(report: &SuiteReport) -> ExitCode {
    if report.passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// One-line run summary.
fn summary_line(report: &SuiteReport) -> String {
    let counts = report.counts();
    format!(
        "{}: {} passed, {} failed, {} skipped",
        if report.passed() { "PASSED" } else { "FAILED" },
        counts.passed,
        counts.failed,
        counts.skipped
    )
}

/// Renders the stage catalog, one line per stage.
fn stage_lines() -> Vec<String> {
    Stage::ALL
        .iter()
        .enumerate()
        .map(|(index, stage)| {
            let after: Vec<&str> = stage.dependencies().iter().map(|dep| dep.as_str()).collect();
            let after = if after.is_empty() { "-".to_string() } else { after.join(",") };
            format!("{:>2}  {:<22} after: {:<20} {}", index + 1, stage.as_str(), after, stage.description())
        })
        .collect()
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}").map_err(|err| CliError::Run(format!("stdout: {err}")))
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}
