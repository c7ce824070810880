// crates/project-ledger-cli/src/main.rs
// ============================================================================
// Module: Project Ledger CLI Entry Point
// Description: Command dispatcher for project number resolution and lookup.
// Purpose: Provide a scriptable front end over the configured ledger store.
// Dependencies: clap, project-ledger-config, project-ledger-core, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! The `project-ledger` binary resolves CRM source records to project
//! numbers, inspects stored mappings, and validates configuration. Command
//! output goes to stdout; diagnostics and errors go to stderr. All
//! user-facing strings are routed through the message catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use project_ledger_cli::backend::LedgerBackend;
use project_ledger_cli::logging::LOG_ENV_VAR;
use project_ledger_cli::logging::init_logging;
use project_ledger_cli::logging::resolve_log_filter;
use project_ledger_cli::t;
use project_ledger_config::DEFAULT_LOG_LEVEL;
use project_ledger_config::LedgerConfig;
use project_ledger_core::Clock;
use project_ledger_core::FixedClock;
use project_ledger_core::MappingStore;
use project_ledger_core::ProjectMapping;
use project_ledger_core::ProjectNumber;
use project_ledger_core::ProjectNumberResolver;
use project_ledger_core::SequenceAllocator;
use project_ledger_core::SourceRecordId;
use project_ledger_core::StoreError;
use project_ledger_core::SystemClock;
use project_ledger_core::parse_project_number;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "project-ledger", version, disable_help_subcommand = true)]
struct Cli {
    /// Config file path (overrides `PROJECT_LEDGER_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Log filter directive (overrides `RUST_LOG` and `logging.level`).
    #[arg(long, value_name = "FILTER", global = true)]
    log_level: Option<String>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve (link or generate) the project number for a source record.
    Resolve(ResolveCommand),
    /// Show a stored mapping as JSON.
    Show(ShowCommand),
    /// Parse a project number into its parts.
    Parse(ParseCommand),
    /// Print the active department table as JSON.
    Departments,
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `resolve`.
#[derive(Args, Debug)]
struct ResolveCommand {
    /// Source record (deal) identifier.
    #[arg(long, value_name = "ID")]
    source_id: String,
    /// Department display name.
    #[arg(long, value_name = "NAME")]
    department: String,
    /// Existing project number to link to.
    #[arg(long = "link", value_name = "NUMBER")]
    link_target: Option<String>,
    /// Calendar year to allocate in (defaults to the current UTC year).
    #[arg(long, value_name = "YYYY")]
    year: Option<i32>,
}

/// Arguments for `show`.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ShowCommand {
    /// Look up by source record identifier.
    #[arg(long, value_name = "ID")]
    source_id: Option<String>,
    /// Look up by project number.
    #[arg(long, value_name = "NUMBER")]
    project_number: Option<String>,
}

/// Arguments for `parse`.
#[derive(Args, Debug)]
struct ParseCommand {
    /// Project number to parse.
    #[arg(value_name = "NUMBER")]
    value: String,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the project ledger configuration.
    Validate,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_filter = std::env::var(LOG_ENV_VAR).ok();

    if let Commands::Parse(command) = &cli.command {
        setup_logging(cli.log_level.as_deref(), env_filter.as_deref(), DEFAULT_LOG_LEVEL)?;
        return command_parse(command);
    }

    let config = LedgerConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    setup_logging(cli.log_level.as_deref(), env_filter.as_deref(), &config.logging.level)?;
    debug!(source = ?config.source_path, "configuration loaded");

    match cli.command {
        Commands::Resolve(command) => command_resolve(&config, &command),
        Commands::Show(command) => command_show(&config, &command),
        Commands::Parse(command) => command_parse(&command),
        Commands::Departments => command_departments(&config),
        Commands::Config {
            command: ConfigCommand::Validate,
        } => command_config_validate(&config),
    }
}

/// Installs the stderr log subscriber.
fn setup_logging(flag: Option<&str>, env: Option<&str>, configured: &str) -> CliResult<()> {
    let directive = resolve_log_filter(flag, env, configured);
    init_logging(&directive).map_err(|err| CliError::new(t!("logging.init_failed", error = err)))
}

// ============================================================================
// SECTION: Resolve Command
// ============================================================================

/// Executes the `resolve` command.
fn command_resolve(config: &LedgerConfig, command: &ResolveCommand) -> CliResult<ExitCode> {
    let registry = config
        .department_registry()
        .map_err(|err| CliError::new(t!("departments.invalid", error = err)))?;
    let backend = open_backend(config)?;
    let year = command.year.unwrap_or_else(|| SystemClock.current_year());
    debug!(backend = backend.label(), year, "resolving project number");
    let resolver =
        ProjectNumberResolver::new(backend.clone(), backend, registry, FixedClock::new(year));
    let number = resolver
        .resolve_project_number(
            command.source_id.as_str(),
            &command.department,
            command.link_target.as_deref(),
        )
        .map_err(|err| CliError::new(t!("resolve.failed", error = err)))?;
    write_stdout_line(number.as_str())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Show Command
// ============================================================================

/// Executes the `show` command.
fn command_show(config: &LedgerConfig, command: &ShowCommand) -> CliResult<ExitCode> {
    let backend = open_backend(config)?;
    let mapping = match (&command.source_id, &command.project_number) {
        (Some(raw), _) => {
            let id: SourceRecordId = raw.parse::<SourceRecordId>().map_err(|err| {
                CliError::new(t!("show.source_id_invalid", value = raw, error = err))
            })?;
            lookup(backend.find_by_source_id(id))?
                .ok_or_else(|| CliError::new(t!("show.not_found.source", source_id = id)))?
        }
        (None, Some(raw)) => {
            let number = ProjectNumber::new(raw.as_str()).map_err(|err| {
                CliError::new(t!("show.project_number_invalid", value = raw, error = err))
            })?;
            lookup(backend.find_by_project_number(&number))?.ok_or_else(|| {
                CliError::new(t!("show.not_found.project", project_number = number))
            })?
        }
        (None, None) => {
            return Err(CliError::new(t!(
                "show.failed",
                error = "either --source-id or --project-number is required"
            )));
        }
    };
    let last_issued = lookup(backend.current_sequence(&mapping.department_code, mapping.year))?;
    write_json(&MappingView::new(&mapping, last_issued))?;
    Ok(ExitCode::SUCCESS)
}

/// Maps a store lookup failure to a CLI error.
fn lookup<T>(result: Result<T, StoreError>) -> CliResult<T> {
    result.map_err(|err| CliError::new(t!("show.failed", error = err)))
}

/// JSON rendering of a stored mapping.
#[derive(Serialize)]
struct MappingView<'a> {
    /// Canonical project number.
    project_number: &'a str,
    /// Department display name.
    department: &'a str,
    /// Two-letter department code.
    department_code: &'a str,
    /// Two-digit year.
    year: u8,
    /// Sequence within the partition.
    sequence: u16,
    /// Linked source records in ascending order.
    source_record_ids: Vec<u64>,
    /// Creation time in unix milliseconds.
    created_at_ms: i64,
    /// Last link time in unix milliseconds.
    updated_at_ms: i64,
    /// Last sequence issued in the mapping's partition.
    partition_last_sequence: Option<u64>,
}

impl<'a> MappingView<'a> {
    /// Builds the view of `mapping` alongside its partition counter.
    fn new(mapping: &'a ProjectMapping, partition_last_sequence: Option<u64>) -> Self {
        Self {
            project_number: mapping.project_number.as_str(),
            department: &mapping.department,
            department_code: &mapping.department_code,
            year: mapping.year,
            sequence: mapping.sequence,
            source_record_ids: mapping.source_record_ids.iter().map(|id| id.get()).collect(),
            created_at_ms: mapping.created_at_ms,
            updated_at_ms: mapping.updated_at_ms,
            partition_last_sequence,
        }
    }
}

// ============================================================================
// SECTION: Parse and Departments Commands
// ============================================================================

/// Executes the `parse` command.
fn command_parse(command: &ParseCommand) -> CliResult<ExitCode> {
    let parts = parse_project_number(&command.value)
        .ok_or_else(|| CliError::new(t!("parse.invalid", value = command.value)))?;
    write_json(&parts)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `departments` command.
fn command_departments(config: &LedgerConfig) -> CliResult<ExitCode> {
    let registry = config
        .department_registry()
        .map_err(|err| CliError::new(t!("departments.invalid", error = err)))?;
    write_json(&registry.all_mappings())?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Executes the config validation command.
fn command_config_validate(config: &LedgerConfig) -> CliResult<ExitCode> {
    let registry = config
        .department_registry()
        .map_err(|err| CliError::new(t!("departments.invalid", error = err)))?;
    let source = config.source_path.as_ref().map_or_else(
        || t!("config.validate.defaults"),
        |path| t!("config.validate.source", path = path.display()),
    );
    let store = config.store.sqlite_config().map_or_else(
        || t!("config.store.memory"),
        |sqlite| t!("config.store.sqlite", path = sqlite.path.display()),
    );
    let lines = [
        t!("config.validate.ok"),
        source,
        t!("config.validate.store", store = store),
        t!("config.validate.departments", count = registry.len()),
    ];
    for line in lines {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Store Helpers
// ============================================================================

/// Opens the configured store backend.
fn open_backend(config: &LedgerConfig) -> CliResult<LedgerBackend> {
    LedgerBackend::open(&config.store)
        .map_err(|err| CliError::new(t!("store.open_failed", error = err)))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a value to stdout as pretty JSON.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = render_json(value)?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Renders a value as pretty JSON.
fn render_json<T: Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(t!("output.serialize_failed", error = err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a catalog output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
