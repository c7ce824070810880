// crates/project-ledger-cli/src/logging.rs
// ============================================================================
// Module: CLI Logging
// Description: Log filter precedence and tracing subscriber setup.
// Purpose: Send structured diagnostics to stderr, never stdout.
// Dependencies: thiserror, tracing-subscriber
// ============================================================================

//! ## Overview
//! The filter comes from the first non-blank source among the `--log-level`
//! flag, the `RUST_LOG` environment variable, and the config file's
//! `logging.level`. Output goes to stderr so stdout carries only command
//! results.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable consulted after the CLI flag.
pub const LOG_ENV_VAR: &str = "RUST_LOG";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Logging setup failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter {directive:?}: {message}")]
    InvalidFilter {
        /// Directive that failed to parse.
        directive: String,
        /// Parser message.
        message: String,
    },
    /// A global subscriber was already installed.
    #[error("{0}")]
    Init(String),
}

// ============================================================================
// SECTION: Setup
// ============================================================================

/// Picks the effective filter directive.
#[must_use]
pub fn resolve_log_filter(flag: Option<&str>, env: Option<&str>, configured: &str) -> String {
    [flag, env, Some(configured)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|directive| !directive.is_empty())
        .unwrap_or(project_ledger_config::DEFAULT_LOG_LEVEL)
        .to_string()
}

/// Parses `directive` into an [`EnvFilter`].
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] when the directive is malformed.
pub fn parse_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|err| LoggingError::InvalidFilter {
        directive: directive.to_string(),
        message: err.to_string(),
    })
}

/// Installs the global stderr subscriber.
///
/// # Errors
///
/// Returns [`LoggingError`] when the directive is malformed or a subscriber
/// is already installed.
pub fn init_logging(directive: &str) -> Result<(), LoggingError> {
    let filter = parse_filter(directive)?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .map_err(|err| LoggingError::Init(err.to_string()))
}
