// crates/project-ledger-cli/src/lib.rs
// ============================================================================
// Module: Project Ledger CLI Library
// Description: Shared helpers for the project ledger command-line interface.
// Purpose: Provide the message catalog, store selection, and log setup.
// Dependencies: project-ledger-config, project-ledger-core, tracing-subscriber
// ============================================================================

//! ## Overview
//! This library houses the pieces of the `project-ledger` binary that are
//! worth testing on their own: the message catalog behind the [`t!`] macro,
//! the configured store backend, and log filter resolution. The binary entry
//! point (`src/main.rs`) wires them to the command dispatcher.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Configured ledger store backends.
pub mod backend;
/// Internationalization helpers and message catalog.
pub mod i18n;
/// Log filter resolution and subscriber setup.
pub mod logging;
