// crates/project-ledger-config/src/lib.rs
// ============================================================================
// Module: Project Ledger Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for project-ledger.toml semantics.
// Dependencies: project-ledger-core, project-ledger-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `project-ledger-config` defines the configuration model for the project
//! ledger: which store backs the allocator and mappings, an optional
//! department table override, and the default log filter. Validation is
//! strict and fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
