// crates/project-ledger-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Ledger Store
// Description: Durable ledger backend using SQLite WAL.
// Purpose: Share project number state across processes on one host.
// Dependencies: project-ledger-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed implementation of the
//! [`SequenceAllocator`](project_ledger_core::SequenceAllocator) and
//! [`MappingStore`](project_ledger_core::MappingStore) interfaces. Counters
//! advance with a single atomic upsert and mapping uniqueness is enforced by
//! table constraints, so independent store instances (and processes) pointed
//! at the same database file stay consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteLedgerStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
