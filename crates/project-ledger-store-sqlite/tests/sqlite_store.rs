// crates/project-ledger-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Ledger Store Tests
// Description: Validate the SQLite allocator and mapping store.
// Purpose: Ensure durable counters, constraint classification, and integrity.
// Dependencies: project-ledger-store-sqlite, project-ledger-core, rusqlite, tempfile
// ============================================================================

//! ## Overview
//! Conformance tests for the SQLite-backed ledger store, including tampered
//! rows and schema version drift.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::path::Path;

use project_ledger_core::DuplicateKey;
use project_ledger_core::MAX_SOURCE_RECORD_ID;
use project_ledger_core::MappingStore;
use project_ledger_core::NewProjectMapping;
use project_ledger_core::ProjectNumber;
use project_ledger_core::SequenceAllocator;
use project_ledger_core::SourceRecordId;
use project_ledger_core::StoreError;
use project_ledger_store_sqlite::SqliteLedgerStore;
use project_ledger_store_sqlite::SqliteStoreConfig;
use project_ledger_store_sqlite::SqliteStoreError;
use project_ledger_store_sqlite::SqliteStoreMode;
use project_ledger_store_sqlite::SqliteSyncMode;
use rusqlite::Connection;
use rusqlite::params;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn store_for(path: &Path) -> SqliteLedgerStore {
    let config = SqliteStoreConfig {
        path: path.to_path_buf(),
        busy_timeout_ms: 1_000,
        journal_mode: SqliteStoreMode::Wal,
        sync_mode: SqliteSyncMode::Full,
    };
    SqliteLedgerStore::new(&config).expect("store init")
}

fn id(value: u64) -> SourceRecordId {
    SourceRecordId::from_raw(value).expect("nonzero id")
}

fn number(value: &str) -> ProjectNumber {
    ProjectNumber::new(value).expect("valid project number")
}

fn navy(source: u64, sequence: u16) -> NewProjectMapping {
    NewProjectMapping::new(id(source), "Navy", "NY", 25, sequence).expect("mapping")
}

// ============================================================================
// SECTION: Allocator
// ============================================================================

#[test]
fn counters_start_at_one_and_increment_per_partition() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("ledger.sqlite"));

    assert_eq!(store.current_sequence("NY", 25).unwrap(), None);
    assert_eq!(store.next_sequence("NY", 25).unwrap(), 1);
    assert_eq!(store.next_sequence("NY", 25).unwrap(), 2);
    assert_eq!(store.next_sequence("NY", 26).unwrap(), 1);
    assert_eq!(store.next_sequence("AR", 25).unwrap(), 1);
    assert_eq!(store.current_sequence("NY", 25).unwrap(), Some(2));
}

#[test]
fn counters_survive_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("ledger.sqlite");
    {
        let store = store_for(&path);
        for _ in 0 .. 3 {
            store.next_sequence("CG", 25).unwrap();
        }
    }

    let reopened = store_for(&path);

    assert_eq!(reopened.current_sequence("CG", 25).unwrap(), Some(3));
    assert_eq!(reopened.next_sequence("CG", 25).unwrap(), 4);
}

#[test]
fn counters_keep_counting_past_three_digits() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("ledger.sqlite"));
    let connection = Connection::open(temp.path().join("ledger.sqlite")).unwrap();
    connection
        .execute(
            "INSERT INTO sequence_counters (department_code, year, last_sequence, updated_at) \
             VALUES ('NY', 25, 999, 0)",
            params![],
        )
        .unwrap();

    assert_eq!(store.next_sequence("NY", 25).unwrap(), 1_000);
}

#[test]
fn allocator_rejects_malformed_partition() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("ledger.sqlite"));

    assert!(matches!(store.next_sequence("ny", 25), Err(StoreError::Invalid(_))));
    assert!(matches!(store.next_sequence("NY", 100), Err(StoreError::Invalid(_))));
    assert_eq!(store.current_sequence("ny", 25).unwrap(), None);
}

// ============================================================================
// SECTION: Mappings
// ============================================================================

#[test]
fn create_and_find_mapping_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("ledger.sqlite");
    store_for(&path).create_mapping(&navy(12_345, 1)).unwrap();

    let store = store_for(&path);
    let by_source = store.find_by_source_id(id(12_345)).unwrap().unwrap();
    let by_number = store.find_by_project_number(&number("NY25001")).unwrap().unwrap();

    assert_eq!(by_source, by_number);
    assert_eq!(by_source.project_number, number("NY25001"));
    assert_eq!(by_source.department, "Navy");
    assert_eq!(by_source.department_code, "NY");
    assert_eq!(by_source.year, 25);
    assert_eq!(by_source.sequence, 1);
    assert_eq!(by_source.source_record_ids, BTreeSet::from([id(12_345)]));
    assert_eq!(by_source.created_at_ms, by_source.updated_at_ms);
    assert!(store.find_by_source_id(id(1)).unwrap().is_none());
    assert!(store.find_by_project_number(&number("NY25002")).unwrap().is_none());
}

#[test]
fn create_mapping_reports_which_key_collided() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("ledger.sqlite"));
    store.create_mapping(&navy(1, 1)).unwrap();

    let number_taken = store.create_mapping(&navy(2, 1)).unwrap_err();
    let record_taken = store.create_mapping(&navy(1, 2)).unwrap_err();

    assert_eq!(number_taken, StoreError::Duplicate(DuplicateKey::ProjectNumber(number("NY25001"))));
    assert_eq!(record_taken, StoreError::Duplicate(DuplicateKey::SourceRecordId(id(1))));
    assert_eq!(store.mapping_count().unwrap(), 1);
    assert!(store.find_by_source_id(id(2)).unwrap().is_none());
    assert!(store.find_by_project_number(&number("NY25002")).unwrap().is_none());
}

#[test]
fn link_appends_members_and_guards_ownership() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("ledger.sqlite"));
    store.create_mapping(&navy(1, 1)).unwrap();
    store.create_mapping(&navy(2, 2)).unwrap();

    let linked = store.link_source_id(&number("NY25001"), id(3)).unwrap().unwrap();
    let relinked = store.link_source_id(&number("NY25001"), id(3)).unwrap().unwrap();
    let stolen = store.link_source_id(&number("NY25001"), id(2)).unwrap_err();
    let missing = store.link_source_id(&number("NY25099"), id(4)).unwrap();

    assert_eq!(linked.source_record_ids, BTreeSet::from([id(1), id(3)]));
    assert_eq!(relinked.source_record_ids, linked.source_record_ids);
    assert!(relinked.updated_at_ms >= relinked.created_at_ms);
    assert_eq!(stolen, StoreError::Duplicate(DuplicateKey::SourceRecordId(id(2))));
    assert!(missing.is_none());
    assert!(store.find_by_source_id(id(4)).unwrap().is_none());
    let owner = store.find_by_source_id(id(3)).unwrap().unwrap();
    assert_eq!(owner.project_number, number("NY25001"));
    let other = store.find_by_project_number(&number("NY25002")).unwrap().unwrap();
    assert_eq!(other.source_record_ids, BTreeSet::from([id(2)]));
}

#[test]
fn largest_source_record_id_round_trips() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("ledger.sqlite");
    let largest = id(MAX_SOURCE_RECORD_ID);
    let mapping = NewProjectMapping::new(largest, "Navy", "NY", 25, 1).unwrap();
    store_for(&path).create_mapping(&mapping).unwrap();

    let store = store_for(&path);
    let found = store.find_by_source_id(largest).unwrap().unwrap();

    assert_eq!(found.source_record_ids, BTreeSet::from([largest]));
    assert!(SourceRecordId::from_raw(MAX_SOURCE_RECORD_ID + 1).is_none());
}

// ============================================================================
// SECTION: Integrity
// ============================================================================

#[test]
fn mappings_with_members_cannot_be_deleted() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("ledger.sqlite");
    let store = store_for(&path);
    store.create_mapping(&navy(1, 1)).unwrap();
    store.link_source_id(&number("NY25001"), id(2)).unwrap().unwrap();
    let connection = Connection::open(&path).unwrap();
    connection.execute_batch("PRAGMA foreign_keys = ON;").unwrap();

    let deleted = connection
        .execute("DELETE FROM project_mappings WHERE project_number = 'NY25001'", params![]);

    assert!(deleted.is_err());
    let mapping = store.find_by_project_number(&number("NY25001")).unwrap().unwrap();
    assert_eq!(mapping.source_record_ids, BTreeSet::from([id(1), id(2)]));
}

#[test]
fn find_rejects_components_that_disagree_with_number() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("ledger.sqlite");
    let store = store_for(&path);
    store.create_mapping(&navy(1, 1)).unwrap();
    let connection = Connection::open(&path).unwrap();
    connection
        .execute(
            "UPDATE project_mappings SET sequence = 7 WHERE project_number = 'NY25001'",
            params![],
        )
        .unwrap();

    let err = store.find_by_source_id(id(1)).unwrap_err();

    assert!(matches!(err, StoreError::Corrupt(_)));
}

#[test]
fn find_rejects_malformed_stored_number() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("ledger.sqlite");
    let store = store_for(&path);
    let connection = Connection::open(&path).unwrap();
    connection
        .execute_batch(
            "PRAGMA foreign_keys = ON;
             INSERT INTO project_mappings VALUES ('ny25001', 'NY', 25, 1, 'Navy', 0, 0);
             INSERT INTO mapping_members VALUES (5, 'ny25001', 0);",
        )
        .unwrap();

    let err = store.find_by_source_id(id(5)).unwrap_err();

    assert!(matches!(err, StoreError::Corrupt(_)));
}

#[test]
fn reopen_rejects_unknown_schema_version() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("ledger.sqlite");
    drop(store_for(&path));
    let connection = Connection::open(&path).unwrap();
    connection.execute("UPDATE store_meta SET version = 99", params![]).unwrap();
    drop(connection);

    let result = SqliteLedgerStore::new(&SqliteStoreConfig::new(&path));

    assert!(matches!(result, Err(SqliteStoreError::VersionMismatch(_))));
}

#[test]
fn directory_path_is_rejected() {
    let temp = TempDir::new().unwrap();

    let result = SqliteLedgerStore::new(&SqliteStoreConfig::new(temp.path()));

    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn missing_parent_directories_are_created() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("deeper").join("ledger.sqlite");

    let store = SqliteLedgerStore::new(&SqliteStoreConfig::new(&path)).unwrap();

    assert_eq!(store.next_sequence("NY", 25).unwrap(), 1);
    assert!(path.exists());
}
