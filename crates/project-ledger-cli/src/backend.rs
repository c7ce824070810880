// crates/project-ledger-cli/src/backend.rs
// ============================================================================
// Module: Ledger Store Backends
// Description: Runtime selection between the in-memory and SQLite stores.
// Purpose: Give the resolver one concrete store type per config.
// Dependencies: project-ledger-config, project-ledger-core, project-ledger-store-sqlite
// ============================================================================

//! ## Overview
//! [`LedgerBackend`] wraps whichever store the configuration selects and
//! forwards both storage interfaces to it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use project_ledger_config::StoreConfig;
use project_ledger_config::StoreType;
use project_ledger_core::InMemoryLedgerStore;
use project_ledger_core::MappingStore;
use project_ledger_core::NewProjectMapping;
use project_ledger_core::ProjectMapping;
use project_ledger_core::ProjectNumber;
use project_ledger_core::SequenceAllocator;
use project_ledger_core::SourceRecordId;
use project_ledger_core::StoreError;
use project_ledger_store_sqlite::SqliteLedgerStore;

// ============================================================================
// SECTION: Backend
// ============================================================================

/// Store backend chosen by configuration.
#[derive(Clone)]
pub enum LedgerBackend {
    /// Process-local in-memory store.
    Memory(InMemoryLedgerStore),
    /// Durable `SQLite` store.
    Sqlite(SqliteLedgerStore),
}

impl LedgerBackend {
    /// Opens the backend described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the `SQLite` store cannot be opened.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        match config.store_type {
            StoreType::Memory => Ok(Self::Memory(InMemoryLedgerStore::new())),
            StoreType::Sqlite => {
                let sqlite = config.sqlite_config().ok_or_else(|| {
                    StoreError::Invalid("sqlite store requires path".to_string())
                })?;
                Ok(Self::Sqlite(SqliteLedgerStore::new(&sqlite)?))
            }
        }
    }

    /// Returns the backend label used in logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Sqlite(_) => "sqlite",
        }
    }
}

impl SequenceAllocator for LedgerBackend {
    fn next_sequence(&self, department_code: &str, year: u8) -> Result<u64, StoreError> {
        match self {
            Self::Memory(store) => store.next_sequence(department_code, year),
            Self::Sqlite(store) => store.next_sequence(department_code, year),
        }
    }

    fn current_sequence(
        &self,
        department_code: &str,
        year: u8,
    ) -> Result<Option<u64>, StoreError> {
        match self {
            Self::Memory(store) => store.current_sequence(department_code, year),
            Self::Sqlite(store) => store.current_sequence(department_code, year),
        }
    }
}

impl MappingStore for LedgerBackend {
    fn find_by_source_id(&self, id: SourceRecordId) -> Result<Option<ProjectMapping>, StoreError> {
        match self {
            Self::Memory(store) => store.find_by_source_id(id),
            Self::Sqlite(store) => store.find_by_source_id(id),
        }
    }

    fn find_by_project_number(
        &self,
        project_number: &ProjectNumber,
    ) -> Result<Option<ProjectMapping>, StoreError> {
        match self {
            Self::Memory(store) => store.find_by_project_number(project_number),
            Self::Sqlite(store) => store.find_by_project_number(project_number),
        }
    }

    fn create_mapping(&self, mapping: &NewProjectMapping) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.create_mapping(mapping),
            Self::Sqlite(store) => store.create_mapping(mapping),
        }
    }

    fn link_source_id(
        &self,
        project_number: &ProjectNumber,
        id: SourceRecordId,
    ) -> Result<Option<ProjectMapping>, StoreError> {
        match self {
            Self::Memory(store) => store.link_source_id(project_number, id),
            Self::Sqlite(store) => store.link_source_id(project_number, id),
        }
    }
}
