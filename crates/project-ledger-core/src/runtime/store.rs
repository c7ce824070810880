// crates/project-ledger-core/src/runtime/store.rs
// ============================================================================
// Module: Project Ledger In-Memory Store
// Description: In-memory sequence allocator and mapping store.
// Purpose: Provide a single-process store for tests and local demos.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryLedgerStore`] implements [`SequenceAllocator`] and
//! [`MappingStore`] over shared maps. Each trait method runs under one lock
//! acquisition, which gives the same per-operation atomicity a durable store
//! provides. Clones share state. It is not durable and does not coordinate
//! across processes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crate::core::NewProjectMapping;
use crate::core::ProjectMapping;
use crate::core::ProjectNumber;
use crate::core::SourceRecordId;
use crate::interfaces::DuplicateKey;
use crate::interfaces::MappingStore;
use crate::interfaces::SequenceAllocator;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Ledger contents guarded by the store mutex.
#[derive(Debug, Default)]
struct LedgerState {
    /// Last issued sequence per (department code, year).
    counters: BTreeMap<(String, u8), u64>,
    /// Mappings keyed by project number.
    mappings: BTreeMap<ProjectNumber, ProjectMapping>,
    /// Source record membership index.
    members: BTreeMap<SourceRecordId, ProjectNumber>,
}

/// In-memory ledger store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLedgerStore {
    /// Ledger state protected by a mutex.
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedgerStore {
    /// Creates an empty in-memory ledger store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored mappings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store mutex is poisoned.
    pub fn mapping_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.mappings.len())
    }

    /// Acquires the state lock.
    fn lock(&self) -> Result<MutexGuard<'_, LedgerState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Store("ledger store mutex poisoned".to_string()))
    }
}

impl SequenceAllocator for InMemoryLedgerStore {
    fn next_sequence(&self, department_code: &str, year: u8) -> Result<u64, StoreError> {
        let mut guard = self.lock()?;
        let counter = guard.counters.entry((department_code.to_string(), year)).or_insert(0);
        *counter = counter
            .checked_add(1)
            .ok_or_else(|| StoreError::Invalid("sequence counter overflow".to_string()))?;
        Ok(*counter)
    }

    fn current_sequence(
        &self,
        department_code: &str,
        year: u8,
    ) -> Result<Option<u64>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.counters.get(&(department_code.to_string(), year)).copied())
    }
}

impl MappingStore for InMemoryLedgerStore {
    fn find_by_source_id(&self, id: SourceRecordId) -> Result<Option<ProjectMapping>, StoreError> {
        let guard = self.lock()?;
        let Some(number) = guard.members.get(&id) else {
            return Ok(None);
        };
        guard.mappings.get(number).cloned().map(Some).ok_or_else(|| {
            StoreError::Corrupt(format!("source record {id} points at missing mapping {number}"))
        })
    }

    fn find_by_project_number(
        &self,
        project_number: &ProjectNumber,
    ) -> Result<Option<ProjectMapping>, StoreError> {
        Ok(self.lock()?.mappings.get(project_number).cloned())
    }

    fn create_mapping(&self, mapping: &NewProjectMapping) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if guard.mappings.contains_key(mapping.project_number()) {
            return Err(StoreError::Duplicate(DuplicateKey::ProjectNumber(
                mapping.project_number().clone(),
            )));
        }
        if guard.members.contains_key(&mapping.source_record_id()) {
            return Err(StoreError::Duplicate(DuplicateKey::SourceRecordId(
                mapping.source_record_id(),
            )));
        }
        let stored = mapping.clone().into_mapping(unix_millis());
        guard.members.insert(mapping.source_record_id(), stored.project_number.clone());
        guard.mappings.insert(stored.project_number.clone(), stored);
        drop(guard);
        Ok(())
    }

    fn link_source_id(
        &self,
        project_number: &ProjectNumber,
        id: SourceRecordId,
    ) -> Result<Option<ProjectMapping>, StoreError> {
        let mut guard = self.lock()?;
        if !guard.mappings.contains_key(project_number) {
            return Ok(None);
        }
        let owner = guard.members.get(&id).cloned();
        match owner {
            Some(owner) if &owner != project_number => {
                return Err(StoreError::Duplicate(DuplicateKey::SourceRecordId(id)));
            }
            Some(_) => {}
            None => {
                guard.members.insert(id, project_number.clone());
            }
        }
        let now = unix_millis();
        let linked = guard.mappings.get_mut(project_number).map(|mapping| {
            mapping.source_record_ids.insert(id);
            mapping.updated_at_ms = now;
            mapping.clone()
        });
        drop(guard);
        Ok(linked)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
