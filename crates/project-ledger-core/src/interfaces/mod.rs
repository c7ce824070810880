// crates/project-ledger-core/src/interfaces/mod.rs
// ============================================================================
// Module: Project Ledger Interfaces
// Description: Backend-agnostic storage and clock interfaces.
// Purpose: Define the seams between the resolver and durable storage.
// Dependencies: thiserror, crate::core
// ============================================================================

//! ## Overview
//! The resolver depends on storage only through these traits. Every method
//! must map to a single atomic operation in the backing store: correctness
//! under concurrent callers (possibly in separate processes) rests on the
//! store's atomic increment and its uniqueness constraints, not on any
//! in-process lock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

use crate::core::NewProjectMapping;
use crate::core::ProjectMapping;
use crate::core::ProjectNumber;
use crate::core::SourceRecordId;

// ============================================================================
// SECTION: Store Errors
// ============================================================================

/// Uniqueness constraint that rejected a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateKey {
    /// The project number is already mapped.
    ProjectNumber(ProjectNumber),
    /// The source record is already a member of a mapping.
    SourceRecordId(SourceRecordId),
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProjectNumber(number) => write!(f, "project number {number}"),
            Self::SourceRecordId(id) => write!(f, "source record {id}"),
        }
    }
}

/// Storage errors shared by all ledger backends.
///
/// [`StoreError::Duplicate`] is an expected, recoverable signal; every other
/// variant is a genuine storage failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("ledger store duplicate key: {0}")]
    Duplicate(DuplicateKey),
    /// Store I/O error.
    #[error("ledger store io error: {0}")]
    Io(String),
    /// Store engine error or unreachable backend.
    #[error("ledger store error: {0}")]
    Store(String),
    /// Store data is corrupted or violates record invariants.
    #[error("ledger store corruption: {0}")]
    Corrupt(String),
    /// Store schema version is incompatible.
    #[error("ledger store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store input is invalid.
    #[error("ledger store invalid data: {0}")]
    Invalid(String),
}

impl StoreError {
    /// Returns the violated uniqueness key when this is a duplicate.
    #[must_use]
    pub const fn duplicate_key(&self) -> Option<&DuplicateKey> {
        match self {
            Self::Duplicate(key) => Some(key),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Sequence Allocator
// ============================================================================

/// Issues sequence numbers per (department code, year) partition.
pub trait SequenceAllocator {
    /// Atomically increments and returns the partition counter, creating it
    /// when absent. The first value for a new partition is 1.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the counter cannot be updated.
    fn next_sequence(&self, department_code: &str, year: u8) -> Result<u64, StoreError>;

    /// Returns the last issued value without incrementing, or `None` when the
    /// partition has never been allocated.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the counter cannot be read.
    fn current_sequence(&self, department_code: &str, year: u8)
    -> Result<Option<u64>, StoreError>;
}

// ============================================================================
// SECTION: Mapping Store
// ============================================================================

/// Durable record of project numbers and their linked source records.
pub trait MappingStore {
    /// Finds the mapping whose member set contains `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn find_by_source_id(&self, id: SourceRecordId) -> Result<Option<ProjectMapping>, StoreError>;

    /// Finds the mapping keyed by `project_number`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn find_by_project_number(
        &self,
        project_number: &ProjectNumber,
    ) -> Result<Option<ProjectMapping>, StoreError>;

    /// Inserts a brand-new mapping.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] with [`DuplicateKey::ProjectNumber`]
    /// when the number is taken, or [`DuplicateKey::SourceRecordId`] when the
    /// source record already belongs to a mapping. Nothing is written in
    /// either case.
    fn create_mapping(&self, mapping: &NewProjectMapping) -> Result<(), StoreError>;

    /// Adds `id` to the member set of `project_number` and bumps its update
    /// time. Re-adding a present member is a no-op. Returns `None` when no
    /// mapping has that number.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] with [`DuplicateKey::SourceRecordId`]
    /// when `id` already belongs to a different mapping.
    fn link_source_id(
        &self,
        project_number: &ProjectNumber,
        id: SourceRecordId,
    ) -> Result<Option<ProjectMapping>, StoreError>;
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Source of the current calendar year.
pub trait Clock {
    /// Returns the current calendar year (for example `2025`).
    fn current_year(&self) -> i32;
}
