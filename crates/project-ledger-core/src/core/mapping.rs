// crates/project-ledger-core/src/core/mapping.rs
// ============================================================================
// Module: Deal-Project Mapping Records
// Description: Records linking project numbers to CRM source records.
// Purpose: Define the persisted mapping shape shared by all stores.
// Dependencies: serde, crate::core
// ============================================================================

//! ## Overview
//! A [`ProjectMapping`] is the durable association between one project number
//! and the set of source records that share it. New mappings are described by
//! [`NewProjectMapping`], which derives the project number from its
//! components so the two can never disagree.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::SourceRecordId;
use crate::core::project_number::ProjectNumber;
use crate::core::project_number::ProjectNumberError;

// ============================================================================
// SECTION: Stored Mapping
// ============================================================================

/// Persisted project mapping.
///
/// # Invariants
/// - `project_number` equals the formatted (`department_code`, `year`,
///   `sequence`) triple.
/// - `source_record_ids` is non-empty and none of its members appear in any
///   other mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMapping {
    /// Canonical project number.
    pub project_number: ProjectNumber,
    /// Two-letter department code.
    pub department_code: String,
    /// Two-digit year.
    pub year: u8,
    /// Sequence within the (department, year) partition.
    pub sequence: u16,
    /// Department name as supplied by the first caller.
    pub department: String,
    /// Source records sharing this project number.
    pub source_record_ids: BTreeSet<SourceRecordId>,
    /// Creation time in unix milliseconds.
    pub created_at_ms: i64,
    /// Last link time in unix milliseconds.
    pub updated_at_ms: i64,
}

impl ProjectMapping {
    /// Returns true when `id` is linked to this mapping.
    #[must_use]
    pub fn contains(&self, id: SourceRecordId) -> bool {
        self.source_record_ids.contains(&id)
    }
}

// ============================================================================
// SECTION: Insert Payload
// ============================================================================

/// Payload for inserting a brand-new mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProjectMapping {
    /// Project number derived from the components.
    project_number: ProjectNumber,
    /// First source record linked to the mapping.
    source_record_id: SourceRecordId,
    /// Department display name.
    department: String,
    /// Two-letter department code.
    department_code: String,
    /// Two-digit year.
    year: u8,
    /// Sequence within the partition.
    sequence: u16,
}

impl NewProjectMapping {
    /// Builds an insert payload, formatting the project number from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectNumberError`] when the parts do not form a canonical
    /// project number.
    pub fn new(
        source_record_id: SourceRecordId,
        department: impl Into<String>,
        department_code: impl Into<String>,
        year: u8,
        sequence: u16,
    ) -> Result<Self, ProjectNumberError> {
        let department_code = department_code.into();
        let project_number = ProjectNumber::from_parts(&department_code, year, sequence)?;
        Ok(Self {
            project_number,
            source_record_id,
            department: department.into(),
            department_code,
            year,
            sequence,
        })
    }

    /// Returns the project number.
    #[must_use]
    pub const fn project_number(&self) -> &ProjectNumber {
        &self.project_number
    }

    /// Returns the initial source record.
    #[must_use]
    pub const fn source_record_id(&self) -> SourceRecordId {
        self.source_record_id
    }

    /// Returns the department display name.
    #[must_use]
    pub fn department(&self) -> &str {
        &self.department
    }

    /// Returns the department code.
    #[must_use]
    pub fn department_code(&self) -> &str {
        &self.department_code
    }

    /// Returns the two-digit year.
    #[must_use]
    pub const fn year(&self) -> u8 {
        self.year
    }

    /// Returns the sequence.
    #[must_use]
    pub const fn sequence(&self) -> u16 {
        self.sequence
    }

    /// Materializes the stored form with both timestamps set to `now_ms`.
    #[must_use]
    pub fn into_mapping(self, now_ms: i64) -> ProjectMapping {
        ProjectMapping {
            project_number: self.project_number,
            department_code: self.department_code,
            year: self.year,
            sequence: self.sequence,
            department: self.department,
            source_record_ids: BTreeSet::from([self.source_record_id]),
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }
}
