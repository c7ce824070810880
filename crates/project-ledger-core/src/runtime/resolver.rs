// crates/project-ledger-core/src/runtime/resolver.rs
// ============================================================================
// Module: Project Number Resolver
// Description: Idempotent lookup, link-to-existing, and generate-new paths.
// Purpose: Map each source record to exactly one project number.
// Dependencies: serde, thiserror, tracing, crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`ProjectNumberResolver::resolve`] answers "which project number does this
//! source record use". It first returns any existing mapping, then tries the
//! optional link target, then allocates a fresh sequence and inserts a new
//! mapping. Races are handled optimistically: a uniqueness violation on the
//! project number retries with a fresh sequence, and a violation on the
//! source record re-reads the winner's mapping. Attempts are bounded by
//! [`MAX_ALLOCATION_ATTEMPTS`].
//!
//! ## Invariants
//! - No state is cached between calls; every decision re-reads the store.
//! - Validation failures never touch storage.
//! - A source record that already has a mapping never consumes a sequence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::core::DepartmentRegistry;
use crate::core::MAX_SEQUENCE;
use crate::core::NewProjectMapping;
use crate::core::ProjectNumber;
use crate::core::ProjectNumberError;
use crate::core::RawSourceId;
use crate::core::SourceIdError;
use crate::core::SourceRecordId;
use crate::core::two_digit_year;
use crate::interfaces::Clock;
use crate::interfaces::DuplicateKey;
use crate::interfaces::MappingStore;
use crate::interfaces::SequenceAllocator;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum allocate-and-insert attempts before giving up.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 5;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Resolve request as received from a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    /// Source record identifier (number or numeric string).
    pub source_id: RawSourceId,
    /// Department display name.
    pub department: String,
    /// Optional existing project number to link to.
    #[serde(default)]
    pub link_target: Option<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Input rejected before any storage access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Source record identifier is not a positive integer.
    #[error("invalid source record id: {0}")]
    InvalidSourceId(#[from] SourceIdError),
    /// Department name is empty.
    #[error("department name must be non-empty")]
    EmptyDepartment,
    /// Department name has no code in the registry.
    #[error("department {0:?} has no project number code")]
    UnmappedDepartment(String),
}

/// Errors returned by [`ProjectNumberResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The request failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Every allocation attempt hit a uniqueness conflict.
    #[error(
        "gave up allocating a project number for source record {source_id} in {department} after \
         {attempts} attempts ({project_number_conflicts} project number conflicts, \
         {source_record_conflicts} source record conflicts)"
    )]
    ConflictExhausted {
        /// Source record being resolved.
        source_id: SourceRecordId,
        /// Department display name.
        department: String,
        /// Attempts made.
        attempts: u32,
        /// Attempts lost to another caller taking the same project number.
        project_number_conflicts: u32,
        /// Attempts lost to a concurrent mapping of the same source record.
        source_record_conflicts: u32,
    },
    /// The partition issued a sequence beyond the three-digit field.
    #[error("sequence space exhausted for {department_code}{year:02}: allocator issued {sequence}")]
    SequenceExhausted {
        /// Department code of the partition.
        department_code: String,
        /// Two-digit year of the partition.
        year: u8,
        /// Sequence value that did not fit.
        sequence: u64,
    },
    /// The registry produced a code that cannot form a project number.
    #[error(transparent)]
    ProjectNumber(#[from] ProjectNumberError),
    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ResolveError {
    /// Returns true when the error is a caller input problem.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves source records to project numbers.
#[derive(Debug, Clone)]
pub struct ProjectNumberResolver<A, M, C> {
    /// Partitioned sequence allocator.
    allocator: A,
    /// Mapping store.
    mappings: M,
    /// Department name to code table.
    registry: DepartmentRegistry,
    /// Year source.
    clock: C,
}

impl<A, M, C> ProjectNumberResolver<A, M, C>
where
    A: SequenceAllocator,
    M: MappingStore,
    C: Clock,
{
    /// Creates a resolver over the given collaborators.
    #[must_use]
    pub const fn new(allocator: A, mappings: M, registry: DepartmentRegistry, clock: C) -> Self {
        Self {
            allocator,
            mappings,
            registry,
            clock,
        }
    }

    /// Returns the department registry.
    #[must_use]
    pub const fn registry(&self) -> &DepartmentRegistry {
        &self.registry
    }

    /// Returns the mapping store.
    #[must_use]
    pub const fn mappings(&self) -> &M {
        &self.mappings
    }

    /// Resolves a project number from loose inputs.
    ///
    /// # Errors
    ///
    /// See [`ProjectNumberResolver::resolve`].
    pub fn resolve_project_number(
        &self,
        source_id: impl Into<RawSourceId>,
        department: &str,
        link_target: Option<&str>,
    ) -> Result<ProjectNumber, ResolveError> {
        self.resolve(&ResolveRequest {
            source_id: source_id.into(),
            department: department.to_string(),
            link_target: link_target.map(str::to_string),
        })
    }

    /// Returns the project number for `request.source_id`, linking or
    /// generating one when the record has none.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Validation`] for bad input,
    /// [`ResolveError::ConflictExhausted`] when every attempt collided,
    /// [`ResolveError::SequenceExhausted`] when the partition is full, and
    /// [`ResolveError::Storage`] when the store fails.
    pub fn resolve(&self, request: &ResolveRequest) -> Result<ProjectNumber, ResolveError> {
        let source_id =
            request.source_id.to_source_record_id().map_err(ValidationError::InvalidSourceId)?;
        if request.department.trim().is_empty() {
            return Err(ValidationError::EmptyDepartment.into());
        }
        let department = request.department.as_str();

        if let Some(existing) = self.mappings.find_by_source_id(source_id)? {
            debug!(
                source_id = %source_id,
                project_number = %existing.project_number,
                "source record already mapped"
            );
            return Ok(existing.project_number);
        }

        let link_target =
            request.link_target.as_deref().map(str::trim).filter(|target| !target.is_empty());
        if let Some(target) = link_target
            && let Some(number) = self.link(source_id, target)?
        {
            return Ok(number);
        }

        let department_code = self
            .registry
            .code_for(department)
            .ok_or_else(|| ValidationError::UnmappedDepartment(department.to_string()))?;
        let year = two_digit_year(self.clock.current_year());
        self.generate(source_id, department, department_code, year)
    }

    /// Links `source_id` to an existing project number.
    ///
    /// Returns `None` when the target is malformed or unknown, so the caller
    /// falls through to generation.
    fn link(
        &self,
        source_id: SourceRecordId,
        target: &str,
    ) -> Result<Option<ProjectNumber>, ResolveError> {
        let Ok(number) = ProjectNumber::new(target) else {
            warn!(
                source_id = %source_id,
                link_target = target,
                "link target is malformed; generating"
            );
            return Ok(None);
        };
        match self.mappings.link_source_id(&number, source_id) {
            Ok(Some(mapping)) => {
                info!(
                    source_id = %source_id,
                    project_number = %mapping.project_number,
                    "linked source record to existing project"
                );
                Ok(Some(mapping.project_number))
            }
            Ok(None) => {
                warn!(
                    source_id = %source_id,
                    link_target = %number,
                    "link target not found; generating"
                );
                Ok(None)
            }
            Err(StoreError::Duplicate(DuplicateKey::SourceRecordId(_))) => {
                let existing = self.mappings.find_by_source_id(source_id)?.ok_or_else(|| {
                    StoreError::Duplicate(DuplicateKey::SourceRecordId(source_id))
                })?;
                debug!(
                    source_id = %source_id,
                    project_number = %existing.project_number,
                    "source record mapped concurrently during link"
                );
                Ok(Some(existing.project_number))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Allocates a fresh sequence and inserts a new mapping, retrying on
    /// uniqueness conflicts.
    fn generate(
        &self,
        source_id: SourceRecordId,
        department: &str,
        department_code: &str,
        year: u8,
    ) -> Result<ProjectNumber, ResolveError> {
        let mut project_number_conflicts = 0;
        let mut source_record_conflicts = 0;
        for attempt in 1 ..= MAX_ALLOCATION_ATTEMPTS {
            let issued = self.allocator.next_sequence(department_code, year)?;
            let sequence = u16::try_from(issued)
                .ok()
                .filter(|sequence| *sequence <= MAX_SEQUENCE)
                .ok_or_else(|| ResolveError::SequenceExhausted {
                    department_code: department_code.to_string(),
                    year,
                    sequence: issued,
                })?;
            let mapping =
                NewProjectMapping::new(source_id, department, department_code, year, sequence)?;
            match self.mappings.create_mapping(&mapping) {
                Ok(()) => {
                    info!(
                        source_id = %source_id,
                        project_number = %mapping.project_number(),
                        attempt,
                        "allocated project number"
                    );
                    return Ok(mapping.project_number().clone());
                }
                Err(StoreError::Duplicate(DuplicateKey::ProjectNumber(number))) => {
                    project_number_conflicts += 1;
                    warn!(
                        source_id = %source_id,
                        project_number = %number,
                        attempt,
                        "project number taken by another caller; retrying"
                    );
                }
                Err(StoreError::Duplicate(DuplicateKey::SourceRecordId(_))) => {
                    source_record_conflicts += 1;
                    if let Some(existing) = self.mappings.find_by_source_id(source_id)? {
                        debug!(
                            source_id = %source_id,
                            project_number = %existing.project_number,
                            "source record mapped concurrently; using winner"
                        );
                        return Ok(existing.project_number);
                    }
                    warn!(
                        source_id = %source_id,
                        attempt,
                        "source record conflict without a visible mapping; retrying"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
        warn!(
            source_id = %source_id,
            department,
            project_number_conflicts,
            source_record_conflicts,
            "project number allocation exhausted"
        );
        Err(ResolveError::ConflictExhausted {
            source_id,
            department: department.to_string(),
            attempts: MAX_ALLOCATION_ATTEMPTS,
            project_number_conflicts,
            source_record_conflicts,
        })
    }
}
