// crates/project-ledger-core/src/core/mod.rs
// ============================================================================
// Module: Project Ledger Core Types
// Description: Department registry, project number codec, and records.
// Purpose: Group the pure, storage-independent building blocks.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! Pure types and functions with no storage access: the department table, the
//! canonical project number grammar, identifier wrappers, mapping records,
//! and clock implementations.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod clock;
pub mod department;
pub mod identifiers;
pub mod mapping;
pub mod project_number;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use clock::FixedClock;
pub use clock::SystemClock;
pub use clock::two_digit_year;
pub use department::BUILTIN_DEPARTMENTS;
pub use department::DepartmentRegistry;
pub use department::DepartmentRegistryError;
pub use department::is_department_code;
pub use identifiers::MAX_SOURCE_RECORD_ID;
pub use identifiers::RawSourceId;
pub use identifiers::SourceIdError;
pub use identifiers::SourceRecordId;
pub use mapping::NewProjectMapping;
pub use mapping::ProjectMapping;
pub use project_number::MAX_SEQUENCE;
pub use project_number::PROJECT_NUMBER_LEN;
pub use project_number::ProjectNumber;
pub use project_number::ProjectNumberError;
pub use project_number::ProjectNumberParts;
pub use project_number::format_project_number;
pub use project_number::is_valid_project_number;
pub use project_number::parse_project_number;
