// crates/project-ledger-core/src/lib.rs
// ============================================================================
// Module: Project Ledger Core Library
// Description: Public API surface for project number allocation.
// Purpose: Expose core types, storage interfaces, and the resolver.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Project Ledger core hands out human-readable project numbers of the form
//! `DDYYSSS` per (department, year) partition and links CRM deal records to
//! them. Every source record maps to exactly one project number, even when
//! several callers race on the same record. Mutual exclusion is delegated to
//! the backing store through the [`SequenceAllocator`] and [`MappingStore`]
//! interfaces; the core holds no locks and no cached state between calls.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::Clock;
pub use interfaces::DuplicateKey;
pub use interfaces::MappingStore;
pub use interfaces::SequenceAllocator;
pub use interfaces::StoreError;
pub use runtime::InMemoryLedgerStore;
pub use runtime::MAX_ALLOCATION_ATTEMPTS;
pub use runtime::ProjectNumberResolver;
pub use runtime::ResolveError;
pub use runtime::ResolveRequest;
pub use runtime::ValidationError;
