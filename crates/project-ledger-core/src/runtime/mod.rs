// crates/project-ledger-core/src/runtime/mod.rs
// ============================================================================
// Module: Project Ledger Runtime
// Description: Project number resolution and the in-memory store.
// Purpose: Tie the registry, codec, and storage interfaces together.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime components: the [`ProjectNumberResolver`] entry point and the
//! [`InMemoryLedgerStore`] used by tests and local runs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod resolver;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use resolver::MAX_ALLOCATION_ATTEMPTS;
pub use resolver::ProjectNumberResolver;
pub use resolver::ResolveError;
pub use resolver::ResolveRequest;
pub use resolver::ValidationError;
pub use store::InMemoryLedgerStore;
