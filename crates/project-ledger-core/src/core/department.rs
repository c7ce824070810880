// crates/project-ledger-core/src/core/department.rs
// ============================================================================
// Module: Department Registry
// Description: Static lookup from department names to two-letter codes.
// Purpose: Resolve the partition prefix used in project numbers.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The department registry maps human-readable department names (as they
//! appear on CRM deals) to the two-letter code embedded in project numbers.
//! The table is immutable configuration: it is fixed at construction and only
//! handed out as an owned copy, so callers cannot alter the shared mapping.
//!
//! ## Invariants
//! - Lookups are exact and case-sensitive; no trimming or folding.
//! - Every code is exactly two uppercase ASCII letters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

// ============================================================================
// SECTION: Built-in Table
// ============================================================================

/// Built-in department name to code table.
pub const BUILTIN_DEPARTMENTS: &[(&str, &str)] = &[
    ("Air Force", "AF"),
    ("Army", "AR"),
    ("Coast Guard", "CG"),
    ("Commercial", "CM"),
    ("Federal Civilian", "FC"),
    ("International", "IN"),
    ("Marine Corps", "MC"),
    ("Navy", "NY"),
    ("Research & Development", "RD"),
    ("Space Force", "SF"),
];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building a department registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepartmentRegistryError {
    /// A department name was empty or whitespace.
    #[error("department name must be non-empty")]
    EmptyName,
    /// A department code does not match `[A-Z]{2}`.
    #[error("department {name} has invalid code {code:?} (expected two uppercase letters)")]
    InvalidCode {
        /// Department name carrying the bad code.
        name: String,
        /// Offending code.
        code: String,
    },
    /// The same department name appeared twice.
    #[error("department {0} is listed more than once")]
    DuplicateName(String),
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Immutable department name to code table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentRegistry {
    /// Name to code entries.
    entries: BTreeMap<String, String>,
}

impl DepartmentRegistry {
    /// Returns the registry backed by [`BUILTIN_DEPARTMENTS`].
    #[must_use]
    pub fn builtin() -> Self {
        let entries = BUILTIN_DEPARTMENTS
            .iter()
            .map(|(name, code)| ((*name).to_string(), (*code).to_string()))
            .collect();
        Self {
            entries,
        }
    }

    /// Builds a registry from explicit `(name, code)` entries.
    ///
    /// # Errors
    ///
    /// Returns [`DepartmentRegistryError`] when a name is empty, a code is not
    /// two uppercase ASCII letters, or a name repeats.
    pub fn from_entries<I, N, C>(entries: I) -> Result<Self, DepartmentRegistryError>
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        let mut table = BTreeMap::new();
        for (name, code) in entries {
            let name = name.into();
            let code = code.into();
            if name.trim().is_empty() {
                return Err(DepartmentRegistryError::EmptyName);
            }
            if !is_department_code(&code) {
                return Err(DepartmentRegistryError::InvalidCode {
                    name,
                    code,
                });
            }
            if table.contains_key(&name) {
                return Err(DepartmentRegistryError::DuplicateName(name));
            }
            table.insert(name, code);
        }
        Ok(Self {
            entries: table,
        })
    }

    /// Returns the code for `name`, or `None` when the name is not mapped.
    #[must_use]
    pub fn code_for(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Returns an owned copy of every name to code entry.
    ///
    /// Mutating the returned map has no effect on the registry.
    #[must_use]
    pub fn all_mappings(&self) -> BTreeMap<String, String> {
        self.entries.clone()
    }

    /// Returns the number of mapped departments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no departments are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DepartmentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Returns true when `code` is exactly two uppercase ASCII letters.
#[must_use]
pub fn is_department_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|byte| byte.is_ascii_uppercase())
}
