// crates/project-ledger-core/src/core/project_number.rs
// ============================================================================
// Module: Project Number Codec
// Description: Canonical `DDYYSSS` project number grammar.
// Purpose: Format, validate, and parse project numbers.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A project number is exactly seven ASCII characters: a two-letter
//! uppercase department code, a zero-padded two-digit year, and a
//! zero-padded three-digit sequence (`NY25001`). There are no separators.
//!
//! [`format_project_number`] embeds its inputs verbatim and does not
//! validate them. [`ProjectNumber`] is the validated form used by records
//! and storage; it cannot hold a string outside the grammar.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Length of a canonical project number.
pub const PROJECT_NUMBER_LEN: usize = 7;
/// Largest sequence the three-digit field can hold.
pub const MAX_SEQUENCE: u16 = 999;
/// Width of the department code field.
const CODE_WIDTH: usize = 2;
/// Offset where the sequence field starts.
const SEQUENCE_OFFSET: usize = 4;

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Formats a project number from its parts.
///
/// The sequence is zero-padded to three digits and the year to two. Neither
/// the code nor the ranges are checked; callers own that.
#[must_use]
pub fn format_project_number(department_code: &str, year: u8, sequence: u16) -> String {
    format!("{department_code}{year:02}{sequence:03}")
}

/// Returns true when `value` matches `[A-Z]{2}[0-9]{2}[0-9]{3}` exactly.
#[must_use]
pub fn is_valid_project_number(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == PROJECT_NUMBER_LEN
        && bytes[.. CODE_WIDTH].iter().all(u8::is_ascii_uppercase)
        && bytes[CODE_WIDTH ..].iter().all(u8::is_ascii_digit)
}

/// Parses a project number into its parts.
///
/// Returns `None` exactly when [`is_valid_project_number`] is false.
#[must_use]
pub fn parse_project_number(value: &str) -> Option<ProjectNumberParts> {
    is_valid_project_number(value).then(|| split_fields(value))
}

/// Slices the fixed-width fields of a canonical project number.
///
/// Callers must have checked [`is_valid_project_number`] first.
fn split_fields(value: &str) -> ProjectNumberParts {
    let bytes = value.as_bytes();
    let digit = |index: usize| bytes[index] - b'0';
    let year = digit(CODE_WIDTH) * 10 + digit(CODE_WIDTH + 1);
    let sequence = bytes[SEQUENCE_OFFSET ..]
        .iter()
        .fold(0_u16, |acc, byte| acc * 10 + u16::from(byte - b'0'));
    ProjectNumberParts {
        department_code: value[.. CODE_WIDTH].to_string(),
        year,
        sequence,
    }
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Components of a project number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectNumberParts {
    /// Two-letter department code.
    pub department_code: String,
    /// Two-digit year (0-99).
    pub year: u8,
    /// Sequence within the (department, year) partition.
    pub sequence: u16,
}

impl ProjectNumberParts {
    /// Formats the parts back into a project number string.
    #[must_use]
    pub fn format(&self) -> String {
        format_project_number(&self.department_code, self.year, self.sequence)
    }
}

/// Errors raised when constructing a [`ProjectNumber`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectNumberError {
    /// The string does not match the canonical grammar.
    #[error("invalid project number {0:?}: expected two uppercase letters and five digits")]
    Malformed(String),
}

/// Validated canonical project number.
///
/// # Invariants
/// - The wrapped string always satisfies [`is_valid_project_number`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectNumber(String);

impl ProjectNumber {
    /// Validates and wraps a project number string.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectNumberError::Malformed`] when `value` is outside the
    /// grammar.
    pub fn new(value: impl Into<String>) -> Result<Self, ProjectNumberError> {
        let value = value.into();
        if is_valid_project_number(&value) {
            Ok(Self(value))
        } else {
            Err(ProjectNumberError::Malformed(value))
        }
    }

    /// Builds a project number from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectNumberError::Malformed`] when the code is not two
    /// uppercase letters, the year exceeds 99, or the sequence exceeds
    /// [`MAX_SEQUENCE`].
    pub fn from_parts(
        department_code: &str,
        year: u8,
        sequence: u16,
    ) -> Result<Self, ProjectNumberError> {
        Self::new(format_project_number(department_code, year, sequence))
    }

    /// Returns the project number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the parsed components.
    #[must_use]
    pub fn parts(&self) -> ProjectNumberParts {
        split_fields(&self.0)
    }
}

impl fmt::Display for ProjectNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for ProjectNumber {
    type Error = ProjectNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ProjectNumber {
    type Error = ProjectNumberError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectNumber> for String {
    fn from(value: ProjectNumber) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
