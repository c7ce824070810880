// crates/project-ledger-core/src/core/identifiers.rs
// ============================================================================
// Module: Project Ledger Identifiers
// Description: Source record identifiers supplied by the CRM.
// Purpose: Validate and normalize deal identifiers before storage access.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! CRM deals are addressed by positive integer identifiers. Callers hand them
//! over either as JSON numbers or as strings; [`RawSourceId`] captures both
//! wire forms and [`RawSourceId::to_source_record_id`] coerces them into a
//! validated [`SourceRecordId`].
//!
//! Identifiers are capped at [`MAX_SOURCE_RECORD_ID`] so every store,
//! including the `SQLite` `INTEGER` column, can hold every accepted value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU64;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Largest accepted source record identifier (`i64::MAX`).
pub const MAX_SOURCE_RECORD_ID: u64 = i64::MAX.unsigned_abs();

// ============================================================================
// SECTION: Source Record Identifier
// ============================================================================

/// Positive integer identifier of a CRM source record (deal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct SourceRecordId(NonZeroU64);

impl SourceRecordId {
    /// Creates a source record identifier from a raw integer.
    ///
    /// Returns `None` when `value` is zero or above [`MAX_SOURCE_RECORD_ID`].
    #[must_use]
    pub const fn from_raw(value: u64) -> Option<Self> {
        if value > MAX_SOURCE_RECORD_ID {
            return None;
        }
        match NonZeroU64::new(value) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for SourceRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<SourceRecordId> for u64 {
    fn from(value: SourceRecordId) -> Self {
        value.get()
    }
}

impl TryFrom<u64> for SourceRecordId {
    type Error = SourceIdError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > MAX_SOURCE_RECORD_ID {
            return Err(SourceIdError::OutOfRange(value.to_string()));
        }
        Self::from_raw(value).ok_or_else(|| SourceIdError::NotPositive(value.to_string()))
    }
}

impl TryFrom<i64> for SourceRecordId {
    type Error = SourceIdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .ok()
            .and_then(Self::from_raw)
            .ok_or_else(|| SourceIdError::NotPositive(value.to_string()))
    }
}

impl std::str::FromStr for SourceRecordId {
    type Err = SourceIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SourceIdError::Empty);
        }
        if !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(SourceIdError::NotInteger(value.to_string()));
        }
        let raw: u64 =
            trimmed.parse().map_err(|_| SourceIdError::OutOfRange(value.to_string()))?;
        if raw > MAX_SOURCE_RECORD_ID {
            return Err(SourceIdError::OutOfRange(value.to_string()));
        }
        Self::from_raw(raw).ok_or_else(|| SourceIdError::NotPositive(value.to_string()))
    }
}

// ============================================================================
// SECTION: Raw Wire Form
// ============================================================================

/// Source record identifier as supplied by a caller, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSourceId {
    /// Numeric identifier.
    Integer(i64),
    /// String identifier, expected to hold decimal digits.
    Text(String),
}

impl RawSourceId {
    /// Coerces the raw value into a positive [`SourceRecordId`].
    ///
    /// # Errors
    ///
    /// Returns [`SourceIdError`] when the value is empty, non-numeric, out of
    /// range, or not strictly positive.
    pub fn to_source_record_id(&self) -> Result<SourceRecordId, SourceIdError> {
        match self {
            Self::Integer(value) => SourceRecordId::try_from(*value),
            Self::Text(value) => value.parse(),
        }
    }
}

impl From<i32> for RawSourceId {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for RawSourceId {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u64> for RawSourceId {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Text(value.to_string()), Self::Integer)
    }
}

impl From<SourceRecordId> for RawSourceId {
    fn from(value: SourceRecordId) -> Self {
        Self::from(value.get())
    }
}

impl From<&str> for RawSourceId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawSourceId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reasons a raw source identifier is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceIdError {
    /// The identifier was empty or whitespace.
    #[error("source record id is empty")]
    Empty,
    /// The identifier contains non-digit characters.
    #[error("source record id {0:?} is not an integer")]
    NotInteger(String),
    /// The identifier exceeds [`MAX_SOURCE_RECORD_ID`].
    #[error("source record id {0:?} is out of range")]
    OutOfRange(String),
    /// The identifier is zero or negative.
    #[error("source record id {0:?} must be positive")]
    NotPositive(String),
}
