// crates/project-ledger-core/src/core/clock.rs
// ============================================================================
// Module: Project Ledger Clocks
// Description: Year sources used to partition project numbers.
// Purpose: Keep wall-clock reads behind the Clock interface.
// Dependencies: time, crate::interfaces
// ============================================================================

//! ## Overview
//! The resolver never reads wall-clock time directly. Hosts supply a
//! [`Clock`]: [`SystemClock`] reads the current UTC year, [`FixedClock`] pins
//! a year for tests and replays.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ::time::OffsetDateTime;

use crate::interfaces::Clock;

// ============================================================================
// SECTION: Clocks
// ============================================================================

/// Clock backed by the system UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        OffsetDateTime::now_utc().year()
    }
}

/// Clock pinned to a single calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    /// Calendar year reported by the clock.
    year: i32,
}

impl FixedClock {
    /// Creates a clock that always reports `year`.
    #[must_use]
    pub const fn new(year: i32) -> Self {
        Self {
            year,
        }
    }
}

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.year
    }
}

/// Reduces a calendar year to its two-digit partition value (`year mod 100`).
#[must_use]
pub fn two_digit_year(year: i32) -> u8 {
    u8::try_from(year.rem_euclid(100)).unwrap_or_default()
}
