// crates/project-ledger-core/tests/project_number_codec.rs
// ============================================================================
// Module: Project Number Codec Tests
// Description: Grammar, formatting, and parsing of project numbers.
// Purpose: Pin the canonical `[A-Z]{2}[0-9]{2}[0-9]{3}` format.
// ============================================================================

//! Codec tests, including property checks over the full valid space.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use project_ledger_core::ProjectNumber;
use project_ledger_core::ProjectNumberError;
use project_ledger_core::ProjectNumberParts;
use project_ledger_core::format_project_number;
use project_ledger_core::is_valid_project_number;
use project_ledger_core::parse_project_number;
use proptest::prelude::*;

#[test]
fn format_pads_year_and_sequence() {
    assert_eq!(format_project_number("NY", 25, 1), "NY25001");
    assert_eq!(format_project_number("AR", 5, 42), "AR05042");
    assert_eq!(format_project_number("SF", 0, 999), "SF00999");
}

#[test]
fn grammar_accepts_boundary_values() {
    assert!(is_valid_project_number("NY25001"));
    assert!(is_valid_project_number("NY00000"));
    assert!(is_valid_project_number("NY99999"));
    assert!(is_valid_project_number("ZZ00999"));
}

#[test]
fn grammar_rejects_near_misses() {
    for value in [
        "", "ny25001", "Ny25001", "NY2500", "NY250001", "NY 25001", "NY-25001", "N925001",
        "NYA5001", "NY2500A", " NY25001", "NY25001 ", "ÑY25001",
    ] {
        assert!(!is_valid_project_number(value), "{value:?} should be rejected");
        assert_eq!(parse_project_number(value), None, "{value:?} should not parse");
        assert_eq!(
            ProjectNumber::new(value),
            Err(ProjectNumberError::Malformed(value.to_string()))
        );
    }
}

#[test]
fn parse_reads_components() {
    let parts = parse_project_number("RD24137").unwrap();

    assert_eq!(
        parts,
        ProjectNumberParts {
            department_code: "RD".to_string(),
            year: 24,
            sequence: 137,
        }
    );
    assert_eq!(parts.format(), "RD24137");
}

#[test]
fn from_parts_rejects_non_canonical_code() {
    assert!(ProjectNumber::from_parts("ny", 25, 1).is_err());
    assert!(ProjectNumber::from_parts("NAV", 25, 1).is_err());
    assert!(ProjectNumber::from_parts("NY", 25, 1_000).is_err());
}

#[test]
fn serde_round_trip_validates_on_decode() {
    let number = ProjectNumber::new("CG25010").unwrap();

    let encoded = serde_json::to_string(&number).unwrap();
    assert_eq!(encoded, "\"CG25010\"");
    let decoded: ProjectNumber = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, number);
    assert!(serde_json::from_str::<ProjectNumber>("\"cg25010\"").is_err());
}

proptest! {
    #[test]
    fn format_then_parse_recovers_parts(
        code in "[A-Z]{2}",
        year in 0_u8 ..= 99,
        sequence in 0_u16 ..= 999,
    ) {
        let formatted = format_project_number(&code, year, sequence);
        prop_assert!(is_valid_project_number(&formatted));
        let parts = parse_project_number(&formatted).unwrap();
        prop_assert_eq!(&parts.department_code, &code);
        prop_assert_eq!(parts.year, year);
        prop_assert_eq!(parts.sequence, sequence);
        let number = ProjectNumber::from_parts(&code, year, sequence).unwrap();
        prop_assert_eq!(number.parts(), parts);
    }

    #[test]
    fn parse_agrees_with_validation(value in "\\PC{0,9}") {
        prop_assert_eq!(parse_project_number(&value).is_some(), is_valid_project_number(&value));
    }
}
