// crates/project-ledger-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Unit tests for catalog lookup and placeholder substitution.
// Purpose: Keep catalog templates well formed.
// Dependencies: project-ledger-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies substitution, the missing-key fallback, and placeholder syntax
//! of every catalog template.

use std::collections::BTreeSet;

use crate::i18n::CATALOG_ITEMS;
use crate::i18n::MessageArg;
use crate::i18n::translate;

fn placeholder_names(template: &str) -> Result<BTreeSet<&str>, String> {
    let mut names = BTreeSet::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1 ..];
        let close = after.find('}').ok_or_else(|| format!("unclosed '{{' in {template}"))?;
        let name = &after[.. close];
        if name.is_empty()
            || !name.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_')
        {
            return Err(format!("bad placeholder '{name}' in {template}"));
        }
        names.insert(name);
        rest = &after[close + 1 ..];
    }
    if rest.contains('}') {
        return Err(format!("unmatched '}}' in {template}"));
    }
    Ok(names)
}

#[test]
fn translate_substitutes_named_args() {
    let message = translate(
        "show.not_found.project",
        vec![MessageArg::new("project_number", "NY25001")],
    );
    assert_eq!(message, "No project mapping for project number NY25001.");
}

#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("missing.key", Vec::new()), "missing.key");
}

#[test]
fn t_macro_formats_values() {
    let message = crate::t!("config.validate.departments", count = 21);
    assert_eq!(message, "Departments: 21");
}

#[test]
fn catalog_keys_are_unique() {
    let keys: BTreeSet<&str> = CATALOG_ITEMS.iter().map(|(key, _)| *key).collect();
    assert_eq!(keys.len(), CATALOG_ITEMS.len());
}

#[test]
fn catalog_placeholders_are_well_formed() {
    for (key, template) in CATALOG_ITEMS {
        if let Err(err) = placeholder_names(template) {
            panic!("{key}: {err}");
        }
    }
}
