//! Tests against the built-in catalog and an on-disk override file.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::allocate;
use tax_core::editor::validate_schedule;
use tax_data::PresetCatalog;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn builtin_catalog_loads() {
    let catalog = PresetCatalog::builtin().expect("built-in presets should parse");

    assert_eq!(catalog.len(), 7);
}

#[test]
fn builtin_catalog_groups_by_jurisdiction() {
    let catalog = PresetCatalog::builtin().unwrap();

    let groups: Vec<_> = catalog
        .groups()
        .into_iter()
        .map(|(name, members)| (name.to_string(), members.len()))
        .collect();

    assert_eq!(
        groups,
        vec![
            ("".to_string(), 1),
            ("US Federal".to_string(), 4),
            ("California State".to_string(), 2),
        ]
    );
}

#[test]
fn builtin_custom_preset_has_no_brackets() {
    let catalog = PresetCatalog::builtin().unwrap();

    let custom = catalog.require("custom").unwrap();

    assert!(custom.is_custom());
}

#[test]
fn builtin_schedules_are_valid() {
    let catalog = PresetCatalog::builtin().unwrap();

    for preset in catalog.presets().iter().filter(|p| !p.is_custom()) {
        assert_eq!(validate_schedule(&preset.brackets), Ok(()), "{}", preset.id);
    }
}

#[test]
fn us_federal_2025_matches_published_base_tax() {
    let catalog = PresetCatalog::builtin().unwrap();
    let brackets = &catalog.require("us-federal-2025").unwrap().brackets;

    // Base tax amounts from the 2025 Schedule X rate table.
    assert_eq!(allocate(brackets, dec!(11925)).total_tax, dec!(1192.50));
    assert_eq!(allocate(brackets, dec!(103350)).total_tax, dec!(17651));
    assert_eq!(allocate(brackets, dec!(197300)).total_tax, dec!(40199));
    assert_eq!(allocate(brackets, dec!(626350)).total_tax, dec!(188769.75));
}

#[test]
fn california_2024_applies_fractional_rates() {
    let catalog = PresetCatalog::builtin().unwrap();
    let brackets = &catalog.require("california-2024").unwrap().brackets;

    let allocation = allocate(brackets, dec!(80606));

    assert_eq!(allocation.breakdowns.len(), 6);
    assert_eq!(allocation.breakdowns[5].tax, dec!(930));
    assert_eq!(allocation.total_tax, dec!(4038.72));
}

#[test]
fn override_file_replaces_and_extends_builtin() {
    let mut catalog = PresetCatalog::builtin().unwrap();
    let extra = PresetCatalog::from_path(&fixture_path("extra_presets.toml"))
        .expect("fixture should load");

    catalog.merge(extra);

    assert_eq!(catalog.len(), 8);
    let replaced = catalog.require("us-federal-2025").unwrap();
    assert_eq!(replaced.name, "US Federal 2025 (rounded)");
    assert_eq!(replaced.brackets.len(), 2);
    assert_eq!(catalog.require("flat-15").unwrap().group, "Examples");
}
