//! Integration tests that exercise the CSV loader against on-disk fixtures.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::editor::ScheduleError;
use tax_core::{TaxBracket, allocate};
use tax_data::{BracketCsvLoader, BracketLoaderError};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn load_fixture_file_groups_schedules() {
    let schedules = BracketCsvLoader::load_path(&fixture_path("brackets.csv"))
        .expect("fixture file should load without error");

    let names: Vec<_> = schedules.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["flat", "uk-2024"]);
    assert_eq!(schedules["flat"], vec![TaxBracket::new(dec!(0), dec!(15))]);
    assert_eq!(schedules["uk-2024"].len(), 4);
}

#[test]
fn loaded_schedule_feeds_the_allocator() {
    let schedules = BracketCsvLoader::load_path(&fixture_path("brackets.csv")).unwrap();

    let allocation = allocate(&schedules["uk-2024"], dec!(60000));

    // 37,700 at 20% plus 9,730 at 40%
    assert_eq!(allocation.total_tax, dec!(11432));
    assert_eq!(allocation.breakdowns[0].tax, dec!(0));
}

#[test]
fn load_rejects_schedule_without_floor() {
    let result = BracketCsvLoader::load_path(&fixture_path("bad_schedule.csv"));

    match result {
        Err(BracketLoaderError::InvalidSchedule { preset, source }) => {
            assert_eq!(preset, "floorless");
            assert_eq!(source, ScheduleError::MissingZeroFloor(dec!(10000)));
        }
        other => panic!("expected invalid schedule, got {other:?}"),
    }
}
