use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::TaxBracket;
use tax_core::editor::{ScheduleError, validate_schedule};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading bracket schedules from CSV.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("failed to open '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schedule '{preset}' is invalid: {source}")]
    InvalidSchedule {
        preset: String,
        #[source]
        source: ScheduleError,
    },
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a bracket CSV file.
///
/// - `preset`: the schedule this bracket belongs to (e.g. `us-federal-2025`)
/// - `min`: the bracket's lower bound
/// - `rate`: the marginal rate as a percentage (e.g. `22` for 22%)
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BracketRecord {
    pub preset: String,
    pub min: Decimal,
    pub rate: Decimal,
}

/// Loader for bracket schedules stored as CSV.
///
/// Headers are matched by name, so column order does not matter. Rows of
/// the same schedule may appear in any order; they are sorted by `min` when
/// grouped.
///
/// ```csv
/// preset,min,rate
/// simple,0,10
/// simple,30000,20
/// ```
pub struct BracketCsvLoader;

impl BracketCsvLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice. Whitespace around values is ignored.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records into schedules keyed by preset name.
    ///
    /// Each schedule is sorted ascending by `min`. No validation is done
    /// here; see [`BracketCsvLoader::load_path`].
    pub fn group(records: &[BracketRecord]) -> BTreeMap<String, Vec<TaxBracket>> {
        let mut groups: BTreeMap<String, Vec<TaxBracket>> = BTreeMap::new();

        for record in records {
            groups
                .entry(record.preset.clone())
                .or_default()
                .push(TaxBracket::new(record.min, record.rate));
        }

        for brackets in groups.values_mut() {
            brackets.sort_by(|a, b| a.min.cmp(&b.min));
        }

        groups
    }

    /// Read, group and validate every schedule in a CSV file.
    pub fn load_path(path: &Path) -> Result<BTreeMap<String, Vec<TaxBracket>>, BracketLoaderError> {
        let file = File::open(path).map_err(|source| BracketLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let records = Self::parse(file)?;
        let groups = Self::group(&records);

        for (preset, brackets) in &groups {
            validate_schedule(brackets).map_err(|source| BracketLoaderError::InvalidSchedule {
                preset: preset.clone(),
                source,
            })?;
        }

        debug!(
            path = %path.display(),
            records = records.len(),
            schedules = groups.len(),
            "Loaded bracket schedules"
        );

        Ok(groups)
    }
}
