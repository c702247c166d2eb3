//! Named bracket schedules.
//!
//! A catalog is read from TOML. Each `[[presets]]` table describes one
//! schedule:
//!
//! ```toml
//! [[presets]]
//! id = "us-federal-2025"
//! name = "US Federal 2025"
//! description = "US Federal Income Tax Brackets for 2025 (Single Filer)"
//! group = "US Federal"
//! brackets = [
//!     { min = 0, rate = 10 },
//!     { min = 11925, rate = 12 },
//! ]
//! ```
//!
//! Presets with brackets must form a valid schedule (see
//! [`tax_core::editor::validate_schedule`]); a preset with an empty bracket
//! list stands for a schedule the user builds by hand.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tax_core::TaxBracket;
use tax_core::editor::{ScheduleError, validate_schedule};
use thiserror::Error;
use tracing::debug;

const BUILTIN_PRESETS: &str = include_str!("../presets.toml");

/// Errors that can occur while reading a preset catalog.
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("failed to read preset file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate preset id '{0}'")]
    DuplicateId(String),

    #[error("preset '{id}' has an invalid schedule: {source}")]
    InvalidSchedule {
        id: String,
        #[source]
        source: ScheduleError,
    },

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}

/// A named, pre-sorted bracket schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPreset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Jurisdiction heading the preset is listed under; empty for none.
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub brackets: Vec<TaxBracket>,
}

impl TaxPreset {
    /// True for a preset without brackets (a hand-built schedule).
    pub fn is_custom(&self) -> bool {
        self.brackets.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    presets: Vec<TaxPreset>,
}

/// An ordered collection of presets, looked up by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetCatalog {
    presets: Vec<TaxPreset>,
}

impl PresetCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, PresetError> {
        Self::from_toml_str(BUILTIN_PRESETS)
    }

    /// Parses and validates a catalog from TOML text.
    pub fn from_toml_str(input: &str) -> Result<Self, PresetError> {
        let file: CatalogFile = toml::from_str(input)?;
        let mut catalog = Self::default();

        for preset in file.presets {
            if catalog.get(&preset.id).is_some() {
                return Err(PresetError::DuplicateId(preset.id));
            }
            if !preset.is_custom() {
                validate_schedule(&preset.brackets).map_err(|source| {
                    PresetError::InvalidSchedule {
                        id: preset.id.clone(),
                        source,
                    }
                })?;
            }
            catalog.presets.push(preset);
        }

        debug!(presets = catalog.presets.len(), "Parsed preset catalog");
        Ok(catalog)
    }

    /// Reads a catalog from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, PresetError> {
        let input = std::fs::read_to_string(path).map_err(|source| PresetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    pub fn presets(&self) -> &[TaxPreset] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn get(
        &self,
        id: &str,
    ) -> Option<&TaxPreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Like [`PresetCatalog::get`], but reports a missing id as an error.
    pub fn require(
        &self,
        id: &str,
    ) -> Result<&TaxPreset, PresetError> {
        self.get(id)
            .ok_or_else(|| PresetError::UnknownPreset(id.to_string()))
    }

    /// Presets grouped by jurisdiction, in the order groups first appear.
    pub fn groups(&self) -> Vec<(&str, Vec<&TaxPreset>)> {
        let mut groups: Vec<(&str, Vec<&TaxPreset>)> = Vec::new();
        for preset in &self.presets {
            match groups.iter_mut().find(|(name, _)| *name == preset.group) {
                Some((_, members)) => members.push(preset),
                None => groups.push((preset.group.as_str(), vec![preset])),
            }
        }
        groups
    }

    /// Adds `other`'s presets to this catalog.
    ///
    /// A preset whose id already exists replaces the existing entry in place;
    /// new ids are appended.
    pub fn merge(
        &mut self,
        other: PresetCatalog,
    ) {
        for preset in other.presets {
            match self.presets.iter_mut().find(|p| p.id == preset.id) {
                Some(existing) => {
                    debug!(id = %preset.id, "Replacing preset");
                    *existing = preset;
                }
                None => self.presets.push(preset),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const SMALL_CATALOG: &str = r#"
[[presets]]
id = "flat"
name = "Flat"
group = "Examples"
brackets = [{ min = 0, rate = 20 }]

[[presets]]
id = "two-step"
name = "Two step"
description = "Ten then twenty"
group = "Examples"
brackets = [
    { min = 0, rate = 10 },
    { min = 30000, rate = 20.5 },
]

[[presets]]
id = "blank"
name = "Blank"
"#;

    #[test]
    fn from_toml_str_reads_presets_in_order() {
        let catalog = PresetCatalog::from_toml_str(SMALL_CATALOG).unwrap();

        let ids: Vec<_> = catalog.presets().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["flat", "two-step", "blank"]);
    }

    #[test]
    fn from_toml_str_reads_fractional_rates() {
        let catalog = PresetCatalog::from_toml_str(SMALL_CATALOG).unwrap();

        let preset = catalog.get("two-step").unwrap();

        assert_eq!(preset.description, "Ten then twenty");
        assert_eq!(preset.brackets[1], TaxBracket::new(dec!(30000), dec!(20.5)));
    }

    #[test]
    fn from_toml_str_defaults_optional_fields() {
        let catalog = PresetCatalog::from_toml_str(SMALL_CATALOG).unwrap();

        let blank = catalog.get("blank").unwrap();

        assert!(blank.is_custom());
        assert_eq!(blank.group, "");
        assert_eq!(blank.description, "");
    }

    #[test]
    fn from_toml_str_rejects_duplicate_ids() {
        let input = r#"
[[presets]]
id = "a"
name = "A"

[[presets]]
id = "a"
name = "A again"
"#;

        let err = PresetCatalog::from_toml_str(input).unwrap_err();

        assert!(matches!(err, PresetError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn from_toml_str_rejects_invalid_schedule() {
        let input = r#"
[[presets]]
id = "gap"
name = "No floor"
brackets = [{ min = 1000, rate = 10 }]
"#;

        let err = PresetCatalog::from_toml_str(input).unwrap_err();

        match err {
            PresetError::InvalidSchedule { id, source } => {
                assert_eq!(id, "gap");
                assert_eq!(source, ScheduleError::MissingZeroFloor(dec!(1000)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn from_toml_str_rejects_malformed_toml() {
        let err = PresetCatalog::from_toml_str("[[presets]\nid = ").unwrap_err();

        assert!(matches!(err, PresetError::Parse(_)));
    }

    #[test]
    fn require_reports_unknown_id() {
        let catalog = PresetCatalog::from_toml_str(SMALL_CATALOG).unwrap();

        let err = catalog.require("nope").unwrap_err();

        assert_eq!(err.to_string(), "unknown preset 'nope'");
    }

    #[test]
    fn groups_collects_presets_by_group() {
        let catalog = PresetCatalog::from_toml_str(SMALL_CATALOG).unwrap();

        let groups: Vec<_> = catalog
            .groups()
            .into_iter()
            .map(|(name, members)| (name, members.len()))
            .collect();

        assert_eq!(groups, vec![("Examples", 2), ("", 1)]);
    }

    #[test]
    fn merge_replaces_and_appends() {
        let mut catalog = PresetCatalog::from_toml_str(SMALL_CATALOG).unwrap();
        let extra = PresetCatalog::from_toml_str(
            r#"
[[presets]]
id = "flat"
name = "Flat (revised)"
brackets = [{ min = 0, rate = 25 }]

[[presets]]
id = "new"
name = "New"
"#,
        )
        .unwrap();

        catalog.merge(extra);

        let ids: Vec<_> = catalog.presets().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["flat", "two-step", "blank", "new"]);
        assert_eq!(catalog.get("flat").unwrap().brackets[0].rate, dec!(25));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = PresetCatalog::from_path(Path::new("/this/path/does/not/exist.toml")).unwrap_err();

        assert!(matches!(err, PresetError::Io { .. }));
    }
}
