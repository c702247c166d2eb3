//! Settings resolution.
//!
//! Values come from three places, highest precedence first: command-line
//! flags, the optional TOML file given with `--config`, and built-in
//! defaults. A config file looks like this (every key is optional):
//!
//! ```toml
//! income = 85000
//! preset = "us-federal-2025"
//! ceiling = "income"          # or "top-bracket"
//! format = "text"             # or "json"
//! cents = false
//! presets_file = "my_presets.toml"
//! log_level = "info"
//!
//! # An inline schedule, used when no preset is named.
//! brackets = [
//!     { min = 0, rate = 10 },
//!     { min = 40000, rate = 25 },
//! ]
//! ```
//!
//! A relative `presets_file` is taken relative to the directory holding the
//! config file, not the working directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tax_core::TaxBracket;
use tax_core::calculations::CeilingPolicy;

use crate::cli::{Cli, OutputFormat};

/// Income used when none is configured.
pub const DEFAULT_INCOME: Decimal = dec!(75000);

/// Schedule used when no bracket source is configured.
pub fn default_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket::new(dec!(0), dec!(10)),
        TaxBracket::new(dec!(30000), dec!(20)),
        TaxBracket::new(dec!(50000), dec!(30)),
    ]
}

/// Contents of a `--config` TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub income: Option<Decimal>,
    pub preset: Option<String>,
    pub ceiling: Option<CeilingPolicy>,
    pub format: Option<OutputFormat>,
    pub cents: Option<bool>,
    pub presets_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub brackets: Option<Vec<TaxBracket>>,
}

impl FileConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).context("invalid configuration")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config = Self::from_toml_str(&input)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        if let Some(dir) = path.parent() {
            config.rebase_paths(dir);
        }
        Ok(config)
    }

    /// Joins relative file paths onto `dir`.
    fn rebase_paths(
        &mut self,
        dir: &Path,
    ) {
        if let Some(file) = self.presets_file.as_mut() {
            if file.is_relative() {
                *file = dir.join(&*file);
            }
        }
    }
}

/// Where the bracket schedule comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketSource {
    /// Brackets given directly, not yet validated.
    Inline(Vec<TaxBracket>),
    /// A schedule in a CSV file; the name may be omitted when the file holds
    /// exactly one schedule.
    Csv {
        path: PathBuf,
        schedule: Option<String>,
    },
    /// A preset from the catalog.
    Preset(String),
    /// The built-in example schedule.
    Default,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub income: Decimal,
    pub source: BracketSource,
    pub ceiling: CeilingPolicy,
    pub format: OutputFormat,
    pub cents: bool,
    pub presets_file: Option<PathBuf>,
    pub list_presets: bool,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Merges command-line flags over file values over defaults.
    ///
    /// Bracket sources are tried in order: `--bracket`, `--csv`, `--preset`,
    /// the file's `brackets`, the file's `preset`, then the default schedule.
    pub fn resolve(
        cli: Cli,
        file: FileConfig,
    ) -> Self {
        let source = if !cli.brackets.is_empty() {
            BracketSource::Inline(cli.brackets)
        } else if let Some(path) = cli.csv {
            BracketSource::Csv {
                path,
                schedule: cli.preset,
            }
        } else if let Some(id) = cli.preset {
            BracketSource::Preset(id)
        } else if let Some(brackets) = file.brackets {
            BracketSource::Inline(brackets)
        } else if let Some(id) = file.preset {
            BracketSource::Preset(id)
        } else {
            BracketSource::Default
        };

        Self {
            income: cli.income.or(file.income).unwrap_or(DEFAULT_INCOME),
            source,
            ceiling: cli.ceiling.or(file.ceiling).unwrap_or_default(),
            format: cli.format.or(file.format).unwrap_or_default(),
            cents: cli.cents || file.cents.unwrap_or(false),
            presets_file: cli.presets.or(file.presets_file),
            list_presets: cli.list_presets,
            log_level: cli.log_level.or(file.log_level),
            log_file: cli.log_file,
        }
    }
}
