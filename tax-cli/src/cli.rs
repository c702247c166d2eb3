use std::path::PathBuf;
use std::sync::LazyLock;

use clap::{Parser, ValueEnum};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::TaxBracket;
use tax_core::calculations::CeilingPolicy;
use tax_core::utils::parse_decimal;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Marginal income tax breakdown.
///
/// Splits an income across a bracket schedule, shows the tax and take-home
/// amount for each bracket, and draws the schedule on an income axis.
#[derive(Debug, Parser)]
#[command(name = "marginal", version, about)]
pub struct Cli {
    /// Taxable income to break down (e.g. `75000` or `75,000`).
    #[arg(short, long, value_parser = parse_amount)]
    pub income: Option<Decimal>,

    /// A bracket as MIN:RATE (e.g. `30,000:20%`). Repeat for each bracket.
    #[arg(short, long = "bracket", value_name = "MIN:RATE", value_parser = parse_bracket_arg)]
    pub brackets: Vec<TaxBracket>,

    /// Preset id from the catalog, or schedule name within `--csv`.
    #[arg(short, long)]
    pub preset: Option<String>,

    /// CSV file with `preset,min,rate` rows.
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// TOML preset catalog merged over the built-in presets.
    #[arg(long, value_name = "FILE")]
    pub presets: Option<PathBuf>,

    /// How the axis ceiling is chosen: `income` or `top-bracket`.
    #[arg(long, value_parser = parse_ceiling)]
    pub ceiling: Option<CeilingPolicy>,

    /// Output format.
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Show amounts with cents.
    #[arg(long)]
    pub cents: bool,

    /// List the available presets and exit.
    #[arg(long)]
    pub list_presets: bool,

    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log filter (`error`, `warn`, `info`, `debug`, `trace` or a directive).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Append log output to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// ─── value parsers ───────────────────────────────────────────────────────────

const BRACKET_PATTERN: &str =
    r"^\s*(?P<min>\$?[0-9][0-9,]*(?:\.[0-9]+)?)\s*[:@]\s*(?P<rate>[0-9]+(?:\.[0-9]+)?)\s*%?\s*$";

/// Compiled once for all `--bracket` arguments.
static BRACKET_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(BRACKET_PATTERN));

/// Parses an amount, accepting thousands separators and a leading `$`.
pub fn parse_amount(s: &str) -> Result<Decimal, String> {
    if s.trim().is_empty() {
        return Err("amount is empty".to_string());
    }
    parse_decimal(s).map_err(|e| e.to_string())
}

/// Parses `MIN:RATE` (or `MIN@RATE`) into a bracket.
///
/// Range checks are left to the bracket editor.
pub fn parse_bracket_arg(s: &str) -> Result<TaxBracket, String> {
    let pattern = BRACKET_RE.as_ref().map_err(|e| e.to_string())?;
    let captures = pattern
        .captures(s)
        .ok_or_else(|| format!("expected MIN:RATE (e.g. 30000:20), got '{s}'"))?;

    let min = parse_decimal(&captures["min"]).map_err(|e| e.to_string())?;
    let rate = parse_decimal(&captures["rate"]).map_err(|e| e.to_string())?;
    Ok(TaxBracket::new(min, rate))
}

pub fn parse_ceiling(s: &str) -> Result<CeilingPolicy, String> {
    CeilingPolicy::parse(s).ok_or_else(|| format!("expected `income` or `top-bracket`, got '{s}'"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn bracket_pattern_compiles() {
        assert!(BRACKET_RE.is_ok());
    }

    #[test]
    fn parse_bracket_arg_reuses_compiled_pattern() {
        let first = BRACKET_RE.as_ref().map(|re| re as *const Regex).ok();

        for arg in ["0:10", "30000:20", "50000:30"] {
            assert!(parse_bracket_arg(arg).is_ok());
        }

        assert_eq!(BRACKET_RE.as_ref().map(|re| re as *const Regex).ok(), first);
    }

    #[test]
    fn parse_bracket_arg_accepts_plain_pair() {
        assert_eq!(
            parse_bracket_arg("30000:20"),
            Ok(TaxBracket::new(dec!(30000), dec!(20)))
        );
    }

    #[test]
    fn parse_bracket_arg_accepts_separators_and_symbols() {
        assert_eq!(
            parse_bracket_arg(" $30,000 : 20.5% "),
            Ok(TaxBracket::new(dec!(30000), dec!(20.5)))
        );
        assert_eq!(
            parse_bracket_arg("0@10"),
            Ok(TaxBracket::new(dec!(0), dec!(10)))
        );
    }

    #[test]
    fn parse_bracket_arg_rejects_malformed_input() {
        assert!(parse_bracket_arg("30000").is_err());
        assert!(parse_bracket_arg("abc:10").is_err());
        assert!(parse_bracket_arg("-5:10").is_err());
    }

    #[test]
    fn parse_amount_rejects_empty_and_garbage() {
        assert_eq!(parse_amount("75,000"), Ok(dec!(75000)));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("lots").is_err());
    }

    #[test]
    fn cli_collects_repeated_brackets() {
        let cli = Cli::try_parse_from([
            "marginal",
            "--income",
            "75000",
            "-b",
            "0:10",
            "-b",
            "30000:20",
            "--ceiling",
            "income",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.income, Some(dec!(75000)));
        assert_eq!(cli.brackets.len(), 2);
        assert_eq!(cli.ceiling, Some(CeilingPolicy::IncomeHeadroom));
        assert_eq!(cli.format, Some(OutputFormat::Json));
    }

    #[test]
    fn cli_rejects_unknown_ceiling() {
        let result = Cli::try_parse_from(["marginal", "--ceiling", "sky"]);

        assert!(result.is_err());
    }
}
