use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::calculations::{BarSegment, CeilingPolicy, allocate, layout, scale};
use tax_core::editor::{BracketEditor, validate_schedule};
use tax_core::format::{CurrencyFormatter, DollarFormatter};
use tax_core::{Allocation, TaxBracket, Tick};
use tax_data::{BracketCsvLoader, PresetCatalog};
use tracing::{debug, info, warn};

use crate::cli::OutputFormat;
use crate::config::{BracketSource, Settings, default_brackets};
use crate::report;

/// Label for brackets given on the command line or in a config file.
pub const CUSTOM_LABEL: &str = "Custom";
/// Label for the built-in example schedule.
pub const DEFAULT_LABEL: &str = "Example schedule";

/// A bracket schedule together with the name it is shown under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub label: String,
    pub brackets: Vec<TaxBracket>,
}

/// Everything computed for one income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub label: String,
    pub income: Decimal,
    pub brackets: Vec<TaxBracket>,
    pub allocation: Allocation,
    /// `income - total_tax`.
    pub take_home: Decimal,
    pub effective_rate: Decimal,
    pub marginal_rate: Option<Decimal>,
    pub ceiling: CeilingPolicy,
    pub max_income: Decimal,
    pub ticks: Vec<Tick>,
    pub bars: Vec<BarSegment>,
}

/// Built-in presets, with `presets_file` merged over them when given.
pub fn load_catalog(presets_file: Option<&Path>) -> Result<PresetCatalog> {
    let mut catalog = PresetCatalog::builtin().context("built-in presets are invalid")?;

    if let Some(path) = presets_file {
        let extra = PresetCatalog::from_path(path)
            .with_context(|| format!("failed to load presets from {}", path.display()))?;
        info!(path = %path.display(), presets = extra.len(), "Merging preset catalog");
        catalog.merge(extra);
    }

    Ok(catalog)
}

/// Turns a bracket source into a concrete schedule.
pub fn resolve_schedule(
    source: &BracketSource,
    catalog: &PresetCatalog,
) -> Result<Schedule> {
    match source {
        BracketSource::Inline(brackets) => {
            let mut editor = BracketEditor::default();
            for bracket in brackets {
                editor.insert(*bracket).with_context(|| {
                    format!("invalid bracket {}:{}", bracket.min, bracket.rate)
                })?;
            }
            if let Err(err) = validate_schedule(editor.brackets()) {
                warn!(error = %err, "Bracket schedule is incomplete");
            }
            Ok(Schedule {
                label: CUSTOM_LABEL.to_string(),
                brackets: editor.into_brackets(),
            })
        }
        BracketSource::Csv { path, schedule } => {
            let mut groups = BracketCsvLoader::load_path(path)
                .with_context(|| format!("failed to load brackets from {}", path.display()))?;
            let available = groups.keys().cloned().collect::<Vec<_>>().join(", ");

            let (label, brackets) = match schedule {
                Some(name) => {
                    let brackets = groups.remove(name).ok_or_else(|| {
                        anyhow!(
                            "schedule '{name}' not found in {} (available: {available})",
                            path.display()
                        )
                    })?;
                    (name.clone(), brackets)
                }
                None if groups.len() == 1 => groups
                    .pop_first()
                    .ok_or_else(|| anyhow!("{} holds no schedules", path.display()))?,
                None if groups.is_empty() => bail!("{} holds no schedules", path.display()),
                None => bail!(
                    "{} holds {} schedules; choose one with --preset (available: {available})",
                    path.display(),
                    groups.len()
                ),
            };
            Ok(Schedule { label, brackets })
        }
        BracketSource::Preset(id) => {
            let preset = catalog.require(id)?;
            if preset.is_custom() {
                bail!("preset '{id}' has no brackets; give them with --bracket MIN:RATE");
            }
            Ok(Schedule {
                label: preset.name.clone(),
                brackets: preset.brackets.clone(),
            })
        }
        BracketSource::Default => Ok(Schedule {
            label: DEFAULT_LABEL.to_string(),
            brackets: default_brackets(),
        }),
    }
}

/// Allocates `income` over `schedule` and places the result on the axis.
pub fn build_report<F>(
    schedule: Schedule,
    income: Decimal,
    ceiling: CeilingPolicy,
    formatter: &F,
) -> Report
where
    F: CurrencyFormatter + ?Sized,
{
    let allocation = allocate(&schedule.brackets, income);
    let max_income = ceiling.ceiling(&schedule.brackets, income);
    let ticks = scale(&schedule.brackets, income, max_income, formatter);
    let bars = layout(&allocation.breakdowns, max_income);

    debug!(
        label = %schedule.label,
        income = %income,
        total_tax = %allocation.total_tax,
        max_income = %max_income,
        "Built report"
    );

    Report {
        label: schedule.label,
        income,
        brackets: schedule.brackets,
        take_home: income.saturating_sub(allocation.total_tax),
        effective_rate: allocation.effective_rate(),
        marginal_rate: allocation.marginal_rate(),
        allocation,
        ceiling,
        max_income,
        ticks,
        bars,
    }
}

/// Runs one invocation and returns the text to print.
pub fn run(settings: &Settings) -> Result<String> {
    let catalog = load_catalog(settings.presets_file.as_deref())?;
    let formatter = if settings.cents {
        DollarFormatter::with_cents()
    } else {
        DollarFormatter::default()
    };

    if settings.list_presets {
        return match settings.format {
            OutputFormat::Text => Ok(report::render_presets(&catalog)),
            OutputFormat::Json => serde_json::to_string_pretty(catalog.presets())
                .context("failed to serialize presets"),
        };
    }

    let schedule = resolve_schedule(&settings.source, &catalog)?;
    let report = build_report(schedule, settings.income, settings.ceiling, &formatter);

    match settings.format {
        OutputFormat::Text => Ok(report::render_text(&report, &formatter)),
        OutputFormat::Json => report::render_json(&report),
    }
}
