//! Text and JSON rendering of a [`Report`].

use std::fmt::Write;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tax_core::TickKind;
use tax_core::calculations::BarSegment;
use tax_core::format::CurrencyFormatter;
use tax_data::PresetCatalog;

use crate::app::Report;

/// Columns used by the ASCII bar.
pub const BAR_COLUMNS: usize = 60;

/// Formats a percentage with at most two decimals: `22%`, `9.3%`, `19.33%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", value.round_dp(2).normalize())
}

/// Renders the breakdown table, totals, rates, axis ticks and bar.
pub fn render_text<F>(
    report: &Report,
    formatter: &F,
) -> String
where
    F: CurrencyFormatter + ?Sized,
{
    let mut out = String::new();
    let money = |amount: Decimal| formatter.format(amount);

    let _ = writeln!(out, "{} at {}", report.label, money(report.income));
    let _ = writeln!(out);

    let rows: Vec<[String; 5]> = report
        .allocation
        .breakdowns
        .iter()
        .map(|b| {
            [
                format!("{} - {}", money(b.min), formatter.format_bound(b.max)),
                format_percent(b.rate),
                money(b.taxable),
                money(b.tax),
                money(b.take_home),
            ]
        })
        .collect();
    let totals = [
        "Total".to_string(),
        String::new(),
        money(report.allocation.total_taxable()),
        money(report.allocation.total_tax),
        money(report.take_home),
    ];
    let header = ["Range", "Rate", "Taxable", "Tax", "Take home"].map(String::from);

    let mut widths = [0usize; 5];
    for row in std::iter::once(&header).chain(&rows).chain(std::iter::once(&totals)) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut push_row = |row: &[String; 5]| {
        let _ = write!(out, "{:<w$}", row[0], w = widths[0]);
        for (cell, width) in row.iter().zip(widths).skip(1) {
            let _ = write!(out, "  {cell:>width$}");
        }
        let _ = writeln!(out);
    };
    push_row(&header);
    for row in &rows {
        push_row(row);
    }
    push_row(&totals);

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Effective rate: {}",
        format_percent(report.effective_rate)
    );
    let marginal = report
        .marginal_rate
        .map(format_percent)
        .unwrap_or_else(|| "n/a".to_string());
    let _ = writeln!(out, "Marginal rate:  {marginal}");

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Axis ({}, ceiling {}):",
        report.ceiling.as_str(),
        money(report.max_income)
    );
    for tick in &report.ticks {
        let marker = match tick.kind {
            TickKind::Boundary => "",
            TickKind::Income => "  <- income",
        };
        let _ = writeln!(
            out,
            "  {:>7}  {}{marker}",
            format_percent(tick.position),
            tick.label
        );
    }

    if !report.bars.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", render_bar(&report.bars));
    }

    out
}

/// Draws the segments as `[####|##..|....]`, filled part first.
pub fn render_bar(bars: &[BarSegment]) -> String {
    let segments: Vec<String> = bars
        .iter()
        .filter(|bar| bar.width > Decimal::ZERO)
        .map(|bar| {
            let columns = columns_for(bar.width, BAR_COLUMNS).max(1);
            let filled = columns_for(bar.filled, columns);
            format!("{}{}", "#".repeat(filled), ".".repeat(columns - filled))
        })
        .collect();
    format!("[{}]", segments.join("|"))
}

/// Number of columns covering `percent` of `total`, rounded.
fn columns_for(
    percent: Decimal,
    total: usize,
) -> usize {
    let columns = (percent.saturating_mul(Decimal::from(total)) / Decimal::ONE_HUNDRED).round();
    columns.to_usize().unwrap_or(0).min(total)
}

pub fn render_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report")
}

/// Lists presets under their jurisdiction headings.
pub fn render_presets(catalog: &PresetCatalog) -> String {
    let mut out = String::new();
    for (group, presets) in catalog.groups() {
        let heading = if group.is_empty() { "Other" } else { group };
        let _ = writeln!(out, "{heading}:");
        for preset in presets {
            let _ = write!(out, "  {:<28} {}", preset.id, preset.name);
            if preset.is_custom() {
                let _ = write!(out, " (no brackets)");
            } else {
                let _ = write!(out, " ({} brackets)", preset.brackets.len());
            }
            let _ = writeln!(out);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn bar(
        width: Decimal,
        filled: Decimal,
    ) -> BarSegment {
        BarSegment {
            min: dec!(0),
            clamped_max: dec!(0),
            width,
            filled,
            tax_height: dec!(10),
            take_home_height: dec!(90),
            partial: filled < dec!(100),
        }
    }

    #[test]
    fn format_percent_trims_trailing_zeros() {
        assert_eq!(format_percent(dec!(22)), "22%");
        assert_eq!(format_percent(dec!(9.30)), "9.3%");
        assert_eq!(format_percent(dec!(19.33333)), "19.33%");
        assert_eq!(format_percent(dec!(0)), "0%");
    }

    #[test]
    fn render_bar_scales_segments() {
        let rendered = render_bar(&[bar(dec!(50), dec!(100)), bar(dec!(50), dec!(50))]);

        assert_eq!(
            rendered,
            format!("[{}|{}{}]", "#".repeat(30), "#".repeat(15), ".".repeat(15))
        );
    }

    #[test]
    fn render_bar_keeps_tiny_segments_visible() {
        let rendered = render_bar(&[bar(dec!(0.1), dec!(100))]);

        assert_eq!(rendered, "[#]");
    }

    #[test]
    fn render_bar_skips_zero_width_segments() {
        let rendered = render_bar(&[bar(dec!(100), dec!(0)), bar(dec!(0), dec!(0))]);

        assert_eq!(rendered, format!("[{}]", ".".repeat(60)));
    }
}
