//! Bar geometry for drawing a breakdown against the income axis.
//!
//! Each breakdown becomes one segment of a horizontal bar. Its width is the
//! bracket's share of the axis, the filled part is how far into the bracket
//! the income reaches, and the fill is split vertically into a tax part
//! (height = rate) and a take-home part.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::axis::position;
use crate::calculations::common::{min_bounded, percent_of};
use crate::models::TaxBreakdown;

/// Geometry for one bracket segment, in percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSegment {
    pub min: Decimal,
    /// Upper bound cut off at the axis ceiling.
    pub clamped_max: Decimal,
    /// Share of the full axis occupied by this bracket.
    pub width: Decimal,
    /// Share of this segment covered by income, at most 100.
    pub filled: Decimal,
    pub tax_height: Decimal,
    pub take_home_height: Decimal,
    /// True when income stops inside this segment.
    pub partial: bool,
}

/// Lays out `breakdowns` against an axis ending at `max_income`.
pub fn layout(
    breakdowns: &[TaxBreakdown],
    max_income: Decimal,
) -> Vec<BarSegment> {
    breakdowns
        .iter()
        .map(|breakdown| segment(breakdown, max_income))
        .collect()
}

fn segment(
    breakdown: &TaxBreakdown,
    max_income: Decimal,
) -> BarSegment {
    let clamped_max = min_bounded(max_income, breakdown.max);
    let span = clamped_max.saturating_sub(breakdown.min);

    let width = if span > Decimal::ZERO {
        position(span, max_income)
    } else {
        Decimal::ZERO
    };
    let filled = if span > Decimal::ZERO {
        percent_of(breakdown.taxable, span)
            .unwrap_or(Decimal::ZERO)
            .min(Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };

    BarSegment {
        min: breakdown.min,
        clamped_max,
        width,
        filled,
        tax_height: breakdown.rate,
        take_home_height: Decimal::ONE_HUNDRED.saturating_sub(breakdown.rate),
        partial: filled < Decimal::ONE_HUNDRED,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::TaxBracket;
    use crate::calculations::allocate;

    fn three_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket::new(dec!(0), dec!(10)),
            TaxBracket::new(dec!(30000), dec!(20)),
            TaxBracket::new(dec!(50000), dec!(30)),
        ]
    }

    #[test]
    fn layout_splits_axis_by_bracket_span() {
        let allocation = allocate(&three_brackets(), dec!(75000));

        let bars = layout(&allocation.breakdowns, dec!(100000));

        let widths: Vec<_> = bars.iter().map(|b| b.width).collect();
        assert_eq!(widths, vec![dec!(30), dec!(20), dec!(50)]);
        assert_eq!(bars[2].clamped_max, dec!(100000));
    }

    #[test]
    fn layout_fills_reached_brackets_completely() {
        let allocation = allocate(&three_brackets(), dec!(75000));

        let bars = layout(&allocation.breakdowns, dec!(100000));

        assert_eq!(bars[0].filled, dec!(100));
        assert!(!bars[0].partial);
        assert_eq!(bars[2].filled, dec!(50));
        assert!(bars[2].partial);
    }

    #[test]
    fn layout_splits_height_by_rate() {
        let allocation = allocate(&three_brackets(), dec!(75000));

        let bars = layout(&allocation.breakdowns, dec!(90000));

        assert_eq!(bars[1].tax_height, dec!(20));
        assert_eq!(bars[1].take_home_height, dec!(80));
    }

    #[test]
    fn layout_clamps_bounded_bracket_to_ceiling() {
        let allocation = allocate(&three_brackets(), dec!(40000));

        let bars = layout(&allocation.breakdowns, dec!(45000));

        assert_eq!(bars[1].clamped_max, dec!(45000));
        assert_eq!(bars[1].filled.round_dp(2), dec!(66.67));
        assert!(bars[1].partial);
    }

    #[test]
    fn layout_handles_zero_ceiling() {
        let breakdowns = vec![TaxBreakdown {
            min: dec!(0),
            max: None,
            taxable: dec!(0),
            tax: dec!(0),
            take_home: dec!(0),
            rate: dec!(10),
        }];

        let bars = layout(&breakdowns, dec!(0));

        assert_eq!(bars[0].width, dec!(0));
        assert_eq!(bars[0].filled, dec!(0));
    }
}
