//! Tick placement for the income axis.
//!
//! Amounts are mapped onto a 0–100 scale whose upper end is a ceiling chosen
//! by [`CeilingPolicy`]. Every bracket boundary at or below the ceiling gets
//! a tick, and the income itself always gets one, even when it lies beyond
//! the ceiling (its position is then above 100 and is not clamped).
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::{AxisScaler, CeilingPolicy};
//! use tax_core::format::DollarFormatter;
//! use tax_core::{TaxBracket, TickKind};
//!
//! let brackets = vec![
//!     TaxBracket::new(dec!(0), dec!(10)),
//!     TaxBracket::new(dec!(30000), dec!(20)),
//!     TaxBracket::new(dec!(50000), dec!(30)),
//! ];
//! let income = dec!(75000);
//! let ceiling = CeilingPolicy::IncomeHeadroom.ceiling(&brackets, income);
//! assert_eq!(ceiling, dec!(90000));
//!
//! let formatter = DollarFormatter::default();
//! let ticks = AxisScaler::new(&brackets, &formatter).ticks(income, ceiling);
//!
//! let labels: Vec<_> = ticks.iter().map(|t| t.label.as_str()).collect();
//! assert_eq!(labels, ["$0", "$30,000", "$50,000", "$75,000"]);
//! assert_eq!(ticks[3].kind, TickKind::Income);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{max, percent_of};
use crate::format::CurrencyFormatter;
use crate::models::{TaxBracket, Tick, TickKind};

/// Headroom added above the reference amount when choosing a ceiling.
pub const CEILING_HEADROOM: Decimal = Decimal::from_parts(12, 0, 0, false, 1);

/// How the axis ceiling (the amount drawn at position 100) is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CeilingPolicy {
    /// `income × 1.2`. Brackets starting above that are not drawn.
    #[serde(rename = "income", alias = "income-headroom")]
    IncomeHeadroom,
    /// `max(income, highest bracket min) × 1.2`, so every bracket is drawn.
    #[default]
    #[serde(rename = "top-bracket", alias = "income-or-top-bracket")]
    IncomeOrTopBracket,
}

impl CeilingPolicy {
    /// Computes the ceiling for `income` over `brackets`.
    ///
    /// Saturates at the `Decimal` bounds for amounts near them.
    pub fn ceiling(
        &self,
        brackets: &[TaxBracket],
        income: Decimal,
    ) -> Decimal {
        let reference = match self {
            Self::IncomeHeadroom => income,
            Self::IncomeOrTopBracket => brackets
                .iter()
                .map(|b| b.min)
                .fold(income, max),
        };
        reference.saturating_mul(CEILING_HEADROOM)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IncomeHeadroom => "income",
            Self::IncomeOrTopBracket => "top-bracket",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "income" | "income-headroom" => Some(Self::IncomeHeadroom),
            "top-bracket" | "income-or-top-bracket" => Some(Self::IncomeOrTopBracket),
            _ => None,
        }
    }
}

/// Places bracket boundaries and the income marker on the 0–100 axis.
pub struct AxisScaler<'a, F: ?Sized> {
    brackets: &'a [TaxBracket],
    formatter: &'a F,
}

impl<'a, F> AxisScaler<'a, F>
where
    F: CurrencyFormatter + ?Sized,
{
    pub fn new(
        brackets: &'a [TaxBracket],
        formatter: &'a F,
    ) -> Self {
        Self {
            brackets,
            formatter,
        }
    }

    /// Returns ticks for every visible boundary plus the income marker,
    /// sorted by position.
    ///
    /// A boundary is visible when its `min` is at or below `max_income`.
    /// When `max_income` is zero or negative there is no usable scale and
    /// every tick is placed at position 0.
    pub fn ticks(
        &self,
        income: Decimal,
        max_income: Decimal,
    ) -> Vec<Tick> {
        if max_income <= Decimal::ZERO {
            warn!(max_income = %max_income, "Axis ceiling is not positive; ticks collapse to 0");
        }

        let mut ticks: Vec<Tick> = self
            .brackets
            .iter()
            .filter(|b| b.min <= max_income)
            .map(|b| self.tick(b.min, max_income, TickKind::Boundary))
            .collect();
        ticks.push(self.tick(income, max_income, TickKind::Income));

        // Stable: a boundary keeps its place ahead of an income tick at the same spot.
        ticks.sort_by(|a, b| a.position.cmp(&b.position));

        debug!(
            income = %income,
            max_income = %max_income,
            ticks = ticks.len(),
            "Scaled income axis"
        );

        ticks
    }

    fn tick(
        &self,
        amount: Decimal,
        max_income: Decimal,
        kind: TickKind,
    ) -> Tick {
        Tick {
            position: position(amount, max_income),
            label: self.formatter.format(amount),
            kind,
        }
    }
}

/// Maps `amount` onto the 0–100 axis whose upper end is `max_income`.
///
/// Not clamped: amounts above the ceiling map beyond 100. A non-positive
/// ceiling maps everything to 0.
pub fn position(
    amount: Decimal,
    max_income: Decimal,
) -> Decimal {
    if max_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    percent_of(amount, max_income).unwrap_or(Decimal::ZERO)
}

/// Derives the sorted tick sequence for `brackets` and `income`.
///
/// Shorthand for [`AxisScaler::new`] followed by [`AxisScaler::ticks`].
pub fn scale<F>(
    brackets: &[TaxBracket],
    income: Decimal,
    max_income: Decimal,
    formatter: &F,
) -> Vec<Tick>
where
    F: CurrencyFormatter + ?Sized,
{
    AxisScaler::new(brackets, formatter).ticks(income, max_income)
}
