use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::percent_of;

/// The share of income that falls into one bracket, and what it costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Lower bound of the bracket.
    pub min: Decimal,
    /// Next bracket's lower bound, or `None` when the bracket is unbounded.
    pub max: Option<Decimal>,
    /// Income falling inside `[min, max)`.
    pub taxable: Decimal,
    /// `taxable * rate / 100`.
    pub tax: Decimal,
    /// `taxable - tax`.
    pub take_home: Decimal,
    /// Marginal rate as a percentage.
    pub rate: Decimal,
}

impl TaxBreakdown {
    /// Returns true when this bracket has no upper bound.
    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }
}

/// Result of allocating an income across a bracket schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Sum of `tax` over all breakdowns.
    pub total_tax: Decimal,
    /// One entry per bracket reached by the income, ascending by `min`.
    pub breakdowns: Vec<TaxBreakdown>,
}

impl Allocation {
    /// Sum of the taxable amounts across all breakdowns.
    pub fn total_taxable(&self) -> Decimal {
        self.breakdowns
            .iter()
            .fold(Decimal::ZERO, |sum, b| sum.saturating_add(b.taxable))
    }

    /// Sum of the take-home amounts across all breakdowns.
    pub fn total_take_home(&self) -> Decimal {
        self.breakdowns
            .iter()
            .fold(Decimal::ZERO, |sum, b| sum.saturating_add(b.take_home))
    }

    /// Total tax as a percentage of the taxable total.
    ///
    /// Returns zero when nothing was taxable.
    pub fn effective_rate(&self) -> Decimal {
        percent_of(self.total_tax, self.total_taxable()).unwrap_or(Decimal::ZERO)
    }

    /// Rate of the highest bracket the income reached.
    pub fn marginal_rate(&self) -> Option<Decimal> {
        self.breakdowns.last().map(|b| b.rate)
    }

    pub fn is_empty(&self) -> bool {
        self.breakdowns.is_empty()
    }
}
