//! Marginal income allocation across a bracket schedule.
//!
//! The allocator walks brackets in ascending order and assigns each one the
//! slice of income that lies between its lower bound and the next bracket's
//! lower bound. Only that slice is taxed at the bracket's rate.
//!
//! # Preconditions
//!
//! Brackets must already be sorted ascending by `min` and the first bracket
//! should start at zero. The allocator does not sort or validate: an
//! unsorted or gapped schedule produces whatever the arithmetic yields, and a
//! schedule without a zero floor yields no breakdowns for income below its
//! first bound. Use [`crate::editor::validate_schedule`] at the input boundary
//! when a hard check is wanted.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::TaxBracket;
//! use tax_core::calculations::BracketAllocator;
//!
//! let brackets = vec![
//!     TaxBracket::new(dec!(0), dec!(10)),
//!     TaxBracket::new(dec!(30000), dec!(20)),
//!     TaxBracket::new(dec!(50000), dec!(30)),
//! ];
//!
//! let allocation = BracketAllocator::new(&brackets).allocate(dec!(75000));
//!
//! assert_eq!(allocation.total_tax, dec!(14500));
//! assert_eq!(allocation.breakdowns.len(), 3);
//! assert_eq!(allocation.breakdowns[2].taxable, dec!(25000));
//! assert_eq!(allocation.breakdowns[2].max, None);
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{max, min_bounded};
use crate::models::{Allocation, TaxBracket, TaxBreakdown};

/// Allocates income across an ordered bracket schedule.
#[derive(Debug, Clone, Copy)]
pub struct BracketAllocator<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> BracketAllocator<'a> {
    /// Creates an allocator over brackets sorted ascending by `min`.
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    /// Splits `income` into per-bracket segments and totals the tax.
    ///
    /// Iteration stops at the first bracket whose lower bound the income does
    /// not exceed, so zero or negative income (or an empty schedule) yields
    /// an empty allocation with zero tax.
    pub fn allocate(
        &self,
        income: Decimal,
    ) -> Allocation {
        if income < Decimal::ZERO {
            warn!(income = %income, "Income is negative; no brackets apply");
        }

        let mut total_tax = Decimal::ZERO;
        let mut breakdowns = Vec::with_capacity(self.brackets.len());

        for (index, bracket) in self.brackets.iter().enumerate() {
            if income <= bracket.min {
                break;
            }

            let next_min = self.next_min(index, bracket.min);
            let taxable = self.taxable_in_bracket(bracket.min, next_min, income);
            let tax = self.bracket_tax(taxable, bracket.rate);
            let take_home = taxable.saturating_sub(tax);

            total_tax = total_tax.saturating_add(tax);
            breakdowns.push(TaxBreakdown {
                min: bracket.min,
                max: next_min,
                taxable,
                tax,
                take_home,
                rate: bracket.rate,
            });
        }

        debug!(
            income = %income,
            brackets = self.brackets.len(),
            applied = breakdowns.len(),
            total_tax = %total_tax,
            "Allocated income across brackets"
        );

        Allocation {
            total_tax,
            breakdowns,
        }
    }

    /// Lower bound of the bracket after `index`, or `None` for the last one.
    fn next_min(
        &self,
        index: usize,
        current_min: Decimal,
    ) -> Option<Decimal> {
        let next = self.brackets.get(index + 1)?;
        if next.min <= current_min {
            warn!(
                index = index + 1,
                min = %next.min,
                previous_min = %current_min,
                "Bracket boundaries are not strictly ascending"
            );
        }
        Some(next.min)
    }

    /// Income inside `[min, next_min)`, never below zero.
    fn taxable_in_bracket(
        &self,
        min: Decimal,
        next_min: Option<Decimal>,
        income: Decimal,
    ) -> Decimal {
        let bracket_max = min_bounded(income, next_min);
        max(bracket_max.saturating_sub(min), Decimal::ZERO)
    }

    /// `taxable * rate / 100`. When the product overflows, the division is
    /// done first and the result saturates at the `Decimal` bounds.
    fn bracket_tax(
        &self,
        taxable: Decimal,
        rate: Decimal,
    ) -> Decimal {
        match taxable.checked_mul(rate) {
            Some(product) => product / Decimal::ONE_HUNDRED,
            None => (taxable / Decimal::ONE_HUNDRED).saturating_mul(rate),
        }
    }
}

/// Allocates `income` across `brackets`.
///
/// Shorthand for [`BracketAllocator::new`] followed by
/// [`BracketAllocator::allocate`].
pub fn allocate(
    brackets: &[TaxBracket],
    income: Decimal,
) -> Allocation {
    BracketAllocator::new(brackets).allocate(income)
}
