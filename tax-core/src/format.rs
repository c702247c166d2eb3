//! Currency formatting for labels and reports.
//!
//! The calculations never format amounts themselves; anything that produces
//! display strings takes a [`CurrencyFormatter`]. [`DollarFormatter`] is the
//! default, and any `Fn(Decimal) -> String` closure works as well.

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;

/// Label used for an unbounded upper bracket limit.
pub const UNBOUNDED_GLYPH: &str = "∞";

/// Maps an amount to a display string.
pub trait CurrencyFormatter {
    fn format(
        &self,
        amount: Decimal,
    ) -> String;

    /// Formats an optional upper bound, using [`UNBOUNDED_GLYPH`] for `None`.
    fn format_bound(
        &self,
        bound: Option<Decimal>,
    ) -> String {
        bound
            .map(|amount| self.format(amount))
            .unwrap_or_else(|| UNBOUNDED_GLYPH.to_string())
    }
}

impl<F> CurrencyFormatter for F
where
    F: Fn(Decimal) -> String,
{
    fn format(
        &self,
        amount: Decimal,
    ) -> String {
        self(amount)
    }
}

/// Formats amounts as US dollars: `$1,234,567` or `-$12.50`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::format::{CurrencyFormatter, DollarFormatter};
///
/// let whole = DollarFormatter::default();
/// assert_eq!(whole.format(dec!(1234567.5)), "$1,234,568");
/// assert_eq!(whole.format_bound(None), "∞");
///
/// let cents = DollarFormatter::with_cents();
/// assert_eq!(cents.format(dec!(-12.5)), "-$12.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DollarFormatter {
    decimals: u32,
}

impl DollarFormatter {
    pub fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    pub fn with_cents() -> Self {
        Self::new(2)
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }
}

impl CurrencyFormatter for DollarFormatter {
    fn format(
        &self,
        amount: Decimal,
    ) -> String {
        let rounded = round_half_up(amount, self.decimals);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        let digits = format!("{:.*}", self.decimals as usize, rounded.abs());
        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (digits.as_str(), None),
        };

        let mut out = format!("{sign}${}", group_thousands(whole));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }
}

/// Inserts a comma between every group of three digits.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
