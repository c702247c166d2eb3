use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A marginal rate applied to income above `min`.
///
/// The bracket's upper bound is implied by the next bracket's `min` in an
/// ascending schedule; the last bracket is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower bound of the bracket.
    pub min: Decimal,
    /// Marginal rate as a percentage (e.g. `22` for 22%).
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        min: Decimal,
        rate: Decimal,
    ) -> Self {
        Self { min, rate }
    }
}
