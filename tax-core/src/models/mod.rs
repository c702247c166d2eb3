mod tax_bracket;
mod tax_breakdown;
mod tick;

pub use tax_bracket::TaxBracket;
pub use tax_breakdown::{Allocation, TaxBreakdown};
pub use tick::{Tick, TickKind};
