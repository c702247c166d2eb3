use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a tick on the income axis marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickKind {
    /// The lower bound of a bracket.
    Boundary,
    /// The income being broken down.
    Income,
}

/// A labelled position on the normalized 0–100 income axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub position: Decimal,
    pub label: String,
    pub kind: TickKind,
}
