//! Marginal tax calculations.
//!
//! This module holds the pure computations behind a bracket breakdown:
//! allocating income across brackets, placing ticks on the income axis and
//! laying out the bar segments that visualize the result.

pub mod allocator;
pub mod axis;
pub mod common;
pub mod layout;

pub use allocator::{BracketAllocator, allocate};
pub use axis::{AxisScaler, CEILING_HEADROOM, CeilingPolicy, scale};
pub use layout::{BarSegment, layout};
