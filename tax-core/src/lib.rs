//! Marginal income tax breakdowns.
//!
//! [`calculations::allocate`] splits an income across an ascending bracket
//! schedule and [`calculations::scale`] places the schedule's boundaries and
//! the income on a normalized axis for display. Both are pure functions of
//! their inputs; validation of user-entered schedules lives in [`editor`].

pub mod calculations;
pub mod editor;
pub mod format;
pub mod models;
pub mod utils;

pub use calculations::{allocate, scale};
pub use models::*;
