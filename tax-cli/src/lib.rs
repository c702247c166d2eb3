//! Command-line front end for the marginal tax breakdown.

pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod report;

pub use app::{Report, Schedule, build_report, run};
pub use cli::{Cli, OutputFormat};
pub use config::{BracketSource, FileConfig, Settings};
