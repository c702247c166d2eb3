//! Bracket schedule sources: the preset catalog and CSV files.

pub mod loader;
pub mod presets;

pub use loader::{BracketCsvLoader, BracketLoaderError, BracketRecord};
pub use presets::{PresetCatalog, PresetError, TaxPreset};
