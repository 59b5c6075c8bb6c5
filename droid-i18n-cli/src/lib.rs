//! CLI library for testing purposes

pub mod config;
pub mod export;
pub mod import;
pub mod inspect;
pub mod validation;

pub use config::Settings;
pub use export::{ExportOptions, run_export_command};
pub use import::{ImportOptions, run_import_command};
pub use inspect::{InspectOptions, run_inspect_command};
