//! Shared types, error model, and configuration for docbuild.
//!
//! This crate is the foundation depended on by all other docbuild crates.
//! It provides:
//! - [`DocBuildError`], the unified error type
//! - Domain types ([`DocumentUnit`], [`WriteOutcome`], [`NotebookOutcome`], [`ModuleDoc`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ConverterConfig, PathsConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{DocBuildError, Result};
pub use types::{DocumentUnit, ModuleDoc, NotebookOutcome, RunSummary, WriteOutcome};
