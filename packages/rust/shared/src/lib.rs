//! Shared types, error model, and configuration for docgen.
//!
//! This crate is the foundation depended on by all other docgen crates.
//! It provides:
//! - [`DocgenError`] — the unified error type
//! - IR and per-file extraction types ([`ExportEntry`], [`Tag`], [`FileResult`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{DocgenError, Result};
pub use types::{
    ExportEntry, ExportToken, FileResult, ModuleSummary, StatementKind, StatementRecord, Tag,
};
