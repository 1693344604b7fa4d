//! Shared types, error model, and configuration for shelfpage.
//!
//! This crate is the foundation depended on by all other shelfpage crates.
//! It provides:
//! - [`ShelfpageError`] — the unified error type
//! - Domain types ([`Bucket`], [`BookRecord`], [`RenderedCard`], [`ShelfSnapshot`])
//! - Configuration ([`AppConfig`], [`SheetColumns`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, LinkLabels, OutputConfig, SheetColumns, SheetConfig, StatusStemsConfig,
    WatchConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{Result, ShelfpageError};
pub use types::{Bucket, BookRecord, RenderedCard, ShelfSnapshot, StatusKind, StatusLine};
