//! Sheet ingestion: delimited-text parsing, normalization, classification,
//! and field extraction.
//!
//! This crate turns the raw CSV export of the reading tracker into typed
//! [`BookRecord`](shelfpage_shared::BookRecord)s with bucket assignments:
//! - [`parser`] — single-pass RFC-4180-style row scanner
//! - [`normalize`] — case/diacritic-insensitive comparison form
//! - [`classify`] — status-stem-to-bucket matching
//! - [`extract`] — positional cell extraction via a named column mapping

pub mod classify;
pub mod extract;
pub mod normalize;
pub mod parser;

pub use classify::StatusStems;
pub use extract::{cell_value, extract_record};
pub use normalize::normalize_text;
pub use parser::{Row, is_blank_row, parse_rows};
