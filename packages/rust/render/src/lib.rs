//! Card rendering for shelfpage.
//!
//! Turns [`BookRecord`](shelfpage_shared::BookRecord)s into detached HTML card
//! subtrees. Page assembly (lists, placeholders, status element) lives in
//! `shelfpage-core`; this crate only builds the cards themselves.

pub mod card;

pub use card::{escape_html, render_card, sanitize_external_link, star_count};
