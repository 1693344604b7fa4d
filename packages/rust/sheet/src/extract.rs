//! Positional field extraction from parsed rows.

use shelfpage_shared::{BookRecord, SheetColumns};

/// Trimmed text of a cell at `index`, or an empty string when the row is too
/// short. Extraction never errors on missing cells.
pub fn cell_value(row: &[String], index: usize) -> String {
    row.get(index).map(|cell| cell.trim().to_string()).unwrap_or_default()
}

/// Pull the configured columns of one row into a [`BookRecord`].
pub fn extract_record(row: &[String], columns: &SheetColumns) -> BookRecord {
    BookRecord {
        title: cell_value(row, columns.title),
        author: cell_value(row, columns.author),
        genre: cell_value(row, columns.genre),
        status: cell_value(row, columns.status),
        rating: cell_value(row, columns.rating),
        cover_url: cell_value(row, columns.cover_url),
        primary_link: cell_value(row, columns.primary_link),
        secondary_link: cell_value(row, columns.secondary_link),
    }
}
