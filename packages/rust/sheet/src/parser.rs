//! Delimited-text parser for the published sheet export.
//!
//! Single left-to-right scan with one character of lookahead, reproducing
//! RFC-4180-style quoting:
//! - `"` toggles the quoted-field flag; `""` inside a quoted field is an
//!   escaped literal quote
//! - `,` outside quotes ends the current cell
//! - `\n` / `\r` outside quotes ends the current row; `\r\n` is a single
//!   terminator
//! - commas and newlines inside quotes are literal
//!
//! Only the comma delimiter is supported.

/// An ordered sequence of cells, one per sheet column.
pub type Row = Vec<String>;

/// Parse raw delimited text into rows of cells.
///
/// Empty input yields zero rows. A fully blank line yields a row of one empty
/// cell; the caller is expected to filter rows whose every cell is blank.
/// Input without a trailing terminator still flushes its final row.
pub fn parse_rows(text: &str) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();
    let mut row: Row = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;

    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if inside_quotes && chars.peek() == Some(&'"') {
                    // Escaped literal quote
                    current.push('"');
                    chars.next();
                } else {
                    inside_quotes = !inside_quotes;
                }
            }
            ',' if !inside_quotes => {
                row.push(std::mem::take(&mut current));
            }
            '\n' | '\r' if !inside_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    // Windows-style line ending is one terminator
                    chars.next();
                }
                row.push(std::mem::take(&mut current));
                rows.push(std::mem::take(&mut row));
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() || !row.is_empty() {
        row.push(current);
        rows.push(row);
    }

    rows
}

/// Whether every cell of a row is empty or whitespace.
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}
