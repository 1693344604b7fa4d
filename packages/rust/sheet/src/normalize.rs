//! Case- and diacritic-insensitive text normalization for classification.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalize text for comparison: trim, lowercase, NFD-decompose, and drop
/// combining marks, so `"Czytám"` compares equal to `"czytam"`. Empty input
/// normalizes to an empty string; this never fails.
pub fn normalize_text(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(normalize_text("  CZYTAM  "), "czytam");
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(normalize_text("czytám"), "czytam");
        assert_eq!(normalize_text("Planuję przeczytać"), "planuje przeczytac");
    }

    #[test]
    fn polish_l_with_stroke_is_not_a_combining_mark() {
        // NFD does not decompose ł; it survives normalization as-is.
        assert_eq!(normalize_text("Ładuję"), "ładuje");
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn interior_whitespace_preserved() {
        assert_eq!(normalize_text("Czytam teraz"), "czytam teraz");
    }
}
