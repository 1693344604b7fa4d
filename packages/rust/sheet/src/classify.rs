//! Status-to-bucket classification by stem containment.

use shelfpage_shared::{Bucket, StatusStemsConfig};

use crate::normalize::normalize_text;

/// Normalized status stems, checked in fixed priority order:
/// reading, then next, then finished. First match wins.
#[derive(Debug, Clone)]
pub struct StatusStems {
    reading: String,
    next: String,
    finished: String,
}

impl StatusStems {
    /// Build the matcher from configured stems. The stems themselves are
    /// normalized, so configured values with capitals or diacritics still
    /// match.
    pub fn new(config: &StatusStemsConfig) -> Self {
        Self {
            reading: normalize_text(&config.reading),
            next: normalize_text(&config.next),
            finished: normalize_text(&config.finished),
        }
    }

    /// Classify a raw status cell into a bucket, or `None` when no stem
    /// matches (the record is then dropped from every list).
    ///
    /// This is substring containment on normalized text, not exact equality:
    /// any status that merely contains a stem anywhere qualifies.
    pub fn bucket_for(&self, status: &str) -> Option<Bucket> {
        let normalized = normalize_text(status);
        if normalized.is_empty() {
            return None;
        }
        if !self.reading.is_empty() && normalized.contains(&self.reading) {
            return Some(Bucket::Reading);
        }
        if !self.next.is_empty() && normalized.contains(&self.next) {
            return Some(Bucket::Next);
        }
        if !self.finished.is_empty() && normalized.contains(&self.finished) {
            return Some(Bucket::Finished);
        }
        None
    }
}

impl Default for StatusStems {
    fn default() -> Self {
        Self::new(&StatusStemsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_variants_classify_as_reading() {
        let stems = StatusStems::default();
        assert_eq!(stems.bucket_for("Czytam teraz"), Some(Bucket::Reading));
        assert_eq!(stems.bucket_for("CZYTAM"), Some(Bucket::Reading));
        assert_eq!(stems.bucket_for("czytám"), Some(Bucket::Reading));
    }

    #[test]
    fn planned_classifies_as_next() {
        let stems = StatusStems::default();
        assert_eq!(
            stems.bucket_for("Planuję przeczytać"),
            Some(Bucket::Next)
        );
    }

    #[test]
    fn finished_classifies_as_finished() {
        let stems = StatusStems::default();
        assert_eq!(stems.bucket_for("Przeczytane"), Some(Bucket::Finished));
    }

    #[test]
    fn reading_wins_over_finished() {
        // "przeczytam" contains both the reading and finished stems;
        // the reading rule is checked first.
        let stems = StatusStems::default();
        assert_eq!(stems.bucket_for("przeczytam"), Some(Bucket::Reading));
    }

    #[test]
    fn unmatched_status_is_dropped() {
        let stems = StatusStems::default();
        assert_eq!(stems.bucket_for("W kolejce"), None);
        assert_eq!(stems.bucket_for(""), None);
        assert_eq!(stems.bucket_for("   "), None);
    }

    #[test]
    fn stems_with_diacritics_are_normalized() {
        let stems = StatusStems::new(&StatusStemsConfig {
            reading: "CZYTÁM".into(),
            next: "planuje".into(),
            finished: "przeczyt".into(),
        });
        assert_eq!(stems.bucket_for("czytam"), Some(Bucket::Reading));
    }

    #[test]
    fn match_is_substring_anywhere() {
        let stems = StatusStems::default();
        assert_eq!(
            stems.bucket_for("status: aktualnie czytam tę książkę"),
            Some(Bucket::Reading)
        );
    }
}
