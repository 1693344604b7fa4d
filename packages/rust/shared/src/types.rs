//! Core domain types for the shelfpage pipeline.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Bucket
// ---------------------------------------------------------------------------

/// One of the three fixed display categories a book record is sorted into.
///
/// A record belongs to at most one bucket, determined solely by its status
/// text; records matching no bucket are dropped from every list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// Currently being read.
    Reading,
    /// Planned / to-read.
    Next,
    /// Already finished.
    Finished,
}

impl Bucket {
    /// All buckets in display order.
    pub const ALL: [Bucket; 3] = [Bucket::Reading, Bucket::Next, Bucket::Finished];

    /// Stable lowercase key, used as the list id and the card variant suffix.
    pub fn key(&self) -> &'static str {
        match self {
            Bucket::Reading => "reading",
            Bucket::Next => "next",
            Bucket::Finished => "finished",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// BookRecord
// ---------------------------------------------------------------------------

/// The extracted, trimmed set of fields describing one book, derived from one
/// spreadsheet row. Every field defaults to an empty string rather than
/// erroring on missing cells; `rating` stays raw text and is parsed at render
/// time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub genre: String,
    /// Raw status cell text, the sole input to bucket classification.
    pub status: String,
    /// Raw rating cell text (numeric 0-5 when present).
    pub rating: String,
    pub cover_url: String,
    /// Link to the book in the primary language.
    pub primary_link: String,
    /// Link to the book in the secondary language.
    pub secondary_link: String,
}

impl BookRecord {
    /// Whether every field is empty (a fully blank extraction).
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.author.is_empty()
            && self.genre.is_empty()
            && self.status.is_empty()
            && self.rating.is_empty()
            && self.cover_url.is_empty()
            && self.primary_link.is_empty()
            && self.secondary_link.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RenderedCard
// ---------------------------------------------------------------------------

/// A rendered visual card: the record, its bucket, and the card markup.
/// Write-once, handed to a display surface with no back-reference to the row
/// it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCard {
    pub bucket: Bucket,
    pub record: BookRecord,
    /// Self-contained `<li>` subtree for the card.
    pub html: String,
}

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

/// Styling kind for the status line surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// A human-readable status message for the status-line surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

// ---------------------------------------------------------------------------
// ShelfSnapshot
// ---------------------------------------------------------------------------

/// One refresh cycle's complete output: per-bucket card lists plus the status
/// line. Rebuilt in full every cycle; display surfaces replace their contents
/// wholesale with a snapshot, never merge.
#[derive(Debug, Clone)]
pub struct ShelfSnapshot {
    pub reading: Vec<RenderedCard>,
    pub next: Vec<RenderedCard>,
    pub finished: Vec<RenderedCard>,
    pub status: StatusLine,
    /// When this snapshot was produced (local time, for the success message).
    pub produced_at: DateTime<Local>,
}

impl ShelfSnapshot {
    /// An empty snapshot with the given status line.
    pub fn empty(status: StatusLine) -> Self {
        Self {
            reading: Vec::new(),
            next: Vec::new(),
            finished: Vec::new(),
            status,
            produced_at: Local::now(),
        }
    }

    /// The card list for a bucket.
    pub fn cards(&self, bucket: Bucket) -> &[RenderedCard] {
        match bucket {
            Bucket::Reading => &self.reading,
            Bucket::Next => &self.next,
            Bucket::Finished => &self.finished,
        }
    }

    /// Mutable card list for a bucket.
    pub fn cards_mut(&mut self, bucket: Bucket) -> &mut Vec<RenderedCard> {
        match bucket {
            Bucket::Reading => &mut self.reading,
            Bucket::Next => &mut self.next,
            Bucket::Finished => &mut self.finished,
        }
    }

    /// Total number of cards across all buckets.
    pub fn card_count(&self) -> usize {
        self.reading.len() + self.next.len() + self.finished.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_keys_are_stable() {
        assert_eq!(Bucket::Reading.key(), "reading");
        assert_eq!(Bucket::Next.key(), "next");
        assert_eq!(Bucket::Finished.key(), "finished");
        assert_eq!(Bucket::ALL.len(), 3);
        assert_eq!(format!("{}", Bucket::Finished), "finished");
    }

    #[test]
    fn blank_record_is_empty() {
        assert!(BookRecord::default().is_empty());

        let record = BookRecord {
            title: "Diuna".into(),
            ..Default::default()
        };
        assert!(!record.is_empty());
    }

    #[test]
    fn snapshot_bucket_access() {
        let mut snapshot = ShelfSnapshot::empty(StatusLine::info("ok"));
        snapshot.cards_mut(Bucket::Next).push(RenderedCard {
            bucket: Bucket::Next,
            record: BookRecord::default(),
            html: "<li></li>".into(),
        });

        assert_eq!(snapshot.cards(Bucket::Next).len(), 1);
        assert_eq!(snapshot.cards(Bucket::Reading).len(), 0);
        assert_eq!(snapshot.card_count(), 1);
    }

    #[test]
    fn status_line_kinds() {
        assert!(StatusLine::error("boom").is_error());
        assert!(!StatusLine::info("fine").is_error());
    }
}
