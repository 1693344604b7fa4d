//! Book card rendering.
//!
//! Builds a self-contained `<li>` subtree per record: title line, optional
//! author/links/genre meta line, optional star rating, optional lazy-loaded
//! cover image, with a bucket-specific variant class on the root. Construction
//! is pure string building; nothing here touches a document.

use tracing::debug;
use url::Url;

use shelfpage_shared::{BookRecord, Bucket, LinkLabels, RenderedCard};

/// Placeholder title for records with an empty title cell.
const UNTITLED: &str = "(bez tytułu)";

/// Generic cover alt text for records with an empty title cell.
const GENERIC_COVER_ALT: &str = "Okładka książki";

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// Escape text for interpolation into HTML content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Link sanitation
// ---------------------------------------------------------------------------

/// Validate an external link: must parse as an absolute `http`/`https` URL.
/// Relative paths, other schemes (`javascript:`, `mailto:`, ...), and garbage
/// all yield `None`. Returns the normalized href.
pub fn sanitize_external_link(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let url = Url::parse(trimmed).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

/// Parse a raw rating cell into a clamped star count in `1..=5`.
///
/// Non-numeric or non-finite input yields `None`; so does a rounded value of
/// zero (an absent rating, not a zero-filled one).
pub fn star_count(rating: &str) -> Option<u8> {
    let numeric: f64 = rating.trim().parse().ok()?;
    if !numeric.is_finite() {
        return None;
    }
    let clamped = numeric.round().clamp(0.0, 5.0) as u8;
    if clamped == 0 { None } else { Some(clamped) }
}

/// Render the rating indicator: exactly five star symbols, the first N filled.
fn render_rating(rating: &str) -> Option<String> {
    let filled = star_count(rating)?;

    let mut html = format!(
        "<div class=\"book-rating\" role=\"img\" aria-label=\"Ocena: {filled} na 5\">"
    );
    for i in 1..=5u8 {
        if i <= filled {
            html.push_str("<span class=\"rating-star is-filled\" aria-hidden=\"true\">★</span>");
        } else {
            html.push_str("<span class=\"rating-star\" aria-hidden=\"true\">☆</span>");
        }
    }
    html.push_str("</div>");
    Some(html)
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

/// Render one labeled, new-tab-safe external link, or nothing when the URL
/// fails validation.
fn render_link(value: &str, label: &str, flag: &str) -> Option<String> {
    let href = sanitize_external_link(value)?;

    let label_esc = escape_html(label);
    let title = format!("{label_esc} (otwiera się w nowej karcie)");

    let mut html = format!(
        "<a class=\"book-meta-link\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" aria-label=\"{title}\" title=\"{title}\">",
        escape_html(&href)
    );
    if !flag.is_empty() {
        html.push_str(&format!(
            "<span class=\"book-meta-link-flag\" aria-hidden=\"true\">{}</span>",
            escape_html(flag)
        ));
    }
    html.push_str(&format!(
        "<span class=\"book-meta-link-label\">{label_esc}</span></a>"
    ));
    Some(html)
}

/// Render the link group for a record, or nothing when neither link validates.
fn render_links(record: &BookRecord, labels: &LinkLabels) -> Option<String> {
    let mut links = Vec::new();

    if let Some(link) = render_link(
        &record.primary_link,
        &labels.primary_label,
        &labels.primary_flag,
    ) {
        links.push(link);
    }
    if let Some(link) = render_link(
        &record.secondary_link,
        &labels.secondary_label,
        &labels.secondary_flag,
    ) {
        links.push(link);
    }

    if links.is_empty() {
        return None;
    }

    Some(format!(
        "<span class=\"book-meta-links\">{}</span>",
        links.join("")
    ))
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// Render one record into a card for its bucket.
pub fn render_card(record: &BookRecord, bucket: Bucket, labels: &LinkLabels) -> RenderedCard {
    let mut html = format!(
        "<li class=\"book-card book-card--{}\"><div class=\"book-card-body\">",
        bucket.key()
    );

    if !record.cover_url.is_empty() {
        let alt = if record.title.is_empty() {
            GENERIC_COVER_ALT.to_string()
        } else {
            format!("Okładka: {}", record.title)
        };
        html.push_str(&format!(
            "<div class=\"book-cover\"><img src=\"{}\" alt=\"{}\" loading=\"lazy\"></div>",
            escape_html(&record.cover_url),
            escape_html(&alt)
        ));
    }

    html.push_str("<div class=\"book-card-content\">");

    let title = if record.title.is_empty() {
        UNTITLED
    } else {
        &record.title
    };
    html.push_str(&format!(
        "<h3 class=\"book-title\">{}</h3>",
        escape_html(title)
    ));

    // Meta line: author, link group, genre, in that order; omitted entirely
    // when none of them contribute.
    let mut meta = String::new();
    if !record.author.is_empty() {
        meta.push_str(&format!(
            "<span class=\"book-meta-author\">{}</span>",
            escape_html(&record.author)
        ));
    }
    if let Some(links) = render_links(record, labels) {
        meta.push_str(&links);
    }
    if !record.genre.is_empty() {
        meta.push_str(&format!(
            "<span class=\"book-meta-genre\">{}</span>",
            escape_html(&record.genre)
        ));
    }
    if !meta.is_empty() {
        html.push_str(&format!("<p class=\"book-meta\">{meta}</p>"));
    }

    if let Some(rating) = render_rating(&record.rating) {
        html.push_str(&rating);
    }

    html.push_str("</div></div></li>");

    debug!(title = %title, bucket = %bucket, "card rendered");

    RenderedCard {
        bucket,
        record: record.clone(),
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> LinkLabels {
        LinkLabels::default()
    }

    fn record_with(f: impl FnOnce(&mut BookRecord)) -> BookRecord {
        let mut record = BookRecord::default();
        f(&mut record);
        record
    }

    // --- Link sanitation ---

    #[test]
    fn https_link_is_accepted() {
        assert_eq!(
            sanitize_external_link("https://example.com/book"),
            Some("https://example.com/book".into())
        );
    }

    #[test]
    fn javascript_scheme_is_rejected() {
        assert_eq!(sanitize_external_link("javascript:alert(1)"), None);
    }

    #[test]
    fn relative_path_is_rejected() {
        assert_eq!(sanitize_external_link("/relative/path"), None);
        assert_eq!(sanitize_external_link("relative/path"), None);
    }

    #[test]
    fn other_schemes_and_blanks_are_rejected() {
        assert_eq!(sanitize_external_link("ftp://example.com/file"), None);
        assert_eq!(sanitize_external_link("mailto:kto@example.com"), None);
        assert_eq!(sanitize_external_link(""), None);
        assert_eq!(sanitize_external_link("   "), None);
    }

    // --- Rating ---

    #[test]
    fn rating_rounds_and_clamps() {
        assert_eq!(star_count("4.6"), Some(5));
        assert_eq!(star_count("3"), Some(3));
        assert_eq!(star_count("7"), Some(5));
        assert_eq!(star_count("-2"), None);
    }

    #[test]
    fn zero_or_garbage_rating_renders_nothing() {
        assert_eq!(star_count("0"), None);
        assert_eq!(star_count("abc"), None);
        assert_eq!(star_count(""), None);
    }

    #[test]
    fn rating_renders_exactly_five_symbols() {
        let record = record_with(|r| {
            r.title = "Diuna".into();
            r.rating = "4.6".into();
        });
        let card = render_card(&record, Bucket::Finished, &labels());

        assert_eq!(card.html.matches("rating-star").count(), 5);
        assert_eq!(card.html.matches("is-filled").count(), 5);
        assert!(card.html.contains("aria-label=\"Ocena: 5 na 5\""));
    }

    #[test]
    fn partial_rating_mixes_filled_and_empty() {
        let record = record_with(|r| r.rating = "3".into());
        let card = render_card(&record, Bucket::Reading, &labels());

        assert_eq!(card.html.matches("is-filled").count(), 3);
        assert_eq!(card.html.matches('☆').count(), 2);
    }

    #[test]
    fn unratable_record_has_no_rating_block() {
        let record = record_with(|r| r.rating = "abc".into());
        let card = render_card(&record, Bucket::Reading, &labels());
        assert!(!card.html.contains("book-rating"));
    }

    // --- Card structure ---

    #[test]
    fn empty_title_falls_back_to_placeholder() {
        let card = render_card(&BookRecord::default(), Bucket::Next, &labels());
        assert!(card.html.contains("(bez tytułu)"));
    }

    #[test]
    fn bucket_variant_class_on_root() {
        let card = render_card(&BookRecord::default(), Bucket::Next, &labels());
        assert!(card.html.starts_with("<li class=\"book-card book-card--next\">"));
    }

    #[test]
    fn meta_line_omitted_when_empty() {
        let card = render_card(&BookRecord::default(), Bucket::Reading, &labels());
        assert!(!card.html.contains("book-meta"));
    }

    #[test]
    fn meta_line_present_with_author_only() {
        let record = record_with(|r| r.author = "Frank Herbert".into());
        let card = render_card(&record, Bucket::Reading, &labels());
        assert!(card.html.contains("<p class=\"book-meta\">"));
        assert!(card.html.contains("Frank Herbert"));
        assert!(!card.html.contains("book-meta-genre"));
    }

    #[test]
    fn valid_link_renders_new_tab_safe_anchor() {
        let record = record_with(|r| r.primary_link = "https://example.com/book".into());
        let card = render_card(&record, Bucket::Reading, &labels());

        assert!(card.html.contains("href=\"https://example.com/book\""));
        assert!(card.html.contains("target=\"_blank\""));
        assert!(card.html.contains("rel=\"noopener noreferrer\""));
        assert!(card.html.contains("Książka po polsku"));
    }

    #[test]
    fn invalid_links_render_no_link_group() {
        let record = record_with(|r| {
            r.author = "Ktoś".into();
            r.primary_link = "javascript:alert(1)".into();
            r.secondary_link = "/relative/path".into();
        });
        let card = render_card(&record, Bucket::Reading, &labels());
        assert!(!card.html.contains("book-meta-links"));
    }

    #[test]
    fn cover_image_is_lazy_with_title_alt() {
        let record = record_with(|r| {
            r.title = "Diuna".into();
            r.cover_url = "https://img.example.com/diuna.jpg".into();
        });
        let card = render_card(&record, Bucket::Finished, &labels());

        assert!(card.html.contains("loading=\"lazy\""));
        assert!(card.html.contains("alt=\"Okładka: Diuna\""));
    }

    #[test]
    fn missing_cover_renders_no_image() {
        let card = render_card(&BookRecord::default(), Bucket::Finished, &labels());
        assert!(!card.html.contains("<img"));
    }

    #[test]
    fn text_is_html_escaped() {
        let record = record_with(|r| r.title = "Wiedźmin <i> & \"spółka\"".into());
        let card = render_card(&record, Bucket::Reading, &labels());

        assert!(card.html.contains("Wiedźmin &lt;i&gt; &amp; &quot;spółka&quot;"));
        assert!(!card.html.contains("<i>"));
    }
}
