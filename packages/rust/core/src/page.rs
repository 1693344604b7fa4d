//! Full HTML page assembly and writing.
//!
//! Builds the complete reading-tracker document from a [`ShelfSnapshot`]:
//! a status line element, and per bucket a section with a heading, a card
//! list, and an empty-state placeholder that carries the `hidden` attribute
//! exactly when its list received at least one card. Styling is external;
//! the page only references the configured stylesheet.

use std::path::Path;

use tracing::info;

use shelfpage_shared::{Bucket, OutputConfig, Result, ShelfpageError, ShelfSnapshot};
use shelfpage_render::escape_html;

/// Section heading per bucket.
fn bucket_heading(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Reading => "Czytam teraz",
        Bucket::Next => "Planuję przeczytać",
        Bucket::Finished => "Przeczytane",
    }
}

/// Empty-state placeholder text per bucket.
fn empty_message(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Reading => "Aktualnie niczego nie czytam.",
        Bucket::Next => "Brak zaplanowanych książek.",
        Bucket::Finished => "Brak przeczytanych książek.",
    }
}

/// Render the full HTML document for a snapshot.
pub fn render_page(snapshot: &ShelfSnapshot, output: &OutputConfig) -> String {
    let title = escape_html(&output.page_title);

    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"pl\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str(&format!(
        "<link rel=\"stylesheet\" href=\"{}\">\n",
        escape_html(&output.stylesheet)
    ));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{title}</h1>\n"));

    // Status line
    let status_class = if snapshot.status.is_error() {
        "status-message is-error"
    } else {
        "status-message"
    };
    html.push_str(&format!(
        "<p id=\"status-message\" class=\"{status_class}\">{}</p>\n",
        escape_html(&snapshot.status.text)
    ));

    // One section per bucket, in fixed display order.
    for bucket in Bucket::ALL {
        let cards = snapshot.cards(bucket);
        let key = bucket.key();

        html.push_str(&format!("<section class=\"shelf shelf--{key}\">\n"));
        html.push_str(&format!("<h2>{}</h2>\n", bucket_heading(bucket)));

        html.push_str(&format!("<ul id=\"{key}-list\" class=\"book-list\">\n"));
        for card in cards {
            html.push_str(&card.html);
            html.push('\n');
        }
        html.push_str("</ul>\n");

        // Placeholder is hidden exactly when the list has cards.
        let hidden = if cards.is_empty() { "" } else { " hidden" };
        html.push_str(&format!(
            "<p class=\"empty-message\" data-for=\"{key}-list\"{hidden}>{}</p>\n",
            empty_message(bucket)
        ));

        html.push_str("</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Write a rendered page to disk, creating parent directories as needed.
pub fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ShelfpageError::io(parent, e))?;
        }
    }
    std::fs::write(path, html).map_err(|e| ShelfpageError::io(path, e))?;
    info!(path = %path.display(), bytes = html.len(), "page written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfpage_shared::{BookRecord, RenderedCard, StatusLine};

    fn snapshot_with_reading_card() -> ShelfSnapshot {
        let mut snapshot = ShelfSnapshot::empty(StatusLine::info("Zaktualizowano: test."));
        snapshot.reading.push(RenderedCard {
            bucket: Bucket::Reading,
            record: BookRecord {
                title: "Diuna".into(),
                ..Default::default()
            },
            html: "<li class=\"book-card book-card--reading\">Diuna</li>".into(),
        });
        snapshot
    }

    #[test]
    fn page_contains_all_three_lists() {
        let html = render_page(
            &ShelfSnapshot::empty(StatusLine::info("")),
            &OutputConfig::default(),
        );
        assert!(html.contains("id=\"reading-list\""));
        assert!(html.contains("id=\"next-list\""));
        assert!(html.contains("id=\"finished-list\""));
        assert!(html.contains("id=\"status-message\""));
    }

    #[test]
    fn populated_bucket_hides_its_placeholder() {
        let html = render_page(&snapshot_with_reading_card(), &OutputConfig::default());

        assert!(html.contains("data-for=\"reading-list\" hidden"));
        assert!(html.contains("data-for=\"next-list\">"));
        assert!(html.contains("data-for=\"finished-list\">"));
        assert!(html.contains("Diuna"));
    }

    #[test]
    fn error_status_gets_error_class() {
        let snapshot = ShelfSnapshot::empty(StatusLine::error("awaria"));
        let html = render_page(&snapshot, &OutputConfig::default());
        assert!(html.contains("status-message is-error"));
        assert!(html.contains("awaria"));
    }

    #[test]
    fn page_title_and_stylesheet_are_configurable() {
        let output = OutputConfig {
            page_title: "Półka <test>".into(),
            stylesheet: "styles/custom.css".into(),
            ..Default::default()
        };
        let html = render_page(&ShelfSnapshot::empty(StatusLine::info("")), &output);
        assert!(html.contains("<title>Półka &lt;test&gt;</title>"));
        assert!(html.contains("href=\"styles/custom.css\""));
    }

    #[test]
    fn write_page_creates_parent_dirs() {
        let dir = std::env::temp_dir().join(format!("shelfpage-test-{}", std::process::id()));
        let path = dir.join("nested").join("shelf.html");

        write_page(&path, "<html></html>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
