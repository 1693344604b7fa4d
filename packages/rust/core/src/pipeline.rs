//! End-to-end refresh pipeline: fetch CSV → parse → classify → render →
//! replace display surfaces.
//!
//! One refresh cycle is fully re-entrant: every trigger (initial load, watch
//! tick, manual refresh) rebuilds all records and cards from scratch and
//! replaces each bucket's displayed contents wholesale. A failed cycle leaves
//! previously displayed cards in place and only reports through the status
//! line; the specific cause goes to tracing, never to the user.

use chrono::Local;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use shelfpage_shared::{
    AppConfig, Bucket, LinkLabels, RenderedCard, Result, SheetColumns, ShelfpageError,
    ShelfSnapshot, StatusLine, StatusStemsConfig,
};
use shelfpage_sheet::{StatusStems, extract_record, is_blank_row, parse_rows};

/// User-Agent string for sheet requests.
const USER_AGENT: &str = concat!("shelfpage/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Status texts
// ---------------------------------------------------------------------------

/// Status line while a fetch is in flight.
pub const STATUS_LOADING: &str = "Ładuję dane z arkusza...";

/// Status line when a refresh succeeds but no record matched any bucket.
pub const STATUS_NO_DATA: &str = "Brak danych do wyświetlenia.";

/// The single user-facing failure message. Network failures, non-2xx
/// responses, and empty datasets all collapse into this.
pub const STATUS_FETCH_FAILED: &str =
    "Nie udało się pobrać danych z arkusza. Spróbuj odświeżyć stronę później.";

/// Timestamped success status line.
pub fn success_status(at: chrono::DateTime<Local>) -> String {
    format!("Zaktualizowano: {}.", at.format("%d.%m.%Y, %H:%M:%S"))
}

// ---------------------------------------------------------------------------
// Display surfaces
// ---------------------------------------------------------------------------

/// The display surfaces a refresh cycle writes into: one card list per
/// bucket, one empty-state placeholder per bucket, one status line.
///
/// Surfaces are explicit handles passed into the orchestrator; only the
/// orchestrator's render step writes them (single-writer discipline).
pub trait ShelfSurfaces: Send {
    /// Update the human-readable status line.
    fn set_status(&mut self, status: StatusLine);

    /// Replace a bucket's displayed contents wholesale with a new card set.
    fn replace_bucket(&mut self, bucket: Bucket, cards: Vec<RenderedCard>);

    /// Toggle a bucket's empty-state placeholder. Called with `true` exactly
    /// when the bucket received zero cards this cycle.
    fn set_empty_visible(&mut self, bucket: Bucket, visible: bool);
}

/// A [`ShelfSurfaces`] implementation that collects one refresh cycle into a
/// [`ShelfSnapshot`], for surfaces that consume whole snapshots (the TUI and
/// the HTML page writer).
#[derive(Debug)]
pub struct SnapshotSurfaces {
    snapshot: ShelfSnapshot,
}

impl SnapshotSurfaces {
    pub fn new() -> Self {
        Self {
            snapshot: ShelfSnapshot::empty(StatusLine::info("")),
        }
    }

    /// Consume the collector, yielding the finished snapshot.
    pub fn into_snapshot(self) -> ShelfSnapshot {
        self.snapshot
    }
}

impl Default for SnapshotSurfaces {
    fn default() -> Self {
        Self::new()
    }
}

impl ShelfSurfaces for SnapshotSurfaces {
    fn set_status(&mut self, status: StatusLine) {
        self.snapshot.status = status;
        self.snapshot.produced_at = Local::now();
    }

    fn replace_bucket(&mut self, bucket: Bucket, cards: Vec<RenderedCard>) {
        *self.snapshot.cards_mut(bucket) = cards;
    }

    fn set_empty_visible(&mut self, _bucket: Bucket, _visible: bool) {
        // A snapshot derives placeholder visibility from its card counts.
    }
}

// ---------------------------------------------------------------------------
// Refresh config & outcome
// ---------------------------------------------------------------------------

/// Everything one refresh cycle needs, merged from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// URL of the published CSV export.
    pub csv_url: String,
    /// Named column mapping.
    pub columns: SheetColumns,
    /// Status stems for classification.
    pub stems: StatusStemsConfig,
    /// Labels for the two external links.
    pub links: LinkLabels,
}

impl From<&AppConfig> for RefreshConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            csv_url: config.sheet.csv_url.clone(),
            columns: config.columns.clone(),
            stems: config.stems.clone(),
            links: config.links.clone(),
        }
    }
}

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// At least one record landed in a bucket.
    Success {
        card_count: usize,
        /// SHA-256 of the fetched CSV text, for change detection.
        content_hash: String,
    },
    /// The fetch and parse succeeded but no record matched any bucket.
    NoData { content_hash: String },
    /// The cycle failed; surfaces kept their prior bucket contents.
    Failed,
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Build the HTTP client used for sheet fetches: caching disabled via request
/// headers, limited redirects, no timeout (a hung request is a hung refresh;
/// there is no retry or cancellation).
pub fn build_client() -> Result<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::CACHE_CONTROL,
        reqwest::header::HeaderValue::from_static("no-store"),
    );
    headers.insert(
        reqwest::header::PRAGMA,
        reqwest::header::HeaderValue::from_static("no-cache"),
    );

    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| ShelfpageError::Network(format!("failed to build HTTP client: {e}")))
}

/// Fetch the raw CSV export. Non-2xx responses are errors.
pub async fn fetch_sheet(client: &reqwest::Client, url: &str) -> Result<String> {
    debug!(%url, "fetching sheet export");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ShelfpageError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ShelfpageError::Network(format!("{url}: HTTP {status}")));
    }

    response
        .text()
        .await
        .map_err(|e| ShelfpageError::Network(format!("{url}: body read failed: {e}")))
}

/// SHA-256 hash of the fetched CSV text.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Row processing
// ---------------------------------------------------------------------------

/// Parse, filter, extract, classify, and render the CSV text into cards.
///
/// Rows whose every cell is blank are discarded; the first surviving row is
/// the header and is dropped. A dataset with zero surviving rows is a
/// validation error (collapsed into the fixed failure message upstream).
pub fn render_sheet(text: &str, config: &RefreshConfig) -> Result<Vec<RenderedCard>> {
    let rows: Vec<_> = parse_rows(text)
        .into_iter()
        .filter(|row| !is_blank_row(row))
        .collect();

    if rows.is_empty() {
        return Err(ShelfpageError::validation("sheet contains no data rows"));
    }

    let stems = StatusStems::new(&config.stems);
    let mut cards = Vec::new();
    let mut dropped = 0usize;

    // Row 0 is the header.
    for row in &rows[1..] {
        let record = extract_record(row, &config.columns);
        match stems.bucket_for(&record.status) {
            Some(bucket) => {
                cards.push(shelfpage_render::render_card(&record, bucket, &config.links));
            }
            None => dropped += 1,
        }
    }

    debug!(
        rows = rows.len() - 1,
        cards = cards.len(),
        dropped,
        "sheet rendered"
    );

    Ok(cards)
}

/// Group rendered cards by bucket, preserving row order within each bucket.
fn group_by_bucket(cards: Vec<RenderedCard>) -> [(Bucket, Vec<RenderedCard>); 3] {
    let mut grouped = Bucket::ALL.map(|bucket| (bucket, Vec::new()));
    for card in cards {
        let slot = match card.bucket {
            Bucket::Reading => &mut grouped[0].1,
            Bucket::Next => &mut grouped[1].1,
            Bucket::Finished => &mut grouped[2].1,
        };
        slot.push(card);
    }
    grouped
}

// ---------------------------------------------------------------------------
// Refresh cycle
// ---------------------------------------------------------------------------

/// Run one full refresh cycle against the given surfaces.
///
/// On failure at any stage the buckets keep whatever they displayed before
/// and only the status line changes; on success every bucket is replaced
/// wholesale, placeholders are toggled, and a timestamped success line (or
/// the fixed no-data line) is set.
#[instrument(skip_all, fields(url = %config.csv_url))]
pub async fn refresh(
    client: &reqwest::Client,
    config: &RefreshConfig,
    surfaces: &mut dyn ShelfSurfaces,
) -> RefreshOutcome {
    surfaces.set_status(StatusLine::info(STATUS_LOADING));

    let rendered = match try_refresh(client, config).await {
        Ok(rendered) => rendered,
        Err(e) => {
            warn!(error = %e, "refresh failed");
            surfaces.set_status(StatusLine::error(STATUS_FETCH_FAILED));
            return RefreshOutcome::Failed;
        }
    };

    let hash = rendered.content_hash;
    let card_count: usize = rendered.cards.len();

    for (bucket, cards) in group_by_bucket(rendered.cards) {
        let empty = cards.is_empty();
        surfaces.replace_bucket(bucket, cards);
        surfaces.set_empty_visible(bucket, empty);
    }

    if card_count > 0 {
        let now = Local::now();
        surfaces.set_status(StatusLine::info(success_status(now)));
        info!(card_count, "refresh complete");
        RefreshOutcome::Success {
            card_count,
            content_hash: hash,
        }
    } else {
        surfaces.set_status(StatusLine::info(STATUS_NO_DATA));
        info!("refresh complete, no records matched any bucket");
        RefreshOutcome::NoData { content_hash: hash }
    }
}

struct RenderedSheet {
    cards: Vec<RenderedCard>,
    content_hash: String,
}

/// The fallible part of a refresh: fetch + parse + render.
async fn try_refresh(client: &reqwest::Client, config: &RefreshConfig) -> Result<RenderedSheet> {
    let text = fetch_sheet(client, &config.csv_url).await?;
    let content_hash = content_hash(&text);
    let cards = render_sheet(&text, config)?;
    Ok(RenderedSheet {
        cards,
        content_hash,
    })
}
