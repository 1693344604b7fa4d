//! Refresh orchestration for shelfpage.
//!
//! Ties the sheet and render crates together into full refresh cycles:
//! fetching the published CSV, rebuilding every card, replacing display
//! surfaces wholesale, assembling the HTML page, and adopting config updates
//! between cycles.

pub mod page;
pub mod pipeline;
pub mod refresh;

pub use page::{render_page, write_page};
pub use pipeline::{
    RefreshConfig, RefreshOutcome, ShelfSurfaces, SnapshotSurfaces, STATUS_FETCH_FAILED,
    STATUS_LOADING, STATUS_NO_DATA, build_client, content_hash, fetch_sheet, refresh,
    success_status,
};
pub use refresh::{ConfigUpdateChannel, NullUpdateChannel, Refresher, UpdateChannel};
