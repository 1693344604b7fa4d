//! Application configuration for shelfpage.
//!
//! User config lives at `~/.shelfpage/shelfpage.toml`. Every field carries a
//! default, so a missing config file yields the stock reading-tracker setup
//! (the published sheet URL and the original column layout). CLI flags
//! override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfpageError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "shelfpage.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".shelfpage";

/// Published CSV export of the reading-tracker spreadsheet.
const DEFAULT_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQjjjgtBTUiSTuLiJQ_rP4m7uYffLK_uvkF2Dt1_NildFjEHUcilVUysEQRBH-iWJC1dA-Rtpx8tVn8/pub?gid=2028690260&single=true&output=csv";

// ---------------------------------------------------------------------------
// Config structs (matching shelfpage.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Sheet source settings.
    #[serde(default)]
    pub sheet: SheetConfig,

    /// Logical-field-to-column mapping.
    #[serde(default)]
    pub columns: SheetColumns,

    /// Status stems driving bucket classification.
    #[serde(default)]
    pub stems: StatusStemsConfig,

    /// Labels and flags for the two per-book external links.
    #[serde(default)]
    pub links: LinkLabels,

    /// Rendered page output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Watch-mode settings.
    #[serde(default)]
    pub watch: WatchConfig,
}

/// `[sheet]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// URL of the published CSV export.
    #[serde(default = "default_csv_url")]
    pub csv_url: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            csv_url: default_csv_url(),
        }
    }
}

fn default_csv_url() -> String {
    DEFAULT_CSV_URL.into()
}

/// `[columns]` section — explicit named mapping from logical field to
/// 0-indexed sheet column. Row 0 is always treated as a header and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetColumns {
    #[serde(default = "default_col_title")]
    pub title: usize,
    #[serde(default = "default_col_author")]
    pub author: usize,
    #[serde(default = "default_col_genre")]
    pub genre: usize,
    #[serde(default = "default_col_status")]
    pub status: usize,
    #[serde(default = "default_col_rating")]
    pub rating: usize,
    #[serde(default = "default_col_cover_url")]
    pub cover_url: usize,
    #[serde(default = "default_col_primary_link")]
    pub primary_link: usize,
    #[serde(default = "default_col_secondary_link")]
    pub secondary_link: usize,
}

impl Default for SheetColumns {
    fn default() -> Self {
        Self {
            title: default_col_title(),
            author: default_col_author(),
            genre: default_col_genre(),
            status: default_col_status(),
            rating: default_col_rating(),
            cover_url: default_col_cover_url(),
            primary_link: default_col_primary_link(),
            secondary_link: default_col_secondary_link(),
        }
    }
}

fn default_col_title() -> usize {
    2
}
fn default_col_author() -> usize {
    3
}
fn default_col_genre() -> usize {
    4
}
fn default_col_status() -> usize {
    5
}
fn default_col_rating() -> usize {
    8
}
fn default_col_cover_url() -> usize {
    9
}
fn default_col_primary_link() -> usize {
    10
}
fn default_col_secondary_link() -> usize {
    11
}

/// `[stems]` section — substring stems matched against the normalized status
/// cell, first match wins. Defaults are the sheet's Polish status wording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusStemsConfig {
    /// Stem meaning "currently reading".
    #[serde(default = "default_stem_reading")]
    pub reading: String,
    /// Stem meaning "planned".
    #[serde(default = "default_stem_next")]
    pub next: String,
    /// Stem meaning "already read".
    #[serde(default = "default_stem_finished")]
    pub finished: String,
}

impl Default for StatusStemsConfig {
    fn default() -> Self {
        Self {
            reading: default_stem_reading(),
            next: default_stem_next(),
            finished: default_stem_finished(),
        }
    }
}

fn default_stem_reading() -> String {
    "czytam".into()
}
fn default_stem_next() -> String {
    "planuje".into()
}
fn default_stem_finished() -> String {
    "przeczyt".into()
}

/// `[links]` section — display labels for the two external book links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkLabels {
    #[serde(default = "default_primary_label")]
    pub primary_label: String,
    #[serde(default = "default_primary_flag")]
    pub primary_flag: String,
    #[serde(default = "default_secondary_label")]
    pub secondary_label: String,
    #[serde(default = "default_secondary_flag")]
    pub secondary_flag: String,
}

impl Default for LinkLabels {
    fn default() -> Self {
        Self {
            primary_label: default_primary_label(),
            primary_flag: default_primary_flag(),
            secondary_label: default_secondary_label(),
            secondary_flag: default_secondary_flag(),
        }
    }
}

fn default_primary_label() -> String {
    "Książka po polsku".into()
}
fn default_primary_flag() -> String {
    "🇵🇱".into()
}
fn default_secondary_label() -> String {
    "Książka po angielsku".into()
}
fn default_secondary_flag() -> String {
    "🇬🇧".into()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path the rendered HTML page is written to.
    #[serde(default = "default_page_path")]
    pub page_path: String,
    /// Stylesheet href referenced from the page head (CSS itself is external).
    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,
    /// Page `<title>` and main heading.
    #[serde(default = "default_page_title")]
    pub page_title: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            page_path: default_page_path(),
            stylesheet: default_stylesheet(),
            page_title: default_page_title(),
        }
    }
}

fn default_page_path() -> String {
    "shelf.html".into()
}
fn default_stylesheet() -> String {
    "shelf.css".into()
}
fn default_page_title() -> String {
    "Moja półka".into()
}

/// `[watch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Seconds between automatic refresh cycles in `watch` mode.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_interval_secs() -> u64 {
    300
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.shelfpage/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ShelfpageError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.shelfpage/shelfpage.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ShelfpageError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        ShelfpageError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ShelfpageError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ShelfpageError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ShelfpageError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
