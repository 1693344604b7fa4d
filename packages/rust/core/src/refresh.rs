//! Refresh driver with out-of-band update adoption.
//!
//! Long-running surfaces (watch mode, the TUI) keep refreshing against a
//! config loaded at startup. An [`UpdateChannel`] lets a newer config be
//! picked up at a safe point: changes are detected between cycles and only
//! adopted at the start of the next refresh, never mid-cycle.

use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use shelfpage_shared::{AppConfig, Result, load_config_from};

use crate::pipeline::{RefreshConfig, RefreshOutcome, ShelfSurfaces, build_client, refresh};

// ---------------------------------------------------------------------------
// Update channel
// ---------------------------------------------------------------------------

/// Source of configuration updates for a long-running refresh loop.
///
/// `pending` is a cheap poll; `activate` commits to the new version and
/// returns it. Activation happens only between refresh cycles.
pub trait UpdateChannel: Send {
    /// Whether a newer version is waiting.
    fn pending(&mut self) -> bool;

    /// Adopt the waiting version. Returns `None` when there is nothing newer.
    fn activate(&mut self) -> Result<Option<AppConfig>>;
}

/// An update channel that never has anything pending. Used by one-shot runs.
#[derive(Debug, Default)]
pub struct NullUpdateChannel;

impl UpdateChannel for NullUpdateChannel {
    fn pending(&mut self) -> bool {
        false
    }

    fn activate(&mut self) -> Result<Option<AppConfig>> {
        Ok(None)
    }
}

/// Watches the config file on disk and reports a pending update when its
/// contents change after the baseline was taken. A missing file hashes to
/// `None`, so deleting the config also counts as a change.
#[derive(Debug)]
pub struct ConfigUpdateChannel {
    path: PathBuf,
    baseline: Option<String>,
}

impl ConfigUpdateChannel {
    pub fn new(path: PathBuf) -> Self {
        let baseline = file_hash(&path);
        Self { path, baseline }
    }
}

impl UpdateChannel for ConfigUpdateChannel {
    fn pending(&mut self) -> bool {
        file_hash(&self.path) != self.baseline
    }

    fn activate(&mut self) -> Result<Option<AppConfig>> {
        let current = file_hash(&self.path);
        if current == self.baseline {
            return Ok(None);
        }

        self.baseline = current;
        if !self.path.exists() {
            debug!(path = %self.path.display(), "config file removed, reverting to defaults");
            return Ok(Some(AppConfig::default()));
        }

        let config = load_config_from(&self.path)?;
        info!(path = %self.path.display(), "adopted updated config");
        Ok(Some(config))
    }
}

/// SHA-256 of a file's contents, or `None` when it cannot be read.
fn file_hash(path: &std::path::Path) -> Option<String> {
    let bytes = std::fs::read(path).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Some(format!("{:x}", hasher.finalize()))
}

// ---------------------------------------------------------------------------
// Refresher
// ---------------------------------------------------------------------------

/// Owns the HTTP client, the active refresh config, and the update channel,
/// and drives refresh cycles for a long-running surface.
pub struct Refresher {
    client: reqwest::Client,
    config: RefreshConfig,
    channel: Box<dyn UpdateChannel>,
}

impl Refresher {
    pub fn new(config: RefreshConfig, channel: Box<dyn UpdateChannel>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            config,
            channel,
        })
    }

    /// The currently active refresh config.
    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Adopt a pending config update, if any.
    ///
    /// A broken updated config is logged and skipped; the previously active
    /// config stays in effect.
    fn adopt_pending(&mut self) {
        if self.channel.pending() {
            match self.channel.activate() {
                Ok(Some(updated)) => self.config = RefreshConfig::from(&updated),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "ignoring unreadable config update"),
            }
        }
    }

    /// Adopt any pending config update, then hand out the client and the
    /// active config so a refresh cycle can run detached from the refresher.
    /// Cycles started from separate checkouts run concurrently.
    pub fn checkout(&mut self) -> (reqwest::Client, RefreshConfig) {
        self.adopt_pending();
        (self.client.clone(), self.config.clone())
    }

    /// Run one refresh cycle, adopting any pending config update first.
    pub async fn refresh_now(&mut self, surfaces: &mut dyn ShelfSurfaces) -> RefreshOutcome {
        self.adopt_pending();
        refresh(&self.client, &self.config, surfaces).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SnapshotSurfaces;
    use shelfpage_shared::Bucket;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("shelfpage-{}-{}.toml", name, std::process::id()))
    }

    #[test]
    fn null_channel_never_pending() {
        let mut channel = NullUpdateChannel;
        assert!(!channel.pending());
        assert!(channel.activate().unwrap().is_none());
    }

    #[test]
    fn config_channel_detects_file_change() {
        let path = temp_config_path("detect");
        std::fs::write(&path, "[watch]\ninterval_secs = 60\n").unwrap();

        let mut channel = ConfigUpdateChannel::new(path.clone());
        assert!(!channel.pending());

        std::fs::write(&path, "[watch]\ninterval_secs = 120\n").unwrap();
        assert!(channel.pending());

        let updated = channel.activate().unwrap().unwrap();
        assert_eq!(updated.watch.interval_secs, 120);

        // Activation rebases; no further update is pending.
        assert!(!channel.pending());
        assert!(channel.activate().unwrap().is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn config_channel_handles_missing_file() {
        let path = temp_config_path("missing");
        let _ = std::fs::remove_file(&path);

        let mut channel = ConfigUpdateChannel::new(path.clone());
        assert!(!channel.pending());

        std::fs::write(&path, "[stems]\nreading = \"reading\"\n").unwrap();
        assert!(channel.pending());
        let updated = channel.activate().unwrap().unwrap();
        assert_eq!(updated.stems.reading, "reading");

        // Deleting the file counts as a change back to defaults.
        std::fs::remove_file(&path).unwrap();
        assert!(channel.pending());
        let reverted = channel.activate().unwrap().unwrap();
        assert_eq!(reverted.stems.reading, "czytam");
    }

    struct SwapUrlChannel {
        next: Option<AppConfig>,
    }

    impl UpdateChannel for SwapUrlChannel {
        fn pending(&mut self) -> bool {
            self.next.is_some()
        }

        fn activate(&mut self) -> Result<Option<AppConfig>> {
            Ok(self.next.take())
        }
    }

    #[test]
    fn checkout_adopts_update_and_detaches_from_refresher() {
        let mut updated = AppConfig::default();
        updated.sheet.csv_url = "https://example.com/v2.csv".into();

        let channel = SwapUrlChannel {
            next: Some(updated),
        };
        let mut refresher =
            Refresher::new(RefreshConfig::from(&AppConfig::default()), Box::new(channel))
                .unwrap();

        let (_client, config) = refresher.checkout();
        assert_eq!(config.csv_url, "https://example.com/v2.csv");

        // The checked-out config is a detached copy; a second checkout sees
        // the same active config with nothing further pending.
        let (_client, again) = refresher.checkout();
        assert_eq!(again.csv_url, config.csv_url);
    }

    #[tokio::test]
    async fn refresher_adopts_update_between_cycles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "h,h,h,h,h,h\n,,Diuna,,,Czytam\n",
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "h,h,h,h,h,h\n,,Hobbit,,,Przeczytane\n",
            ))
            .mount(&server)
            .await;

        let mut initial = AppConfig::default();
        initial.sheet.csv_url = format!("{}/v1.csv", server.uri());
        let mut updated = AppConfig::default();
        updated.sheet.csv_url = format!("{}/v2.csv", server.uri());

        let channel = SwapUrlChannel {
            next: Some(updated),
        };
        let mut refresher =
            Refresher::new(RefreshConfig::from(&initial), Box::new(channel)).unwrap();

        // The pending update is adopted before the first cycle runs.
        let mut surfaces = SnapshotSurfaces::new();
        let outcome = refresher.refresh_now(&mut surfaces).await;
        let snapshot = surfaces.into_snapshot();

        assert!(matches!(outcome, RefreshOutcome::Success { .. }));
        assert_eq!(snapshot.cards(Bucket::Finished).len(), 1);
        assert_eq!(snapshot.cards(Bucket::Finished)[0].record.title, "Hobbit");
        assert!(refresher.config().csv_url.ends_with("/v2.csv"));
    }
}
