//! CLI command definitions, routing, and tracing setup.

use std::path::Path;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use shelfpage_core::{
    ConfigUpdateChannel, NullUpdateChannel, RefreshConfig, RefreshOutcome, Refresher,
    SnapshotSurfaces, UpdateChannel, render_page, write_page,
};
use shelfpage_shared::{AppConfig, config_file_path, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// shelfpage — render a reading shelf from a published spreadsheet.
#[derive(Parser)]
#[command(
    name = "shelfpage",
    version,
    about = "Fetch a published spreadsheet export and render it as a reading-shelf page.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch the sheet once and write the shelf page.
    Build {
        /// Override the CSV export URL from the config.
        #[arg(long)]
        url: Option<String>,

        /// Override the output page path from the config.
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Refresh the shelf page on an interval until interrupted.
    Watch {
        /// Seconds between refresh cycles (defaults to the config value).
        #[arg(short, long)]
        interval: Option<u64>,

        /// Override the CSV export URL from the config.
        #[arg(long)]
        url: Option<String>,

        /// Override the output page path from the config.
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "shelfpage=info",
        1 => "shelfpage=debug",
        _ => "shelfpage=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build { url, out } => cmd_build(url.as_deref(), out.as_deref()).await,
        Command::Watch { interval, url, out } => {
            cmd_watch(interval, url.as_deref(), out.as_deref()).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Merge CLI overrides into the loaded config.
fn apply_overrides(config: &mut AppConfig, url: Option<&str>, out: Option<&str>) {
    if let Some(url) = url {
        config.sheet.csv_url = url.to_string();
    }
    if let Some(out) = out {
        config.output.page_path = out.to_string();
    }
}

/// Update channel for `watch` mode: adopts config-file edits but reapplies
/// the CLI flag overrides on every adoption, so flags keep precedence over
/// file values for the whole session.
struct OverrideChannel {
    inner: ConfigUpdateChannel,
    url: Option<String>,
    out: Option<String>,
}

impl UpdateChannel for OverrideChannel {
    fn pending(&mut self) -> bool {
        self.inner.pending()
    }

    fn activate(&mut self) -> shelfpage_shared::Result<Option<AppConfig>> {
        Ok(self.inner.activate()?.map(|mut config| {
            apply_overrides(&mut config, self.url.as_deref(), self.out.as_deref());
            config
        }))
    }
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(
            style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
    }
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_build(url: Option<&str>, out: Option<&str>) -> Result<()> {
    let mut config = load_config()?;
    apply_overrides(&mut config, url, out);

    info!(url = %config.sheet.csv_url, "building shelf page");

    let mut refresher =
        Refresher::new(RefreshConfig::from(&config), Box::new(NullUpdateChannel))?;

    let progress = spinner("Fetching sheet...");
    let mut surfaces = SnapshotSurfaces::new();
    let outcome = refresher.refresh_now(&mut surfaces).await;
    progress.finish_and_clear();

    let card_count = match outcome {
        RefreshOutcome::Success { card_count, .. } => card_count,
        RefreshOutcome::NoData { .. } => 0,
        // An existing page keeps its last good contents.
        RefreshOutcome::Failed => {
            return Err(eyre!("could not fetch the sheet; page left unchanged"));
        }
    };

    let snapshot = surfaces.into_snapshot();
    let html = render_page(&snapshot, &config.output);
    write_page(Path::new(&config.output.page_path), &html)?;

    println!();
    println!("  Shelf page written!");
    println!("  Cards:  {card_count}");
    println!("  Path:   {}", config.output.page_path);
    println!();

    Ok(())
}

async fn cmd_watch(interval: Option<u64>, url: Option<&str>, out: Option<&str>) -> Result<()> {
    let mut config = load_config()?;
    apply_overrides(&mut config, url, out);

    let interval = Duration::from_secs(interval.unwrap_or(config.watch.interval_secs));
    let output = config.output.clone();
    let page_path = Path::new(&output.page_path);

    let channel = OverrideChannel {
        inner: ConfigUpdateChannel::new(config_file_path()?),
        url: url.map(String::from),
        out: out.map(String::from),
    };
    let mut refresher = Refresher::new(RefreshConfig::from(&config), Box::new(channel))?;

    info!(
        url = %config.sheet.csv_url,
        interval_secs = interval.as_secs(),
        page = %output.page_path,
        "watching sheet for changes"
    );

    let mut last_hash: Option<String> = None;
    loop {
        let mut surfaces = SnapshotSurfaces::new();
        let outcome = refresher.refresh_now(&mut surfaces).await;

        match outcome {
            RefreshOutcome::Success { content_hash, .. }
            | RefreshOutcome::NoData { content_hash } => {
                if last_hash.as_deref() == Some(content_hash.as_str()) {
                    debug!("sheet unchanged, skipping page write");
                } else {
                    let snapshot = surfaces.into_snapshot();
                    let html = render_page(&snapshot, &output);
                    write_page(page_path, &html)?;
                    info!(cards = snapshot.card_count(), "page updated");
                    last_hash = Some(content_hash);
                }
            }
            RefreshOutcome::Failed => {
                warn!("refresh failed, keeping previous page");
            }
        }

        tokio::time::sleep(interval).await;
    }
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
