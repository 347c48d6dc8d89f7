use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::error::ScrapeError;
use crate::scrapers::{
    BrowserOptions, DiscoveryPolicy, LayoutProfile, ReadinessStrategy, SearchParams,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WaitMode {
    /// Wait for the detail view heading to appear
    Marker,
    /// Sleep a fixed delay after each click
    Settle,
}

/// Scrape Google Maps listings for a search query into a CSV file.
#[derive(Debug, Parser)]
#[command(name = "maps-scout")]
#[command(version)]
pub struct Cli {
    /// Text to search for on the map
    #[arg(short, long, env = "MAPS_SCOUT_SEARCH", default_value = "langkawi cenang restaurant")]
    pub search: String,

    /// Number of listings to collect
    #[arg(
        short,
        long,
        env = "MAPS_SCOUT_TOTAL",
        default_value_t = 120,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub total: u32,

    /// Directory the CSV is written to
    #[arg(short, long, env = "MAPS_SCOUT_OUTPUT_DIR", default_value = "data/raw")]
    pub output_dir: PathBuf,

    /// Page layout the selectors target
    #[arg(
        short,
        long,
        env = "MAPS_SCOUT_PROFILE",
        value_enum,
        default_value_t = LayoutProfile::Current
    )]
    pub profile: LayoutProfile,

    /// Show the browser window
    #[arg(long, env = "MAPS_SCOUT_HEADFUL")]
    pub headful: bool,

    /// How to decide a listing's detail view has loaded
    #[arg(long, env = "MAPS_SCOUT_WAIT", value_enum, default_value_t = WaitMode::Marker)]
    pub wait: WaitMode,

    /// Delay after each click when --wait=settle
    #[arg(long, env = "MAPS_SCOUT_SETTLE_MS", default_value_t = 5000)]
    pub settle_ms: u64,

    /// Timeout for the search box and detail view marker
    #[arg(long, env = "MAPS_SCOUT_ELEMENT_TIMEOUT_SECS", default_value_t = 5)]
    pub element_timeout_secs: u64,

    /// Timeout for page navigation
    #[arg(long, env = "MAPS_SCOUT_NAVIGATION_TIMEOUT_SECS", default_value_t = 60)]
    pub navigation_timeout_secs: u64,

    /// Pause after each scroll of the results panel
    #[arg(long, env = "MAPS_SCOUT_SCROLL_PAUSE_MS", default_value_t = 1500)]
    pub scroll_pause_ms: u64,

    /// Extra unchanged-count checks before the result list counts as exhausted
    #[arg(long, env = "MAPS_SCOUT_EXHAUSTION_RECHECKS", default_value_t = 0)]
    pub exhaustion_rechecks: u32,

    /// Maps entry page
    #[arg(long, env = "MAPS_SCOUT_BASE_URL", default_value = "https://www.google.com/maps")]
    pub base_url: String,
}

/// Everything one run needs, resolved from the command line and environment
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub params: SearchParams,
    pub output_dir: PathBuf,
    pub browser: BrowserOptions,
}

impl TryFrom<Cli> for ScrapeConfig {
    type Error = ScrapeError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let query = cli.search.trim().to_string();
        if query.is_empty() {
            return Err(ScrapeError::InvalidConfig(
                "search query must not be blank".to_string(),
            ));
        }
        if cli.total == 0 {
            return Err(ScrapeError::InvalidConfig(
                "total must be at least 1".to_string(),
            ));
        }

        let element_timeout = Duration::from_secs(cli.element_timeout_secs);
        let readiness = match cli.wait {
            WaitMode::Marker => ReadinessStrategy::Marker {
                timeout: element_timeout,
            },
            WaitMode::Settle => ReadinessStrategy::Settle(Duration::from_millis(cli.settle_ms)),
        };

        Ok(Self {
            params: SearchParams {
                query,
                total: cli.total as usize,
            },
            output_dir: cli.output_dir,
            browser: BrowserOptions {
                base_url: cli.base_url,
                headless: !cli.headful,
                profile: cli.profile,
                readiness,
                discovery: DiscoveryPolicy {
                    exhaustion_rechecks: cli.exhaustion_rechecks,
                },
                navigation_timeout: Duration::from_secs(cli.navigation_timeout_secs),
                element_timeout,
                scroll_pause: Duration::from_millis(cli.scroll_pause_ms),
            },
        })
    }
}
