mod config;
mod error;
mod export;
mod models;
mod scrapers;

use clap::Parser;
use config::{Cli, ScrapeConfig};
use scrapers::{ListingScraper, MapsBrowserScraper};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ScrapeConfig::try_from(Cli::parse())?;

    info!("🗺️  Maps Scout");
    info!("==========================================");
    info!(
        "Query: {:?}, target: {}, profile: {}",
        config.params.query,
        config.params.total,
        config.browser.profile.name()
    );

    let scraper = MapsBrowserScraper::new(config.browser.clone());
    info!("Starting {} scrape...", scraper.source_name());

    let businesses = scraper.scrape(&config.params).await?;

    let path = export::save_csv(&businesses, &config.output_dir, &config.params.query).await?;
    info!(
        "✅ Scraping complete: {} rows written to {}",
        businesses.len(),
        path.display()
    );

    Ok(())
}
