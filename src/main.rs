// Venue scraper binary
//
// Walks a paginated listing with Chromium, extracts venue records with an
// LLM and writes the accepted records to a JSON file.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use venue_scraper::config::{api_key_from_env, get_browser_config, llm_strategy_builder};
use venue_scraper::utils::{
    BASE_URL_ENV, BROWSER_PATH_ENV, DEFAULT_OUTPUT_FILE, DEFAULT_PAGE_DELAY_MS, DEFAULT_PROVIDER,
    DEFAULT_SESSION_ID,
};
use venue_scraper::{AsyncWebCrawler, ChromiumFetcher, ScrapeConfig, crawl_venues, save_venues};

#[derive(Debug, Parser)]
#[command(name = "venue-scraper", version, about = "Scrape venue listings with an LLM")]
struct Args {
    /// Listing URL; `{page}` is replaced by the page number, otherwise `page=N` is appended
    #[arg(long, env = BASE_URL_ENV)]
    base_url: String,

    /// Only extract from elements matching this CSS selector
    #[arg(long)]
    css_selector: Option<String>,

    /// Stop after this many pages
    #[arg(long)]
    max_pages: Option<u32>,

    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    #[arg(long, default_value = DEFAULT_SESSION_ID)]
    session_id: String,

    /// LLM provider and model as `<provider>/<model>`
    #[arg(long, default_value = DEFAULT_PROVIDER)]
    provider: String,

    /// Run the browser without a window
    #[arg(long)]
    headless: bool,

    /// Chrome/Chromium binary; detected or downloaded when omitted
    #[arg(long, env = BROWSER_PATH_ENV)]
    chromium_path: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_PAGE_DELAY_MS)]
    page_delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("venue_scraper=info")),
        )
        .init();

    let args = Args::parse();

    let config = ScrapeConfig::builder()
        .base_url(args.base_url)
        .css_selector(args.css_selector)
        .max_pages(args.max_pages)
        .session_id(args.session_id)
        .page_delay(Duration::from_millis(args.page_delay_ms))
        .output_path(args.output)
        .build()
        .context("Invalid scrape configuration")?;

    let strategy = Arc::new(
        llm_strategy_builder(&args.provider, api_key_from_env())
            .build()
            .context("Failed to configure LLM extraction")?,
    );

    let browser_config = get_browser_config()
        .with_headless(args.headless)
        .with_executable_path(args.chromium_path);
    let fetcher = ChromiumFetcher::launch(&browser_config)
        .await
        .context("Failed to launch browser")?;
    let crawler = AsyncWebCrawler::new(fetcher);

    let summary = crawl_venues(&crawler, &config, &strategy).await;
    info!(pages = summary.pages_visited, "Crawl complete");

    if summary.venues.is_empty() {
        warn!("No venues were found during the crawl.");
    } else {
        save_venues(&summary.venues, config.output_path()).await?;
    }

    strategy.show_usage();

    crawler.into_fetcher().close().await?;
    Ok(())
}
