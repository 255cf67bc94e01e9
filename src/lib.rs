pub mod browser_setup;
pub mod config;
pub mod content_saver;
pub mod crawl_engine;
pub mod extraction;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use browser_setup::{download_managed_browser, launch_browser};
pub use config::{BrowserConfig, ScrapeConfig, get_browser_config, get_llm_strategy};
pub use content_saver::save_venues;
pub use crawl_engine::{
    AsyncWebCrawler, CacheMode, ChromiumFetcher, CrawlError, CrawlResult, CrawlerRunConfig,
    PageFetcher, WebCrawler,
};
pub use extraction::{ExtractionError, LlmExtractionStrategy, TokenUsage};
pub use models::{Venue, VenueRecord};
pub use pipeline::{
    CrawlSummary, PageBatch, check_no_results, crawl_venues, fetch_and_process_page,
    is_complete_venue, is_duplicate_venue,
};
