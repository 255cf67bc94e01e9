//! Crawl Engine Module
//!
//! Fetching pages through a browser and turning them into cleaned HTML,
//! markdown and extracted records.

pub mod chromium_fetcher;
pub mod crawl_types;
pub mod crawler;
pub mod page_timeout;

pub use chromium_fetcher::ChromiumFetcher;
pub use crawl_types::{
    CacheMode, CrawlError, CrawlResult, CrawlerRunConfig, FetchResult, FetchedPage, PageFetcher,
    WebCrawler,
};
pub use crawler::AsyncWebCrawler;
pub use page_timeout::with_page_timeout;
