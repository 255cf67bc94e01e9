use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use super::page::{check_no_results, fetch_and_process_page};
use crate::config::ScrapeConfig;
use crate::crawl_engine::WebCrawler;
use crate::extraction::LlmExtractionStrategy;
use crate::models::VenueRecord;
use crate::utils::page_url;

/// What a full crawl produced.
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    pub venues: Vec<VenueRecord>,
    /// Pages that went through fetch-and-process, whether or not the fetch
    /// succeeded
    pub pages_visited: u32,
}

/// Walk the listing from page 1 until it is exhausted.
///
/// Stops on the no-results marker, on a page that yields no accepted venue,
/// or after `max_pages`. Pages are processed one at a time with
/// `page_delay` between them.
pub async fn crawl_venues(
    crawler: &impl WebCrawler,
    config: &ScrapeConfig,
    strategy: &Arc<LlmExtractionStrategy>,
) -> CrawlSummary {
    let mut summary = CrawlSummary::default();
    let mut seen_names = HashSet::new();
    let mut page_number = 1;

    loop {
        if let Some(max) = config.max_pages()
            && page_number > max
        {
            info!(max_pages = max, "Reached page limit");
            break;
        }

        let url = page_url(config.base_url(), page_number);
        if check_no_results(
            crawler,
            &url,
            config.session_id(),
            config.no_results_marker(),
        )
        .await
        {
            info!(page = page_number, "No more results. Ending crawl.");
            break;
        }

        let batch = fetch_and_process_page(
            crawler,
            page_number,
            config.base_url(),
            config.css_selector(),
            strategy,
            config.session_id(),
            config.required_keys(),
            &mut seen_names,
        )
        .await;
        summary.pages_visited += 1;

        if batch.no_more_pages {
            info!(page = page_number, "Extraction returned nothing. Ending crawl.");
            break;
        }
        if batch.venues.is_empty() {
            info!(page = page_number, "No venues accepted on page. Ending crawl.");
            break;
        }

        summary.venues.extend(batch.venues);
        page_number += 1;

        tokio::time::sleep(config.page_delay()).await;
    }

    info!(
        venues = summary.venues.len(),
        pages = summary.pages_visited,
        "Crawl finished"
    );
    summary
}
