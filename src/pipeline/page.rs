//! One listing page: availability check and fetch-extract-filter.
//!
//! Neither operation returns an error. Failures are logged and show up as
//! `false` or an empty batch so that the driver decides what to do next.

use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use super::filters::{is_complete_venue, is_duplicate_venue};
use crate::crawl_engine::{CacheMode, CrawlerRunConfig, WebCrawler};
use crate::extraction::LlmExtractionStrategy;
use crate::models::VenueRecord;
use crate::utils::page_url;

/// Records accepted from one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageBatch {
    pub venues: Vec<VenueRecord>,
    /// Set when the page loaded and extraction returned nothing at all
    pub no_more_pages: bool,
}

impl PageBatch {
    fn empty() -> Self {
        Self::default()
    }

    fn exhausted() -> Self {
        Self {
            venues: Vec::new(),
            no_more_pages: true,
        }
    }
}

/// Whether `url` shows the listing's "no results" marker.
///
/// A failed fetch counts as "results may exist".
pub async fn check_no_results(
    crawler: &impl WebCrawler,
    url: &str,
    session_id: &str,
    marker: &str,
) -> bool {
    let config = CrawlerRunConfig::new()
        .cache_mode(CacheMode::Bypass)
        .session_id(session_id);

    let result = crawler.arun(url, &config).await;
    if !result.success {
        warn!(
            url,
            error = result.error_message.as_deref().unwrap_or("unknown error"),
            "Error fetching page for 'No Results Found' check"
        );
        return false;
    }

    result.cleaned_html.contains(marker)
}

/// Fetch page `page_number`, extract venues and keep the complete, unseen ones.
///
/// Accepted names are added to `seen_names`.
#[allow(clippy::too_many_arguments)]
pub async fn fetch_and_process_page<K: AsRef<str>>(
    crawler: &impl WebCrawler,
    page_number: u32,
    base_url: &str,
    css_selector: Option<&str>,
    strategy: &Arc<LlmExtractionStrategy>,
    session_id: &str,
    required_keys: &[K],
    seen_names: &mut HashSet<String>,
) -> PageBatch {
    let url = page_url(base_url, page_number);
    info!(page = page_number, url = %url, "Loading page {page_number}...");

    let config = CrawlerRunConfig::new()
        .cache_mode(CacheMode::Bypass)
        .css_selector(css_selector.map(str::to_string))
        .extraction_strategy(Arc::clone(strategy))
        .session_id(session_id);

    let result = crawler.arun(&url, &config).await;

    let content = match result.extracted_content.as_deref() {
        Some(content) if result.success && !content.trim().is_empty() => content,
        _ => {
            warn!(
                page = page_number,
                error = result.error_message.as_deref().unwrap_or("no extracted content"),
                "Error fetching page {page_number}"
            );
            return PageBatch::empty();
        }
    };

    let items: Vec<Value> = match serde_json::from_str(content) {
        Ok(items) => items,
        Err(e) => {
            warn!(page = page_number, error = %e, "Extracted content is not a JSON array");
            return PageBatch::empty();
        }
    };

    if items.is_empty() {
        info!(page = page_number, "No venues found on page {page_number}");
        return PageBatch::exhausted();
    }

    let mut venues = Vec::new();
    for item in items {
        let Value::Object(mut venue) = item else {
            continue;
        };

        if venue.get("error") == Some(&Value::Bool(false)) {
            venue.remove("error");
        }

        if !is_complete_venue(&venue, required_keys) {
            continue;
        }

        let Some(name) = venue.get("name").and_then(Value::as_str).map(str::to_string) else {
            continue;
        };

        if is_duplicate_venue(&name, seen_names) {
            info!(name = %name, "Duplicate venue '{name}' found. Skipping.");
            continue;
        }

        seen_names.insert(name);
        venues.push(venue);
    }

    info!(
        page = page_number,
        count = venues.len(),
        "Extracted {} venues from page {page_number}",
        venues.len()
    );

    PageBatch {
        venues,
        no_more_pages: false,
    }
}
