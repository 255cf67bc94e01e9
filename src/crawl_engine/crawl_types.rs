//! Core types and traits for crawling operations.
//!
//! This module contains the error type, the per-run configuration, the
//! result handed back for every crawled page, and the two traits the rest of
//! the crate is written against: [`PageFetcher`] (load raw HTML) and
//! [`WebCrawler`] (load, clean, convert, extract).

use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use crate::extraction::{ExtractionError, LlmExtractionStrategy};

/// Error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Browser or CDP failure
    #[error("Browser error: {0}")]
    Browser(String),

    /// Navigation to the URL failed
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// A page operation exceeded its time budget
    #[error("{operation} timeout after {secs} seconds")]
    Timeout { operation: String, secs: u64 },

    /// The CSS selector could not be parsed
    #[error("Selector error: {0}")]
    Selector(String),

    /// Content processing (cleaning, markdown conversion) failed
    #[error("Content error: {0}")]
    Content(String),

    /// LLM extraction failed
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
}

impl From<anyhow::Error> for CrawlError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve full error chain with context
        Self::Content(format!("{err:#}"))
    }
}

/// Convenience alias for results of fetch operations
pub type FetchResult<T> = Result<T, CrawlError>;

/// Cache policy requested for a run.
///
/// The crawler keeps no page cache, so both modes fetch the page every time.
/// The mode is carried so that callers state their intent explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    #[default]
    Bypass,
    Disabled,
}

/// Options for a single crawl run.
#[derive(Debug, Clone, Default)]
pub struct CrawlerRunConfig {
    pub cache_mode: CacheMode,
    /// Restrict processing to the elements matching this selector
    pub css_selector: Option<String>,
    /// Run LLM extraction over the processed content
    pub extraction_strategy: Option<Arc<LlmExtractionStrategy>>,
    /// Reuse the browser tab registered under this id
    pub session_id: Option<String>,
}

impl CrawlerRunConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    #[must_use]
    pub fn css_selector(mut self, selector: Option<String>) -> Self {
        self.css_selector = selector.filter(|s| !s.trim().is_empty());
        self
    }

    #[must_use]
    pub fn extraction_strategy(mut self, strategy: Arc<LlmExtractionStrategy>) -> Self {
        self.extraction_strategy = Some(strategy);
        self
    }

    #[must_use]
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Outcome of one crawl run.
///
/// A failed run has `success == false` and an `error_message`; the content
/// fields are empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlResult {
    pub url: String,
    pub success: bool,
    pub status_code: Option<u16>,
    /// Raw page HTML
    pub html: String,
    /// Cleaned HTML, scoped to the CSS selector when one was given
    pub cleaned_html: String,
    pub markdown: String,
    /// JSON array produced by the extraction strategy
    pub extracted_content: Option<String>,
    pub error_message: Option<String>,
    pub session_id: Option<String>,
}

impl CrawlResult {
    #[must_use]
    pub fn failure(url: &str, session_id: Option<String>, error: &CrawlError) -> Self {
        Self {
            url: url.to_string(),
            success: false,
            error_message: Some(error.to_string()),
            session_id,
            ..Self::default()
        }
    }
}

/// A page as loaded by a fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    pub html: String,
    pub status_code: Option<u16>,
}

/// Loads the HTML of a URL.
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`, reusing the browser state registered under `session_id`.
    fn fetch(
        &self,
        url: &str,
        session_id: Option<&str>,
    ) -> impl Future<Output = FetchResult<FetchedPage>> + Send;
}

/// A crawler that never fails outright: errors are reported in the result.
pub trait WebCrawler: Send + Sync {
    fn arun(
        &self,
        url: &str,
        config: &CrawlerRunConfig,
    ) -> impl Future<Output = CrawlResult> + Send;
}
