//! Type-safe builder for `ScrapeConfig` using the typestate pattern
//!
//! `build()` only exists once a base URL was given.

use anyhow::{Result, anyhow};
use scraper::Selector;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Duration;

use super::types::ScrapeConfig;
use crate::utils::{
    DEFAULT_OUTPUT_FILE, DEFAULT_PAGE_DELAY_MS, DEFAULT_SESSION_ID, NO_RESULTS_MARKER,
    REQUIRED_KEYS, is_valid_url, page_url,
};

// Type states for the builder
pub struct WithBaseUrl;

pub struct ScrapeConfigBuilder<State = ()> {
    pub(crate) base_url: Option<String>,
    pub(crate) css_selector: Option<String>,
    pub(crate) required_keys: Vec<String>,
    pub(crate) session_id: String,
    pub(crate) max_pages: Option<u32>,
    pub(crate) page_delay: Duration,
    pub(crate) no_results_marker: String,
    pub(crate) output_path: PathBuf,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ScrapeConfigBuilder<()> {
    fn default() -> Self {
        Self {
            base_url: None,
            css_selector: None,
            required_keys: REQUIRED_KEYS.iter().map(|k| (*k).to_string()).collect(),
            session_id: DEFAULT_SESSION_ID.to_string(),
            max_pages: None,
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            no_results_marker: NO_RESULTS_MARKER.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder<()> {
        ScrapeConfigBuilder::default()
    }
}

impl ScrapeConfigBuilder<()> {
    pub fn base_url(self, url: impl Into<String>) -> ScrapeConfigBuilder<WithBaseUrl> {
        let url_string = url.into();

        // Normalize URL: add https:// if no scheme is present
        let normalized_url =
            if url_string.starts_with("http://") || url_string.starts_with("https://") {
                url_string
            } else {
                format!("https://{url_string}")
            };

        ScrapeConfigBuilder {
            base_url: Some(normalized_url),
            css_selector: self.css_selector,
            required_keys: self.required_keys,
            session_id: self.session_id,
            max_pages: self.max_pages,
            page_delay: self.page_delay,
            no_results_marker: self.no_results_marker,
            output_path: self.output_path,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when all required fields are set
impl ScrapeConfigBuilder<WithBaseUrl> {
    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for a base URL that is not http(s), an unparsable CSS
    /// selector, an empty session id or marker, or `max_pages == 0`.
    pub fn build(self) -> Result<ScrapeConfig> {
        let base_url = self
            .base_url
            .ok_or_else(|| anyhow!("base_url is required"))?;

        if !is_valid_url(&page_url(&base_url, 1)) {
            return Err(anyhow!("Invalid base URL '{base_url}'"));
        }

        if let Some(selector) = &self.css_selector {
            Selector::parse(selector)
                .map_err(|e| anyhow!("Invalid CSS selector '{selector}': {e:?}"))?;
        }

        if self.session_id.trim().is_empty() {
            return Err(anyhow!("session_id must not be empty"));
        }

        if self.no_results_marker.is_empty() {
            return Err(anyhow!("no_results_marker must not be empty"));
        }

        if self.max_pages == Some(0) {
            return Err(anyhow!("max_pages must be at least 1"));
        }

        Ok(ScrapeConfig {
            base_url,
            css_selector: self.css_selector,
            required_keys: self.required_keys,
            session_id: self.session_id,
            max_pages: self.max_pages,
            page_delay: self.page_delay,
            no_results_marker: self.no_results_marker,
            output_path: self.output_path,
        })
    }
}

// Builder methods available at any state
impl<State> ScrapeConfigBuilder<State> {
    #[must_use]
    pub fn css_selector(mut self, selector: Option<String>) -> Self {
        self.css_selector = selector.filter(|s| !s.trim().is_empty());
        self
    }

    #[must_use]
    pub fn required_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    #[must_use]
    pub fn max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    #[must_use]
    pub fn page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    #[must_use]
    pub fn no_results_marker(mut self, marker: impl Into<String>) -> Self {
        self.no_results_marker = marker.into();
        self
    }

    #[must_use]
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }
}
