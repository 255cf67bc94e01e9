//! Getter methods for the configuration types

use std::path::Path;
use std::time::Duration;

use super::types::{BrowserConfig, BrowserType, ScrapeConfig};

impl ScrapeConfig {
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn css_selector(&self) -> Option<&str> {
        self.css_selector.as_deref()
    }

    #[must_use]
    pub fn required_keys(&self) -> &[String] {
        &self.required_keys
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub fn max_pages(&self) -> Option<u32> {
        self.max_pages
    }

    #[must_use]
    pub fn page_delay(&self) -> Duration {
        self.page_delay
    }

    #[must_use]
    pub fn no_results_marker(&self) -> &str {
        &self.no_results_marker
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl BrowserConfig {
    #[must_use]
    pub fn browser_type(&self) -> BrowserType {
        self.browser_type
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn executable_path(&self) -> Option<&Path> {
        self.executable_path.as_deref()
    }

    #[must_use]
    pub fn user_data_dir(&self) -> Option<&Path> {
        self.user_data_dir.as_deref()
    }

    #[must_use]
    pub fn page_load_timeout_secs(&self) -> u64 {
        self.page_load_timeout_secs
    }
}
