//! Core configuration types
//!
//! `BrowserConfig` describes how the browser is launched, `ScrapeConfig`
//! describes what one scraping run visits and keeps.

use anyhow::anyhow;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::{CHROME_USER_AGENT, DEFAULT_PAGE_LOAD_TIMEOUT_SECS};

/// Browser engine.
///
/// Only Chromium-family browsers are driven (through the DevTools protocol).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowserType {
    #[default]
    Chromium,
}

impl FromStr for BrowserType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(Self::Chromium),
            other => Err(anyhow!(
                "Unsupported browser type '{other}': only chromium is available"
            )),
        }
    }
}

impl fmt::Display for BrowserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chromium => f.write_str("chromium"),
        }
    }
}

/// Browser launch settings
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub(crate) browser_type: BrowserType,
    pub(crate) headless: bool,
    pub(crate) verbose: bool,
    pub(crate) user_agent: String,
    /// Browser binary; auto-detected when unset
    pub(crate) executable_path: Option<PathBuf>,
    /// Chrome user data directory; a per-process temp dir when unset
    pub(crate) user_data_dir: Option<PathBuf>,
    /// Timeout in seconds for `page.goto()` plus the navigation wait
    ///
    /// Default: 30 seconds
    pub(crate) page_load_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            browser_type: BrowserType::Chromium,
            headless: true,
            verbose: false,
            user_agent: CHROME_USER_AGENT.to_string(),
            executable_path: None,
            user_data_dir: None,
            page_load_timeout_secs: DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
        }
    }
}

impl BrowserConfig {
    #[must_use]
    pub fn with_browser_type(mut self, browser_type: BrowserType) -> Self {
        self.browser_type = browser_type;
        self
    }

    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_executable_path(mut self, path: Option<PathBuf>) -> Self {
        self.executable_path = path;
        self
    }

    #[must_use]
    pub fn with_user_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_data_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.page_load_timeout_secs = secs;
        self
    }
}

/// Parameters of one scraping run
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Listing URL; may contain a `{page}` placeholder
    pub(crate) base_url: String,
    /// Only elements matching this selector are sent to the LLM
    pub(crate) css_selector: Option<String>,
    pub(crate) required_keys: Vec<String>,
    pub(crate) session_id: String,
    /// Stop after this many pages; unbounded when unset
    pub(crate) max_pages: Option<u32>,
    pub(crate) page_delay: Duration,
    pub(crate) no_results_marker: String,
    pub(crate) output_path: PathBuf,
}
