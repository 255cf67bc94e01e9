//! Chromium-backed page fetcher
//!
//! Owns a chromiumoxide browser and its CDP handler task. A session id maps
//! to a long-lived tab so that cookies and client state persist between
//! fetches; fetches without a session get a throw-away tab.

use anyhow::Result;
use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::crawl_types::{CrawlError, FetchResult, FetchedPage, PageFetcher};
use super::page_timeout::with_page_timeout;
use crate::browser_setup::launch_browser;
use crate::config::BrowserConfig;

pub struct ChromiumFetcher {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
    sessions: Mutex<HashMap<String, Page>>,
    page_load_timeout_secs: u64,
    verbose: bool,
}

impl ChromiumFetcher {
    /// Launch a browser configured by `config`.
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let (browser, handler, user_data_dir) = launch_browser(config).await?;
        Ok(Self {
            browser: Mutex::new(browser),
            handler,
            user_data_dir: Some(user_data_dir),
            sessions: Mutex::new(HashMap::new()),
            page_load_timeout_secs: config.page_load_timeout_secs(),
            verbose: config.verbose(),
        })
    }

    /// Close the tab registered under `session_id`, if any.
    pub async fn kill_session(&self, session_id: &str) {
        let page = self.sessions.lock().await.remove(session_id);
        if let Some(page) = page
            && let Err(e) = page.close().await
        {
            debug!(session_id, error = %e, "Failed to close session tab");
        }
    }

    /// Close every tab, shut the browser down and remove its profile.
    pub async fn close(mut self) -> Result<()> {
        let pages: Vec<Page> = self.sessions.lock().await.drain().map(|(_, p)| p).collect();
        for page in pages {
            let _ = page.close().await;
        }

        {
            let browser = self.browser.get_mut();
            if let Err(e) = browser.close().await {
                warn!(error = %e, "Browser close failed");
            }
            if let Err(e) = browser.wait().await {
                warn!(error = %e, "Waiting for browser exit failed");
            }
        }

        self.handler.abort();
        self.cleanup_temp_dir();
        Ok(())
    }

    /// Remove the browser profile directory.
    ///
    /// MUST be called after the browser exited so that Chrome released its
    /// file handles.
    fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            info!("Cleaning up temp directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to clean up temp directory {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }

    async fn new_blank_page(&self) -> FetchResult<Page> {
        self.browser
            .lock()
            .await
            .new_page("about:blank")
            .await
            .map_err(|e| CrawlError::Browser(format!("Failed to create page: {e}")))
    }

    async fn session_page(&self, session_id: &str) -> FetchResult<Page> {
        let mut sessions = self.sessions.lock().await;
        if let Some(page) = sessions.get(session_id) {
            return Ok(page.clone());
        }

        let page = self.new_blank_page().await?;
        debug!(session_id, "Opened session tab");
        sessions.insert(session_id.to_string(), page.clone());
        Ok(page)
    }

    async fn navigate(&self, page: &Page, url: &str) -> FetchResult<FetchedPage> {
        if self.verbose {
            info!(url, "Navigating");
        }

        with_page_timeout(
            async {
                page.goto(url)
                    .await
                    .map_err(|e| CrawlError::Navigation {
                        url: url.to_string(),
                        message: e.to_string(),
                    })?;
                page.wait_for_navigation()
                    .await
                    .map_err(|e| CrawlError::Navigation {
                        url: url.to_string(),
                        message: e.to_string(),
                    })?;
                Ok(())
            },
            self.page_load_timeout_secs,
            "page.goto()",
        )
        .await?;

        let html = page
            .content()
            .await
            .map_err(|e| CrawlError::Browser(format!("Failed to read page content: {e}")))?;

        let final_url = match page.url().await {
            Ok(Some(current)) => current,
            _ => url.to_string(),
        };

        Ok(FetchedPage {
            url: final_url,
            html,
            status_code: None,
        })
    }
}

impl PageFetcher for ChromiumFetcher {
    async fn fetch(&self, url: &str, session_id: Option<&str>) -> FetchResult<FetchedPage> {
        match session_id {
            Some(id) => {
                let page = self.session_page(id).await?;
                self.navigate(&page, url).await
            }
            None => {
                let page = self.new_blank_page().await?;
                let result = self.navigate(&page, url).await;
                if let Err(e) = page.close().await {
                    debug!(url, error = %e, "Failed to close tab");
                }
                result
            }
        }
    }
}

impl Drop for ChromiumFetcher {
    fn drop(&mut self) {
        self.handler.abort();
        // Browser::drop() kills the Chrome process; remove the profile as fallback
        if self.user_data_dir.is_some() {
            warn!("ChromiumFetcher dropped without close() - removing temp dir in Drop");
            self.cleanup_temp_dir();
        }
    }
}
