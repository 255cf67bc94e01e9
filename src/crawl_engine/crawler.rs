use tracing::warn;

use super::crawl_types::{
    CrawlError, CrawlResult, CrawlerRunConfig, FetchResult, PageFetcher, WebCrawler,
};
use crate::content_saver::{clean_html, html_to_markdown, select_css};
use crate::extraction::InputFormat;

/// Crawler that loads pages through a [`PageFetcher`] and post-processes them.
///
/// Each run goes fetch, clean, CSS scope, markdown, and optionally LLM
/// extraction. Every run fetches the page again. Runs never return an error;
/// a failing step produces a result with `success == false`.
pub struct AsyncWebCrawler<F> {
    fetcher: F,
}

impl<F: PageFetcher> AsyncWebCrawler<F> {
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Give the fetcher back, e.g. to shut the browser down.
    pub fn into_fetcher(self) -> F {
        self.fetcher
    }

    async fn run(&self, url: &str, config: &CrawlerRunConfig) -> FetchResult<CrawlResult> {
        let page = self
            .fetcher
            .fetch(url, config.session_id.as_deref())
            .await?;

        let cleaned = clean_html(&page.html);
        let cleaned_html = match &config.css_selector {
            Some(selector) => select_css(&cleaned, selector)
                .map_err(|e| CrawlError::Selector(format!("{e:#}")))?,
            None => cleaned,
        };
        let markdown = html_to_markdown(&cleaned_html)?;

        let extracted_content = match &config.extraction_strategy {
            Some(strategy) => {
                let input = match strategy.input_format() {
                    InputFormat::Markdown => markdown.as_str(),
                    InputFormat::CleanedHtml => cleaned_html.as_str(),
                    InputFormat::Html => page.html.as_str(),
                };
                let blocks = strategy.extract(&page.url, input).await?;
                let json = serde_json::to_string(&blocks)
                    .map_err(|e| CrawlError::Content(format!("Failed to serialize blocks: {e}")))?;
                Some(json)
            }
            None => None,
        };

        Ok(CrawlResult {
            url: page.url,
            success: true,
            status_code: page.status_code,
            html: page.html,
            cleaned_html,
            markdown,
            extracted_content,
            error_message: None,
            session_id: config.session_id.clone(),
        })
    }
}

impl<F: PageFetcher> WebCrawler for AsyncWebCrawler<F> {
    async fn arun(&self, url: &str, config: &CrawlerRunConfig) -> CrawlResult {
        match self.run(url, config).await {
            Ok(result) => result,
            Err(e) => {
                warn!(url, error = %e, "Crawl failed");
                CrawlResult::failure(url, config.session_id.clone(), &e)
            }
        }
    }
}
