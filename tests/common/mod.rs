//! Test doubles and helpers shared by the venue_scraper test suite

#![allow(dead_code)]

use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use venue_scraper::crawl_engine::{
    CacheMode, CrawlError, CrawlResult, CrawlerRunConfig, FetchResult, FetchedPage, PageFetcher,
    WebCrawler,
};
use venue_scraper::extraction::LlmExtractionStrategy;
use venue_scraper::models::VenueRecord;

/// What the mock crawler serves for one URL.
#[allow(dead_code)]
#[derive(Clone)]
pub enum MockPage {
    /// A loaded page; `extracted` is returned when the run carries a strategy
    Loaded {
        cleaned_html: String,
        extracted: Option<String>,
    },
    Failed(String),
}

/// One recorded `arun` call.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub url: String,
    pub cache_mode: CacheMode,
    pub css_selector: Option<String>,
    pub session_id: Option<String>,
    pub with_strategy: bool,
}

/// `WebCrawler` answering from a URL map and recording every call.
///
/// Unknown URLs produce a failed result.
#[derive(Default)]
pub struct MockCrawler {
    pages: HashMap<String, MockPage>,
    runs: Mutex<Vec<RecordedRun>>,
}

#[allow(dead_code)]
impl MockCrawler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, cleaned_html: &str, extracted: Option<&str>) -> Self {
        self.pages.insert(
            url.into(),
            MockPage::Loaded {
                cleaned_html: cleaned_html.to_string(),
                extracted: extracted.map(str::to_string),
            },
        );
        self
    }

    pub fn failing(mut self, url: impl Into<String>, message: &str) -> Self {
        self.pages.insert(url.into(), MockPage::Failed(message.to_string()));
        self
    }

    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs.lock().unwrap().clone()
    }

    /// Runs that asked for extraction, i.e. page fetches rather than checks.
    pub fn extraction_runs(&self) -> Vec<RecordedRun> {
        self.runs().into_iter().filter(|r| r.with_strategy).collect()
    }
}

impl WebCrawler for MockCrawler {
    async fn arun(&self, url: &str, config: &CrawlerRunConfig) -> CrawlResult {
        let with_strategy = config.extraction_strategy.is_some();
        self.runs.lock().unwrap().push(RecordedRun {
            url: url.to_string(),
            cache_mode: config.cache_mode,
            css_selector: config.css_selector.clone(),
            session_id: config.session_id.clone(),
            with_strategy,
        });

        match self.pages.get(url) {
            Some(MockPage::Loaded {
                cleaned_html,
                extracted,
            }) => CrawlResult {
                url: url.to_string(),
                success: true,
                html: cleaned_html.clone(),
                cleaned_html: cleaned_html.clone(),
                extracted_content: if with_strategy { extracted.clone() } else { None },
                session_id: config.session_id.clone(),
                ..CrawlResult::default()
            },
            Some(MockPage::Failed(message)) => CrawlResult::failure(
                url,
                config.session_id.clone(),
                &CrawlError::Browser(message.clone()),
            ),
            None => CrawlResult::failure(
                url,
                config.session_id.clone(),
                &CrawlError::Navigation {
                    url: url.to_string(),
                    message: "unknown url".into(),
                },
            ),
        }
    }
}

/// `PageFetcher` serving fixed HTML and counting fetches.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    fetches: AtomicUsize,
}

#[allow(dead_code)]
impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str, _session_id: Option<&str>) -> FetchResult<FetchedPage> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .map(|html| FetchedPage {
                url: url.to_string(),
                html: html.clone(),
                status_code: Some(200),
            })
            .ok_or_else(|| CrawlError::Navigation {
                url: url.to_string(),
                message: "404".into(),
            })
    }
}

/// Strategy pointed at `base_url`; the local provider needs no credential.
#[allow(dead_code)]
pub fn test_strategy(base_url: &str) -> Arc<LlmExtractionStrategy> {
    Arc::new(
        venue_scraper::config::llm_strategy_builder("ollama/llama3", None)
            .base_url(base_url)
            .verbose(false)
            .build()
            .unwrap(),
    )
}

/// Strategy for tests that never reach the LLM.
#[allow(dead_code)]
pub fn unused_strategy() -> Arc<LlmExtractionStrategy> {
    test_strategy("http://127.0.0.1:9")
}

#[allow(dead_code)]
pub fn venue(name: &str) -> Value {
    json!({
        "name": name,
        "title": "PhD Student",
        "study_program": "Computer Science",
        "research_interests": "Systems",
        "error": false
    })
}

#[allow(dead_code)]
pub fn record(value: Value) -> VenueRecord {
    value.as_object().cloned().unwrap()
}

/// Body of an OpenAI-style chat completion whose message is `content`.
#[allow(dead_code)]
pub fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 120, "completion_tokens": 30, "total_tokens": 150}
    })
    .to_string()
}
