//! Fetching one page and filtering the extracted venues

use serde_json::json;
use std::collections::HashSet;
use venue_scraper::crawl_engine::CacheMode;
use venue_scraper::pipeline::fetch_and_process_page;
use venue_scraper::utils::REQUIRED_KEYS;

mod common;
use common::{MockCrawler, unused_strategy, venue};

const BASE: &str = "https://listing.test/venues";
const PAGE_1: &str = "https://listing.test/venues?page=1";

fn extracted(items: &[serde_json::Value]) -> String {
    serde_json::Value::Array(items.to_vec()).to_string()
}

#[tokio::test]
async fn accepts_complete_venue_and_strips_error_flag() {
    let content = extracted(&[venue("A")]);
    let crawler = MockCrawler::new().page(PAGE_1, "<ul></ul>", Some(&content));
    let strategy = unused_strategy();
    let mut seen = HashSet::new();

    let batch = fetch_and_process_page(
        &crawler,
        1,
        BASE,
        Some("div.person"),
        &strategy,
        "session",
        &REQUIRED_KEYS,
        &mut seen,
    )
    .await;

    assert!(!batch.no_more_pages);
    assert_eq!(batch.venues.len(), 1);
    assert!(!batch.venues[0].contains_key("error"));
    assert_eq!(batch.venues[0]["name"], json!("A"));
    assert!(seen.contains("A"));

    let runs = crawler.runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].url, PAGE_1);
    assert_eq!(runs[0].cache_mode, CacheMode::Bypass);
    assert_eq!(runs[0].css_selector.as_deref(), Some("div.person"));
    assert_eq!(runs[0].session_id.as_deref(), Some("session"));
    assert!(runs[0].with_strategy);
}

#[tokio::test]
async fn second_call_with_same_name_is_a_duplicate() {
    let content = extracted(&[venue("A")]);
    let crawler = MockCrawler::new().page(PAGE_1, "<ul></ul>", Some(&content));
    let strategy = unused_strategy();
    let mut seen = HashSet::new();

    let first = fetch_and_process_page(
        &crawler, 1, BASE, None, &strategy, "session", &REQUIRED_KEYS, &mut seen,
    )
    .await;
    let second = fetch_and_process_page(
        &crawler, 1, BASE, None, &strategy, "session", &REQUIRED_KEYS, &mut seen,
    )
    .await;

    assert_eq!(first.venues.len(), 1);
    assert!(second.venues.is_empty());
    assert!(!second.no_more_pages);
    assert_eq!(seen.len(), 1);
}

#[tokio::test]
async fn duplicates_within_one_page_keep_the_first() {
    let mut later = venue("A");
    later["title"] = json!("Postdoc");
    let content = extracted(&[venue("A"), later, venue("B")]);
    let crawler = MockCrawler::new().page(PAGE_1, "", Some(&content));
    let mut seen = HashSet::new();

    let batch = fetch_and_process_page(
        &crawler, 1, BASE, None, &unused_strategy(), "s", &REQUIRED_KEYS, &mut seen,
    )
    .await;

    assert_eq!(batch.venues.len(), 2);
    assert_eq!(batch.venues[0]["title"], json!("PhD Student"));
    assert_eq!(batch.venues[1]["name"], json!("B"));
}

#[tokio::test]
async fn incomplete_and_malformed_items_are_skipped() {
    let content = extracted(&[
        json!({"name": "NoTitle", "study_program": "CS", "research_interests": "AI"}),
        json!("not an object"),
        json!({"name": 42, "title": "T", "study_program": "CS", "research_interests": "AI"}),
        venue("Kept"),
    ]);
    let crawler = MockCrawler::new().page(PAGE_1, "", Some(&content));
    let mut seen = HashSet::new();

    let batch = fetch_and_process_page(
        &crawler, 1, BASE, None, &unused_strategy(), "s", &REQUIRED_KEYS, &mut seen,
    )
    .await;

    assert_eq!(batch.venues.len(), 1);
    assert_eq!(batch.venues[0]["name"], json!("Kept"));
    assert!(!batch.no_more_pages);
    assert_eq!(seen, HashSet::from(["Kept".to_string()]));
}

#[tokio::test]
async fn error_flag_other_than_false_is_kept() {
    let mut flagged = venue("A");
    flagged["error"] = json!(true);
    let content = extracted(&[flagged]);
    let crawler = MockCrawler::new().page(PAGE_1, "", Some(&content));
    let mut seen = HashSet::new();

    let batch = fetch_and_process_page(
        &crawler, 1, BASE, None, &unused_strategy(), "s", &REQUIRED_KEYS, &mut seen,
    )
    .await;

    assert_eq!(batch.venues.len(), 1);
    assert_eq!(batch.venues[0]["error"], json!(true));
}

#[tokio::test]
async fn failed_fetch_yields_empty_batch_without_stop_signal() {
    let crawler = MockCrawler::new().failing(PAGE_1, "navigation timeout");
    let mut seen = HashSet::new();

    let batch = fetch_and_process_page(
        &crawler, 1, BASE, None, &unused_strategy(), "s", &REQUIRED_KEYS, &mut seen,
    )
    .await;

    assert!(batch.venues.is_empty());
    assert!(!batch.no_more_pages);
    assert!(seen.is_empty());
}

#[tokio::test]
async fn missing_extracted_content_yields_empty_batch() {
    let crawler = MockCrawler::new().page(PAGE_1, "<p></p>", None);
    let mut seen = HashSet::new();

    let batch = fetch_and_process_page(
        &crawler, 1, BASE, None, &unused_strategy(), "s", &REQUIRED_KEYS, &mut seen,
    )
    .await;

    assert!(batch.venues.is_empty());
    assert!(!batch.no_more_pages);
}

#[tokio::test]
async fn unparsable_content_yields_empty_batch() {
    let crawler = MockCrawler::new().page(PAGE_1, "", Some("{not json"));
    let mut seen = HashSet::new();

    let batch = fetch_and_process_page(
        &crawler, 1, BASE, None, &unused_strategy(), "s", &REQUIRED_KEYS, &mut seen,
    )
    .await;

    assert!(batch.venues.is_empty());
    assert!(!batch.no_more_pages);
}

#[tokio::test]
async fn empty_extraction_signals_no_more_pages() {
    let crawler = MockCrawler::new().page(PAGE_1, "<ul></ul>", Some("[]"));
    let mut seen = HashSet::new();

    let batch = fetch_and_process_page(
        &crawler, 1, BASE, None, &unused_strategy(), "s", &REQUIRED_KEYS, &mut seen,
    )
    .await;

    assert!(batch.venues.is_empty());
    assert!(batch.no_more_pages);
}

#[tokio::test]
async fn all_filtered_out_is_not_a_stop_signal() {
    let content = extracted(&[json!({"name": "Only"})]);
    let crawler = MockCrawler::new().page(PAGE_1, "", Some(&content));
    let mut seen = HashSet::new();

    let batch = fetch_and_process_page(
        &crawler, 1, BASE, None, &unused_strategy(), "s", &REQUIRED_KEYS, &mut seen,
    )
    .await;

    assert!(batch.venues.is_empty());
    assert!(!batch.no_more_pages);
}

#[tokio::test]
async fn page_number_is_placed_into_template() {
    let url = "https://listing.test/venues/3/";
    let content = extracted(&[venue("C")]);
    let crawler = MockCrawler::new().page(url, "", Some(&content));
    let mut seen = HashSet::new();

    let batch = fetch_and_process_page(
        &crawler,
        3,
        "https://listing.test/venues/{page}/",
        None,
        &unused_strategy(),
        "s",
        &REQUIRED_KEYS,
        &mut seen,
    )
    .await;

    assert_eq!(crawler.runs()[0].url, url);
    assert_eq!(batch.venues.len(), 1);
}
