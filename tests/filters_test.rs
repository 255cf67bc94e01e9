//! Completeness and duplicate filters

use proptest::prelude::*;
use serde_json::{Map, Value};
use std::collections::HashSet;
use venue_scraper::pipeline::{is_complete_venue, is_duplicate_venue};
use venue_scraper::utils::REQUIRED_KEYS;

mod common;

#[test]
fn full_record_is_complete() {
    let venue = common::record(common::venue("Ada"));
    assert!(is_complete_venue(&venue, &REQUIRED_KEYS));
}

#[test]
fn record_missing_research_interests_is_incomplete() {
    let mut venue = common::record(common::venue("Ada"));
    venue.remove("research_interests");
    assert!(!is_complete_venue(&venue, &REQUIRED_KEYS));
}

#[test]
fn empty_required_keys_accepts_anything() {
    let no_keys: [&str; 0] = [];
    assert!(is_complete_venue(&Map::new(), &no_keys));
}

#[test]
fn duplicate_is_plain_membership() {
    let mut seen = HashSet::new();
    assert!(!is_duplicate_venue("Ada", &seen));
    seen.insert("Ada".to_string());
    assert!(is_duplicate_venue("Ada", &seen));
    assert!(!is_duplicate_venue("ada", &seen));
}

proptest! {
    #[test]
    fn complete_iff_every_key_present(
        present in proptest::collection::hash_set("[a-z]{1,6}", 0..8),
        required in proptest::collection::vec("[a-z]{1,6}", 0..6),
    ) {
        let venue: Map<String, Value> = present
            .iter()
            .map(|k| (k.clone(), Value::Null))
            .collect();
        let expected = required.iter().all(|k| present.contains(k));
        prop_assert_eq!(is_complete_venue(&venue, &required), expected);
    }

    #[test]
    fn inserted_names_are_duplicates(names in proptest::collection::vec(".{0,12}", 1..10)) {
        let seen: HashSet<String> = names.iter().cloned().collect();
        for name in &names {
            prop_assert!(is_duplicate_venue(name, &seen));
        }
    }
}
