use std::collections::HashSet;

use crate::models::VenueRecord;

/// True when every required key is present. Values are not inspected.
#[must_use]
pub fn is_complete_venue<K: AsRef<str>>(venue: &VenueRecord, required_keys: &[K]) -> bool {
    required_keys
        .iter()
        .all(|key| venue.contains_key(key.as_ref()))
}

#[must_use]
pub fn is_duplicate_venue(name: &str, seen_names: &HashSet<String>) -> bool {
    seen_names.contains(name)
}
