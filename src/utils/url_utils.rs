//! URL utilities for paginated listings.

use url::Url;

/// Placeholder substituted with the page number in templated base URLs.
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Build the URL of a listing page.
///
/// A base URL containing `{page}` is treated as a template. Otherwise the
/// `page` query parameter is set, replacing any existing one, while the other
/// parameters are kept byte for byte. A base URL that does not parse is
/// returned unchanged.
#[must_use]
pub fn page_url(base_url: &str, page: u32) -> String {
    if base_url.contains(PAGE_PLACEHOLDER) {
        return base_url.replace(PAGE_PLACEHOLDER, &page.to_string());
    }

    let Ok(mut url) = Url::parse(base_url) else {
        tracing::debug!(base_url, "Base URL does not parse, using it as is");
        return base_url.to_string();
    };

    let page_pair = format!("page={page}");
    let query = url
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && pair.split('=').next() != Some("page"))
        .chain(std::iter::once(page_pair.as_str()))
        .collect::<Vec<_>>()
        .join("&");
    url.set_query(Some(&query));

    url.to_string()
}

/// Check if a URL is valid
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
