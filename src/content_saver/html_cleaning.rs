//! HTML cleaning and CSS scoping.
//!
//! Cleaning removes everything that carries no listing content: `<script>`,
//! `<style>`, `<noscript>`, `<iframe>`, `<svg>` and `<template>` elements,
//! HTML comments and inline event handlers. Scoping keeps only the elements
//! matched by a CSS selector.

use anyhow::{Result, anyhow};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

// Compile regex patterns once at first use
// These are hardcoded patterns that will never fail to compile

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("SCRIPT_RE: hardcoded regex is valid")
});

static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("STYLE_RE: hardcoded regex is valid")
});

static NOSCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<noscript[^>]*>.*?</noscript>")
        .expect("NOSCRIPT_RE: hardcoded regex is valid")
});

static IFRAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<iframe[^>]*>.*?</iframe>").expect("IFRAME_RE: hardcoded regex is valid")
});

static SVG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<svg[^>]*>.*?</svg>").expect("SVG_RE: hardcoded regex is valid")
});

static TEMPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<template[^>]*>.*?</template>")
        .expect("TEMPLATE_RE: hardcoded regex is valid")
});

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("COMMENT_RE: hardcoded regex is valid"));

static EVENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s+on[a-z]+\s*=\s*("[^"]*"|'[^']*')"#).expect("EVENT_RE: hardcoded regex is valid")
});

static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n+").expect("BLANK_LINES_RE: hardcoded regex is valid"));

/// Strip non-content elements from raw page HTML.
#[must_use]
pub fn clean_html(html: &str) -> String {
    let mut result = SCRIPT_RE.replace_all(html, "").into_owned();
    for re in [
        &*STYLE_RE,
        &*NOSCRIPT_RE,
        &*IFRAME_RE,
        &*SVG_RE,
        &*TEMPLATE_RE,
        &*COMMENT_RE,
        &*EVENT_RE,
    ] {
        result = re.replace_all(&result, "").into_owned();
    }
    BLANK_LINES_RE.replace_all(&result, "\n").trim().to_string()
}

/// Keep only the elements matching `selector`.
///
/// Every match is serialized in document order and the results are wrapped
/// in a single `<div>`. No match yields an empty string.
///
/// # Errors
///
/// Returns an error if `selector` is not valid CSS.
pub fn select_css(html: &str, selector: &str) -> Result<String> {
    let parsed = Selector::parse(selector)
        .map_err(|e| anyhow!("Invalid CSS selector '{selector}': {e:?}"))?;

    let document = Html::parse_document(html);
    let matches: Vec<String> = document.select(&parsed).map(|el| el.html()).collect();

    if matches.is_empty() {
        tracing::debug!(selector, "CSS selector matched nothing");
        return Ok(String::new());
    }

    Ok(format!("<div>\n{}\n</div>", matches.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_styles_and_comments_are_removed() {
        let html = r#"<html><head><style>p { color: red }</style>
            <script>var x = 1;</script></head>
            <body><!-- hidden --><p onclick="go()">Visible</p></body></html>"#;
        let cleaned = clean_html(html);
        assert!(cleaned.contains("<p>Visible</p>"));
        assert!(!cleaned.contains("color: red"));
        assert!(!cleaned.contains("var x"));
        assert!(!cleaned.contains("hidden"));
        assert!(!cleaned.contains("onclick"));
    }

    #[test]
    fn selector_keeps_every_match() {
        let html = r#"<body><div class="info-container">A</div><p>skip</p>
            <div class="info-container-2">B</div></body>"#;
        let scoped = select_css(html, "[class^='info-container']").unwrap();
        assert!(scoped.contains(">A<"));
        assert!(scoped.contains(">B<"));
        assert!(!scoped.contains("skip"));
    }

    #[test]
    fn selector_without_match_is_empty() {
        assert_eq!(select_css("<p>x</p>", ".missing").unwrap(), "");
    }

    #[test]
    fn invalid_selector_is_an_error() {
        assert!(select_css("<p>x</p>", "[[").is_err());
    }
}
