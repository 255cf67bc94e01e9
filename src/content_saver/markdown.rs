//! HTML to markdown conversion.

use anyhow::{Context, Result};
use htmd::HtmlToMarkdown;
use regex::Regex;
use std::sync::LazyLock;

static EXCESS_NEWLINES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n{3,}").expect("EXCESS_NEWLINES_RE: hardcoded regex is valid")
});

/// Convert HTML to markdown, dropping non-content tags.
///
/// Trailing whitespace is removed from every line and runs of blank lines
/// collapse to one.
///
/// # Errors
///
/// Returns an error if the converter fails on the input.
pub fn html_to_markdown(html: &str) -> Result<String> {
    if html.trim().is_empty() {
        return Ok(String::new());
    }

    let converter = HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "noscript", "head", "iframe", "svg"])
        .build();

    let markdown = converter
        .convert(html)
        .context("Failed to convert HTML to markdown")?;

    let trimmed: Vec<&str> = markdown.lines().map(str::trim_end).collect();
    let joined = trimmed.join("\n");
    Ok(EXCESS_NEWLINES_RE
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string())
}
