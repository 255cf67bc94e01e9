//! Default browser and extraction configurations for the venue crawl.

use super::types::{BrowserConfig, BrowserType};
use crate::extraction::{
    ExtractionResult, ExtractionType, InputFormat, LlmExtractionStrategy,
    LlmExtractionStrategyBuilder,
};
use crate::models::venue_schema;
use crate::utils::{API_KEY_ENV, DEFAULT_PROVIDER};

/// Visible Chromium window with verbose progress logging.
#[must_use]
pub fn get_browser_config() -> BrowserConfig {
    BrowserConfig::default()
        .with_browser_type(BrowserType::Chromium)
        .with_headless(false)
        .with_verbose(true)
}

/// Instruction sent with every extraction request.
#[must_use]
pub fn venue_instruction() -> &'static str {
    "Extract all venues objects with 'name', 'title', 'study_program', and \
     'research_interests' from the following content. Return as a JSON array."
}

/// Read the API credential, treating an empty value as unset.
#[must_use]
pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
}

/// Venue extraction preset for an arbitrary provider and credential.
#[must_use]
pub fn llm_strategy_builder(
    provider: &str,
    api_token: Option<String>,
) -> LlmExtractionStrategyBuilder {
    LlmExtractionStrategy::builder(provider)
        .api_token(api_token)
        .schema(venue_schema())
        .extraction_type(ExtractionType::Schema)
        .instruction(venue_instruction())
        .input_format(InputFormat::Markdown)
        .verbose(true)
}

/// Venue extraction with the default provider and the credential from the
/// environment.
///
/// # Errors
///
/// Fails when the credential is missing.
pub fn get_llm_strategy() -> ExtractionResult<LlmExtractionStrategy> {
    llm_strategy_builder(DEFAULT_PROVIDER, api_key_from_env()).build()
}
