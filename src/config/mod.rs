//! Configuration module
//!
//! Browser settings, the typestate-built `ScrapeConfig` describing one
//! scraping run, and the providers that assemble the default browser and
//! extraction configurations.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod providers;
pub mod types;

// Re-exports for public API
pub use builder::{ScrapeConfigBuilder, WithBaseUrl};
pub use providers::{
    api_key_from_env, get_browser_config, get_llm_strategy, llm_strategy_builder, venue_instruction,
};
pub use types::{BrowserConfig, BrowserType, ScrapeConfig};
