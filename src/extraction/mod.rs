//! LLM-backed structured extraction
//!
//! Turns page content into JSON records by prompting an OpenAI-compatible
//! chat-completion endpoint with an instruction and a JSON schema.

pub mod client;
pub mod error;
pub mod parsing;
pub mod provider;
pub mod strategy;
pub mod usage;

pub use client::{ChatCompletion, ChatRequest, LlmClient, Message};
pub use error::{ExtractionError, ExtractionResult};
pub use parsing::parse_blocks;
pub use provider::{Provider, ProviderSpec};
pub use strategy::{
    ExtractionType, InputFormat, LlmExtractionStrategy, LlmExtractionStrategyBuilder, chunk_content,
};
pub use usage::TokenUsage;
