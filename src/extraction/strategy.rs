//! The LLM extraction strategy
//!
//! Holds everything needed to turn page content into records: provider and
//! credential, the JSON schema, the natural-language instruction and the
//! content format to feed the model. Content that exceeds the chunk budget
//! is split and every chunk becomes one completion request, sent one after
//! the other.

use serde_json::Value;
use std::fmt::Write;
use std::sync::Mutex;
use tracing::{debug, info};

use super::client::{ChatRequest, LlmClient, Message};
use super::error::{ExtractionError, ExtractionResult};
use super::parsing::parse_blocks;
use super::provider::ProviderSpec;
use super::usage::TokenUsage;
use crate::utils::{DEFAULT_CHUNK_TOKEN_THRESHOLD, DEFAULT_OVERLAP_RATE, WORD_TOKEN_RATE};

/// What the model is asked to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionType {
    /// Objects matching the configured JSON schema
    #[default]
    Schema,
    /// Free-form semantic blocks (`index`, `tags`, `content`)
    Block,
}

/// Which rendition of the page is sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    #[default]
    Markdown,
    Html,
    CleanedHtml,
}

const SYSTEM_PROMPT: &str = "You extract structured data from web page content. \
Answer with JSON only, wrapped in <blocks></blocks> tags.";

/// Configured LLM extraction with usage accounting.
#[derive(Debug)]
pub struct LlmExtractionStrategy {
    provider: ProviderSpec,
    schema: Option<Value>,
    extraction_type: ExtractionType,
    instruction: String,
    input_format: InputFormat,
    chunk_token_threshold: usize,
    overlap_rate: f64,
    temperature: Option<f32>,
    verbose: bool,
    client: LlmClient,
    usage: Mutex<TokenUsage>,
}

/// Builder for [`LlmExtractionStrategy`]
pub struct LlmExtractionStrategyBuilder {
    provider: String,
    api_token: Option<String>,
    base_url: Option<String>,
    schema: Option<Value>,
    extraction_type: ExtractionType,
    instruction: String,
    input_format: InputFormat,
    chunk_token_threshold: usize,
    overlap_rate: f64,
    temperature: Option<f32>,
    verbose: bool,
}

impl LlmExtractionStrategy {
    /// Start building a strategy for a `<provider>/<model>` identifier.
    #[must_use]
    pub fn builder(provider: impl Into<String>) -> LlmExtractionStrategyBuilder {
        LlmExtractionStrategyBuilder {
            provider: provider.into(),
            api_token: None,
            base_url: None,
            schema: None,
            extraction_type: ExtractionType::default(),
            instruction: String::new(),
            input_format: InputFormat::default(),
            chunk_token_threshold: DEFAULT_CHUNK_TOKEN_THRESHOLD,
            overlap_rate: DEFAULT_OVERLAP_RATE,
            temperature: None,
            verbose: false,
        }
    }

    #[must_use]
    pub fn provider(&self) -> &ProviderSpec {
        &self.provider
    }

    #[must_use]
    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }

    #[must_use]
    pub fn extraction_type(&self) -> ExtractionType {
        self.extraction_type
    }

    #[must_use]
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    #[must_use]
    pub fn input_format(&self) -> InputFormat {
        self.input_format
    }

    #[must_use]
    pub fn chunk_token_threshold(&self) -> usize {
        self.chunk_token_threshold
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Token usage accumulated over every request made so far.
    #[must_use]
    pub fn usage(&self) -> TokenUsage {
        self.usage.lock().map(|u| *u).unwrap_or_default()
    }

    /// Log accumulated token usage.
    pub fn show_usage(&self) {
        self.usage().log_summary();
    }

    /// Extract blocks from `content` fetched from `url`.
    ///
    /// Blank content short-circuits to an empty result without a request.
    /// A chunk whose reply cannot be parsed contributes one error block
    /// rather than failing the whole extraction.
    ///
    /// # Errors
    ///
    /// Any request failure aborts the extraction.
    pub async fn extract(&self, url: &str, content: &str) -> ExtractionResult<Vec<Value>> {
        if content.trim().is_empty() {
            debug!(url, "No content to extract from");
            return Ok(Vec::new());
        }

        let chunks = chunk_content(content, self.chunk_token_threshold, self.overlap_rate);
        if self.verbose {
            info!(url, chunks = chunks.len(), provider = %self.provider, "Running LLM extraction");
        }

        let mut blocks = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let request = ChatRequest::new(&self.provider.model)
                .message(Message::system(SYSTEM_PROMPT))
                .message(Message::user(self.build_prompt(url, chunk)))
                .temperature(self.temperature);

            let completion = self.client.chat_completion(&request).await?;
            self.record_usage(completion.usage);

            let parsed = parse_blocks(&completion.content, index);
            debug!(url, chunk = index, blocks = parsed.len(), "Chunk extracted");
            blocks.extend(parsed);
        }

        if self.verbose {
            info!(url, blocks = blocks.len(), "LLM extraction finished");
        }
        Ok(blocks)
    }

    fn record_usage(&self, usage: Option<TokenUsage>) {
        let usage = usage.unwrap_or(TokenUsage {
            requests: 1,
            ..TokenUsage::default()
        });
        if let Ok(mut total) = self.usage.lock() {
            *total += usage;
        }
    }

    fn build_prompt(&self, url: &str, content: &str) -> String {
        let mut prompt = String::with_capacity(content.len() + 1024);

        let _ = write!(
            prompt,
            "Here is the content from the URL:\n<url>{url}</url>\n\n<url_content>\n{content}\n</url_content>\n\n"
        );

        if !self.instruction.is_empty() {
            let _ = write!(
                prompt,
                "The user has made the following request for what information to extract \
                 from the above content:\n\n<user_request>\n{}\n</user_request>\n\n",
                self.instruction
            );
        }

        match (self.extraction_type, &self.schema) {
            (ExtractionType::Schema, Some(schema)) => {
                let schema_text =
                    serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string());
                let _ = write!(
                    prompt,
                    "<schema_block>\n{schema_text}\n</schema_block>\n\n\
                     Extract every item in the content that matches the schema above. \
                     Return a JSON array of objects that follow the schema exactly, using \
                     the schema's field names. Do not invent values that are not present \
                     in the content. If nothing matches, return an empty array."
                );
            }
            _ => {
                prompt.push_str(
                    "Break the content into semantically coherent blocks. Return a JSON array \
                     where each element has an integer \"index\", a list of short \"tags\" and \
                     a list of \"content\" strings taken verbatim from the page.",
                );
            }
        }

        prompt.push_str("\n\nWrap the JSON array in <blocks></blocks> tags.");
        prompt
    }
}

impl LlmExtractionStrategyBuilder {
    /// API credential; required by every provider except local ones.
    #[must_use]
    pub fn api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Override the provider's default endpoint (proxies, tests).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    #[must_use]
    pub fn extraction_type(mut self, extraction_type: ExtractionType) -> Self {
        self.extraction_type = extraction_type;
        self
    }

    #[must_use]
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    #[must_use]
    pub fn input_format(mut self, input_format: InputFormat) -> Self {
        self.input_format = input_format;
        self
    }

    #[must_use]
    pub fn chunk_token_threshold(mut self, tokens: usize) -> Self {
        self.chunk_token_threshold = tokens;
        self
    }

    #[must_use]
    pub fn overlap_rate(mut self, rate: f64) -> Self {
        self.overlap_rate = rate;
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validate the settings and build the strategy.
    ///
    /// # Errors
    ///
    /// `ExtractionError::Config` for an unknown provider, a missing credential,
    /// a schema extraction without schema, or out-of-range chunk settings.
    pub fn build(self) -> ExtractionResult<LlmExtractionStrategy> {
        let provider: ProviderSpec = self.provider.parse()?;

        if provider.provider.requires_api_key() && self.api_token.is_none() {
            return Err(ExtractionError::Config(format!(
                "Provider '{provider}' requires an API token"
            )));
        }
        if self.extraction_type == ExtractionType::Schema && self.schema.is_none() {
            return Err(ExtractionError::Config(
                "Schema extraction requires a schema".into(),
            ));
        }
        if self.chunk_token_threshold == 0 {
            return Err(ExtractionError::Config(
                "chunk_token_threshold must be greater than zero".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.overlap_rate) {
            return Err(ExtractionError::Config(format!(
                "overlap_rate must be in [0, 1), got {}",
                self.overlap_rate
            )));
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| provider.provider.default_base_url().to_string());
        let client = LlmClient::new(base_url, self.api_token)?;

        Ok(LlmExtractionStrategy {
            provider,
            schema: self.schema,
            extraction_type: self.extraction_type,
            instruction: self.instruction,
            input_format: self.input_format,
            chunk_token_threshold: self.chunk_token_threshold,
            overlap_rate: self.overlap_rate,
            temperature: self.temperature,
            verbose: self.verbose,
            client,
            usage: Mutex::new(TokenUsage::default()),
        })
    }
}

/// Split content into chunks of at most `token_threshold` estimated tokens.
///
/// Content that fits is returned as a single untouched chunk. Larger content
/// is packed line by line so that markdown structure survives; a single line
/// longer than the budget is cut into word windows. Each chunk starts with
/// the trailing lines of the previous one, up to `overlap_rate` of the budget.
#[must_use]
pub fn chunk_content(content: &str, token_threshold: usize, overlap_rate: f64) -> Vec<String> {
    let max_words = ((token_threshold as f64 / WORD_TOKEN_RATE) as usize).max(1);

    if content.split_whitespace().count() <= max_words {
        return vec![content.to_string()];
    }

    let overlap_words = ((max_words as f64 * overlap_rate) as usize).min(max_words - 1);

    let mut chunks = Vec::new();
    let mut current: Vec<(String, usize)> = Vec::new();
    let mut current_words = 0;

    for (segment, words) in line_segments(content, max_words) {
        if current_words > 0 && current_words + words > max_words {
            chunks.push(current.iter().map(|(s, _)| s.as_str()).collect::<String>());

            let mut carried_words = 0;
            let keep = current
                .iter()
                .rev()
                .take_while(|(_, w)| {
                    carried_words += w;
                    carried_words <= overlap_words && carried_words + words <= max_words
                })
                .count();
            current.drain(..current.len() - keep);
            current_words = current.iter().map(|(_, w)| w).sum();
        }

        current_words += words;
        current.push((segment, words));
    }

    if current_words > 0 {
        chunks.push(current.iter().map(|(s, _)| s.as_str()).collect::<String>());
    }
    chunks
}

/// Lines of `content` with their word counts, over-long lines cut into
/// `max_words` windows.
fn line_segments(content: &str, max_words: usize) -> Vec<(String, usize)> {
    let mut segments = Vec::new();
    for line in content.split_inclusive('\n') {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() <= max_words {
            segments.push((line.to_string(), words.len()));
            continue;
        }

        let pieces = words.chunks(max_words).count();
        for (i, piece) in words.chunks(max_words).enumerate() {
            let mut text = piece.join(" ");
            if i + 1 < pieces || line.ends_with('\n') {
                text.push('\n');
            }
            segments.push((text, piece.len()));
        }
    }
    segments
}
