//! Token accounting across extraction requests.

use std::ops::AddAssign;

/// Tokens consumed by one or more completion requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub requests: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        self.requests += rhs.requests;
        self.prompt_tokens += rhs.prompt_tokens;
        self.completion_tokens += rhs.completion_tokens;
        self.total_tokens += rhs.total_tokens;
    }
}

impl TokenUsage {
    /// Log the totals.
    pub fn log_summary(&self) {
        tracing::info!(
            requests = self.requests,
            prompt_tokens = self.prompt_tokens,
            completion_tokens = self.completion_tokens,
            total_tokens = self.total_tokens,
            "LLM token usage"
        );
    }
}
