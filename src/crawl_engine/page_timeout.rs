//! Timeout utilities for page operations
//!
//! Provides async timeout wrappers to prevent indefinite hangs during
//! page navigation, loading, and other browser operations.

use std::future::Future;
use std::time::Duration;

use super::crawl_types::{CrawlError, FetchResult};

/// Wrap an async page operation with an explicit timeout
///
/// Distinguishes between the operation failing (its own error is returned)
/// and the deadline passing (`CrawlError::Timeout`).
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout_secs: u64,
    operation_name: &str,
) -> FetchResult<T>
where
    F: Future<Output = FetchResult<T>>,
{
    match tokio::time::timeout(Duration::from_secs(timeout_secs), operation).await {
        Ok(result) => result,
        Err(_) => Err(CrawlError::Timeout {
            operation: operation_name.to_string(),
            secs: timeout_secs,
        }),
    }
}
