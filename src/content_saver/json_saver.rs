use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;

use crate::models::VenueRecord;

/// Timeout for blocking JSON serialization
/// Prevents hangs on pathological data structures
const BLOCKING_SERIALIZATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Save accepted venues as a pretty-printed JSON array
pub async fn save_venues(venues: &[VenueRecord], path: &Path) -> Result<()> {
    let data = serde_json::Value::Array(
        venues
            .iter()
            .cloned()
            .map(serde_json::Value::Object)
            .collect(),
    );

    // JSON serialization (keep spawn_blocking - CPU intensive)
    let blocking_task = tokio::task::spawn_blocking(move || serde_json::to_string_pretty(&data));

    let json_str = match timeout(BLOCKING_SERIALIZATION_TIMEOUT, blocking_task).await {
        Ok(Ok(result)) => result?,
        Ok(Err(e)) => return Err(anyhow::anyhow!("JSON serialization task panicked: {e}")),
        Err(_) => {
            tracing::warn!(
                "JSON serialization timeout (timeout: {:?})",
                BLOCKING_SERIALIZATION_TIMEOUT
            );
            return Err(anyhow::anyhow!(
                "JSON serialization timed out after {BLOCKING_SERIALIZATION_TIMEOUT:?}"
            ));
        }
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    tokio::fs::write(path, json_str)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(count = venues.len(), path = %path.display(), "Saved venues");
    Ok(())
}
