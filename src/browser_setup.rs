//! Starting the Chromium instance the fetcher drives.
//!
//! The binary comes from `BrowserConfig::executable_path` when set. Otherwise
//! chromiumoxide looks for an installed Chrome or Chromium, and when it finds
//! none a managed Chromium is downloaded into the user cache directory.

use anyhow::{Context, Result, anyhow, bail};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::BrowserConfig;

/// Flags passed to every launch, besides the user agent.
const LAUNCH_FLAGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-background-networking",
    "--disable-extensions",
    "--disable-notifications",
    "--disable-popup-blocking",
    "--no-first-run",
    "--no-default-browser-check",
    "--no-sandbox",
    "--password-store=basic",
    "--use-mock-keychain",
    "--mute-audio",
];

/// Validate the configured executable.
///
/// `Ok(None)` means "let chromiumoxide detect one".
///
/// # Errors
///
/// A configured path that does not exist.
pub fn configured_executable(config: &BrowserConfig) -> Result<Option<PathBuf>> {
    match config.executable_path() {
        Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
        Some(path) => bail!(
            "Configured {} executable {} does not exist",
            config.browser_type(),
            path.display()
        ),
        None => Ok(None),
    }
}

/// Command line flags for `config`.
#[must_use]
pub fn launch_args(config: &BrowserConfig) -> Vec<String> {
    let mut args = vec![format!("--user-agent={}", config.user_agent())];
    args.extend(LAUNCH_FLAGS.iter().map(|flag| (*flag).to_string()));
    args
}

/// Download Chromium into `<cache dir>/venue_scraper/chromium` and return
/// the path of its executable.
///
/// # Errors
///
/// The cache directory cannot be created or the download fails.
pub async fn download_managed_browser() -> Result<PathBuf> {
    let install_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("venue_scraper")
        .join("chromium");
    tokio::fs::create_dir_all(&install_dir)
        .await
        .with_context(|| format!("Failed to create {}", install_dir.display()))?;

    info!(dir = %install_dir.display(), "No local browser found, downloading Chromium");

    let options = BrowserFetcherOptions::builder()
        .with_path(&install_dir)
        .build()
        .context("Invalid browser fetcher options")?;
    let installation = BrowserFetcher::new(options)
        .fetch()
        .await
        .context("Chromium download failed")?;

    info!(executable = %installation.executable_path.display(), "Chromium installed");
    Ok(installation.executable_path)
}

fn launch_config(
    config: &BrowserConfig,
    executable: Option<&Path>,
    user_data_dir: &Path,
) -> std::result::Result<chromiumoxide::BrowserConfig, String> {
    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(Duration::from_secs(config.page_load_timeout_secs()))
        .window_size(1920, 1080)
        .user_data_dir(user_data_dir)
        .args(launch_args(config));

    builder = if config.headless() {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };

    if let Some(path) = executable {
        builder = builder.chrome_executable(path);
    }
    builder.build()
}

/// Launch the browser described by `config`.
///
/// Returns the browser, the task polling its CDP event stream, and the user
/// data directory to remove once the browser has exited.
///
/// # Errors
///
/// An invalid executable, a failed download, or a browser that does not start.
pub async fn launch_browser(config: &BrowserConfig) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    let user_data_dir = config.user_data_dir().map_or_else(
        || std::env::temp_dir().join(format!("venue_scraper_chrome_{}", std::process::id())),
        Path::to_path_buf,
    );
    std::fs::create_dir_all(&user_data_dir)
        .with_context(|| format!("Failed to create {}", user_data_dir.display()))?;

    let explicit = configured_executable(config)?;
    let launch = match launch_config(config, explicit.as_deref(), &user_data_dir) {
        Ok(launch) => launch,
        Err(e) if explicit.is_none() => {
            debug!(error = %e, "Browser auto-detection failed");
            let downloaded = download_managed_browser().await?;
            launch_config(config, Some(&downloaded), &user_data_dir)
                .map_err(|e| anyhow!("Invalid browser launch config: {e}"))?
        }
        Err(e) => return Err(anyhow!("Invalid browser launch config: {e}")),
    };

    info!(
        browser = %config.browser_type(),
        headless = config.headless(),
        profile = %user_data_dir.display(),
        "Launching browser"
    );
    let (browser, mut events) = Browser::launch(launch)
        .await
        .context("Browser failed to start")?;

    let handler = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let Err(e) = event else { continue };
            let message = e.to_string();
            // CDP messages chromiumoxide has no type for fail to deserialize
            if message.contains("did not match any variant") || message.contains("deserialize") {
                debug!(error = %message, "Ignoring unmodelled CDP message");
            } else {
                error!(error = %message, "CDP handler error");
            }
        }
        warn!("CDP event stream closed");
    });

    Ok((browser, handler, user_data_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_executable_defers_to_detection() {
        assert!(configured_executable(&BrowserConfig::default()).unwrap().is_none());
    }

    #[test]
    fn missing_executable_is_an_error() {
        let config =
            BrowserConfig::default().with_executable_path(Some("/nonexistent/chromium".into()));
        let err = configured_executable(&config).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/chromium"));
    }

    #[test]
    fn existing_executable_is_used() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config =
            BrowserConfig::default().with_executable_path(Some(file.path().to_path_buf()));
        assert_eq!(
            configured_executable(&config).unwrap().as_deref(),
            Some(file.path())
        );
    }

    #[test]
    fn user_agent_leads_the_launch_flags() {
        let config = BrowserConfig::default().with_user_agent("test-agent/1.0");
        let args = launch_args(&config);
        assert_eq!(args[0], "--user-agent=test-agent/1.0");
        assert!(args.iter().any(|a| a == "--no-first-run"));
    }
}
