//! Shared configuration constants for venue_scraper
//!
//! Default values used by the config builders and providers so that the
//! binary, the library and the tests agree on them.

/// Default LLM provider, in `<provider>/<model>` form.
pub const DEFAULT_PROVIDER: &str = "groq/deepseek-r1-distill-llama-70b";

/// Environment variable holding the LLM API credential.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Environment variable that may point at the browser binary.
pub const BROWSER_PATH_ENV: &str = "CHROMIUM_PATH";

/// Environment variable that may hold the listing base URL.
pub const BASE_URL_ENV: &str = "VENUE_BASE_URL";

/// Session id shared by every page fetch of one run.
///
/// Reusing the id keeps a single browser tab (cookies, local storage)
/// alive across pages.
pub const DEFAULT_SESSION_ID: &str = "venue_crawl_session";

/// Literal marker a listing page shows once pagination ran past the end.
pub const NO_RESULTS_MARKER: &str = "No Results Found";

/// Fields every accepted venue record must carry.
pub const REQUIRED_KEYS: [&str; 4] = ["name", "title", "study_program", "research_interests"];

/// Delay between two page fetches: 2 seconds
pub const DEFAULT_PAGE_DELAY_MS: u64 = 2_000;

/// Default output file for the accumulated venues.
pub const DEFAULT_OUTPUT_FILE: &str = "complete_venues.json";

/// Timeout for `page.goto()` and the following navigation wait: 30 seconds
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 30;

/// Chunk size for LLM extraction, in estimated tokens
///
/// Content larger than this is split and every chunk is sent as its own
/// request.
pub const DEFAULT_CHUNK_TOKEN_THRESHOLD: usize = 2048;

/// Fraction of a chunk repeated at the start of the next one.
pub const DEFAULT_OVERLAP_RATE: f64 = 0.1;

/// Estimated tokens per whitespace-separated word.
pub const WORD_TOKEN_RATE: f64 = 0.75;

/// Timeout for one chat-completion request: 120 seconds
///
/// Reasoning models routinely need more than a minute for a long chunk.
pub const LLM_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Chrome user agent string for stealth mode
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
