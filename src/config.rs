// Runtime configuration.
// Passed explicitly down the call chain; nothing here is global.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::DEFAULT_CACHE_DIR;

/// Default portal root. Relative links in pages resolve against it.
pub const DEFAULT_BASE_URL: &str = "https://suis.sabanciuniv.edu";

/// Default directory for JSON output.
pub const DEFAULT_OUT_DIR: &str = "out";

/// Maximum concurrent course detail fetches.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Retry schedule for a single network request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts before the error is returned.
    pub max_attempts: u32,
    /// Delay after failed attempt `n` is `n * backoff_unit`.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff_unit: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Linear backoff; `attempt` counts from 1.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_unit * attempt
    }
}

/// Soft retry for a term list that parses to zero terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermListRetry {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for TermListRetry {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(60),
        }
    }
}

/// Everything a fetch run needs to know.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub cache_dir: PathBuf,
    pub out_dir: PathBuf,
    pub concurrency: usize,
    pub retry: RetryPolicy,
    pub term_list_retry: TermListRetry,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            retry: RetryPolicy::default(),
            term_list_retry: TermListRetry::default(),
        }
    }
}
