use crate::geo::{Coordinate, ORIGIN};
use serde::Deserialize;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Upper bound on how many "next page" links a single search follows
pub const MAX_EXTRA_PAGES: u32 = 10;

/// Main configuration structure for listing-harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default = "default_origin")]
    pub origin: Coordinate,
    #[serde(default, rename = "search")]
    pub searches: Vec<SearchEntryConfig>,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Number of "next page" links to follow after the first page
    #[serde(rename = "max-extra-pages", default = "default_max_extra_pages")]
    pub max_extra_pages: u32,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_extra_pages: MAX_EXTRA_PAGES,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the scraper
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the scraper
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for scraper-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// One search to run and where to write its results
#[derive(Debug, Clone, Deserialize)]
pub struct SearchEntryConfig {
    /// Short label used in logs and with `--only`
    pub name: String,

    /// Search-result URL with its query string already encoded
    pub url: String,

    /// CSV path; `{date}` is replaced with the run date as MMDD
    pub output: String,
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_max_extra_pages() -> u32 {
    MAX_EXTRA_PAGES
}

fn default_origin() -> Coordinate {
    ORIGIN
}
