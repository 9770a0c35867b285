//! listing-harvest: a classifieds search scraper
//!
//! This crate fetches search-result pages from a classifieds site, reads
//! each listing and its detail page, follows pagination up to a fixed bound,
//! and writes one CSV file per search.

pub mod config;
pub mod geo;
pub mod listing;
pub mod output;
pub mod scrape;

use thiserror::Error;

/// Main error type for listing-harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Coordinate error: {0}")]
    Geo(#[from] GeoError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Network failures while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },
}

/// Markup that does not have the expected shape
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Missing element: {element}")]
    MissingElement { element: &'static str },

    #[error("Missing attribute '{attribute}' on {element}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Malformed {field}: '{value}'")]
    MalformedField { field: &'static str, value: String },

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Coordinate input errors
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Invalid coordinate value: '{value}'")]
    InvalidInput { value: String },
}

// Re-export commonly used types
pub use config::Config;
pub use geo::{distance_from_origin, distance_from_origin_str, Coordinate, DistanceCalculator};
pub use listing::Listing;
pub use scrape::{run_harvest, Harvester, StopReason};
