//! Configuration module for listing-harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use listing_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! for search in &config.searches {
//!     println!("{} -> {}", search.url, search.output);
//! }
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, ScraperConfig, SearchEntryConfig, UserAgentConfig, DEFAULT_REQUEST_TIMEOUT,
    MAX_EXTRA_PAGES,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
