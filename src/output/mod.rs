//! Output module for harvested listings
//!
//! This module handles:
//! - Writing each search's listings to a CSV file
//! - Recording and printing per-search run statistics

mod csv_output;
pub mod stats;

pub use csv_output::{resolve_output_path, write_listings_csv, CSV_HEADERS, DATE_PLACEHOLDER};
pub use stats::{format_statistics, print_statistics, RunReport, SearchReport};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
