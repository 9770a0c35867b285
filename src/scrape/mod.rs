//! Scraping module for search and detail pages
//!
//! This module contains the scraping pipeline, including:
//! - HTTP fetching with a per-request timeout
//! - Search-result page parsing and pagination cursor discovery
//! - Posting detail page parsing
//! - Per-search coordination and CSV export

mod coordinator;
mod detail_page;
mod fetcher;
mod search_page;

pub use coordinator::{run_harvest, Harvester, SearchHarvest, StopReason};
pub use detail_page::parse_detail_page;
pub use fetcher::{build_http_client, fetch_page};
pub use search_page::{parse_price, parse_search_page, SearchPage};

use crate::ExtractError;
use scraper::Selector;

/// Compiles a CSS selector, reporting a bad one as an extraction error
pub(crate) fn selector(css: &'static str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::InvalidSelector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}
