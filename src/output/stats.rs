//! Run statistics
//!
//! Collects what happened to each search during a run and prints it once
//! the run is over.

use std::path::PathBuf;

/// Outcome of one configured search
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Search name from the configuration
    pub name: String,

    /// Search-result URL
    pub url: String,

    /// CSV file written for this search, if any
    pub output_path: Option<PathBuf>,

    /// Result pages fetched and parsed
    pub pages: u32,

    /// Listings written
    pub listings: usize,

    /// Listings dropped because of unreadable markup
    pub skipped: usize,

    /// Listings written with sentinel detail fields
    pub detail_failures: usize,

    /// Why pagination stopped, or why the search failed
    pub outcome: String,

    /// False when no CSV could be produced
    pub succeeded: bool,
}

impl SearchReport {
    /// Report for a search that produced no output
    pub fn failed(name: &str, url: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            output_path: None,
            pages: 0,
            listings: 0,
            skipped: 0,
            detail_failures: 0,
            outcome: reason.into(),
            succeeded: false,
        }
    }
}

/// All search reports of a run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub searches: Vec<SearchReport>,
}

impl RunReport {
    pub fn total_listings(&self) -> usize {
        self.searches.iter().map(|s| s.listings).sum()
    }

    pub fn total_pages(&self) -> u32 {
        self.searches.iter().map(|s| s.pages).sum()
    }

    pub fn failed_searches(&self) -> usize {
        self.searches.iter().filter(|s| !s.succeeded).count()
    }
}

/// Formats a run report as plain text
pub fn format_statistics(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str("=== Harvest Statistics ===\n\n");

    for search in &report.searches {
        let status = if search.succeeded { "ok" } else { "FAILED" };
        out.push_str(&format!("{} [{}]\n", search.name, status));
        out.push_str(&format!("  URL: {}\n", search.url));
        if let Some(path) = &search.output_path {
            out.push_str(&format!("  Output: {}\n", path.display()));
        }
        out.push_str(&format!(
            "  Pages: {}, listings: {}, skipped: {}, detail failures: {}\n",
            search.pages, search.listings, search.skipped, search.detail_failures
        ));
        out.push_str(&format!("  Outcome: {}\n\n", search.outcome));
    }

    out.push_str(&format!(
        "Total: {} listings from {} pages across {} searches ({} failed)\n",
        report.total_listings(),
        report.total_pages(),
        report.searches.len(),
        report.failed_searches()
    ));
    out
}

/// Prints a run report to stdout
pub fn print_statistics(report: &RunReport) {
    print!("{}", format_statistics(report));
}
