//! Harvest coordinator - the per-search pipeline
//!
//! For each search URL the coordinator:
//! - fetches and parses the first result page
//! - fetches every listing's detail page, one at a time
//! - follows the "next page" link up to the configured bound
//! - hands the accumulated listings to the CSV writer
//!
//! Everything runs sequentially; each request is awaited before the next
//! one is sent.

use crate::config::{Config, SearchEntryConfig};
use crate::geo::DistanceCalculator;
use crate::listing::{DetailInfo, Listing, SearchEntry};
use crate::output::{resolve_output_path, write_listings_csv, RunReport, SearchReport};
use crate::scrape::{build_http_client, fetch_page, parse_detail_page, parse_search_page, SearchPage};
use crate::{ExtractError, FetchError, HarvestError};
use chrono::NaiveDate;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Why a search stopped following "next page" links
#[derive(Debug)]
pub enum StopReason {
    /// The last page had no next link
    NoNextPage,

    /// The configured number of extra pages was reached
    PageLimit,

    /// A later result page could not be fetched
    FetchFailed(FetchError),

    /// A later result page did not contain a listing container
    MarkupMismatch(ExtractError),
}

impl StopReason {
    /// True when pagination ended because the results ran out or the bound was hit
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::NoNextPage | Self::PageLimit)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNextPage => write!(f, "no more pages"),
            Self::PageLimit => write!(f, "page limit reached"),
            Self::FetchFailed(e) => write!(f, "stopped early: {}", e),
            Self::MarkupMismatch(e) => write!(f, "stopped early: {}", e),
        }
    }
}

/// Listings gathered for one search URL
#[derive(Debug)]
pub struct SearchHarvest {
    pub listings: Vec<Listing>,
    pub pages: u32,
    pub skipped: usize,
    pub detail_failures: usize,
    pub stop_reason: StopReason,
}

/// Runs the scraping pipeline for search URLs
pub struct Harvester {
    client: Client,
    calculator: DistanceCalculator,
    max_extra_pages: u32,
}

impl Harvester {
    /// Creates a harvester from the configuration
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.scraper.request_timeout),
        )?;

        Ok(Self {
            client,
            calculator: DistanceCalculator::new(config.origin),
            max_extra_pages: config.scraper.max_extra_pages,
        })
    }

    /// Harvests every listing reachable from a search URL
    ///
    /// A failure on the first page is an error. Failures on later pages stop
    /// pagination and are reported in [`SearchHarvest::stop_reason`]; the
    /// listings gathered so far are kept.
    pub async fn harvest(&self, search_url: &str) -> Result<SearchHarvest, HarvestError> {
        let mut current = Url::parse(search_url)?;

        tracing::info!("Processing page 1 of {}", current);
        let html = fetch_page(&self.client, current.as_str()).await?;
        let first = parse_search_page(&html, &current)?;

        let mut harvest = SearchHarvest {
            listings: Vec::new(),
            pages: 0,
            skipped: 0,
            detail_failures: 0,
            stop_reason: StopReason::NoNextPage,
        };
        let mut next = self.absorb_page(first, &mut harvest).await;

        let mut followed = 0;
        let stop_reason = loop {
            let Some(next_url) = next.take() else {
                break StopReason::NoNextPage;
            };
            if next_url == current {
                tracing::debug!("Next page link points back at {}", current);
                break StopReason::NoNextPage;
            }
            if followed >= self.max_extra_pages {
                break StopReason::PageLimit;
            }
            followed += 1;

            tracing::info!("Processing page {} of {}", followed + 1, search_url);
            let html = match fetch_page(&self.client, next_url.as_str()).await {
                Ok(html) => html,
                Err(e) => break StopReason::FetchFailed(e),
            };
            let page = match parse_search_page(&html, &next_url) {
                Ok(page) => page,
                Err(e) => break StopReason::MarkupMismatch(e),
            };

            next = self.absorb_page(page, &mut harvest).await;
            current = next_url;
        };
        harvest.stop_reason = stop_reason;

        match &harvest.stop_reason {
            StopReason::NoNextPage => tracing::info!("Running out of pages"),
            StopReason::PageLimit => tracing::info!(
                "Stopped after {} pages (limit of {} extra pages)",
                harvest.pages,
                self.max_extra_pages
            ),
            reason => tracing::warn!("Pagination {}", reason),
        }

        Ok(harvest)
    }

    /// Adds a parsed page's listings to the harvest and returns its next link
    async fn absorb_page(&self, page: SearchPage, harvest: &mut SearchHarvest) -> Option<Url> {
        harvest.pages += 1;
        harvest.skipped += page.skipped;

        for entry in page.entries {
            let listing = self.build_listing(entry, &mut harvest.detail_failures).await;
            harvest.listings.push(listing);
        }

        page.next_page
    }

    async fn build_listing(&self, entry: SearchEntry, detail_failures: &mut usize) -> Listing {
        let detail = match self.fetch_detail(&entry.detail_url).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::warn!(
                    "Detail page {} for '{}' unavailable: {}",
                    entry.detail_url,
                    entry.title,
                    e
                );
                *detail_failures += 1;
                DetailInfo::default()
            }
        };

        let distance = detail
            .coordinates
            .map(|point| self.calculator.distance_to(point));

        Listing::assemble(entry, detail, distance)
    }

    async fn fetch_detail(&self, url: &str) -> Result<DetailInfo, HarvestError> {
        let html = fetch_page(&self.client, url).await?;
        Ok(parse_detail_page(&html)?)
    }
}

/// Runs every configured search and writes one CSV per search
///
/// When `only` is non-empty, just the searches with those names run. A
/// search that fails is recorded in the report and the run moves on.
///
/// # Example
///
/// ```no_run
/// use listing_harvest::config::load_config;
/// use listing_harvest::scrape::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let report = run_harvest(&config, &[]).await?;
/// println!("{} listings", report.total_listings());
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: &Config, only: &[String]) -> Result<RunReport, HarvestError> {
    let harvester = Harvester::new(config)?;
    let run_date = chrono::Local::now().date_naive();

    for name in only {
        if !config.searches.iter().any(|s| &s.name == name) {
            tracing::warn!("No search named '{}' in configuration", name);
        }
    }

    let mut report = RunReport::default();
    for search in config
        .searches
        .iter()
        .filter(|s| only.is_empty() || only.contains(&s.name))
    {
        tracing::info!("Starting search '{}'", search.name);
        report
            .searches
            .push(run_search(&harvester, search, run_date).await);
    }

    tracing::info!(
        "Finished: {} listings from {} searches",
        report.total_listings(),
        report.searches.len()
    );
    Ok(report)
}

async fn run_search(
    harvester: &Harvester,
    search: &SearchEntryConfig,
    run_date: NaiveDate,
) -> SearchReport {
    let harvest = match harvester.harvest(&search.url).await {
        Ok(harvest) => harvest,
        Err(e) => {
            tracing::error!("Search '{}' failed: {}", search.name, e);
            return SearchReport::failed(&search.name, &search.url, e.to_string());
        }
    };

    let path = resolve_output_path(&search.output, run_date);
    if let Err(e) = write_listings_csv(&path, &harvest.listings) {
        tracing::error!("Could not write {}: {}", path.display(), e);
        return SearchReport::failed(&search.name, &search.url, e.to_string());
    }

    SearchReport {
        name: search.name.clone(),
        url: search.url.clone(),
        output_path: Some(path),
        pages: harvest.pages,
        listings: harvest.listings.len(),
        skipped: harvest.skipped,
        detail_failures: harvest.detail_failures,
        outcome: harvest.stop_reason.to_string(),
        succeeded: true,
    }
}
