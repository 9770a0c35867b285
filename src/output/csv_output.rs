//! CSV export of harvested listings
//!
//! The file is row-indexed: the first, unnamed column holds the 0-based
//! row number, followed by the listing columns.

use crate::listing::Listing;
use crate::output::OutputResult;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Header row, including the unnamed index column
pub const CSV_HEADERS: [&str; 9] = [
    "",
    "Name",
    "Price",
    "postDate",
    "HasImage",
    "Attributes",
    "postID",
    "contactInfo",
    "distance",
];

/// Placeholder in output paths replaced by the run date
pub const DATE_PLACEHOLDER: &str = "{date}";

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    index: usize,
    name: &'a str,
    price: i64,
    post_date: &'a str,
    has_image: &'static str,
    attributes: &'a str,
    post_id: &'a str,
    contact_info: &'static str,
    distance: f64,
}

impl<'a> CsvRow<'a> {
    fn new(index: usize, listing: &'a Listing) -> Self {
        Self {
            index,
            name: &listing.name,
            price: listing.price,
            post_date: &listing.post_date,
            has_image: flag(listing.has_image),
            attributes: listing.condition_or_sentinel(),
            post_id: listing.post_id_or_sentinel(),
            contact_info: flag(listing.has_contact),
            distance: listing.distance_or_zero(),
        }
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Expands `{date}` in an output path template to the given date as MMDD
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use listing_harvest::output::resolve_output_path;
///
/// let date = NaiveDate::from_ymd_opt(2019, 12, 2).unwrap();
/// let path = resolve_output_path("out/Craigslist_pixel4-{date}.csv", date);
/// assert_eq!(path.to_str(), Some("out/Craigslist_pixel4-1202.csv"));
/// ```
pub fn resolve_output_path(template: &str, date: NaiveDate) -> PathBuf {
    PathBuf::from(template.replace(DATE_PLACEHOLDER, &date.format("%m%d").to_string()))
}

/// Writes listings to a CSV file, replacing any existing file
///
/// Parent directories are created as needed. The header row is written
/// even when there are no listings.
pub fn write_listings_csv(path: &Path, listings: &[Listing]) -> OutputResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(CSV_HEADERS)?;
    for (index, listing) in listings.iter().enumerate() {
        writer.serialize(CsvRow::new(index, listing))?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} listings to {}", listings.len(), path.display());
    Ok(())
}
