//! Listing records assembled from search and detail pages

use crate::geo::Coordinate;

/// Written when a listing has no condition attribute
pub const UNKNOWN_CONDITION: &str = "Unknown";

/// Written when a detail page has no post ID
pub const MISSING_POST_ID: &str = "None";

/// One row of a search-result page
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEntry {
    /// Listing title
    pub title: String,

    /// Asking price in whole dollars
    pub price: i64,

    /// Value of the `datetime` attribute, e.g. `2019-11-20 14:52`
    pub post_date: String,

    /// Absolute URL of the listing's detail page
    pub detail_url: String,

    /// Whether the listing thumbnail shows an image
    pub has_image: bool,
}

/// Fields read from a listing's detail page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailInfo {
    /// Value of the `condition` attribute, e.g. `used`
    pub condition: Option<String>,

    /// Posting identifier
    pub post_id: Option<String>,

    /// Whether the posting offers a way to call, text or reply
    pub has_contact: bool,

    /// Map position of the item, if the posting shows a map
    pub coordinates: Option<Coordinate>,
}

/// A fully assembled listing
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub name: String,
    pub price: i64,
    pub post_date: String,
    pub has_image: bool,
    pub condition: Option<String>,
    pub post_id: Option<String>,
    pub has_contact: bool,
    /// Distance in miles from the configured origin
    pub distance: Option<f64>,
}

impl Listing {
    /// Combines a search entry with its detail page and computed distance
    pub fn assemble(entry: SearchEntry, detail: DetailInfo, distance: Option<f64>) -> Self {
        Self {
            name: entry.title,
            price: entry.price,
            post_date: entry.post_date,
            has_image: entry.has_image,
            condition: detail.condition,
            post_id: detail.post_id,
            has_contact: detail.has_contact,
            distance,
        }
    }

    /// Condition attribute, or `Unknown`
    pub fn condition_or_sentinel(&self) -> &str {
        self.condition.as_deref().unwrap_or(UNKNOWN_CONDITION)
    }

    /// Post ID, or `None`
    pub fn post_id_or_sentinel(&self) -> &str {
        self.post_id.as_deref().unwrap_or(MISSING_POST_ID)
    }

    /// Distance, or 0 when the posting had no map
    pub fn distance_or_zero(&self) -> f64 {
        self.distance.unwrap_or(0.0)
    }
}
