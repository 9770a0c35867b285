//! Search-result page extraction
//!
//! A result page lists postings inside the search form:
//!
//! ```text
//! body > section > form > div.content > ul > li
//!     li > a.result-image (thumbnail, gets an extra `empty` class without images)
//!     li > p > a (title), time[datetime], span.result-meta > span (price)
//! ```
//!
//! and carries the pagination cursor as `span.buttons a.button.next`.

use crate::listing::SearchEntry;
use crate::scrape::selector;
use crate::ExtractError;
use scraper::{ElementRef, Html};
use url::Url;

/// Class added to the thumbnail link of postings without pictures
const NO_IMAGE_CLASS: &str = "empty";

/// Everything extracted from one search-result page
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Listings that had every required field
    pub entries: Vec<SearchEntry>,

    /// Listings dropped because a field could not be read
    pub skipped: usize,

    /// Absolute URL of the next result page, if there is one
    pub next_page: Option<Url>,
}

/// Parses a search-result page
///
/// Fails only when the listing container itself is missing; individual
/// listings that do not match the expected markup are skipped and counted.
///
/// # Example
///
/// ```
/// use listing_harvest::scrape::parse_search_page;
/// use url::Url;
///
/// let html = r#"<html><body><section><form><div class="content"><ul></ul></div></form>
///     <span class="buttons"><a class="button next" href="/search/sss?s=120">next</a></span>
///     </section></body></html>"#;
/// let page_url = Url::parse("https://sandiego.craigslist.org/search/sss").unwrap();
/// let page = parse_search_page(html, &page_url).unwrap();
/// assert!(page.entries.is_empty());
/// assert_eq!(
///     page.next_page.unwrap().as_str(),
///     "https://sandiego.craigslist.org/search/sss?s=120"
/// );
/// ```
pub fn parse_search_page(html: &str, page_url: &Url) -> Result<SearchPage, ExtractError> {
    let document = Html::parse_document(html);

    let container_selector = selector("body section form div.content ul")?;
    let item_selector = selector("li")?;

    let container = document
        .select(&container_selector)
        .next()
        .ok_or(ExtractError::MissingElement {
            element: "form div.content ul",
        })?;

    let mut page = SearchPage::default();
    for item in container.select(&item_selector) {
        match parse_entry(item, page_url) {
            Ok(entry) => page.entries.push(entry),
            Err(e) => {
                tracing::warn!("Skipping listing on {}: {}", page_url, e);
                page.skipped += 1;
            }
        }
    }

    page.next_page = find_next_page(&document, page_url)?;

    Ok(page)
}

fn parse_entry(item: ElementRef<'_>, page_url: &Url) -> Result<SearchEntry, ExtractError> {
    let p_selector = selector("p")?;
    let a_selector = selector("a")?;
    let time_selector = selector("time")?;
    let price_selector = selector("span.result-meta span")?;

    let info = item
        .select(&p_selector)
        .next()
        .ok_or(ExtractError::MissingElement { element: "p" })?;

    let title = info
        .select(&a_selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .ok_or(ExtractError::MissingElement { element: "p a" })?;

    let price_text = info
        .select(&price_selector)
        .next()
        .map(element_text)
        .ok_or(ExtractError::MissingElement {
            element: "span.result-meta span",
        })?;
    let price = parse_price(&price_text)?;

    let post_date = info
        .select(&time_selector)
        .next()
        .ok_or(ExtractError::MissingElement { element: "time" })?
        .value()
        .attr("datetime")
        .ok_or(ExtractError::MissingAttribute {
            element: "time",
            attribute: "datetime",
        })?
        .to_string();

    let link = item
        .select(&a_selector)
        .next()
        .ok_or(ExtractError::MissingElement { element: "li a" })?;
    let href = link.value().attr("href").ok_or(ExtractError::MissingAttribute {
        element: "li a",
        attribute: "href",
    })?;
    let detail_url = page_url
        .join(href)
        .map_err(|_| ExtractError::MalformedField {
            field: "detail link",
            value: href.to_string(),
        })?;

    let has_image = !link.value().classes().any(|class| class == NO_IMAGE_CLASS);

    Ok(SearchEntry {
        title,
        price,
        post_date,
        detail_url: detail_url.to_string(),
        has_image,
    })
}

/// Finds the "next page" link, resolved against the current page
///
/// A missing link or an empty `href` means there are no more pages.
fn find_next_page(document: &Html, page_url: &Url) -> Result<Option<Url>, ExtractError> {
    let next_selector = selector("span.buttons a.button.next")?;

    let href = match document
        .select(&next_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
    {
        Some(href) if !href.is_empty() => href,
        _ => return Ok(None),
    };

    page_url
        .join(href)
        .map(Some)
        .map_err(|_| ExtractError::MalformedField {
            field: "next page link",
            value: href.to_string(),
        })
}

/// Parses a displayed price such as `$100` or `$1,250` into whole dollars
pub fn parse_price(text: &str) -> Result<i64, ExtractError> {
    let trimmed = text.trim();
    let digits: String = trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| *c != ',')
        .collect();

    digits
        .parse::<i64>()
        .map_err(|_| ExtractError::MalformedField {
            field: "price",
            value: text.to_string(),
        })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
