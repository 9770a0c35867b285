//! Posting detail page extraction
//!
//! Reads the attribute group (for the item condition), the posting info
//! block, the posting body and the map element of a single posting.

use crate::geo::Coordinate;
use crate::listing::DetailInfo;
use crate::scrape::selector;
use crate::ExtractError;
use scraper::{ElementRef, Html};

/// Prefix of the posting info line, e.g. `post id: 7012345678`
const POST_ID_PREFIX: &str = "post id:";

/// Words in a posting body that mean the seller accepts calls or texts
const CONTACT_WORDS: [&str; 4] = ["Text", "text", "Call", "call"];

/// Parses a posting detail page
///
/// Absent fields are left as `None`/`false`, including the coordinates of
/// a map that has none or whose values are not numbers.
pub fn parse_detail_page(html: &str) -> Result<DetailInfo, ExtractError> {
    let document = Html::parse_document(html);

    let condition = find_condition(&document)?;

    let info_selector = selector("p.postinginfo")?;
    let (post_id, has_contact) = match document.select(&info_selector).next() {
        Some(info) => (Some(post_id_from(info)), has_contact(&document)?),
        None => (None, false),
    };

    let coordinates = find_coordinates(&document)?;

    Ok(DetailInfo {
        condition,
        post_id,
        has_contact,
        coordinates,
    })
}

/// Looks for a `condition: <value>` span inside the attribute groups
fn find_condition(document: &Html) -> Result<Option<String>, ExtractError> {
    let span_selector = selector("p.attrgroup span")?;

    Ok(document.select(&span_selector).find_map(|span| {
        let text = span.text().collect::<String>();
        let mut parts = text.trim().splitn(2, ": ");
        match (parts.next(), parts.next()) {
            (Some("condition"), Some(value)) if !value.trim().is_empty() => {
                Some(value.trim().to_string())
            }
            _ => None,
        }
    }))
}

fn post_id_from(info: ElementRef<'_>) -> String {
    let text = info.text().collect::<String>();
    let text = text.trim();
    text.strip_prefix(POST_ID_PREFIX)
        .unwrap_or(text)
        .trim()
        .to_string()
}

/// True when the posting body mentions calling/texting or holds a reply link
fn has_contact(document: &Html) -> Result<bool, ExtractError> {
    let body_selector = selector("section#postingbody")?;
    let link_selector = selector("a")?;

    let Some(body) = document.select(&body_selector).next() else {
        return Ok(false);
    };

    let text = body.text().collect::<String>();
    if CONTACT_WORDS.iter().any(|word| text.contains(word)) {
        return Ok(true);
    }

    Ok(body.select(&link_selector).next().is_some())
}

/// Reads the map position, present only when the posting shows a map
///
/// A map without usable coordinates is logged and treated as no map; the
/// rest of the posting is still read.
fn find_coordinates(document: &Html) -> Result<Option<Coordinate>, ExtractError> {
    let map_selector = selector("div#map")?;
    let position_selector = selector("div.viewposting")?;

    if document.select(&map_selector).next().is_none() {
        return Ok(None);
    }

    let coordinate = match document.select(&position_selector).next() {
        Some(position) => read_coordinates(position),
        None => Err(ExtractError::MissingElement {
            element: "div.viewposting",
        }),
    };

    match coordinate {
        Ok(coordinate) => {
            if !coordinate.is_in_range() {
                tracing::warn!(
                    "Map coordinates ({}, {}) are outside the valid range",
                    coordinate.latitude,
                    coordinate.longitude
                );
            }
            Ok(Some(coordinate))
        }
        Err(e) => {
            tracing::warn!("Ignoring unusable map: {}", e);
            Ok(None)
        }
    }
}

fn read_coordinates(position: ElementRef<'_>) -> Result<Coordinate, ExtractError> {
    let latitude = position
        .value()
        .attr("data-latitude")
        .ok_or(ExtractError::MissingAttribute {
            element: "div.viewposting",
            attribute: "data-latitude",
        })?;
    let longitude = position
        .value()
        .attr("data-longitude")
        .ok_or(ExtractError::MissingAttribute {
            element: "div.viewposting",
            attribute: "data-longitude",
        })?;

    Coordinate::parse(latitude, longitude).map_err(|_| ExtractError::MalformedField {
        field: "map coordinates",
        value: format!("{},{}", latitude, longitude),
    })
}
