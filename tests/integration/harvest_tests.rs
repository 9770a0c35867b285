//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to serve synthetic search and posting pages and
//! run the full fetch → parse → paginate → export cycle against them.

use listing_harvest::config::{Config, ScraperConfig, SearchEntryConfig, UserAgentConfig};
use listing_harvest::geo::{distance_from_origin, ORIGIN};
use listing_harvest::scrape::{run_harvest, Harvester, StopReason};
use listing_harvest::{ExtractError, FetchError, HarvestError};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a test configuration with the given searches
fn create_test_config(max_extra_pages: u32, searches: Vec<SearchEntryConfig>) -> Config {
    Config {
        scraper: ScraperConfig {
            request_timeout: 5,
            max_extra_pages,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestHarvester".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        origin: ORIGIN,
        searches,
    }
}

fn search(name: &str, url: String, output: String) -> SearchEntryConfig {
    SearchEntryConfig {
        name: name.to_string(),
        url,
        output,
    }
}

fn listing_row(href: &str, title: &str, price: &str, with_image: bool) -> String {
    let thumb_class = if with_image {
        "result-image gallery"
    } else {
        "result-image gallery empty"
    };
    format!(
        r#"<li class="result-row">
            <a href="{href}" class="{thumb_class}"></a>
            <p class="result-info">
                <time class="result-date" datetime="2019-11-20 14:52">Nov 20</time>
                <a href="{href}" class="result-title hdrlnk">{title}</a>
                <span class="result-meta"><span class="result-price">{price}</span></span>
            </p>
        </li>"#
    )
}

fn results_page(rows: &str, next_href: Option<&str>) -> String {
    let buttons = next_href
        .map(|href| {
            format!(r#"<span class="buttons"><a href="{href}" class="button next">next &gt;</a></span>"#)
        })
        .unwrap_or_default();
    format!(
        r#"<html><body><section id="pagecontainer">
            {buttons}
            <form id="searchform"><div class="content"><ul class="rows">{rows}</ul></div></form>
        </section></body></html>"#
    )
}

fn detail_page(condition: &str, post_id: &str, latitude: &str, longitude: &str) -> String {
    format!(
        r#"<html><body><section class="page-container"><section class="body"><section class="userbody">
            <div class="mapAndAttrs">
                <div class="mapbox"><div id="map" class="viewposting" data-latitude="{latitude}" data-longitude="{longitude}"></div></div>
                <p class="attrgroup"><span>condition: <b>{condition}</b></span></p>
            </div>
            <section id="postingbody">Works great. Call or text.</section>
            <div class="postinginfos"><p class="postinginfo">post id: {post_id}</p></div>
        </section></section></section></body></html>"#
    )
}

async fn mount_html(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_listing_end_to_end() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/search/sss",
        results_page(
            &listing_row("/nsd/mob/d/galaxy-s9/7012345678.html", "Galaxy S9", "$100", true),
            None,
        ),
    )
    .await;
    mount_html(
        &server,
        "/nsd/mob/d/galaxy-s9/7012345678.html",
        detail_page("used", "7012345678", "32.9", "-117.2"),
    )
    .await;

    let config = create_test_config(10, vec![]);
    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let harvest = harvester
        .harvest(&format!("{}/search/sss?query=samsung+s9&sort=rel", server.uri()))
        .await
        .expect("Harvest failed");

    assert_eq!(harvest.pages, 1);
    assert!(matches!(harvest.stop_reason, StopReason::NoNextPage));
    assert_eq!(harvest.listings.len(), 1);

    let listing = &harvest.listings[0];
    assert_eq!(listing.name, "Galaxy S9");
    assert_eq!(listing.price, 100);
    assert_eq!(listing.post_date, "2019-11-20 14:52");
    assert!(listing.has_image);
    assert_eq!(listing.condition.as_deref(), Some("used"));
    assert_eq!(listing.post_id.as_deref(), Some("7012345678"));
    assert!(listing.has_contact);

    let expected = distance_from_origin(32.9, -117.2);
    let distance = listing.distance.expect("distance should be computed");
    assert!((distance - expected).abs() < 1e-9);
    assert!((distance - 2.5391).abs() < 0.01);
}

/// Serves result pages whose next link always advances the `s` offset
struct EndlessResults;

impl Respond for EndlessResults {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let offset: u32 = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "s")
            .and_then(|(_, value)| value.parse().ok())
            .unwrap_or(0);
        let next = format!("/search/sss?s={}", offset + 120);
        ResponseTemplate::new(200).set_body_string(results_page("", Some(&next)))
    }
}

#[tokio::test]
async fn test_pagination_is_bounded() {
    let server = MockServer::start().await;

    // First page plus ten followed "next" links
    Mock::given(method("GET"))
        .and(path("/search/sss"))
        .respond_with(EndlessResults)
        .expect(11)
        .mount(&server)
        .await;

    let config = create_test_config(10, vec![]);
    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let harvest = harvester
        .harvest(&format!("{}/search/sss", server.uri()))
        .await
        .expect("Harvest failed");

    assert_eq!(harvest.pages, 11);
    assert!(matches!(harvest.stop_reason, StopReason::PageLimit));
    assert!(harvest.listings.is_empty());
}

#[tokio::test]
async fn test_zero_extra_pages_fetches_only_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/sss"))
        .respond_with(EndlessResults)
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(0, vec![]);
    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let harvest = harvester
        .harvest(&format!("{}/search/sss", server.uri()))
        .await
        .expect("Harvest failed");

    assert_eq!(harvest.pages, 1);
    assert!(matches!(harvest.stop_reason, StopReason::PageLimit));
}

#[tokio::test]
async fn test_next_page_fetch_failure_is_not_end_of_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/sss"))
        .and(query_param("s", "120"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/search/sss",
        results_page(
            &listing_row("/d/1.html", "Pixel 4", "$300", false),
            Some("/search/sss?s=120"),
        ),
    )
    .await;
    mount_html(&server, "/d/1.html", detail_page("new", "1", "32.88", "-117.23")).await;

    let config = create_test_config(10, vec![]);
    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let harvest = harvester
        .harvest(&format!("{}/search/sss", server.uri()))
        .await
        .expect("Harvest failed");

    assert_eq!(harvest.pages, 1);
    assert_eq!(harvest.listings.len(), 1);
    assert!(!harvest.listings[0].has_image);
    assert!(matches!(
        harvest.stop_reason,
        StopReason::FetchFailed(FetchError::Status { status: 503, .. })
    ));
    assert!(!harvest.stop_reason.is_complete());
}

#[tokio::test]
async fn test_next_page_without_listings_is_markup_mismatch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/sss"))
        .and(query_param("s", "120"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><section id="pagecontainer"><p>This page has moved.</p></section></body></html>"#,
        ))
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/search/sss",
        results_page(
            &listing_row("/d/1.html", "iPhone 7", "$150", true),
            Some("/search/sss?s=120"),
        ),
    )
    .await;
    mount_html(&server, "/d/1.html", detail_page("good", "1", "32.88", "-117.23")).await;

    let config = create_test_config(10, vec![]);
    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let harvest = harvester
        .harvest(&format!("{}/search/sss", server.uri()))
        .await
        .expect("Harvest failed");

    assert_eq!(harvest.pages, 1);
    assert_eq!(harvest.listings.len(), 1);
    assert_eq!(harvest.listings[0].name, "iPhone 7");
    assert!(matches!(
        harvest.stop_reason,
        StopReason::MarkupMismatch(ExtractError::MissingElement { .. })
    ));
    assert!(!harvest.stop_reason.is_complete());
}

#[tokio::test]
async fn test_next_page_link_to_same_page_stops() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/sss"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(results_page("", Some("/search/sss"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(10, vec![]);
    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let harvest = harvester
        .harvest(&format!("{}/search/sss", server.uri()))
        .await
        .expect("Harvest failed");

    assert_eq!(harvest.pages, 1);
    assert!(matches!(harvest.stop_reason, StopReason::NoNextPage));
}

#[tokio::test]
async fn test_detail_failure_uses_sentinels() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/search/sss",
        results_page(&listing_row("/d/missing.html", "iPhone 7", "$90", true), None),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/d/missing.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = create_test_config(10, vec![]);
    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let harvest = harvester
        .harvest(&format!("{}/search/sss", server.uri()))
        .await
        .expect("Harvest failed");

    assert_eq!(harvest.detail_failures, 1);
    let listing = &harvest.listings[0];
    assert_eq!(listing.price, 90);
    assert_eq!(listing.condition_or_sentinel(), "Unknown");
    assert_eq!(listing.post_id_or_sentinel(), "None");
    assert!(!listing.has_contact);
    assert_eq!(listing.distance_or_zero(), 0.0);
}

#[tokio::test]
async fn test_first_page_failure_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = create_test_config(10, vec![]);
    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let result = harvester
        .harvest(&format!("{}/search/sss", server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(HarvestError::Fetch(FetchError::Status { status: 404, .. }))
    ));
}

#[tokio::test]
async fn test_run_writes_csv_per_search() {
    let server = MockServer::start().await;
    let out_dir = TempDir::new().expect("Failed to create temp dir");

    mount_html(
        &server,
        "/search/sss",
        results_page(
            &format!(
                "{}{}",
                listing_row("/d/1.html", "Galaxy S9", "$100", true),
                listing_row("/d/2.html", "Galaxy S9, cracked", "$40", false)
            ),
            None,
        ),
    )
    .await;
    mount_html(&server, "/d/1.html", detail_page("used", "1001", "32.9", "-117.2")).await;
    mount_html(
        &server,
        "/d/2.html",
        r#"<html><body><section><section><section><p>No details</p></section></section></section></body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/search/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let good_path = out_dir.path().join("s9.csv");
    let bad_path = out_dir.path().join("broken.csv");
    let config = create_test_config(
        10,
        vec![
            search(
                "broken",
                format!("{}/search/broken", server.uri()),
                bad_path.to_string_lossy().into_owned(),
            ),
            search(
                "samsung-s9",
                format!("{}/search/sss?query=samsung+s9", server.uri()),
                good_path.to_string_lossy().into_owned(),
            ),
        ],
    );

    let report = run_harvest(&config, &[]).await.expect("Run failed");

    assert_eq!(report.searches.len(), 2);
    assert!(!report.searches[0].succeeded);
    assert!(!bad_path.exists());

    let s9 = &report.searches[1];
    assert!(s9.succeeded);
    assert_eq!(s9.listings, 2);
    assert_eq!(s9.outcome, "no more pages");

    let content = std::fs::read_to_string(&good_path).expect("CSV not written");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        ",Name,Price,postDate,HasImage,Attributes,postID,contactInfo,distance"
    );
    assert!(lines[1].starts_with("0,Galaxy S9,100,2019-11-20 14:52,True,used,1001,True,2.539"));
    assert_eq!(
        lines[2],
        "1,\"Galaxy S9, cracked\",40,2019-11-20 14:52,False,Unknown,None,False,0.0"
    );
}

#[tokio::test]
async fn test_run_only_selected_searches() {
    let server = MockServer::start().await;
    let out_dir = TempDir::new().expect("Failed to create temp dir");

    mount_html(&server, "/search/a", results_page("", None)).await;
    Mock::given(method("GET"))
        .and(path("/search/b"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page("", None)))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(
        10,
        vec![
            search(
                "a",
                format!("{}/search/a", server.uri()),
                out_dir.path().join("a.csv").to_string_lossy().into_owned(),
            ),
            search(
                "b",
                format!("{}/search/b", server.uri()),
                out_dir.path().join("b.csv").to_string_lossy().into_owned(),
            ),
        ],
    );

    let report = run_harvest(&config, &["a".to_string()])
        .await
        .expect("Run failed");

    assert_eq!(report.searches.len(), 1);
    assert_eq!(report.searches[0].name, "a");
    assert!(out_dir.path().join("a.csv").exists());
    assert!(!out_dir.path().join("b.csv").exists());
}
