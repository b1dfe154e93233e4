//! Integration tests for catalog lookups and the dispatcher
//!
//! These tests use wiremock to stand in for the vendor site and check the
//! full fetch → extract → memoize cycle.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use reichelt_api::cache::{CacheKind, ManualClock, MemoStore};
use reichelt_api::catalog::Catalog;
use reichelt_api::client::VendorSession;
use reichelt_api::config::{HttpConfig, VendorConfig};
use reichelt_api::extract::{ProductIdentity, DATASHEETS_GROUP, MANUFACTURER_KEY, MPN_KEY};
use reichelt_api::{DecodeError, FetchError, ReicheltError};
use std::io::Cursor;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_BODY: &str = r#"{
    "response": {
        "numFound": 3,
        "maxScore": 9.1,
        "docs": [
            {"article_artid": 1712, "article_lang_besch": "Gleichrichterdiode 1N4001"},
            {"article_artid": 40, "article_lang_besch": "Diode 1N4001 im Gurt"},
            {"article_artid": 219391, "article_lang_besch": "Diode 1N4001 SMD"}
        ]
    }
}"#;

const ARTICLE_PAGE: &str = r#"<html><head><title>1N4001</title></head><body>
<div id="av_price">0,07 € *</div>
<div id="av_articlemanufacturer"><span itemprop="manufacturer">DIOTEC</span><span class="av_fontnormal">1N4001</span></div>
<ul class="av_propview"><li>Allgemeines</li><li><span class="av_propname">Bauform</span><span class="av_propvalue"> DO-41 </span></li><li><span class="av_propname">Montage</span><span class="av_propvalue">THT</span></li><li><span class="av_propname">Ausführung</span><span class="av_propvalue">Standard</span></li></ul>
<ul class="av_propview"><li>Elektrische Werte</li><li><span class="av_propname">Strom</span><span class="av_propvalue">1 A</span></li><li><span class="av_propname">Spannung</span></li></ul>
<div class="av_datasheet_description"><a href="/docs/x.pdf">Manual</a></div>
</body></html>"#;

struct Fixture {
    server: MockServer,
    catalog: Catalog,
    clock: Arc<ManualClock>,
}

async fn fixture() -> Fixture {
    let server = MockServer::start().await;
    let vendor = VendorConfig {
        base_url: server.uri(),
    };
    let session = VendorSession::new(&vendor, &HttpConfig::default()).expect("session");
    let clock = Arc::new(ManualClock::default());
    let catalog = Catalog::new(session, Arc::new(MemoStore::with_clock(clock.clone())));

    Fixture {
        server,
        catalog,
        clock,
    }
}

fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([10, 120, 200]));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut buffer, ImageFormat::Jpeg)
        .expect("encode jpeg");
    buffer.into_inner()
}

async fn mount_article(server: &MockServer, id: &str, body: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .and(query_param("ACTION", "3"))
        .and(query_param("ARTICLE", id))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_search(server: &MockServer, term: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .and(query_param("ACTION", "514"))
        .and(query_param("term", term))
        .respond_with(template)
        .mount(server)
        .await;
}

// ===== Session =====

#[tokio::test]
async fn test_connect_primes_session_cookie() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.html"))
        .and(query_param("ACTION", "514"))
        .and(header("cookie", "Reichelt_SID=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_BODY))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "Reichelt_SID=abc123; Path=/"),
        )
        .mount(&server)
        .await;

    let vendor = VendorConfig {
        base_url: server.uri(),
    };
    let session = VendorSession::connect(&vendor, &HttpConfig::default())
        .await
        .expect("connect");
    let catalog = Catalog::new(session, Arc::new(MemoStore::new()));

    let parts = catalog.find_identities("1N4001").await.expect("search");
    assert_eq!(parts.len(), 3);
}

#[tokio::test]
async fn test_connect_fails_on_bad_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let vendor = VendorConfig {
        base_url: server.uri(),
    };
    let result = VendorSession::connect(&vendor, &HttpConfig::default()).await;
    assert!(matches!(
        result,
        Err(FetchError::Status { status: 503, .. })
    ));
}

// ===== Identities =====

#[tokio::test]
async fn test_find_identities_keeps_order_and_remembers_parts() {
    let f = fixture().await;
    mount_search(
        &f.server,
        "1N4001",
        ResponseTemplate::new(200).set_body_string(SEARCH_BODY),
    )
    .await;

    let parts = f.catalog.find_identities("1N4001").await.unwrap();
    let numbers: Vec<u64> = parts.iter().map(|p| p.number()).collect();
    assert_eq!(numbers, vec![1712, 40, 219391]);

    let remembered = f.catalog.get_identity(40).expect("identity cached");
    assert_eq!(remembered.description(), "Diode 1N4001 im Gurt");
    assert!(f.catalog.get_identity(41).is_none());
}

#[tokio::test]
async fn test_find_identities_malformed_json_is_decode_error() {
    let f = fixture().await;
    mount_search(
        &f.server,
        "broken",
        ResponseTemplate::new(200).set_body_string("{\"response\": [unterminated"),
    )
    .await;

    let result = f.catalog.find_identities("broken").await;
    assert!(matches!(
        result,
        Err(ReicheltError::Decode(DecodeError::Json(_)))
    ));
}

#[tokio::test]
async fn test_find_identities_bad_status_is_decode_error() {
    let f = fixture().await;
    mount_search(&f.server, "down", ResponseTemplate::new(500)).await;

    let result = f.catalog.find_identities("down").await;
    assert!(matches!(
        result,
        Err(ReicheltError::Decode(DecodeError::SearchStatus { status: 500, .. }))
    ));
}

// ===== Prices =====

#[tokio::test]
async fn test_price_is_memoized_for_thirty_seconds() {
    let f = fixture().await;
    mount_article(&f.server, "1712", ARTICLE_PAGE, 2).await;
    let part = ProductIdentity::from_number(1712);

    assert_eq!(f.catalog.get_price(&part).await, 0.07);
    f.clock.advance(Duration::seconds(29));
    assert_eq!(f.catalog.get_price(&part).await, 0.07);

    f.clock.advance(Duration::seconds(1));
    assert_eq!(f.catalog.get_price(&part).await, 0.07);
}

#[tokio::test]
async fn test_price_without_node_is_zero() {
    let f = fixture().await;
    mount_article(&f.server, "5", "<html><body>Kein Preis</body></html>", 1).await;

    assert_eq!(
        f.catalog.get_price(&ProductIdentity::from_number(5)).await,
        0.0
    );
}

#[tokio::test]
async fn test_price_on_error_status_is_zero() {
    let f = fixture().await;
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&f.server)
        .await;

    assert_eq!(
        f.catalog.get_price(&ProductIdentity::from_number(9)).await,
        0.0
    );
}

// ===== Specifications =====

#[tokio::test]
async fn test_specifications_scenario_and_memoization() {
    let f = fixture().await;
    mount_article(&f.server, "1712", ARTICLE_PAGE, 1).await;
    let part = ProductIdentity::from_number(1712);

    let table = f.catalog.get_specifications(&part).await.unwrap();
    assert_eq!(table.len(), 2);

    let general = &table["Allgemeines"];
    assert_eq!(general.len(), 3);
    assert_eq!(general["Bauform"], "DO-41");
    assert!(!table.contains_key("Elektrische Werte"));

    let datasheets = &table[DATASHEETS_GROUP];
    assert_eq!(datasheets["Manual"], "/docs/x.pdf");
    assert_eq!(datasheets[MPN_KEY], "1N4001");
    assert_eq!(datasheets[MANUFACTURER_KEY], "DIOTEC");

    f.clock.advance(Duration::days(30));
    let again = f.catalog.get_specifications(&part).await.unwrap();
    assert!(Arc::ptr_eq(&table, &again));
    assert!(f.catalog.cache().get(CacheKind::Meta, "1712").is_some());
}

#[tokio::test]
async fn test_specifications_fetch_error_propagates() {
    let f = fixture().await;
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&f.server)
        .await;

    let result = f
        .catalog
        .get_specifications(&ProductIdentity::from_number(3))
        .await;
    assert!(matches!(
        result,
        Err(ReicheltError::Fetch(FetchError::Status { status: 500, .. }))
    ));
    assert!(f.catalog.cache().get(CacheKind::Meta, "3").is_none());
}

// ===== Images =====

#[tokio::test]
async fn test_image_decodes_and_is_memoized() {
    let f = fixture().await;
    Mock::given(method("GET"))
        .and(path("/artimage/resize_64x48/1712"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(jpeg_bytes(64, 48))
                .insert_header("content-type", "image/jpeg"),
        )
        .expect(1)
        .mount(&f.server)
        .await;

    let part = ProductIdentity::from_number(1712);
    let blob = f.catalog.get_image(&part, 64, 48).await.unwrap();
    assert_eq!((blob.width(), blob.height()), (64, 48));

    let again = f.catalog.get_image(&part, 64, 48).await.unwrap();
    assert!(Arc::ptr_eq(&blob, &again));
}

#[tokio::test]
async fn test_image_garbage_is_decode_error() {
    let f = fixture().await;
    Mock::given(method("GET"))
        .and(path("/artimage/resize_10x10/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>kein Bild</html>"))
        .mount(&f.server)
        .await;

    let result = f
        .catalog
        .get_image(&ProductIdentity::from_number(7), 10, 10)
        .await;
    assert!(matches!(
        result,
        Err(ReicheltError::Decode(DecodeError::Image(_)))
    ));
}

#[tokio::test]
async fn test_image_missing_is_fetch_error() {
    let f = fixture().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&f.server)
        .await;

    let result = f
        .catalog
        .get_image(&ProductIdentity::from_number(7), 10, 10)
        .await;
    assert!(matches!(
        result,
        Err(ReicheltError::Fetch(FetchError::Status { status: 404, .. }))
    ));
}

// ===== Dispatcher =====

async fn call(catalog: &Catalog, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    let response = reichelt_api::server::router(catalog.clone())
        .oneshot(request)
        .await
        .expect("response");

    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn test_dispatcher_search_and_price() {
    let f = fixture().await;
    mount_search(
        &f.server,
        "1N4001",
        ResponseTemplate::new(200).set_body_string(SEARCH_BODY),
    )
    .await;
    mount_article(&f.server, "1712", ARTICLE_PAGE, 1).await;

    let (status, _, body) = call(&f.catalog, "/search/1N4001").await;
    assert_eq!(status, StatusCode::OK);
    let parts: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parts[0]["Number"], 1712);
    assert_eq!(parts[2]["Description"], "Diode 1N4001 SMD");

    let (status, _, body) = call(&f.catalog, "/price/1712").await;
    assert_eq!(status, StatusCode::OK);
    let price: f32 = serde_json::from_slice(&body).unwrap();
    assert_eq!(price, 0.07);
}

#[tokio::test]
async fn test_dispatcher_meta_views() {
    let f = fixture().await;
    mount_article(&f.server, "1712", ARTICLE_PAGE, 1).await;

    let (status, _, body) = call(&f.catalog, "/meta/1712").await;
    assert_eq!(status, StatusCode::OK);
    let table: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(table["Allgemeines"]["Montage"], "THT");

    let (status, _, body) = call(&f.catalog, "/meta/1712/overview").await;
    assert_eq!(status, StatusCode::OK);
    let headlines: Vec<String> = serde_json::from_slice(&body).unwrap();
    assert_eq!(headlines, vec!["Allgemeines", "datasheets"]);

    let (status, _, body) = call(&f.catalog, "/meta/1712/datasheets").await;
    assert_eq!(status, StatusCode::OK);
    let datasheets: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(datasheets["Manual"], "/docs/x.pdf");

    let (status, _, body) = call(&f.catalog, "/meta/1712/Unbekannt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"404");
}

#[tokio::test]
async fn test_dispatcher_image_is_png() {
    let f = fixture().await;
    Mock::given(method("GET"))
        .and(path("/artimage/resize_99999x9999/1712"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(jpeg_bytes(16, 16)))
        .mount(&f.server)
        .await;

    let (status, content_type, body) = call(&f.catalog, "/image/1712").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert!(body.starts_with(b"\x89PNG"));
}

#[tokio::test]
async fn test_dispatcher_errors() {
    let f = fixture().await;
    mount_search(&f.server, "down", ResponseTemplate::new(502)).await;

    let (status, _, body) = call(&f.catalog, "/price/not-a-number").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"404");

    let (status, _, _) = call(&f.catalog, "/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = call(&f.catalog, "/search/down").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"500");
}
