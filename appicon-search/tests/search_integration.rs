//! Integration tests for the search pipeline against a mock catalog.
//!
//! These exercise the real [`ItunesBackend`] over HTTP (via `wiremock`)
//! through classification, fallback, dedup, ranking and caching.

use std::time::Duration;

use appicon_search::{
    AppSearch, ItunesBackend, MergePolicy, Region, RegionBackend, RegionLookup, SearchConfig,
    SearchError,
};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(id: u64, name: &str, rating: f64, count: u64) -> Value {
    json!({
        "trackId": id,
        "trackName": name,
        "artworkUrl100": format!("https://is1.example.com/{id}/100x100bb.jpg"),
        "trackViewUrl": format!("https://apps.example.com/app/id{id}"),
        "averageUserRating": rating,
        "userRatingCount": count,
        "releaseDate": "2015-04-01T07:00:00Z"
    })
}

fn results(apps: Vec<Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "resultCount": apps.len(),
        "results": apps
    }))
}

fn config_for(server: &MockServer) -> SearchConfig {
    SearchConfig {
        base_url: server.uri(),
        user_agent: Some("AppIconTest/1.0".into()),
        ..Default::default()
    }
}

fn service_for(server: &MockServer, config: SearchConfig) -> AppSearch<ItunesBackend> {
    let backend = ItunesBackend::new(&config).expect("backend");
    AppSearch::new(backend, config).expect("service")
}

#[tokio::test]
async fn lookup_sends_expected_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("term", "google maps"))
        .and(query_param("entity", "software"))
        .and(query_param("limit", "50"))
        .and(query_param("country", "us"))
        .and(header("accept", "application/json"))
        .respond_with(results(vec![app(1, "Google Maps", 4.7, 1_000_000)]))
        .expect(1)
        .mount(&server)
        .await;

    let backend = ItunesBackend::new(&config_for(&server)).expect("backend");
    let lookup = backend.lookup("google maps", Region::Us, 50).await;

    let records = lookup.into_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].artwork_url, "https://is1.example.com/1/512x512bb.jpg");
}

#[tokio::test]
async fn non_success_status_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let backend = ItunesBackend::new(&config_for(&server)).expect("backend");
    assert_eq!(
        backend.lookup("zoom", Region::Us, 50).await,
        RegionLookup::Unavailable
    );
}

#[tokio::test]
async fn malformed_body_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let backend = ItunesBackend::new(&config_for(&server)).expect("backend");
    assert!(backend.lookup("zoom", Region::Cn, 50).await.is_unavailable());
}

#[tokio::test]
async fn missing_results_field_is_an_empty_answer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resultCount": 0})))
        .mount(&server)
        .await;

    let backend = ItunesBackend::new(&config_for(&server)).expect("backend");
    assert_eq!(
        backend.lookup("zzzz", Region::Us, 50).await,
        RegionLookup::Found(vec![])
    );
}

#[tokio::test]
async fn timeout_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(results(vec![app(1, "Slow", 4.0, 1)]).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("client");
    let backend = ItunesBackend::with_client(client, &server.uri()).expect("backend");
    assert!(backend.lookup("slow", Region::Us, 50).await.is_unavailable());
}

#[tokio::test]
async fn latin_query_exact_name_ranks_first_and_skips_second_region() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("term", "wechat"))
        .and(query_param("country", "us"))
        .respond_with(results(vec![
            app(10, "Chat Messenger for WeChat", 4.9, 2_000_000),
            app(11, "WeChat", 2.1, 40),
            app(12, "Translator for Chat", 4.8, 500_000),
        ]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("country", "cn"))
        .respond_with(results(vec![app(99, "WeChat", 5.0, 1)]))
        .expect(0)
        .mount(&server)
        .await;

    let search = service_for(&server, config_for(&server));
    let set = search.search("wechat").await.expect("search");

    assert_eq!(set.regions, vec![Region::Us]);
    assert_eq!(set.apps.len(), 3);
    assert_eq!(set.apps[0].record.id, 11);
    assert!((set.apps[0].scores.relevance - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn mapped_brand_falls_through_to_second_region() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("term", "TikTok"))
        .and(query_param("country", "cn"))
        .respond_with(results(vec![]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("term", "TikTok"))
        .and(query_param("country", "us"))
        .respond_with(results(vec![app(835_599_320, "TikTok", 4.6, 17_000_000)]))
        .expect(1)
        .mount(&server)
        .await;

    let search = service_for(&server, config_for(&server));
    let set = search.search("抖音").await.expect("search");

    assert_eq!(set.term, "TikTok");
    assert_eq!(set.regions, vec![Region::Us]);
    assert_eq!(set.apps[0].record.name, "TikTok");
}

#[tokio::test]
async fn every_region_down_reports_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let search = service_for(&server, config_for(&server));
    let err = search.search("微信").await.unwrap_err();

    // Two regions for "WeChat", then two more for the unmapped retry.
    assert!(matches!(err, SearchError::SearchFailed(_)));
    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn first_region_down_and_second_empty_reports_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("country", "us"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("country", "cn"))
        .respond_with(results(vec![]))
        .expect(1)
        .mount(&server)
        .await;

    let search = service_for(&server, config_for(&server));
    let err = search.search("zoom").await.unwrap_err();

    assert!(matches!(err, SearchError::SearchFailed(_)));
    assert!(err.to_string().contains("us: unavailable"));
    assert_eq!(search.cached_len(), 0);
}

#[tokio::test]
async fn zero_matches_everywhere_is_an_empty_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(results(vec![]))
        .mount(&server)
        .await;

    let search = service_for(&server, config_for(&server));
    let set = search.search("qwertyuiop").await.expect("search");
    assert!(set.is_empty());
    assert_eq!(search.cached_len(), 0);
}

#[tokio::test]
async fn union_policy_merges_regions_with_first_region_winning() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("country", "us"))
        .respond_with(results(vec![
            app(1, "Spotify - Music and Podcasts", 4.8, 30_000_000),
            app(2, "Spotify Kids", 4.0, 20_000),
        ]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("country", "cn"))
        .respond_with(results(vec![
            app(1, "Spotify CN listing", 4.8, 10),
            app(3, "Spotify Lite", 3.5, 900),
        ]))
        .expect(1)
        .mount(&server)
        .await;

    let config = SearchConfig {
        policy: MergePolicy::Union,
        ..config_for(&server)
    };
    let search = service_for(&server, config);
    let set = search.search("spotify").await.expect("search");

    assert_eq!(set.apps.len(), 3);
    let shared = set
        .apps
        .iter()
        .find(|a| a.record.id == 1)
        .expect("shared id present");
    assert_eq!(shared.record.name, "Spotify - Music and Podcasts");
    assert_eq!(set.regions, vec![Region::Us, Region::Cn]);
}

#[tokio::test]
async fn repeated_query_hits_cache_not_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("country", "us"))
        .respond_with(results(vec![app(5, "Notion", 4.7, 80_000)]))
        .expect(1)
        .mount(&server)
        .await;

    let search = service_for(&server, config_for(&server));
    let first = search.search("Notion").await.expect("search");
    let second = search.search("  notion  ").await.expect("search");
    assert_eq!(first, second);
}
