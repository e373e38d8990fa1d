//! Integration tests for `PlacesClient` using wiremock HTTP mocks.

use rankgrid_places::{PlacesClient, PlacesError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 30, "rankgrid-tests/0.1", base_url)
        .expect("client construction should not fail")
        // No back-off delay in tests.
        .with_retry_policy(2, 0)
}

#[tokio::test]
async fn rankings_at_parses_ordered_results() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [
            {
                "name": "Acme Spa",
                "place_id": "pid-acme",
                "rank": 1,
                "rating": 4.8,
                "reviews": 212,
                "address": "123 Main St, Kansas City, MO",
                "phone": "(816) 555-0134",
                "website": "https://acmespa.example"
            },
            {
                "name": "Riverside Wellness",
                "rank": 2,
                "rating": 4.5
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/v1/rankings"))
        .and(query_param("key", "test-key"))
        .and(query_param("term", "med spa"))
        .and(query_param("lat", "39.0997"))
        .and(query_param("lng", "-94.5786"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let ranks = client
        .rankings_at("med spa", 39.0997, -94.5786)
        .await
        .expect("should parse rankings");

    assert_eq!(ranks.len(), 2);
    assert_eq!(ranks[0].name, "Acme Spa");
    assert_eq!(ranks[0].rank, 1);
    assert_eq!(ranks[0].place_id.as_deref(), Some("pid-acme"));
    assert_eq!(ranks[0].reviews, Some(212));
    assert_eq!(ranks[1].name, "Riverside Wellness");
    assert_eq!(ranks[1].rank, 2);
    assert!(ranks[1].place_id.is_none());
}

#[tokio::test]
async fn missing_ranks_default_to_response_order() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [
            { "name": "First" },
            { "name": "Second" },
            { "name": "Third" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/v1/rankings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let ranks = client.rankings_at("plumber", 40.0, -90.0).await.unwrap();
    let positions: Vec<u32> = ranks.iter().map(|r| r.rank).collect();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[tokio::test]
async fn empty_result_set_is_valid() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/rankings"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "OK", "results": [] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let ranks = client.rankings_at("unicorn groomer", 40.0, -90.0).await.unwrap();
    assert!(ranks.is_empty());
}

#[tokio::test]
async fn api_error_envelope_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/rankings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({ "status": "ERROR", "error": "daily quota exceeded" }),
        ))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .rankings_at("med spa", 40.0, -90.0)
        .await
        .expect_err("ERROR status should fail");
    assert!(
        matches!(err, PlacesError::ApiError(ref msg) if msg == "daily quota exceeded"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn server_error_is_retried_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/rankings"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/rankings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(
                serde_json::json!({ "status": "OK", "results": [{ "name": "Acme Spa" }] }),
            ),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let ranks = client.rankings_at("med spa", 40.0, -90.0).await.unwrap();
    assert_eq!(ranks.len(), 1);
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/rankings"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .rankings_at("med spa", 40.0, -90.0)
        .await
        .expect_err("404 should fail");
    assert!(matches!(err, PlacesError::Http(_)));
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/rankings"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .rankings_at("med spa", 40.0, -90.0)
        .await
        .expect_err("garbage body should fail");
    assert!(matches!(err, PlacesError::Deserialize { .. }));
}
