//! Integration tests for `WbClient` using wiremock HTTP mocks.

use fbwatch_wb::{WbClient, WbError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(card_url: &str, mirror_urls: &[&str]) -> WbClient {
    WbClient::with_endpoints(card_url, mirror_urls, 123_586_123, 15)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn resolve_group_id_extracts_root_from_first_product() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "products": [
            { "root": 987_000, "id": 112_233 },
            { "root": 555_000, "id": 445_566 }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/cards/v4/detail"))
        .and(query_param("nm", "112233"))
        .and(query_param("dest", "123586123"))
        .and(query_param("curr", "rub"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let card_url = server.uri();
    let client = test_client(&card_url, &[&card_url]);
    let group_id = client
        .resolve_group_id(112_233)
        .await
        .expect("should resolve group id");

    assert_eq!(group_id, 987_000);
}

#[tokio::test]
async fn resolve_group_id_without_products_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cards/v4/detail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"products": []})))
        .mount(&server)
        .await;

    let card_url = server.uri();
    let client = test_client(&card_url, &[&card_url]);
    let result = client.resolve_group_id(42).await;

    assert!(
        matches!(result, Err(WbError::ProductNotFound(42))),
        "expected ProductNotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn resolve_group_id_maps_server_error_to_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cards/v4/detail"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let card_url = server.uri();
    let client = test_client(&card_url, &[&card_url]);
    let result = client.resolve_group_id(42).await;

    assert!(
        matches!(result, Err(WbError::Http(_))),
        "expected Http, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_falls_back_when_primary_mirror_fails() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feedbacks/v2/900"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&primary)
        .await;

    let body = serde_json::json!({
        "feedbacks": [
            { "id": "r1", "productValuation": 1 },
            { "id": "r2", "productValuation": 2 }
        ]
    });
    Mock::given(method("GET"))
        .and(path("/feedbacks/v2/900"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&secondary)
        .await;

    let primary_url = primary.uri();
    let secondary_url = secondary.uri();
    let client = test_client(&primary_url, &[&primary_url, &secondary_url]);

    let feedbacks = client
        .fetch_raw_feedbacks(900)
        .await
        .expect("secondary mirror should supply feedbacks");

    assert_eq!(feedbacks.len(), 2);
    assert_eq!(feedbacks[0].id, "r1");
    assert_eq!(feedbacks[1].id, "r2");
}

#[tokio::test]
async fn fetch_treats_empty_primary_as_failure_and_continues() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feedbacks/v2/901"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"feedbacks": []})),
        )
        .mount(&primary)
        .await;

    let body = serde_json::json!({"feedbacks": [{ "id": "r9" }]});
    Mock::given(method("GET"))
        .and(path("/feedbacks/v2/901"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&secondary)
        .await;

    let primary_url = primary.uri();
    let secondary_url = secondary.uri();
    let client = test_client(&primary_url, &[&primary_url, &secondary_url]);

    let feedbacks = client
        .fetch_raw_feedbacks(901)
        .await
        .expect("empty primary should fall through to secondary");

    assert_eq!(feedbacks.len(), 1);
    assert_eq!(feedbacks[0].id, "r9");
}

#[tokio::test]
async fn fetch_short_circuits_on_first_non_empty_mirror() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    let body = serde_json::json!({"feedbacks": [{ "id": "first" }]});
    Mock::given(method("GET"))
        .and(path("/feedbacks/v2/902"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&primary)
        .await;

    // The fallback mirror must never be consulted once the primary delivers.
    Mock::given(method("GET"))
        .and(path("/feedbacks/v2/902"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"feedbacks": [{ "id": "second" }]})),
        )
        .expect(0)
        .mount(&secondary)
        .await;

    let primary_url = primary.uri();
    let secondary_url = secondary.uri();
    let client = test_client(&primary_url, &[&primary_url, &secondary_url]);

    let feedbacks = client
        .fetch_raw_feedbacks(902)
        .await
        .expect("primary mirror should supply feedbacks");

    assert_eq!(feedbacks.len(), 1);
    assert_eq!(feedbacks[0].id, "first");
}

#[tokio::test]
async fn fetch_null_feedbacks_counts_as_empty() {
    let primary = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feedbacks/v2/903"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"feedbacks": null})),
        )
        .mount(&primary)
        .await;

    let primary_url = primary.uri();
    let client = test_client(&primary_url, &[&primary_url]);
    let result = client.fetch_raw_feedbacks(903).await;

    assert!(
        matches!(result, Err(WbError::FeedbacksUnavailable(903))),
        "expected FeedbacksUnavailable, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_exhausting_all_mirrors_is_unavailable() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feedbacks/v2/904"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&primary)
        .await;
    Mock::given(method("GET"))
        .and(path("/feedbacks/v2/904"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"feedbacks": []})),
        )
        .mount(&secondary)
        .await;

    let primary_url = primary.uri();
    let secondary_url = secondary.uri();
    let client = test_client(&primary_url, &[&primary_url, &secondary_url]);
    let result = client.fetch_raw_feedbacks(904).await;

    assert!(
        matches!(result, Err(WbError::FeedbacksUnavailable(904))),
        "expected FeedbacksUnavailable, got: {result:?}"
    );
}
