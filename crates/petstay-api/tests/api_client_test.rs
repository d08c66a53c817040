#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use petstay_api::{ApiClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let token: secrecy::SecretString = "test-token".to_string().into();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url, token);
    (server, client)
}

fn ok_envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "code": 100_200, "msg": null, "data": data })
}

// ── Order status ────────────────────────────────────────────────────

#[tokio::test]
async fn test_order_status_success() {
    let (server, client) = setup().await;

    let body = ok_envelope(json!({
        "orderId": "ord-2041",
        "orderStatus": 1,
        "expire_seconds": 540,
        "deposit_paid": 0,
        "create_time": "2025-11-02T09:14:00Z",
        "totalPrice": 320.0,
        "depositAmount": 96.0
    }));

    Mock::given(method("GET"))
        .and(path("/api/order/status/ord-2041"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let status = client.order_status("ord-2041").await.unwrap();

    assert_eq!(status.order_id.as_deref(), Some("ord-2041"));
    assert_eq!(status.order_status, Some(1));
    assert_eq!(status.expire_seconds, Some(540));
    assert_eq!(status.deposit_paid, Some(0));
    assert_eq!(status.total_price, Some(320.0));
}

#[tokio::test]
async fn test_order_status_snake_case_fields() {
    let (server, client) = setup().await;

    // The backend is inconsistent about casing; both spellings must parse.
    let body = ok_envelope(json!({
        "order_id": "ord-7",
        "order_status": 2,
        "deposit_paid": 1
    }));

    Mock::given(method("GET"))
        .and(path("/api/order/status/ord-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let status = client.order_status("ord-7").await.unwrap();

    assert_eq!(status.order_status, Some(2));
    assert_eq!(status.deposit_paid, Some(1));
    assert_eq!(status.expire_seconds, None);
}

// ── Order list ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_orders_by_state_plain_array() {
    let (server, client) = setup().await;

    let body = ok_envelope(json!([
        { "orderId": "a", "orderStatus": 1, "expire_seconds": 120 },
        { "orderId": "b", "orderStatus": 1 }
    ]));

    Mock::given(method("GET"))
        .and(path("/api/order/list"))
        .and(query_param("status", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let orders = client.orders_by_state(1).await.unwrap();

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].order_id.as_deref(), Some("a"));
    assert_eq!(orders[0].expire_seconds, Some(120));
    assert_eq!(orders[1].expire_seconds, None);
}

#[tokio::test]
async fn test_orders_by_state_wrapped_list() {
    let (server, client) = setup().await;

    let body = ok_envelope(json!({
        "list": [{ "orderId": "c", "orderStatus": 1 }]
    }));

    Mock::given(method("GET"))
        .and(path("/api/order/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let orders = client.orders_by_state(1).await.unwrap();

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order_id.as_deref(), Some("c"));
}

// ── Catalog ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_store_detail_with_prices() {
    let (server, client) = setup().await;

    let body = ok_envelope(json!({
        "storeId": 12,
        "name": "Happy Paws",
        "prices": [
            { "priceId": 1, "petCategory": "dog", "petSize": "small(<=7.5kg)", "pricePerDay": 48.0 },
            { "priceId": 2, "petCategory": "any", "petSize": "any", "pricePerDay": 30.0 }
        ]
    }));

    Mock::given(method("GET"))
        .and(path("/api/store/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let store = client.store_detail(12).await.unwrap();

    assert_eq!(store.store_id, Some(12));
    assert_eq!(store.prices.len(), 2);
    assert_eq!(store.prices[0].pet_size.as_deref(), Some("small(<=7.5kg)"));
    assert_eq!(store.prices[1].price_per_day, Some(30.0));
}

#[tokio::test]
async fn test_service_items_posts_store_id() {
    let (server, client) = setup().await;

    let body = ok_envelope(json!([
        { "serviceId": 1, "serviceName": "Bath", "price": 10.0 },
        { "serviceId": 3, "serviceName": "Walk", "price": 2.0 }
    ]));

    Mock::given(method("POST"))
        .and(path("/api/service-item/list"))
        .and(body_json(json!({ "storeId": 12 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let items = client.service_items(12).await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].service_id, Some(1));
    assert_eq!(items[1].price, Some(2.0));
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_failure_code_maps_to_api_error() {
    let (server, client) = setup().await;

    let body = json!({ "code": 100_500, "msg": "order not found", "data": null });

    Mock::given(method("GET"))
        .and(path("/api/order/status/missing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let result = client.order_status("missing").await;

    match result {
        Err(Error::Api { ref message, code, .. }) => {
            assert_eq!(code, Some(100_500));
            assert!(message.contains("order not found"), "got: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_message_field_fallback() {
    let (server, client) = setup().await;

    // Some error paths use `message` instead of `msg`.
    let body = json!({ "code": 100_403, "message": "forbidden store", "data": null });

    Mock::given(method("GET"))
        .and(path("/api/store/99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let result = client.store_detail(99).await;

    match result {
        Err(Error::Api { ref message, .. }) => {
            assert!(message.contains("forbidden store"), "got: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.order_status("any").await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_http_error_maps_to_api_error_with_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.order_status("any").await;

    match result {
        Err(Error::Api { status, code, .. }) => {
            assert_eq!(status, Some(500));
            assert_eq!(code, None);
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_maps_to_deserialization() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.order_status("any").await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}
