//! Integration tests for `NaverClient` using wiremock HTTP mocks.

use chrono::{TimeZone, Utc};
use orderlink_core::HttpSettings;
use orderlink_naver::{AccessToken, NaverClient, NaverError};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings() -> HttpSettings {
    HttpSettings {
        timeout_secs: 5,
        user_agent: "orderlink-test".to_string(),
        max_retries: 2,
        retry_backoff_base_ms: 0,
    }
}

fn test_client(base_url: &str) -> NaverClient {
    NaverClient::with_base_url("client-id", "$2a$04$wWsKI6s9oluIDTgYnP0Y0e", &settings(), base_url)
        .expect("client construction should not fail")
}

fn token() -> AccessToken {
    AccessToken {
        access_token: "tok".to_string(),
        expires_in: Some(10_800),
        token_type: Some("Bearer".to_string()),
    }
}

fn order_entry(product_order_id: &str, option: &str) -> serde_json::Value {
    serde_json::json!({
        "productOrderId": product_order_id,
        "content": {
            "order": {
                "orderId": format!("O-{product_order_id}"),
                "ordererName": "홍길동",
                "ordererTel": "010-1234-5678"
            },
            "productOrder": {
                "productName": "[일본] eSIM",
                "productOption": option,
                "quantity": 1,
                "productOrderStatus": "PAYED"
            }
        }
    })
}

#[tokio::test]
async fn issue_token_posts_signed_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .and(body_string_contains("client_id=client-id"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_secret_sign="))
        .and(body_string_contains("type=SELF"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok",
            "expires_in": 10800,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = test_client(&server.uri())
        .issue_token()
        .await
        .expect("should issue token");
    assert_eq!(token.access_token, "tok");
    assert_eq!(token.expires_in, Some(10_800));
}

#[tokio::test]
async fn issue_token_with_bad_secret_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = NaverClient::with_base_url("client-id", "plain-secret", &settings(), &server.uri())
        .unwrap();
    let err = client.issue_token().await.unwrap_err();
    assert!(matches!(err, NaverError::InvalidSecret(_)));
}

#[tokio::test]
async fn issue_token_rejected_credentials_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).issue_token().await.unwrap_err();
    assert!(matches!(err, NaverError::Http(ref e) if e.status().map(|s| s.as_u16()) == Some(401)));
}

#[tokio::test]
async fn list_changed_orders_follows_pagination() {
    let server = MockServer::start().await;
    let since = Utc.with_ymd_and_hms(2025, 8, 23, 5, 35, 42).unwrap();

    Mock::given(method("GET"))
        .and(path("/v1/pay-order/seller/product-orders"))
        .and(query_param("from", "2025-08-23T14:35:42.000+09:00"))
        .and(query_param("page", "1"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "timestamp": "2025-08-23T14:36:00.000+09:00",
            "traceId": "trace-1",
            "data": {
                "contents": [order_entry("PO-1", "사용일수 선택: 3일")],
                "pagination": { "page": 1, "size": 1, "hasNext": true }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/pay-order/seller/product-orders"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "contents": [order_entry("PO-2", "사용일수 선택: 5일")],
                "pagination": { "page": 2, "size": 1, "hasNext": false }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let orders = test_client(&server.uri())
        .list_changed_orders(&token(), since)
        .await
        .expect("should list orders");

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].product_order_id, "PO-1");
    assert_eq!(orders[0].order_id, "O-PO-1");
    assert_eq!(orders[0].orderer_tel.as_deref(), Some("010-1234-5678"));
    assert_eq!(orders[0].product_option.as_deref(), Some("사용일수 선택: 3일"));
    assert_eq!(orders[0].status.as_deref(), Some("PAYED"));
    assert_eq!(orders[1].product_order_id, "PO-2");
}

#[tokio::test]
async fn list_changed_orders_without_data_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/pay-order/seller/product-orders"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "timestamp": "t", "traceId": "x" })),
        )
        .mount(&server)
        .await;

    let orders = test_client(&server.uri())
        .list_changed_orders(&token(), Utc::now())
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn list_changed_orders_retries_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/pay-order/seller/product-orders"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/pay-order/seller/product-orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "contents": [order_entry("PO-1", "")], "pagination": { "hasNext": false } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let orders = test_client(&server.uri())
        .list_changed_orders(&token(), Utc::now())
        .await
        .expect("should succeed after one retry");
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn list_changed_orders_malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/pay-order/seller/product-orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "contents": [{ "productOrderId": 5 }] }
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .list_changed_orders(&token(), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, NaverError::Deserialize { .. }));
}

#[tokio::test]
async fn confirm_dispatch_sends_nothing_delivery() {
    let server = MockServer::start().await;
    let at = Utc.with_ymd_and_hms(2025, 8, 23, 0, 0, 0).unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/pay-order/seller/product-orders/dispatch"))
        .and(header("authorization", "Bearer tok"))
        .and(body_partial_json(serde_json::json!({
            "dispatchProductOrders": [
                {
                    "productOrderId": "PO-1",
                    "deliveryMethod": "NOTHING",
                    "dispatchDate": "2025-08-23T09:00:00.000+09:00"
                },
                {
                    "productOrderId": "PO-2",
                    "deliveryMethod": "NOTHING",
                    "dispatchDate": "2025-08-23T09:00:00.000+09:00"
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "successProductOrderIds": ["PO-1"],
                "failProductOrderInfos": [
                    { "productOrderId": "PO-2", "code": "104105", "message": "already dispatched" }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri())
        .confirm_dispatch(&token(), &["PO-1".to_string(), "PO-2".to_string()], at)
        .await
        .expect("should confirm dispatch");

    assert_eq!(outcome.success_product_order_ids, vec!["PO-1".to_string()]);
    assert_eq!(outcome.fail_product_order_infos.len(), 1);
    assert_eq!(outcome.fail_product_order_infos[0].product_order_id, "PO-2");
}

#[tokio::test]
async fn confirm_dispatch_with_no_ids_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri())
        .confirm_dispatch(&token(), &[], Utc::now())
        .await
        .unwrap();
    assert!(outcome.success_product_order_ids.is_empty());
}

#[tokio::test]
async fn confirm_dispatch_without_data_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/pay-order/seller/product-orders/dispatch"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "traceId": "t-9" })),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .confirm_dispatch(&token(), &["PO-1".to_string()], Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, NaverError::ApiError(ref msg) if msg.contains("t-9")));
}
