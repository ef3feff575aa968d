//! Integration tests for sales and shipping orders.

#![allow(clippy::unwrap_used)]

use acommerce_client::{
    AcommerceError, ChannelId, Endpoint, OrderId, SUBJECT_TOKEN_HEADER, ShippingOrderId,
    ShippingPartnerId,
};
use acommerce_integration_tests::MockAcommerce;
use serde::Deserialize;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderStatus {
    order_id: String,
    order_status: String,
}

#[tokio::test]
async fn test_sales_order_round_trip() {
    let mock = MockAcommerce::with_token("tok-1").await;
    let order = serde_json::json!({
        "orderCreatedTime": "2024-05-01T08:00:00.000Z",
        "customerInfo": { "addressee": "Ada", "city": "Bangkok" },
        "orderShipmentInfo": { "addressee": "Ada", "postalCode": "10110" },
        "paymentType": "NON_COD",
        "shippingType": "STANDARD_2_4_DAYS",
        "orderItems": [{ "partnerId": "1234", "itemId": "NP-TEE-M", "qty": 2 }]
    });

    Mock::given(method("PUT"))
        .and(path("/channel/ufc/order/SO-1001"))
        .and(header(SUBJECT_TOKEN_HEADER, "tok-1"))
        .and(body_partial_json(serde_json::json!({ "paymentType": "NON_COD" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/channel/ufc/order/SO-1001"))
        .and(header(SUBJECT_TOKEN_HEADER, "tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "orderId": "SO-1001",
            "orderStatus": "NEW",
            "orderItems": []
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let channel = ChannelId::new("ufc");
    let order_id = OrderId::new("SO-1001");

    let created = client
        .create_sales_order(&channel, &order_id, &order)
        .await
        .unwrap();
    assert!(created.is_null());

    let fetched = client.sales_order(&channel, &order_id).await.unwrap();
    let status: OrderStatus = serde_json::from_value(fetched).unwrap();
    assert_eq!(status.order_id, "SO-1001");
    assert_eq!(status.order_status, "NEW");
}

#[tokio::test]
async fn test_typed_response_through_generic_get() {
    let mock = MockAcommerce::with_token("tok-1").await;
    Mock::given(method("GET"))
        .and(path("/channel/ufc/order/SO-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "orderId": "SO-7",
            "orderStatus": "COMPLETED"
        })))
        .mount(&mock.server)
        .await;

    let status: OrderStatus = mock
        .client()
        .get(Endpoint::Fulfillment, "channel/ufc/order/SO-7")
        .await
        .unwrap();
    assert_eq!(status.order_status, "COMPLETED");
}

#[tokio::test]
async fn test_order_ids_are_path_encoded() {
    let mock = MockAcommerce::with_token("tok-1").await;
    Mock::given(method("GET"))
        .and(path("/channel/ufc/order/SO%2F42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock.server)
        .await;

    mock.client()
        .sales_order(&ChannelId::new("ufc"), &OrderId::new("SO/42"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_server_error_body_is_truncated() {
    let mock = MockAcommerce::with_token("tok-1").await;
    Mock::given(method("PUT"))
        .and(path("/channel/ufc/order/SO-1"))
        .respond_with(ResponseTemplate::new(422).set_body_string("x".repeat(2_000)))
        .mount(&mock.server)
        .await;

    let err = mock
        .client()
        .create_sales_order(
            &ChannelId::new("ufc"),
            &OrderId::new("SO-1"),
            &serde_json::json!({}),
        )
        .await
        .unwrap_err();

    let AcommerceError::Http { status, body } = err else {
        panic!("expected HTTP error");
    };
    assert_eq!(status, 422);
    assert_eq!(body.len(), 500);
}

#[tokio::test]
async fn test_invalid_json_is_a_parse_error() {
    let mock = MockAcommerce::with_token("tok-1").await;
    Mock::given(method("GET"))
        .and(path("/channel/ufc/order/SO-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock.server)
        .await;

    let err = mock
        .client()
        .sales_order(&ChannelId::new("ufc"), &OrderId::new("SO-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AcommerceError::Parse(_)));
}

#[tokio::test]
async fn test_shipping_orders_go_to_shipping_root() {
    let mock = MockAcommerce::with_token("tok-1").await;
    let shipping = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/partner/kerry/order/SH-9"))
        .and(header(SUBJECT_TOKEN_HEADER, "tok-1"))
        .and(body_partial_json(serde_json::json!({ "shipServiceType": "DELIVERY" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "shipOrderId": "SH-9"
        })))
        .expect(1)
        .mount(&shipping)
        .await;
    Mock::given(method("GET"))
        .and(path("/partner/kerry/order/SH-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "shipOrderId": "SH-9",
            "shipOrderStatus": "PENDING"
        })))
        .expect(1)
        .mount(&shipping)
        .await;

    let config = mock
        .config()
        .with_base_url(Endpoint::Shipping, format!("{}/", shipping.uri()));
    let client = mock.client_with_cache(config, acommerce_client::MemoryTokenCache::new());

    let partner = ShippingPartnerId::new("kerry");
    let order = ShippingOrderId::new("SH-9");

    let created = client
        .create_shipping_order(
            &partner,
            &order,
            &serde_json::json!({ "shipServiceType": "DELIVERY", "shipPackages": [] }),
        )
        .await
        .unwrap();
    assert_eq!(created["shipOrderId"], "SH-9");

    let fetched = client.shipping_order(&partner, &order).await.unwrap();
    assert_eq!(fetched["shipOrderStatus"], "PENDING");

    assert_eq!(mock.hits("/partner/kerry/order/SH-9").await, 0);
}
