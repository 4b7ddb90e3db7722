//! Wiremock integration tests for [`HttpApiClient`].
//!
//! These tests verify correct HTTP interaction and error handling using
//! mocked responses.

use comanda::{ComandaError, DashboardApi, HttpApiClient, OrderStatus, OrdersQuery, StoreProfileInput};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HttpApiClient {
    HttpApiClient::new(server.uri()).expect("client should build")
}

#[tokio::test]
async fn get_orders_sends_filters_and_parses_the_page() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!({
        "orders": [{
            "orderId": "ord-1",
            "createdAt": "2024-05-01T12:00:00Z",
            "status": "pending",
            "customerName": "Ada",
            "total": 12990
        }],
        "meta": { "pageIndex": 2, "perPage": 10, "totalCount": 21 }
    });

    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(query_param("pageIndex", "2"))
        .and(query_param("customerName", "Ada"))
        .and(query_param("status", "pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let query = OrdersQuery {
        page_index: 2,
        order_id: None,
        customer_name: Some("Ada".to_string()),
        status: Some(OrderStatus::Pending),
    };
    let page = client(&mock_server).get_orders(&query).await.unwrap();

    assert_eq!(page.orders.len(), 1);
    assert_eq!(page.orders[0].order_id, "ord-1");
    assert_eq!(page.orders[0].status, OrderStatus::Pending);
    assert_eq!(page.meta.total_count, 21);
}

#[tokio::test]
async fn get_order_details_parses_customer_and_items() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!({
        "id": "ord-1",
        "createdAt": "2024-05-01T12:00:00Z",
        "status": "processing",
        "totalInCents": 25980,
        "customer": { "name": "Ada", "email": "ada@example.dev", "phone": null },
        "orderItems": [{
            "id": "item-1",
            "priceInCents": 12990,
            "quantity": 2,
            "product": { "name": "Margherita" }
        }]
    });

    Mock::given(method("GET"))
        .and(path("/orders/ord-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let details = client(&mock_server).get_order_details("ord-1").await.unwrap();
    assert_eq!(details.status, OrderStatus::Processing);
    assert_eq!(details.customer.phone, None);
    assert_eq!(details.order_items[0].product.name, "Margherita");
    assert_eq!(details.order_items[0].quantity, 2);
}

#[tokio::test]
async fn cancel_order_patches_the_cancel_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/orders/ord-1/cancel"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    client(&mock_server).cancel_order("ord-1").await.unwrap();
}

#[tokio::test]
async fn update_profile_puts_the_new_store_data() {
    let mock_server = MockServer::start().await;

    let input = StoreProfileInput {
        name: "New Name".to_string(),
        description: Some("now with pasta".to_string()),
    };

    Mock::given(method("PUT"))
        .and(path("/profile"))
        .and(body_json(serde_json::json!({
            "name": "New Name",
            "description": "now with pasta"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    client(&mock_server).update_profile(&input).await.unwrap();
}

#[tokio::test]
async fn month_revenue_parses_the_delta() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/metrics/month-receipt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "receipt": 150000,
            "diffFromLastMonth": -4.5
        })))
        .mount(&mock_server)
        .await;

    let metric = client(&mock_server).get_month_revenue().await.unwrap();
    assert_eq!(metric.receipt, 150_000);
    assert!((metric.diff_from_last_month + 4.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn daily_revenue_sends_the_period_bounds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/metrics/daily-receipt-in-period"))
        .and(query_param("from", "2024-05-01"))
        .and(query_param("to", "2024-05-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "date": "2024-05-01", "receipt": 9900 }
        ])))
        .mount(&mock_server)
        .await;

    let series = client(&mock_server)
        .get_daily_revenue_in_period(Some("2024-05-01"), Some("2024-05-31"))
        .await
        .unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].receipt, 9_900);
}

// =========================================================================
// Error mapping
// =========================================================================

#[tokio::test]
async fn unauthorized_maps_to_unauthenticated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).get_profile().await;
    assert_eq!(result, Err(ComandaError::Unauthenticated));
}

#[tokio::test]
async fn missing_order_maps_to_not_found_with_the_server_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/ghost"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "message": "order not found" })),
        )
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).get_order_details("ghost").await;
    assert_eq!(result, Err(ComandaError::NotFound("order not found".into())));
}

#[tokio::test]
async fn rejected_input_maps_to_validation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/profile"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "message": "name is required" })),
        )
        .mount(&mock_server)
        .await;

    let input = StoreProfileInput {
        name: "x".to_string(),
        description: None,
    };
    let result = client(&mock_server).update_profile(&input).await;
    assert_eq!(
        result,
        Err(ComandaError::Validation("name is required".into()))
    );
}

#[tokio::test]
async fn server_error_keeps_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sign-out"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).sign_out().await;
    assert_eq!(
        result,
        Err(ComandaError::Api {
            status: 500,
            message: "internal".into()
        })
    );
}

#[tokio::test]
async fn sign_in_posts_the_email() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .and(body_json(serde_json::json!({ "email": "ada@example.dev" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    client(&mock_server).sign_in("ada@example.dev").await.unwrap();
}
