//! End-to-end tests through the router against an in-memory database.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use coop_api::{
    AppState, create_router,
    notifications::{NoopNotifier, OrderNotifier},
};
use coop_core::orders::OrderNotice;
use coop_db::migration::{Migrator, MigratorTrait};
use coop_shared::{
    AppConfig, BusinessConfig, EmailConfig, EmailError,
    config::{DatabaseConfig, JwtConfig, ServerConfig},
};
use http_body_util::BodyExt;
use rstest::rstest;
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            expose_internal_errors: false,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test-secret-key-for-api-tests".to_string(),
            access_token_expiry_secs: 900,
        },
        email: EmailConfig::default(),
        business: BusinessConfig::default(),
    }
}

async fn test_state() -> AppState {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");

    AppState::new(db, test_config()).with_notifier(Arc::new(NoopNotifier))
}

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_state(test_state().await)
    }

    fn with_state(state: AppState) -> Self {
        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    fn token(&self, role: &str) -> String {
        self.state
            .jwt_service
            .generate_access_token(Uuid::now_v7(), role)
            .expect("token")
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }
}

async fn create_customer(app: &TestApp, staff: &str, name: &str) -> Value {
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/customers",
            Some(staff),
            Some(json!({ "name": name, "customer_type": "retailer" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn create_batch(app: &TestApp, staff: &str, birds: i32) -> Value {
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/batches",
            Some(staff),
            Some(json!({
                "batch_name": "House A",
                "bird_type": "layer",
                "initial_count": birds,
                "acquisition_date": "2026-06-01",
                "acquisition_cost": 1_500_000
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/api/v1/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": "  Grace@Example.com ",
                "password": "layers-and-broilers",
                "full_name": "Grace Achieng"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["user"]["email"], "grace@example.com");
    assert_eq!(body["user"]["role"], "customer");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": "grace@example.com",
                "password": "another-password",
                "full_name": "Grace Again"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "GRACE@example.com", "password": "layers-and-broilers" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let token = body["access_token"].as_str().expect("token").to_string();

    let (status, body) = app.send(Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Grace Achieng");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "grace@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[rstest]
#[case::anonymous(None, StatusCode::UNAUTHORIZED)]
#[case::customer(Some("customer"), StatusCode::FORBIDDEN)]
#[case::employee(Some("employee"), StatusCode::OK)]
#[case::admin(Some("admin"), StatusCode::OK)]
#[tokio::test]
async fn test_staff_routes_require_staff_role(
    #[case] role: Option<&str>,
    #[case] expected: StatusCode,
) {
    let app = TestApp::new().await;
    let token = role.map(|r| app.token(r));
    let (status, _) = app
        .send(Method::GET, "/api/v1/customers", token.as_deref(), None)
        .await;
    assert_eq!(status, expected);
}

#[tokio::test]
async fn test_bad_token_is_rejected_even_on_public_routes() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(Method::GET, "/api/v1/settings", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = app.send(Method::GET, "/api/v1/settings", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_deletes_require_admin() {
    let app = TestApp::new().await;
    let employee = app.token("employee");
    let customer = create_customer(&app, &employee, "Mama Rose").await;
    let uri = format!("/api/v1/customers/{}", customer["id"].as_str().expect("id"));

    let (status, _) = app.send(Method::DELETE, &uri, Some(&employee), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.token("admin");
    let (status, _) = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Already gone: still a success.
    let (status, _) = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(Method::GET, &uri, Some(&employee), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_customer_contact_can_be_cleared() {
    let app = TestApp::new().await;
    let staff = app.token("employee");
    let customer = create_customer(&app, &staff, "Nakato Kiosk").await;
    let uri = format!("/api/v1/customers/{}", customer["id"].as_str().expect("id"));

    let (status, body) = app
        .send(
            Method::PUT,
            &uri,
            Some(&staff),
            Some(json!({ "email": "Nakato@Example.com", "phone": "+256 700 111222" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["email"], "nakato@example.com");

    // Absent fields stay as they are.
    let (status, body) = app
        .send(Method::PUT, &uri, Some(&staff), Some(json!({ "notes": "Pays on Fridays" })))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["email"], "nakato@example.com");
    assert_eq!(body["phone"], "+256 700 111222");

    // Explicit null clears.
    let (status, body) = app
        .send(Method::PUT, &uri, Some(&staff), Some(json!({ "email": null })))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["email"].is_null());
    assert_eq!(body["phone"], "+256 700 111222");
    assert_eq!(body["notes"], "Pays on Fridays");
}

#[tokio::test]
async fn test_sales_move_the_customer_ledger() {
    let app = TestApp::new().await;
    let staff = app.token("employee");
    let admin = app.token("admin");
    let customer = create_customer(&app, &staff, "Kato Stores").await;
    let customer_id = customer["id"].as_str().expect("id").to_string();
    let customer_uri = format!("/api/v1/customers/{customer_id}");

    let (status, first) = app
        .send(
            Method::POST,
            "/api/v1/sales",
            Some(&staff),
            Some(json!({
                "customer_id": customer_id,
                "sale_date": "2026-10-01",
                "sale_type": "eggs",
                "quantity": 10,
                "unit_price": 12_000
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{first}");
    assert_eq!(first["total_amount"], 120_000);
    assert_eq!(first["payment_status"], "pending");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/sales",
            Some(&staff),
            Some(json!({
                "customer_id": customer_id,
                "sale_date": "2026-10-02",
                "sale_type": "manure",
                "quantity": 3,
                "unit_price": 5_000,
                "payment_status": "paid",
                "payment_method": "mobile_money"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.send(Method::GET, &customer_uri, Some(&staff), None).await;
    assert_eq!(body["total_purchases"], 135_000);

    // A customer with sales cannot be removed.
    let (status, body) = app.send(Method::DELETE, &customer_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let sale_uri = format!("/api/v1/sales/{}", first["id"].as_str().expect("id"));
    let (status, _) = app.send(Method::DELETE, &sale_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send(Method::DELETE, &sale_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.send(Method::GET, &customer_uri, Some(&staff), None).await;
    assert_eq!(body["total_purchases"], 15_000);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/sales?customer_id={customer_id}&page=1&per_page=10"),
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["sale_type"], "manure");
}

#[rstest]
#[case::zero_quantity(0, 12_000)]
#[case::negative_price(5, -1)]
#[tokio::test]
async fn test_invalid_sale_is_rejected_without_touching_the_ledger(
    #[case] quantity: i32,
    #[case] unit_price: i64,
) {
    let app = TestApp::new().await;
    let staff = app.token("employee");
    let customer = create_customer(&app, &staff, "Nakato").await;
    let customer_id = customer["id"].as_str().expect("id");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/sales",
            Some(&staff),
            Some(json!({
                "customer_id": customer_id,
                "sale_date": "2026-10-01",
                "sale_type": "eggs",
                "quantity": quantity,
                "unit_price": unit_price
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["error"], "validation_error");

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/customers/{customer_id}"),
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(body["total_purchases"], 0);
}

#[tokio::test]
async fn test_sale_for_unknown_customer_is_not_found() {
    let app = TestApp::new().await;
    let staff = app.token("employee");
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/sales",
            Some(&staff),
            Some(json!({
                "customer_id": Uuid::now_v7(),
                "sale_date": "2026-10-01",
                "sale_type": "eggs",
                "quantity": 1,
                "unit_price": 12_000
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_mortality_reduces_live_count_and_refuses_overdraw() {
    let app = TestApp::new().await;
    let staff = app.token("employee");
    let batch = create_batch(&app, &staff, 100).await;
    let batch_id = batch["id"].as_str().expect("id").to_string();
    assert_eq!(batch["current_count"], 100);

    let (status, event) = app
        .send(
            Method::POST,
            "/api/v1/health-records",
            Some(&staff),
            Some(json!({
                "batch_id": batch_id,
                "record_date": "2026-10-03",
                "record_type": "mortality",
                "description": "Heat stress",
                "mortality_count": 5
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{event}");
    assert_eq!(event["batch_current_count"], 95);
    assert_eq!(event["mortality_count"], 5);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/health-records",
            Some(&staff),
            Some(json!({
                "batch_id": batch_id,
                "record_date": "2026-10-04",
                "record_type": "mortality",
                "description": "Disease outbreak",
                "mortality_count": 96
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
    assert_eq!(body["error"], "business_rule_violation");

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/batches/{batch_id}"),
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(body["current_count"], 95);

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/health-records?batch_id={batch_id}"),
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_egg_and_feed_records() {
    let app = TestApp::new().await;
    let staff = app.token("employee");
    let batch = create_batch(&app, &staff, 50).await;
    let batch_id = batch["id"].as_str().expect("id").to_string();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/egg-production",
            Some(&staff),
            Some(json!({
                "batch_id": batch_id,
                "record_date": "2026-10-05",
                "eggs_collected": 40,
                "broken_eggs": 41
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/egg-production",
            Some(&staff),
            Some(json!({
                "batch_id": batch_id,
                "record_date": "2026-10-05",
                "eggs_collected": 40,
                "broken_eggs": 2
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/feed-records",
            Some(&staff),
            Some(json!({
                "batch_id": batch_id,
                "record_date": "2026-10-05",
                "feed_type": "Layers mash",
                "quantity_kg": "12.5",
                "cost": 25_000
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/egg-production?batch_id={batch_id}&from=2026-10-01&to=2026-10-31"),
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(body[0]["eggs_collected"], 40);

    let (_, body) = app
        .send(
            Method::GET,
            "/api/v1/feed-records?from=2026-11-01",
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_batch_with_records_cannot_be_deleted() {
    let app = TestApp::new().await;
    let staff = app.token("employee");
    let admin = app.token("admin");
    let batch = create_batch(&app, &staff, 20).await;
    let batch_id = batch["id"].as_str().expect("id").to_string();

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/egg-production",
            Some(&staff),
            Some(json!({
                "batch_id": batch_id,
                "record_date": "2026-10-05",
                "eggs_collected": 15
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/v1/batches/{batch_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_expense_amount_must_be_positive() {
    let app = TestApp::new().await;
    let staff = app.token("employee");
    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/expenses",
            Some(&staff),
            Some(json!({
                "expense_date": "2026-10-05",
                "category": "feed",
                "description": "Layers mash x10",
                "amount": 0
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/expenses",
            Some(&staff),
            Some(json!({
                "expense_date": "2026-10-05",
                "category": "feed",
                "description": "Layers mash x10",
                "amount": 950_000,
                "vendor": "Ugachick"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["amount"], 950_000);
}

/// Forwards every notice to the test.
struct RecordingNotifier(mpsc::UnboundedSender<OrderNotice>);

#[async_trait]
impl OrderNotifier for RecordingNotifier {
    async fn order_placed(&self, notice: &OrderNotice) -> Result<(), EmailError> {
        let _ = self.0.send(notice.clone());
        Ok(())
    }
}

/// Always fails to deliver.
struct BrokenNotifier;

#[async_trait]
impl OrderNotifier for BrokenNotifier {
    async fn order_placed(&self, _notice: &OrderNotice) -> Result<(), EmailError> {
        Err(EmailError::SendError("relay refused".to_string()))
    }
}

fn order_body() -> Value {
    json!({
        "customer_name": "Joan",
        "customer_phone": "+256700000001",
        "customer_email": "Joan@Example.com",
        "delivery_address": "Plot 4, Ntinda",
        "items": [
            { "product": "eggs_tray", "quantity": 3, "unit": "tray", "unit_price": 1 },
            { "product": "manure_bag", "quantity": 1, "unit_price": 8_000 }
        ]
    })
}

#[tokio::test]
async fn test_public_order_placement_uses_catalog_prices_and_notifies() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let state = test_state().await.with_notifier(Arc::new(RecordingNotifier(tx)));
    let app = TestApp::with_state(state);
    let admin = app.token("admin");

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/v1/settings/price.eggs_tray",
            Some(&admin),
            Some(json!({ "value": "12000" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, order) = app
        .send(Method::POST, "/api/v1/orders", None, Some(order_body()))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(order["status"], "new");
    assert_eq!(order["total_amount"], 44_000);
    assert_eq!(order["customer_email"], "joan@example.com");
    assert_eq!(order["items"].as_array().map(Vec::len), Some(2));

    let notice = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("notification sent")
        .expect("channel open");
    assert_eq!(notice.order_number, order["order_number"].as_str().expect("number"));
    assert_eq!(notice.total_amount.minor(), 44_000);
}

#[tokio::test]
async fn test_order_survives_notification_failure() {
    let state = test_state().await.with_notifier(Arc::new(BrokenNotifier));
    let app = TestApp::with_state(state);
    let staff = app.token("employee");

    let (status, order) = app
        .send(Method::POST, "/api/v1/orders", None, Some(order_body()))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{order}");

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/orders/{}", order["id"].as_str().expect("id")),
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_number"], order["order_number"]);
}

#[rstest]
#[case::no_items(json!({ "customer_name": "Joan", "customer_phone": "0700", "items": [] }))]
#[case::no_phone(json!({
    "customer_name": "Joan",
    "customer_phone": "  ",
    "items": [{ "product": "eggs_tray", "quantity": 1, "unit_price": 100 }]
}))]
#[case::zero_quantity(json!({
    "customer_name": "Joan",
    "customer_phone": "0700",
    "items": [{ "product": "eggs_tray", "quantity": 0, "unit_price": 100 }]
}))]
#[tokio::test]
async fn test_invalid_orders_are_rejected(#[case] body: Value) {
    let app = TestApp::new().await;
    let (status, response) = app
        .send(Method::POST, "/api/v1/orders", None, Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{response}");
    assert_eq!(response["error"], "validation_error");
}

#[tokio::test]
async fn test_order_status_workflow() {
    let app = TestApp::new().await;
    let staff = app.token("employee");
    let (_, order) = app
        .send(Method::POST, "/api/v1/orders", None, Some(order_body()))
        .await;
    let status_uri = format!("/api/v1/orders/{}/status", order["id"].as_str().expect("id"));

    let (status, _) = app
        .send(
            Method::PATCH,
            &status_uri,
            None,
            Some(json!({ "status": "confirmed" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Method::PATCH,
            &status_uri,
            Some(&staff),
            Some(json!({ "status": "Confirmed" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    for next in ["confirmed", "processing", "processing", "delivered"] {
        let (status, body) = app
            .send(
                Method::PATCH,
                &status_uri,
                Some(&staff),
                Some(json!({ "status": next })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{next}: {body}");
        assert_eq!(body["status"], next);
    }

    let (status, body) = app
        .send(
            Method::PATCH,
            &status_uri,
            Some(&staff),
            Some(json!({ "status": "cancelled" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");

    let (status, body) = app
        .send(
            Method::PATCH,
            &status_uri,
            Some(&staff),
            Some(json!({ "status": "shipped" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = app
        .send(Method::GET, "/api/v1/orders?status=delivered", Some(&staff), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
}

#[tokio::test]
async fn test_settings_are_public_to_read_and_admin_to_write() {
    let app = TestApp::new().await;
    let staff = app.token("employee");
    let admin = app.token("admin");

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/v1/settings/contact_phone",
            Some(&staff),
            Some(json!({ "value": "+256700123456" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/v1/settings/price.eggs_tray",
            Some(&admin),
            Some(json!({ "value": "twelve" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/v1/settings/contact_phone",
            Some(&admin),
            Some(json!({ "value": "+256700123456" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(Method::GET, "/api/v1/settings/contact_phone", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], "+256700123456");

    let (status, _) = app
        .send(Method::DELETE, "/api/v1/settings/contact_phone", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .send(Method::GET, "/api/v1/settings/contact_phone", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_endpoints() {
    let app = TestApp::new().await;
    let staff = app.token("employee");
    create_batch(&app, &staff, 120).await;

    let (status, stats) = app
        .send(Method::GET, "/api/v1/dashboard/stats", Some(&staff), None)
        .await;
    assert_eq!(status, StatusCode::OK, "{stats}");
    assert_eq!(stats["flock"]["live_birds"], 120);
    assert_eq!(stats["flock"]["active_batches"], 1);

    let (status, points) = app
        .send(
            Method::GET,
            "/api/v1/dashboard/charts/eggs?days=7",
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(points.as_array().map(Vec::len), Some(7));

    let (_, points) = app
        .send(
            Method::GET,
            "/api/v1/dashboard/charts/finance?months=1000",
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(points.as_array().map(Vec::len), Some(24));

    let (status, items) = app
        .send(
            Method::GET,
            "/api/v1/dashboard/recent-activity?limit=5",
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(items.as_array().is_some_and(|a| a.len() <= 5));

    let customer = app.token("customer");
    let (status, _) = app
        .send(Method::GET, "/api/v1/dashboard/stats", Some(&customer), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_malformed_json_uses_error_body() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/orders")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let response = app.router.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["error"], "validation_error");
}
