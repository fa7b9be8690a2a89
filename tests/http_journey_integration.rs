//! End-to-end HTTP tests: an applicant's path from registration to a
//! confirmed seat, driven through the axum router with tower's `oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use admissions_engine::adapters::http::{app_router, AppState};
use admissions_engine::adapters::notifier::InMemoryNotifier;
use admissions_engine::adapters::payment::MockPaymentGateway;
use admissions_engine::config::AppConfig;
use admissions_engine::domain::applicant::LoginIdentifier;
use admissions_engine::ports::NotificationKind;

// =============================================================================
// Test Infrastructure
// =============================================================================

const EMAIL: &str = "ada@example.com";
const REVIEWER: &str = "reviewer-1";

struct TestApp {
    router: Router,
    notifier: InMemoryNotifier,
}

impl TestApp {
    fn new() -> Self {
        let notifier = InMemoryNotifier::new();
        let state = AppState::in_memory(
            &AppConfig::default(),
            Arc::new(MockPaymentGateway::new()),
            Arc::new(notifier.clone()),
        )
        .unwrap();
        Self {
            router: app_router(state, Duration::from_secs(5)),
            notifier,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::get(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post(&self, uri: &str, body: Value, headers: &[(&str, &str)]) -> (StatusCode, Value) {
        let mut builder = Request::post(uri).header("Content-Type", "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn register(&self) -> Value {
        self.register_as(EMAIL).await
    }

    async fn register_as(&self, email: &str) -> Value {
        let (status, body) = self
            .post("/api/applicants", json!({ "email": email, "display_name": "Ada" }), &[])
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    async fn login(&self) -> String {
        self.login_as(EMAIL).await
    }

    async fn login_as(&self, email: &str) -> String {
        let (status, _) = self
            .post("/api/auth/otp", json!({ "identifier": email }), &[])
            .await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let identifier = LoginIdentifier::parse(email).unwrap();
        let code = self
            .notifier
            .last_code_for(&identifier, NotificationKind::LoginCode)
            .await
            .expect("login code delivered");

        let (status, body) = self
            .post(
                "/api/auth/otp/verify",
                json!({ "identifier": email, "code": code }),
                &[],
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["token_type"], "Bearer");
        body["token"].as_str().unwrap().to_string()
    }

    async fn decide(&self, applicant_id: &str, from: u32, decision: &str) -> (StatusCode, Value) {
        self.post(
            &format!("/api/applicants/{}/decisions", applicant_id),
            json!({ "from_stage": from, "decision": decision }),
            &[("X-Actor-Id", REVIEWER)],
        )
        .await
    }

    /// Registers an applicant and selects them through to the fee-bearing final stage.
    async fn finalist(&self) -> (String, String) {
        let applicant = self.register().await;
        let id = applicant["id"].as_str().unwrap().to_string();
        let registration_id = applicant["registration_id"].as_str().unwrap().to_string();
        for from in 0..3 {
            let (status, body) = self.decide(&id, from, "selected").await;
            assert_eq!(status, StatusCode::OK, "{}", body);
        }
        (id, registration_id)
    }

    async fn webhook(&self, order_id: &str, status: &str) -> (StatusCode, Value) {
        self.post(
            "/api/webhooks/payment",
            json!({ "order_id": order_id, "status": status, "tracking_id": "trk_1" }),
            &[],
        )
        .await
    }
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn otp_login_yields_a_working_token() {
    let app = TestApp::new();
    app.register().await;
    let token = app.login().await;

    let (status, me) = app.get("/api/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["applicant"]["email"], EMAIL);
    assert_eq!(me["stage"]["stage"], 0);
    assert_eq!(me["stage"]["status"], "active");
}

#[tokio::test]
async fn otp_request_looks_the_same_for_unknown_identifiers() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/api/auth/otp", json!({ "identifier": "nobody@example.com" }), &[])
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(body["expires_in_secs"].as_u64().unwrap() > 0);
    assert!(app.notifier.delivered().await.is_empty());
}

#[tokio::test]
async fn login_code_cannot_be_used_twice() {
    let app = TestApp::new();
    app.register().await;
    app.post("/api/auth/otp", json!({ "identifier": EMAIL }), &[])
        .await;
    let identifier = LoginIdentifier::parse(EMAIL).unwrap();
    let code = app
        .notifier
        .last_code_for(&identifier, NotificationKind::LoginCode)
        .await
        .unwrap();

    let verify = json!({ "identifier": EMAIL, "code": code });
    let (first, _) = app.post("/api/auth/otp/verify", verify.clone(), &[]).await;
    let (second, body) = app.post("/api/auth/otp/verify", verify, &[]).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "NO_ACTIVE_CHALLENGE");
}

#[tokio::test]
async fn wrong_code_reports_mismatch() {
    let app = TestApp::new();
    app.register().await;
    app.post("/api/auth/otp", json!({ "identifier": EMAIL }), &[])
        .await;

    let identifier = LoginIdentifier::parse(EMAIL).unwrap();
    let code = app
        .notifier
        .last_code_for(&identifier, NotificationKind::LoginCode)
        .await
        .unwrap();
    let wrong: String = code
        .chars()
        .map(|c| if c == '0' { '1' } else { '0' })
        .collect();

    let (status, body) = app
        .post(
            "/api/auth/otp/verify",
            json!({ "identifier": EMAIL, "code": wrong }),
            &[],
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "MISMATCH");
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let app = TestApp::new();
    app.register().await;
    let token = app.login().await;
    let bearer = format!("Bearer {}", token);

    let (status, body) = app
        .post("/api/auth/logout", json!({}), &[("Authorization", &bearer)])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["revoked"], true);

    let (status, _) = app.get("/api/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, again) = app
        .post("/api/auth/logout", json!({}), &[("Authorization", &bearer)])
        .await;
    assert_eq!(again["revoked"], false);
}

// =============================================================================
// Stage progression
// =============================================================================

#[tokio::test]
async fn decisions_are_recorded_in_history() {
    let app = TestApp::new();
    let applicant = app.register().await;
    let id = applicant["id"].as_str().unwrap();

    let (status, body) = app.decide(id, 0, "selected").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["record"]["next_stage"], 1);
    assert_eq!(body["applicant"]["current_stage"], 1);

    let (status, body) = app.decide(id, 0, "selected").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "STAGE_MISMATCH");

    let (_, history) = app.get(&format!("/api/applicants/{}/selections", id), None).await;
    let records = history["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["actor"], REVIEWER);
}

#[tokio::test]
async fn bulk_import_reports_each_row() {
    let app = TestApp::new();
    let first = app.register().await;
    let (_, second) = app
        .post("/api/applicants", json!({ "phone": "+14155550100" }), &[])
        .await;

    let rows = json!({ "rows": [
        { "applicant_ref": first["registration_id"], "from_stage": 0, "decision": "selected" },
        { "applicant_ref": second["id"], "from_stage": 2, "decision": "selected" },
        { "applicant_ref": "REG-ZZZZZZZZ", "from_stage": 0, "decision": "selected" },
    ]});
    let (status, summary) = app
        .post("/api/selections/bulk", rows, &[("X-Actor-Id", REVIEWER)])
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["applied"], 1);
    assert_eq!(summary["failed"], 2);

    let second_id = second["id"].as_str().unwrap();
    let (_, stage) = app
        .get(&format!("/api/applicants/{}/stage", second_id), None)
        .await;
    assert_eq!(stage["stage"], 0);
}

#[tokio::test]
async fn withdrawn_applicant_takes_no_more_decisions() {
    let app = TestApp::new();
    let applicant = app.register().await;
    let id = applicant["id"].as_str().unwrap();

    let (status, body) = app
        .post(&format!("/api/applicants/{}/withdraw", id), json!({}), &[])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "withdrawn");

    let (status, _) = app.decide(id, 0, "selected").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// =============================================================================
// Payment and confirmation
// =============================================================================

#[tokio::test]
async fn finalist_pays_and_confirms() {
    let app = TestApp::new();
    let (applicant_id, registration_id) = app.finalist().await;
    let token = app.login().await;
    let bearer = format!("Bearer {}", token);

    let (_, me) = app.get("/api/me", Some(&token)).await;
    assert_eq!(me["stage"]["status"], "awaiting_payment");
    assert_eq!(me["stage"]["payment_due"], true);

    let (status, order) = app
        .post(
            "/api/payments/orders",
            json!({ "payment_type": "final_round_fee" }),
            &[("Authorization", &bearer)],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", order);
    assert_eq!(order["applicant_id"], applicant_id.as_str());
    assert_eq!(order["amount_minor"], 2500);
    assert_eq!(order["status"], "created");
    let order_id = order["id"].as_str().unwrap().to_string();

    let (status, duplicate) = app
        .post(
            "/api/payments/orders",
            json!({ "payment_type": "final_round_fee" }),
            &[("Authorization", &bearer)],
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(duplicate["code"], "DUPLICATE_ACTIVE_ORDER");

    let (status, first) = app.webhook(&order_id, "success").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["changed"], true);
    assert_eq!(first["settled"], true);

    let (status, redelivered) = app.webhook(&order_id, "success").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(redelivered["changed"], false);

    let (status, late_failure) = app.webhook(&order_id, "failed").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(late_failure["code"], "INVALID_TRANSITION");

    let (_, stored) = app
        .get(&format!("/api/payments/orders/{}", order_id), Some(&token))
        .await;
    assert_eq!(stored["status"], "success");

    let (status, retry) = app
        .post(
            &format!("/api/payments/orders/{}/retry", order_id),
            json!({}),
            &[("Authorization", &bearer)],
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(retry["code"], "INVALID_TRANSITION");

    let (status, issued) = app
        .post("/api/confirmations", json!({ "registration_id": registration_id }), &[])
        .await;
    assert_eq!(status, StatusCode::OK, "{}", issued);
    assert_eq!(issued["newly_issued"], true);

    let identifier = LoginIdentifier::parse(EMAIL).unwrap();
    let code = app
        .notifier
        .last_code_for(&identifier, NotificationKind::ConfirmationCode)
        .await
        .expect("confirmation code delivered");

    let (status, confirmed) = app
        .post("/api/confirmations/confirm", json!({ "code": code }), &[])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["already_confirmed"], false);
    assert_eq!(confirmed["applicant"]["status"], "confirmed");

    let (status, again) = app
        .post("/api/confirmations/confirm", json!({ "code": code.to_lowercase() }), &[])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["already_confirmed"], true);
}

#[tokio::test]
async fn cancelled_order_can_be_retried() {
    let app = TestApp::new();
    app.finalist().await;
    let token = app.login().await;
    let bearer = format!("Bearer {}", token);

    let (_, order) = app
        .post(
            "/api/payments/orders",
            json!({ "payment_type": "final_round_fee" }),
            &[("Authorization", &bearer)],
        )
        .await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let (status, _) = app.webhook(&order_id, "cancelled").await;
    assert_eq!(status, StatusCode::OK);

    let (status, retried) = app
        .post(
            &format!("/api/payments/orders/{}/retry", order_id),
            json!({}),
            &[("Authorization", &bearer)],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", retried);
    assert_ne!(retried["id"], order["id"]);
    assert_eq!(retried["retry_of"], order["id"]);
    assert_eq!(retried["status"], "created");

    let (_, original) = app
        .get(&format!("/api/payments/orders/{}", order_id), Some(&token))
        .await;
    assert_eq!(original["status"], "cancelled");
}

#[tokio::test]
async fn orders_are_private_to_their_applicant() {
    let app = TestApp::new();
    app.finalist().await;
    let owner = format!("Bearer {}", app.login().await);
    let (_, order) = app
        .post(
            "/api/payments/orders",
            json!({ "payment_type": "final_round_fee" }),
            &[("Authorization", &owner)],
        )
        .await;
    let order_id = order["id"].as_str().unwrap().to_string();
    let (status, _) = app.webhook(&order_id, "failed").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/payments/orders/{}", order_id), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.register_as("grace@example.com").await;
    let other_token = app.login_as("grace@example.com").await;
    let other = format!("Bearer {}", other_token);

    let (status, body) = app
        .get(&format!("/api/payments/orders/{}", order_id), Some(&other_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "UNKNOWN_ORDER");

    for action in ["retry", "poll"] {
        let (status, body) = app
            .post(
                &format!("/api/payments/orders/{}/{}", order_id, action),
                json!({}),
                &[("Authorization", &other)],
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", action);
        assert_eq!(body["code"], "UNKNOWN_ORDER");
    }

    // The owner's failed order is untouched and still retryable
    let (status, _) = app
        .post(
            &format!("/api/payments/orders/{}/retry", order_id),
            json!({}),
            &[("Authorization", &owner)],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn confirmation_needs_a_finalist() {
    let app = TestApp::new();
    let applicant = app.register().await;

    let (status, body) = app
        .post(
            "/api/confirmations",
            json!({ "registration_id": applicant["registration_id"] }),
            &[],
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "APPLICANT_NOT_ELIGIBLE");
}

#[tokio::test]
async fn unknown_confirmation_code_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/api/confirmations/confirm", json!({ "code": "ZZZZZZZZ" }), &[])
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "UNKNOWN_CODE");
}
