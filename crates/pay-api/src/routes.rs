//! # Routes
//!
//! Axum router configuration for the payment relay.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
///   - POST /create-order   - Create a gateway order
///   - POST /verify-payment - Verify signature, record registration
///   - GET  /health         - Health check (also at /)
pub fn create_router(state: AppState) -> Router {
    // The landing page calls in from the browser
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .route("/create-order", post(handlers::create_order))
        .route("/verify-payment", post(handlers::verify_payment))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forward::RegistrationForwarder;
    use crate::handlers::{
        ORDER_FAILED, REGISTRATION_NOT_SAVED, REGISTRATION_SAVED, VERIFICATION_ERROR,
        VERIFICATION_FAILED,
    };
    use crate::state::AppConfig;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use pay_core::{BoxedOrderGateway, Currency};
    use pay_razorpay::{sign_payment, RazorpayConfig, RazorpayOrderClient};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SECRET: &str = "test_secret";

    fn test_state(gateway_url: &str, sheet_url: Option<String>) -> AppState {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            sheet_webhook_url: sheet_url.clone(),
        };
        let razorpay = RazorpayConfig::new("rzp_test_key", SECRET).with_api_base_url(gateway_url);
        let gateway = RazorpayOrderClient::new(razorpay).unwrap();
        let forwarder = RegistrationForwarder::new(sheet_url).unwrap();

        AppState::from_parts(
            config,
            Arc::new(gateway) as BoxedOrderGateway,
            forwarder,
            Currency::INR,
        )
    }

    fn registrant_fields() -> Value {
        json!({
            "FullName": "Asha Rao",
            "Email": "asha@example.com",
            "Phone": "9876543210",
            "OrgName": "Acme",
            "EventName": "Agent Room Bootcamp"
        })
    }

    fn verify_body(signature: &str) -> Value {
        let mut body = registrant_fields();
        body["razorpay_order_id"] = json!("order_Nx1");
        body["razorpay_payment_id"] = json!("pay_Nx1");
        body["razorpay_signature"] = json!(signature);
        body
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        post_raw(app, uri, body.to_string()).await
    }

    async fn post_raw(app: Router, uri: &str, body: impl Into<String>) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.into()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn sheet_replying(reply: ResponseTemplate, expected_calls: u64) -> MockServer {
        let sheet = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply)
            .expect(expected_calls)
            .mount(&sheet)
            .await;
        sheet
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_router(test_state("http://127.0.0.1:1", None));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_order_converts_to_paise() {
        let gateway = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .and(body_partial_json(json!({ "amount": 50000, "currency": "INR" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "order_Nx1",
                "amount": 50000,
                "currency": "INR",
                "status": "created"
            })))
            .expect(2)
            .mount(&gateway)
            .await;

        let app = create_router(test_state(&gateway.uri(), None));
        let mut body = registrant_fields();
        body["Amount"] = json!(500);

        let (status, order) = post_json(app.clone(), "/create-order", body.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(order["id"], "order_Nx1");

        let (status, _) = post_json(app, "/create-order", body).await;
        assert_eq!(status, StatusCode::OK);

        let receipts: Vec<String> = gateway
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| {
                let sent: Value = serde_json::from_slice(&r.body).unwrap();
                sent["receipt"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(receipts.len(), 2);
        assert!(receipts.iter().all(|r| r.starts_with("receipt_")));
        assert_ne!(receipts[0], receipts[1]);
    }

    #[tokio::test]
    async fn test_create_order_gateway_failure() {
        let gateway = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&gateway)
            .await;

        let app = create_router(test_state(&gateway.uri(), None));
        let mut body = registrant_fields();
        body["Amount"] = json!(500);

        let (status, reply) = post_json(app, "/create-order", body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply, json!({ "error": ORDER_FAILED }));
    }

    #[tokio::test]
    async fn test_create_order_without_amount() {
        let app = create_router(test_state("http://127.0.0.1:1", None));

        let (status, reply) = post_json(app, "/create-order", registrant_fields()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply, json!({ "error": ORDER_FAILED }));
    }

    #[tokio::test]
    async fn test_create_order_malformed_body() {
        let app = create_router(test_state("http://127.0.0.1:1", None));

        for body in ["{\"Amount\": 500,", "[1, 2]", "{\"Amount\": \"lots\"}"] {
            let (status, reply) = post_raw(app.clone(), "/create-order", body).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(reply, json!({ "error": ORDER_FAILED }));
        }
    }

    #[tokio::test]
    async fn test_verify_payment_saved() {
        let sheet = sheet_replying(
            ResponseTemplate::new(200).set_body_json(json!({ "result": "success" })),
            1,
        )
        .await;
        let app = create_router(test_state("http://127.0.0.1:1", Some(sheet.uri())));
        let signature = sign_payment("order_Nx1", "pay_Nx1", SECRET).unwrap();

        let (status, reply) = post_json(app, "/verify-payment", verify_body(&signature)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            reply,
            json!({ "status": "success", "message": REGISTRATION_SAVED })
        );
    }

    #[tokio::test]
    async fn test_verify_payment_null_registrant_field() {
        let sheet = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("OrgName=&"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "success" })))
            .expect(1)
            .mount(&sheet)
            .await;
        let app = create_router(test_state("http://127.0.0.1:1", Some(sheet.uri())));
        let signature = sign_payment("order_Nx1", "pay_Nx1", SECRET).unwrap();

        let mut body = verify_body(&signature);
        body["OrgName"] = Value::Null;

        let (status, reply) = post_json(app, "/verify-payment", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            reply,
            json!({ "status": "success", "message": REGISTRATION_SAVED })
        );
    }

    #[tokio::test]
    async fn test_verify_payment_malformed_body_never_forwards() {
        let sheet = sheet_replying(ResponseTemplate::new(200), 0).await;
        let app = create_router(test_state("http://127.0.0.1:1", Some(sheet.uri())));

        for body in ["not json", "{\"razorpay_order_id\": 42}"] {
            let (status, reply) = post_raw(app.clone(), "/verify-payment", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                reply,
                json!({ "status": "error", "message": VERIFICATION_FAILED })
            );
        }
    }

    #[tokio::test]
    async fn test_verify_payment_sheet_failures_still_succeed() {
        let signature = sign_payment("order_Nx1", "pay_Nx1", SECRET).unwrap();

        let replies = [
            ResponseTemplate::new(200).set_body_json(json!({ "result": "error", "message": "quota" })),
            ResponseTemplate::new(200).set_body_string("not json"),
            ResponseTemplate::new(500),
        ];

        for reply in replies {
            let sheet = sheet_replying(reply, 1).await;
            let app = create_router(test_state("http://127.0.0.1:1", Some(sheet.uri())));

            let (status, body) = post_json(app, "/verify-payment", verify_body(&signature)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(
                body,
                json!({ "status": "success", "message": REGISTRATION_NOT_SAVED })
            );
        }

        // Unreachable store
        let app = create_router(test_state("http://127.0.0.1:1", Some("http://127.0.0.1:1".into())));
        let (status, body) = post_json(app, "/verify-payment", verify_body(&signature)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], REGISTRATION_NOT_SAVED);
    }

    #[tokio::test]
    async fn test_verify_payment_bad_signature_never_forwards() {
        let sheet = sheet_replying(
            ResponseTemplate::new(200).set_body_json(json!({ "result": "success" })),
            0,
        )
        .await;
        let app = create_router(test_state("http://127.0.0.1:1", Some(sheet.uri())));
        let forged = sign_payment("order_Nx1", "pay_other", SECRET).unwrap();

        let (status, reply) = post_json(app, "/verify-payment", verify_body(&forged)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            reply,
            json!({ "status": "error", "message": VERIFICATION_FAILED })
        );
    }

    #[tokio::test]
    async fn test_verify_payment_missing_ids_is_mismatch() {
        let sheet = sheet_replying(ResponseTemplate::new(200), 0).await;
        let app = create_router(test_state("http://127.0.0.1:1", Some(sheet.uri())));

        let (status, reply) = post_json(app, "/verify-payment", registrant_fields()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["status"], "error");
    }

    #[tokio::test]
    async fn test_verify_payment_without_secret() {
        let sheet = sheet_replying(ResponseTemplate::new(200), 0).await;
        let gateway = RazorpayOrderClient::new(RazorpayConfig::new("rzp_test_key", "")).unwrap();
        let state = AppState::from_parts(
            AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                environment: "test".to_string(),
                sheet_webhook_url: Some(sheet.uri()),
            },
            Arc::new(gateway) as BoxedOrderGateway,
            RegistrationForwarder::new(Some(sheet.uri())).unwrap(),
            Currency::INR,
        );

        let (status, reply) =
            post_json(create_router(state), "/verify-payment", verify_body("abc")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            reply,
            json!({ "status": "error", "message": VERIFICATION_ERROR })
        );
    }
}
