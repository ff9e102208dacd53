//! # Request Handlers
//!
//! Axum request handlers for the payment relay.
//! Every downstream failure is caught here and mapped to a fixed client-facing
//! body; details only go to the logs.

use crate::forward::ForwardOutcome;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pay_core::{null_as_empty, OrderSpec, Registrant, RegistrationRecord};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

pub const ORDER_FAILED: &str = "Failed to create order";
pub const VERIFICATION_FAILED: &str = "Payment verification failed";
pub const VERIFICATION_ERROR: &str = "Internal server error during verification";
pub const REGISTRATION_SAVED: &str = "Payment verified and registration saved!";
pub const REGISTRATION_NOT_SAVED: &str =
    "Payment verified! (Error saving to sheet, please check server logs)";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create order request
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Amount in decimal currency units
    #[serde(rename = "Amount", default)]
    pub amount: Option<f64>,
    /// Registrant details, attached to the order as notes
    #[serde(flatten)]
    pub registrant: Registrant,
}

/// Verify payment request, as handed back by the checkout widget
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub razorpay_payment_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub razorpay_order_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub razorpay_signature: String,
    #[serde(flatten)]
    pub registrant: Registrant,
}

/// Error response for order creation
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Verification outcome
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub status: &'static str,
    pub message: &'static str,
}

impl VerifyResponse {
    pub fn success(message: &'static str) -> Self {
        Self {
            status: "success",
            message,
        }
    }

    pub fn error(message: &'static str) -> Self {
        Self {
            status: "error",
            message,
        }
    }
}

fn order_failed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(ORDER_FAILED)),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "agentroom-pay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a gateway order for one checkout attempt
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    match payload {
        Ok(Json(request)) => place_order(&state, request).await,
        Err(rejection) => {
            warn!("Rejected create-order body: {}", rejection.body_text());
            Err(order_failed())
        }
    }
}

#[instrument(skip(state, request), fields(event = %request.registrant.event_name))]
async fn place_order(
    state: &AppState,
    request: CreateOrderRequest,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let Some(amount) = request.amount else {
        error!(
            "Error creating {} order: Amount is required",
            state.gateway.provider_name()
        );
        return Err(order_failed());
    };

    let spec = OrderSpec::for_registration(
        amount,
        state.currency,
        &request.registrant,
        state.receipts.next_receipt(),
    );

    info!(
        "Creating order: receipt={}, amount={} {}",
        spec.receipt, spec.amount, spec.currency
    );

    let order = state.gateway.create_order(&spec).await.map_err(|e| {
        error!("Error creating {} order: {}", state.gateway.provider_name(), e);
        order_failed()
    })?;

    Ok(Json(order))
}

/// Verify a payment signature, then record the registration
pub async fn verify_payment(
    State(state): State<AppState>,
    payload: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> (StatusCode, Json<VerifyResponse>) {
    match payload {
        Ok(Json(request)) => settle_payment(&state, request).await,
        Err(rejection) => {
            // Nothing to check a signature against
            warn!("Rejected verify-payment body: {}", rejection.body_text());
            (
                StatusCode::BAD_REQUEST,
                Json(VerifyResponse::error(VERIFICATION_FAILED)),
            )
        }
    }
}

#[instrument(
    skip(state, request),
    fields(order_id = %request.razorpay_order_id, payment_id = %request.razorpay_payment_id)
)]
async fn settle_payment(
    state: &AppState,
    request: VerifyPaymentRequest,
) -> (StatusCode, Json<VerifyResponse>) {
    match state.gateway.verify_payment(
        &request.razorpay_order_id,
        &request.razorpay_payment_id,
        &request.razorpay_signature,
    ) {
        Ok(true) => {}
        Ok(false) => {
            warn!("Payment verification failed: Invalid signature");
            return (
                StatusCode::BAD_REQUEST,
                Json(VerifyResponse::error(VERIFICATION_FAILED)),
            );
        }
        Err(e) => {
            error!("Error during payment verification: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(VerifyResponse::error(VERIFICATION_ERROR)),
            );
        }
    }

    info!("Payment verified");

    let record = RegistrationRecord::paid(request.registrant, request.razorpay_payment_id);

    // The charge already went through; a bookkeeping failure only changes the message
    let message = match state.forwarder.forward(&record).await {
        ForwardOutcome::Saved => REGISTRATION_SAVED,
        ForwardOutcome::Failed(_) => REGISTRATION_NOT_SAVED,
    };

    (StatusCode::OK, Json(VerifyResponse::success(message)))
}
