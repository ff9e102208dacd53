//! # Razorpay Orders
//!
//! Implementation of the Razorpay Orders API.
//! An order must exist before the client-side checkout widget can collect a
//! payment against it.

use crate::config::RazorpayConfig;
use crate::signature::verify_payment_signature;
use async_trait::async_trait;
use pay_core::{OrderGateway, OrderSpec, PaymentError, PaymentResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

/// Razorpay order client
///
/// Built once at startup and shared by every request.
pub struct RazorpayOrderClient {
    config: RazorpayConfig,
    client: Client,
}

impl RazorpayOrderClient {
    /// Create a new Razorpay order client
    pub fn new(config: RazorpayConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl OrderGateway for RazorpayOrderClient {
    #[instrument(skip(self, spec), fields(receipt = %spec.receipt, amount = spec.amount))]
    async fn create_order(&self, spec: &OrderSpec) -> PaymentResult<serde_json::Value> {
        if !self.config.missing_keys().is_empty() {
            return Err(PaymentError::Configuration(format!(
                "{} not set",
                self.config.missing_keys().join(", ")
            )));
        }

        debug!(
            "Creating Razorpay order: amount={} {}",
            spec.amount, spec.currency
        );

        let url = format!("{}/v1/orders", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(spec)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Razorpay API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<RazorpayErrorResponse>(&body) {
                return Err(PaymentError::ProviderError {
                    provider: "razorpay".to_string(),
                    message: error_response.error.description,
                });
            }

            return Err(PaymentError::ProviderError {
                provider: "razorpay".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let order: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Razorpay response: {}", e))
        })?;

        info!(
            "Created Razorpay order: id={}",
            order.get("id").and_then(|v| v.as_str()).unwrap_or("unknown")
        );

        Ok(order)
    }

    fn verify_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> PaymentResult<bool> {
        verify_payment_signature(order_id, payment_id, signature, &self.config.key_secret)
    }

    fn provider_name(&self) -> &'static str {
        "razorpay"
    }
}

// =============================================================================
// Razorpay API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct RazorpayErrorResponse {
    error: RazorpayError,
}

#[derive(Debug, Deserialize)]
struct RazorpayError {
    #[serde(default)]
    description: String,
}
