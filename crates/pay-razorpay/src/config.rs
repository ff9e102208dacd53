//! # Razorpay Configuration
//!
//! Credentials and endpoint settings for the Razorpay integration.
//! All secrets are loaded from environment variables.

use pay_core::{Currency, PaymentError, PaymentResult};
use std::env;

const DEFAULT_API_BASE_URL: &str = "https://api.razorpay.com";

/// Razorpay API configuration
#[derive(Clone)]
pub struct RazorpayConfig {
    /// Key id (rzp_test_... or rzp_live_...)
    pub key_id: String,

    /// Key secret, also the HMAC key for payment signatures
    pub key_secret: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Currency every order is created in
    pub currency: Currency,
}

impl RazorpayConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing credentials are left empty rather than rejected, so the
    /// caller decides between degraded startup and aborting
    /// (see [`RazorpayConfig::validate`]).
    ///
    /// Env vars:
    /// - `RAZORPAY_KEY_ID`
    /// - `RAZORPAY_KEY_SECRET`
    /// - `RAZORPAY_API_BASE_URL` (optional)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self {
            key_id: env::var("RAZORPAY_KEY_ID").unwrap_or_default(),
            key_secret: env::var("RAZORPAY_KEY_SECRET").unwrap_or_default(),
            api_base_url: env::var("RAZORPAY_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            currency: Currency::INR,
        }
    }

    /// Create config with explicit values (for testing)
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            currency: Currency::INR,
        }
    }

    /// Names of required env vars that are not set
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.key_id.is_empty() {
            missing.push("RAZORPAY_KEY_ID");
        }
        if self.key_secret.is_empty() {
            missing.push("RAZORPAY_KEY_SECRET");
        }
        missing
    }

    /// Reject incomplete or malformed credentials
    pub fn validate(&self) -> PaymentResult<()> {
        let missing = self.missing_keys();
        if !missing.is_empty() {
            return Err(PaymentError::Configuration(format!(
                "{} not set",
                missing.join(", ")
            )));
        }

        if !self.is_test_mode() && !self.is_live_mode() {
            return Err(PaymentError::Configuration(
                "RAZORPAY_KEY_ID must start with rzp_test_ or rzp_live_".to_string(),
            ));
        }

        Ok(())
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.key_id.starts_with("rzp_test_")
    }

    /// Check if using live keys
    pub fn is_live_mode(&self) -> bool {
        self.key_id.starts_with("rzp_live_")
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("currency", &self.currency)
            .finish()
    }
}
