//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the payment gateway, the registration forwarder and configuration.
//! Everything is built once at startup and handed to handlers via `State`.

use crate::forward::RegistrationForwarder;
use anyhow::Context;
use pay_core::{BoxedOrderGateway, Currency, ReceiptClock};
use pay_razorpay::{RazorpayConfig, RazorpayOrderClient};
use std::sync::Arc;
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Spreadsheet endpoint receiving verified registrations
    pub sheet_webhook_url: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, applying the same defaults as [`AppConfig::from_env`]
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(3000),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            sheet_webhook_url: var("SHEET_WEBHOOK_URL").filter(|url| !url.trim().is_empty()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse::<std::net::SocketAddr>()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Names of required env vars that are not set
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.sheet_webhook_url.is_none() {
            missing.push("SHEET_WEBHOOK_URL");
        }
        missing
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway (order creation + signature checks)
    pub gateway: BoxedOrderGateway,
    /// Registration store client
    pub forwarder: RegistrationForwarder,
    /// Receipt id source
    pub receipts: Arc<ReceiptClock>,
    /// Currency every order is created in
    pub currency: Currency,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState with the Razorpay gateway.
    ///
    /// Missing credentials are logged. In production they abort startup;
    /// elsewhere the service keeps running and the affected requests fail.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let razorpay = RazorpayConfig::from_env();

        let missing: Vec<&str> = razorpay
            .missing_keys()
            .into_iter()
            .chain(config.missing_settings())
            .collect();

        if config.is_production() {
            razorpay
                .validate()
                .map_err(|e| anyhow::anyhow!("Failed to initialize Razorpay: {}", e))?;
            if !missing.is_empty() {
                anyhow::bail!("Missing required configuration: {}", missing.join(", "));
            }
        } else {
            for name in &missing {
                warn!("{} is not set; dependent requests will fail", name);
            }
        }

        if razorpay.is_test_mode() {
            info!("Razorpay running with test keys");
        }

        let currency = razorpay.currency;
        let gateway = RazorpayOrderClient::new(razorpay)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Razorpay: {}", e))?;
        let forwarder = RegistrationForwarder::new(config.sheet_webhook_url.clone())
            .map_err(|e| anyhow::anyhow!("Failed to initialize sheet forwarder: {}", e))?;

        Ok(Self::from_parts(
            config,
            Arc::new(gateway) as BoxedOrderGateway,
            forwarder,
            currency,
        ))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(
        config: AppConfig,
        gateway: BoxedOrderGateway,
        forwarder: RegistrationForwarder,
        currency: Currency,
    ) -> Self {
        Self {
            gateway,
            forwarder,
            receipts: Arc::new(ReceiptClock::new()),
            currency,
            config,
        }
    }
}
