//! # pay-razorpay
//!
//! Razorpay integration for the Agent Room payment relay.
//!
//! This crate provides:
//!
//! 1. **RazorpayOrderClient** - Orders API client
//!    - Amount in paise, fixed currency
//!    - Registrant details attached as order notes
//!    - Gateway response passed through untouched
//!
//! 2. **Payment signature verification**
//!    - `HMAC-SHA256(key_secret, order_id|payment_id)`, hex encoded
//!    - Constant-time comparison
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_razorpay::{RazorpayConfig, RazorpayOrderClient};
//! use pay_core::OrderGateway;
//!
//! let gateway = RazorpayOrderClient::new(RazorpayConfig::from_env())?;
//!
//! // Create an order for the checkout widget
//! let order = gateway.create_order(&spec).await?;
//!
//! // After checkout, check the signature the widget handed back
//! if gateway.verify_payment(order_id, payment_id, signature)? {
//!     // payment is genuine
//! }
//! ```

pub mod config;
pub mod orders;
pub mod signature;

// Re-exports
pub use config::RazorpayConfig;
pub use orders::RazorpayOrderClient;
pub use signature::{sign_payment, verify_payment_signature};
