//! # Order Gateway Trait
//!
//! Seam between the HTTP relay and the payment provider.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            OrderGateway (trait)             │
//! │  ├── create_order()                         │
//! │  ├── verify_payment()                       │
//! │  └── provider_name()                        │
//! └─────────────────────────────────────────────┘
//!                       ▲
//!               ┌───────┴────────┐
//!               │ RazorpayOrder  │
//!               │    Client      │
//!               └────────────────┘
//! ```

use crate::error::PaymentResult;
use crate::order::OrderSpec;
use async_trait::async_trait;
use std::sync::Arc;

/// Payment provider operations used by the relay.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Create an order with the provider.
    ///
    /// # Returns
    /// The provider's order object, untouched, so it can be handed to the
    /// client-side checkout widget as-is.
    async fn create_order(&self, spec: &OrderSpec) -> PaymentResult<serde_json::Value>;

    /// Check the signature the provider issued over an order/payment pair.
    ///
    /// `Ok(false)` means the signature does not match. `Err` means the check
    /// could not be carried out at all (e.g. no secret configured).
    fn verify_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> PaymentResult<bool>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedOrderGateway = Arc<dyn OrderGateway>;
