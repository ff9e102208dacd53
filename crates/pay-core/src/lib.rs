//! # pay-core
//!
//! Core types and traits for the Agent Room payment relay.
//!
//! This crate provides:
//! - `OrderGateway` trait for payment provider implementations
//! - `Registrant`, `OrderSpec` and `RegistrationRecord` for the checkout flow
//! - `Currency` with minor-unit conversion
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{Currency, OrderSpec, ReceiptClock, Registrant};
//!
//! let clock = ReceiptClock::new();
//! let spec = OrderSpec::for_registration(500.0, Currency::INR, &registrant, clock.next_receipt());
//!
//! // spec.amount == 50000 (paise)
//! let order = gateway.create_order(&spec).await?;
//! ```

pub mod currency;
pub mod error;
pub mod gateway;
pub mod order;

// Re-exports for convenience
pub use currency::Currency;
pub use error::{PaymentError, PaymentResult};
pub use gateway::{BoxedOrderGateway, OrderGateway};
pub use order::{
    null_as_empty, OrderSpec, ReceiptClock, Registrant, RegistrationRecord, PAID_STATUS,
};
