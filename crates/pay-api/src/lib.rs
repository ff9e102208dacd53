//! # pay-api
//!
//! HTTP relay for Agent Room event payments.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Order creation against the payment gateway
//! - Payment signature verification
//! - Forwarding of verified registrations to the spreadsheet store
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/create-order` | Create gateway order |
//! | POST | `/verify-payment` | Verify payment and save registration |

pub mod forward;
pub mod handlers;
pub mod routes;
pub mod state;

pub use forward::{ForwardOutcome, RegistrationForwarder};
pub use routes::create_router;
pub use state::{AppConfig, AppState};
