//! # Registration Forwarding
//!
//! Posts verified registrations to the spreadsheet-backed store (a Google
//! Apps Script web app). The store answers with `{"result": "success"}` when
//! the row was written.
//!
//! Forwarding never fails the caller: the payment is already verified by the
//! time a record gets here, so every failure collapses into
//! [`ForwardOutcome::Failed`] and is reconciled by hand.

use pay_core::{PaymentError, PaymentResult, RegistrationRecord};
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info, instrument};

/// Result of one forwarding attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// The store confirmed the row
    Saved,
    /// Anything else; carries the logged reason
    Failed(String),
}

impl ForwardOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, ForwardOutcome::Saved)
    }
}

/// Client for the registration store
#[derive(Clone)]
pub struct RegistrationForwarder {
    client: Client,
    endpoint: Option<String>,
}

impl RegistrationForwarder {
    /// Create a forwarder. `None` means no store is configured and every
    /// record ends up as [`ForwardOutcome::Failed`].
    pub fn new(endpoint: Option<String>) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Send one record to the store
    #[instrument(skip(self, record), fields(payment_id = %record.payment_id))]
    pub async fn forward(&self, record: &RegistrationRecord) -> ForwardOutcome {
        match self.post_record(record).await {
            Ok(()) => {
                info!("Successfully saved registration to sheet");
                ForwardOutcome::Saved
            }
            Err(e) => {
                error!("Error saving to sheet: {}", e);
                ForwardOutcome::Failed(e.to_string())
            }
        }
    }

    async fn post_record(&self, record: &RegistrationRecord) -> PaymentResult<()> {
        let endpoint = self.endpoint.as_deref().ok_or_else(|| {
            PaymentError::Configuration("SHEET_WEBHOOK_URL not set".to_string())
        })?;

        let response = self
            .client
            .post(endpoint)
            .form(&record.form_fields())
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        // The store reports failures in the body, not the status line
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let reply: SheetReply = serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse sheet response: {}", e))
        })?;

        if reply.result == "success" {
            Ok(())
        } else {
            Err(PaymentError::ProviderError {
                provider: "sheet".to_string(),
                message: reply
                    .message
                    .unwrap_or_else(|| "Failed to save to Google Sheet".to_string()),
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct SheetReply {
    #[serde(default)]
    result: String,
    #[serde(default)]
    message: Option<String>,
}
