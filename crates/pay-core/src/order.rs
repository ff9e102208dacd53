//! # Order Types
//!
//! Registrant, gateway order and registration record types.

use crate::currency::Currency;
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Status marker written to the registration store for verified payments
pub const PAID_STATUS: &str = "paid";

/// Registrant details captured by the checkout form
///
/// Wire names follow the form field names (`FullName`, `Email`, ...).
/// Missing or `null` fields deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Registrant {
    #[serde(deserialize_with = "null_as_empty")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub org_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub event_name: String,
}

/// Read an optional string field, treating `null` like an absent value
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Registrant {
    /// Registrant fields as gateway order notes
    pub fn to_notes(&self) -> HashMap<String, String> {
        self.fields()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("FullName", self.full_name.as_str()),
            ("Email", self.email.as_str()),
            ("Phone", self.phone.as_str()),
            ("OrgName", self.org_name.as_str()),
            ("EventName", self.event_name.as_str()),
        ]
    }
}

/// Order creation request sent to the payment gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSpec {
    /// Amount in smallest currency unit (paise for INR)
    pub amount: i64,

    /// Order currency
    pub currency: Currency,

    /// Merchant receipt identifier
    pub receipt: String,

    /// Free-form notes attached to the order
    #[serde(default)]
    pub notes: HashMap<String, String>,
}

impl OrderSpec {
    /// Build the gateway order for one checkout attempt.
    ///
    /// `amount` is in decimal currency units; bounds are left to the gateway.
    pub fn for_registration(
        amount: f64,
        currency: Currency,
        registrant: &Registrant,
        receipt: impl Into<String>,
    ) -> Self {
        Self {
            amount: currency.to_smallest_unit(amount),
            currency,
            receipt: receipt.into(),
            notes: registrant.to_notes(),
        }
    }
}

/// Hands out receipt identifiers derived from wall-clock milliseconds.
///
/// Two calls within the same millisecond get consecutive values, so receipts
/// never repeat within a process.
#[derive(Debug, Default)]
pub struct ReceiptClock {
    last: AtomicI64,
}

impl ReceiptClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next receipt, e.g. `receipt_1718000000000`
    pub fn next_receipt(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                Some(now.max(prev + 1))
            })
            .unwrap_or_else(|prev| prev);
        format!("receipt_{}", now.max(prev + 1))
    }
}

/// Verified registration forwarded to the bookkeeping store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub registrant: Registrant,
    pub payment_id: String,
}

impl RegistrationRecord {
    pub fn paid(registrant: Registrant, payment_id: impl Into<String>) -> Self {
        Self {
            registrant,
            payment_id: payment_id.into(),
        }
    }

    /// Form fields in the order the store expects them
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields: Vec<(&'static str, String)> = self
            .registrant
            .fields()
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect();
        fields.push(("PaymentID", self.payment_id.clone()));
        fields.push(("Price", PAID_STATUS.to_string()));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registrant() -> Registrant {
        Registrant {
            full_name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
            org_name: "Acme".into(),
            event_name: "Agent Room Bootcamp".into(),
        }
    }

    #[test]
    fn test_registrant_wire_names() {
        let parsed: Registrant = serde_json::from_value(json!({
            "FullName": "Asha Rao",
            "Email": "asha@example.com",
            "Phone": "9876543210",
            "OrgName": "Acme",
            "EventName": "Agent Room Bootcamp"
        }))
        .unwrap();
        assert_eq!(parsed, registrant());
    }

    #[test]
    fn test_registrant_missing_fields_default_empty() {
        let parsed: Registrant = serde_json::from_value(json!({ "FullName": "Asha" })).unwrap();
        assert_eq!(parsed.full_name, "Asha");
        assert!(parsed.email.is_empty());
        assert!(parsed.event_name.is_empty());
    }

    #[test]
    fn test_registrant_null_fields_default_empty() {
        let parsed: Registrant = serde_json::from_value(json!({
            "FullName": "Asha",
            "OrgName": null,
            "Phone": null
        }))
        .unwrap();
        assert_eq!(parsed.full_name, "Asha");
        assert!(parsed.org_name.is_empty());
        assert!(parsed.phone.is_empty());
    }

    #[test]
    fn test_order_spec_minor_units_and_notes() {
        let spec = OrderSpec::for_registration(500.0, Currency::INR, &registrant(), "receipt_1");

        assert_eq!(spec.amount, 50000);
        assert_eq!(spec.currency, Currency::INR);
        assert_eq!(spec.receipt, "receipt_1");
        assert_eq!(spec.notes.len(), 5);
        assert_eq!(spec.notes.get("OrgName"), Some(&"Acme".to_string()));

        let body = serde_json::to_value(&spec).unwrap();
        assert_eq!(body["amount"], 50000);
        assert_eq!(body["currency"], "INR");
    }

    #[test]
    fn test_receipts_unique_within_same_millisecond() {
        let clock = ReceiptClock::new();
        let receipts: Vec<String> = (0..100).map(|_| clock.next_receipt()).collect();

        let mut deduped = receipts.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), receipts.len());
        assert!(receipts.iter().all(|r| r.starts_with("receipt_")));
    }

    #[test]
    fn test_registration_form_fields() {
        let record = RegistrationRecord::paid(registrant(), "pay_123");
        let fields = record.form_fields();

        let names: Vec<&str> = fields.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            names,
            ["FullName", "Email", "Phone", "OrgName", "EventName", "PaymentID", "Price"]
        );
        assert_eq!(fields[5].1, "pay_123");
        assert_eq!(fields[6].1, "paid");
    }
}
