//! # Payment Signature Verification
//!
//! Razorpay signs every successful checkout with
//! `hex(HMAC-SHA256(key_secret, order_id + "|" + payment_id))`.
//! The relay recomputes it to prove the payment response was not forged by
//! the client.

use hmac::{Hmac, Mac};
use pay_core::{PaymentError, PaymentResult};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the expected signature for an order/payment pair
pub fn sign_payment(order_id: &str, payment_id: &str, secret: &str) -> PaymentResult<String> {
    if secret.is_empty() {
        return Err(PaymentError::Configuration(
            "RAZORPAY_KEY_SECRET not set".to_string(),
        ));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::Internal(format!("HMAC key rejected: {}", e)))?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a client-supplied signature against the expected one.
///
/// Empty ids are not an error; they simply fail to match.
pub fn verify_payment_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    secret: &str,
) -> PaymentResult<bool> {
    let expected = sign_payment(order_id, payment_id, secret)?;
    Ok(constant_time_compare(&expected, signature))
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}
