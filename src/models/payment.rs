// src/models/payment.rs

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::jwt::Claims;

/// One completed payment attempt, as stored in the append-only ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub receipt_number: String,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub listing_id: String,
    pub listing_title: String,
    pub amount: f64,
    pub quantity: f64,
    pub price_per_unit: f64,
    pub payment_method: String,
    pub payment_id: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl PaymentRecord {
    /// Stamps a provider callback with the session identity, a receipt
    /// number, and the current time.
    pub fn from_attempt(attempt: PaymentAttemptRequest, listing_title: String, claims: &Claims) -> Self {
        let now = Utc::now();
        Self {
            id: format!("pay_{}", Uuid::new_v4()),
            receipt_number: generate_receipt_number(now),
            user_id: claims.sub.clone(),
            user_email: claims.email.clone(),
            user_name: claims.name.clone(),
            listing_id: attempt.listing_id,
            listing_title,
            amount: attempt.amount,
            quantity: attempt.quantity,
            price_per_unit: attempt.price_per_unit,
            payment_method: attempt.payment_method,
            payment_id: attempt.payment_id,
            status: attempt.status,
            timestamp: now,
        }
    }
}

/// Result shape reported by the payment-provider integrations
/// (Razorpay / Google Pay / BharatPe) once a payment settles.
#[derive(Debug, Deserialize, Validate)]
pub struct PaymentAttemptRequest {
    #[validate(length(min = 1))]
    pub listing_id: String,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub quantity: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub price_per_unit: f64,
    #[validate(length(min = 1, max = 50))]
    pub payment_method: String,
    #[validate(length(min = 1, max = 100))]
    pub payment_id: String,
    #[validate(length(min = 1, max = 20))]
    pub status: String,
}

/// Aggregates for the company dashboard, recomputed from the ledger.
#[derive(Debug, Serialize)]
pub struct PaymentStats {
    pub total_purchases: usize,
    pub total_spent: f64,
    pub total_co2_offset: f64,
}

impl PaymentStats {
    pub fn from_records(records: &[PaymentRecord]) -> Self {
        Self {
            total_purchases: records.len(),
            total_spent: records.iter().map(|p| p.amount).sum(),
            total_co2_offset: records.iter().map(|p| p.quantity).sum(),
        }
    }
}

/// Receipt numbers are `PC` + yymmdd + the last six digits of a millisecond
/// timestamp. Practically unlikely to collide, not guaranteed unique.
pub fn generate_receipt_number(now: DateTime<Utc>) -> String {
    let date = format!(
        "{:02}{:02}{:02}",
        now.year() % 100,
        now.month(),
        now.day()
    );
    let suffix = now.timestamp_millis().rem_euclid(1_000_000);
    format!("PC{date}{suffix:06}")
}
