//! Razorpay order integration.
//!
//! The provider is opaque: this client creates orders, fetches settled
//! payments, and verifies callback signatures. Settlement itself happens
//! entirely on the provider's side.

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::{Value, json};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::Config;
use crate::error::AppError;

const RAZORPAY_API_BASE: &str = "https://api.razorpay.com/v1";

type HmacSha256 = Hmac<Sha256>;

pub struct RazorpayClient {
    key_id: Option<String>,
    key_secret: Option<String>,
    http: reqwest::Client,
}

impl RazorpayClient {
    pub fn from_config(config: &Config) -> Self {
        Self {
            key_id: config.razorpay_key_id.clone(),
            key_secret: config.razorpay_key_secret.clone(),
            http: reqwest::Client::new(),
        }
    }

    fn credentials(&self) -> Result<(&str, &str), AppError> {
        match (self.key_id.as_deref(), self.key_secret.as_deref()) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(AppError::Upstream(
                "Payment provider not configured".to_string(),
            )),
        }
    }

    /// Creates a provider order for the given amount (rupees are forwarded
    /// as paise). Returns the provider's order object verbatim.
    pub async fn create_order(
        &self,
        amount: f64,
        currency: &str,
        receipt: Option<String>,
        notes: Option<Value>,
    ) -> Result<Value, AppError> {
        let (key_id, key_secret) = self.credentials()?;

        let body = json!({
            "amount": (amount * 100.0).round() as i64,
            "currency": currency,
            "receipt": receipt
                .unwrap_or_else(|| format!("receipt_{}", Utc::now().timestamp_millis())),
            "notes": notes.unwrap_or_else(|| json!({})),
        });

        let response = self
            .http
            .post(format!("{RAZORPAY_API_BASE}/orders"))
            .basic_auth(key_id, Some(key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to create payment order: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Failed to create payment order: provider returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid provider response: {e}")))
    }

    /// Fetches a settled payment's details from the provider.
    pub async fn fetch_payment(&self, payment_id: &str) -> Result<Value, AppError> {
        let (key_id, key_secret) = self.credentials()?;

        let response = self
            .http
            .get(format!("{RAZORPAY_API_BASE}/payments/{payment_id}"))
            .basic_auth(key_id, Some(key_secret))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to fetch payment: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Failed to fetch payment: provider returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid provider response: {e}")))
    }

    /// Verifies the HMAC-SHA256 callback signature over
    /// `"<order_id>|<payment_id>"` in constant time.
    pub fn verify_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, AppError> {
        let (_, key_secret) = self.credentials()?;

        let mut mac = HmacSha256::new_from_slice(key_secret.as_bytes())
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());

        Ok(expected.as_bytes().ct_eq(signature.as_bytes()).into())
    }
}
