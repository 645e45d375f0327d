// src/handlers/payment.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::{
    email::Mailer,
    error::AppError,
    models::payment::{PaymentAttemptRequest, PaymentRecord, PaymentStats},
    payments::RazorpayClient,
    store::Store,
    utils::jwt::Claims,
};

/// Records a completed payment attempt reported by a provider integration.
///
/// The record is stamped with a receipt number, the current time, and the
/// active session's identity, then appended to the ledger. The confirmation
/// email is best-effort: a failure degrades to a warning and the ledger
/// write stands.
pub async fn record_payment(
    State(store): State<Store>,
    State(mailer): State<Arc<Mailer>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PaymentAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let listings = store.listings().await?;
    let listing = listings
        .iter()
        .find(|l| l.id == payload.listing_id)
        .ok_or_else(|| {
            AppError::NotFound("This listing is not available for purchase".to_string())
        })?;

    let payment = PaymentRecord::from_attempt(payload, listing.title.clone(), &claims);
    store.append_payment(payment.clone()).await?;

    tracing::info!(
        receipt = %payment.receipt_number,
        user_id = %claims.sub,
        method = %payment.payment_method,
        "Payment recorded"
    );

    let email_sent = if mailer.is_enabled() {
        match mailer.send_receipt(&payment).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(receipt = %payment.receipt_number, "Receipt email failed: {e}");
                false
            }
        }
    } else {
        tracing::warn!(
            receipt = %payment.receipt_number,
            "Email not configured, skipping receipt delivery"
        );
        false
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "payment": payment,
            "email_sent": email_sent,
        })),
    ))
}

/// The session user's purchase history plus dashboard aggregates.
pub async fn my_purchases(
    State(store): State<Store>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let records: Vec<PaymentRecord> = store
        .payments()
        .await?
        .into_iter()
        .filter(|p| p.user_id == claims.sub)
        .collect();

    let stats = PaymentStats::from_records(&records);

    Ok(Json(json!({
        "payments": records,
        "stats": stats,
    })))
}

/// DTO for provider order creation. Fields are optional so missing ones can
/// be reported as a 400 rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub receipt: Option<String>,
    pub notes: Option<Value>,
}

/// Creates a Razorpay order for client-side checkout.
pub async fn create_order(
    State(razorpay): State<Arc<RazorpayClient>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(amount), Some(currency)) = (payload.amount, payload.currency) else {
        return Err(AppError::BadRequest(
            "Missing required fields: amount, currency".to_string(),
        ));
    };

    let order = razorpay
        .create_order(amount, &currency, payload.receipt, payload.notes)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "order": order })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
}

/// Verifies a Razorpay payment callback signature and fetches the settled
/// payment's details.
pub async fn verify_order(
    State(razorpay): State<Arc<RazorpayClient>>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(order_id), Some(payment_id), Some(signature)) = (
        payload.razorpay_order_id,
        payload.razorpay_payment_id,
        payload.razorpay_signature,
    ) else {
        return Err(AppError::BadRequest(
            "Missing payment verification data".to_string(),
        ));
    };

    if !razorpay.verify_signature(&order_id, &payment_id, &signature)? {
        return Err(AppError::BadRequest(
            "Payment signature verification failed".to_string(),
        ));
    }

    let payment = razorpay.fetch_payment(&payment_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Payment verified successfully",
        "payment": payment,
    })))
}
