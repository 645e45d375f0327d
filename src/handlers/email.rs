// src/handlers/email.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{email::Mailer, error::AppError, utils::sanitize::strip_tags};

/// DTO for the outbound email endpoint. Fields are optional so missing ones
/// can be reported as a 400 rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub html: Option<String>,
}

/// Sends an email through the configured SMTP relay.
pub async fn send_email(
    State(mailer): State<Arc<Mailer>>,
    Json(payload): Json<SendEmailRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(to), Some(subject), Some(html)) = (payload.to, payload.subject, payload.html) else {
        return Err(AppError::BadRequest(
            "Missing required fields: to, subject, html".to_string(),
        ));
    };

    // Plain-text alternative for clients that do not render HTML.
    let text = strip_tags(&html);

    let message_id = mailer.send(&to, &subject, &html, &text).await?;

    Ok(Json(json!({
        "success": true,
        "message_id": message_id,
        "message": "Email sent successfully",
    })))
}
