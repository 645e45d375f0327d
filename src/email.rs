//! Outbound email over SMTP.
//!
//! Transport settings come from the environment; when they are absent the
//! mailer reports itself disabled and confirmation sends are skipped with a
//! warning instead of failing the surrounding operation.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::models::payment::PaymentRecord;

pub struct Mailer {
    host: Option<String>,
    port: u16,
    username: Option<String>,
    password: Option<String>,
    from: Option<String>,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            username: config.smtp_username.clone(),
            password: config.smtp_password.clone(),
            from: config.email_from.clone().or_else(|| config.smtp_username.clone()),
        }
    }

    /// Whether an SMTP relay is configured at all.
    pub fn is_enabled(&self) -> bool {
        self.host.is_some() && self.from.is_some()
    }

    /// Sends an email with HTML and plain text versions.
    /// Returns the generated message id.
    pub async fn send(
        &self,
        to_email: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<String, AppError> {
        let host = self
            .host
            .as_ref()
            .ok_or_else(|| AppError::Upstream("Email transport not configured".to_string()))?;
        let from_address = self
            .from
            .as_ref()
            .ok_or_else(|| AppError::Upstream("Email sender not configured".to_string()))?;

        let from: Mailbox = format!("Carbon Market <{from_address}>")
            .parse()
            .map_err(|_| AppError::InternalServerError("Invalid sender address".to_string()))?;
        let to: Mailbox = to_email
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid recipient address".to_string()))?;

        let message_id = format!("<{}@carbon-market>", Uuid::new_v4());

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .message_id(Some(message_id.clone()))
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| AppError::Upstream(format!("SMTP relay setup failed: {e}")))?
            .port(self.port);

        let mailer = if let (Some(username), Some(password)) = (&self.username, &self.password) {
            mailer.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer
        };

        mailer
            .build()
            .send(email)
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to send email: {e}")))?;

        tracing::info!(to = %to_email, subject = %subject, "Email sent successfully");

        Ok(message_id)
    }

    /// Sends the payment confirmation receipt for a ledger record.
    pub async fn send_receipt(&self, payment: &PaymentRecord) -> Result<String, AppError> {
        let subject = format!("Payment Confirmation - Receipt #{}", payment.receipt_number);
        let html = render_receipt_html(payment);
        let text = render_receipt_text(payment);
        self.send(&payment.user_email, &subject, &html, &text).await
    }
}

/// Render the HTML version of the payment receipt.
pub fn render_receipt_html(payment: &PaymentRecord) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background: #10B981; color: white; padding: 20px; text-align: center; }}
        .content {{ padding: 20px; border: 1px solid #ddd; }}
        .footer {{ background: #f8f9fa; padding: 15px; text-align: center; font-size: 12px; }}
        table {{ width: 100%; border-collapse: collapse; margin: 20px 0; }}
        th, td {{ padding: 10px; text-align: left; border-bottom: 1px solid #ddd; }}
        .amount {{ font-size: 24px; font-weight: bold; color: #10B981; }}
    </style>
</head>
<body>
    <div class="header">
        <h1>Carbon Market</h1>
        <p>Payment Confirmation Receipt</p>
    </div>

    <div class="content">
        <h2>Thank you for your purchase!</h2>
        <p>Dear {user_name},</p>
        <p>Your payment has been successfully processed. Here are your transaction details:</p>

        <table>
            <tr><th>Receipt Number:</th><td><strong>{receipt_number}</strong></td></tr>
            <tr><th>Date &amp; Time:</th><td>{timestamp}</td></tr>
            <tr><th>Carbon Credits:</th><td>{listing_title}</td></tr>
            <tr><th>Quantity:</th><td>{quantity} tons CO2</td></tr>
            <tr><th>Price per unit:</th><td>Rs. {price_per_unit}</td></tr>
            <tr><th>Payment Method:</th><td>{payment_method}</td></tr>
            <tr><th>Payment ID:</th><td>{payment_id}</td></tr>
            <tr><th>Total Amount:</th><td class="amount">Rs. {amount}</td></tr>
        </table>

        <p><strong>Environmental Impact:</strong></p>
        <p>You have offset <strong>{quantity} tons of CO2</strong> emissions. Thank you for contributing to a sustainable future.</p>
    </div>

    <div class="footer">
        <p>Carbon Market - Carbon Credits Marketplace</p>
        <p>This is an automated receipt. Please save this for your records.</p>
    </div>
</body>
</html>"#,
        user_name = html_escape(&payment.user_name),
        receipt_number = html_escape(&payment.receipt_number),
        timestamp = payment.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        listing_title = html_escape(&payment.listing_title),
        quantity = payment.quantity,
        price_per_unit = payment.price_per_unit,
        payment_method = html_escape(&payment.payment_method),
        payment_id = html_escape(&payment.payment_id),
        amount = payment.amount,
    )
}

/// Render the plain text version of the payment receipt.
pub fn render_receipt_text(payment: &PaymentRecord) -> String {
    format!(
        r#"CARBON MARKET - PAYMENT RECEIPT
===============================

Receipt Number: {receipt_number}
Date: {timestamp}

Customer Details:
- Name: {user_name}
- Email: {user_email}

Purchase Details:
- Item: {listing_title}
- Quantity: {quantity} tons CO2
- Price per unit: Rs. {price_per_unit}
- Total Amount: Rs. {amount}

Payment Information:
- Method: {payment_method}
- Payment ID: {payment_id}
- Status: {status}

This is a computer-generated receipt."#,
        receipt_number = payment.receipt_number,
        timestamp = payment.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        user_name = payment.user_name,
        user_email = payment.user_email,
        listing_title = payment.listing_title,
        quantity = payment.quantity,
        price_per_unit = payment.price_per_unit,
        amount = payment.amount,
        payment_method = payment.payment_method,
        payment_id = payment.payment_id,
        status = payment.status,
    )
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
