/// Mail dispatcher for verification codes
use crate::config::EmailConfig;
use crate::error::{AppError, Result};
use lettre::message::{header, Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::sync::Arc;
use tracing::{info, warn};

/// Async SMTP transport wrapper (SMTP or no-op)
#[derive(Clone)]
pub struct EmailService {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
}

impl EmailService {
    /// Build the mail dispatcher from configuration.
    ///
    /// If the SMTP host is empty, operates in no-op mode (logs only).
    /// Useful for development and testing without mail infrastructure.
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let from = config
            .smtp_from
            .parse::<Mailbox>()
            .map_err(|e| AppError::Internal(format!("Invalid SMTP_FROM address: {}", e)))?;

        let transport = if config.smtp_host.trim().is_empty() {
            warn!("SMTP host not configured; email service will operate in no-op mode");
            None
        } else {
            let builder = if config.use_starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            }
            .map_err(|e| {
                AppError::Internal(format!("Failed to configure SMTP transport: {}", e))
            })?
            .port(config.smtp_port);

            let builder = if let (Some(username), Some(password)) =
                (&config.smtp_username, &config.smtp_password)
            {
                builder.credentials(Credentials::new(username.to_string(), password.to_string()))
            } else {
                builder
            };

            Some(Arc::new(builder.build()))
        };

        Ok(Self { transport, from })
    }

    /// Check if SMTP transport is enabled
    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send a verification code to an address.
    ///
    /// Treat this as a slow, fallible network call: there is no retry
    /// here, and delivery failure surfaces to the caller.
    pub async fn send_otp_email(&self, recipient: &str, code: &str, ttl_minutes: i64) -> Result<()> {
        let subject = "Your Upskill verification code";

        let text_body = format!(
            "Your Upskill verification code is: {}\n\n\
            The code expires in {} minutes.\n\n\
            If you did not request this, please ignore this email.",
            code, ttl_minutes
        );

        let html_body = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; padding: 20px; color: #333;">
    <h2>Your Upskill verification code</h2>
    <p>Enter this code to verify your email address:</p>
    <p style="font-size: 32px; font-weight: bold; letter-spacing: 8px; color: #000; margin: 30px 0;">{code}</p>
    <p style="color: #666; font-size: 14px;">The code expires in <strong>{ttl_minutes} minutes</strong>.</p>
    <p style="color: #999; font-size: 12px; margin-top: 30px;">
        If you did not request this, please ignore this email.
    </p>
</body>
</html>"#
        );

        self.send_html_email(recipient, subject, &html_body, &text_body)
            .await
    }

    /// Send HTML email with plain text fallback
    async fn send_html_email(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<()> {
        if let Some(transport) = &self.transport {
            let to = recipient
                .parse::<Mailbox>()
                .map_err(|e| AppError::Internal(format!("Invalid recipient address: {}", e)))?;

            let email = Message::builder()
                .from(self.from.clone())
                .to(to)
                .subject(subject)
                .multipart(
                    MultiPart::alternative()
                        .singlepart(
                            SinglePart::builder()
                                .header(header::ContentType::TEXT_PLAIN)
                                .body(text_body.to_string()),
                        )
                        .singlepart(
                            SinglePart::builder()
                                .header(header::ContentType::TEXT_HTML)
                                .body(html_body.to_string()),
                        ),
                )?;

            transport.send(email).await?;
            info!(subject, "email sent successfully");
        } else {
            info!(
                subject,
                recipient, "Email service running in no-op mode; skipping actual send"
            );
        }
        Ok(())
    }
}
