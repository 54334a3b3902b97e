//! Outbound email via SMTP.
//!
//! Mail is strictly best-effort: callers never fail because a message could
//! not be sent. With no SMTP configuration the mailer is a logging no-op,
//! which is also what the test environment uses.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// SMTP-backed mailer, or a no-op when unconfigured.
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl Mailer {
    /// Build from `SMTP_HOST` / `SMTP_USERNAME` / `SMTP_PASSWORD` /
    /// `SMTP_FROM`. Missing `SMTP_HOST` disables sending entirely.
    pub fn from_env() -> Self {
        let Ok(host) = std::env::var("SMTP_HOST") else {
            tracing::info!("SMTP_HOST not set, outbound email disabled");
            return Self::disabled();
        };

        let builder = match AsyncSmtpTransport::<Tokio1Executor>::relay(&host) {
            Ok(builder) => builder,
            Err(err) => {
                tracing::warn!(error = %err, host = %host, "Invalid SMTP relay, email disabled");
                return Self::disabled();
            }
        };

        let transport = match (std::env::var("SMTP_USERNAME"), std::env::var("SMTP_PASSWORD")) {
            (Ok(username), Ok(password)) => {
                builder.credentials(Credentials::new(username, password)).build()
            }
            _ => builder.build(),
        };

        let from = std::env::var("SMTP_FROM").unwrap_or_else(|_| "helpdesk@localhost".into());

        Self {
            transport: Some(transport),
            from,
        }
    }

    /// A mailer that drops every message.
    pub fn disabled() -> Self {
        Self {
            transport: None,
            from: String::new(),
        }
    }

    /// Send an HTML email. Failures are logged, never propagated.
    pub async fn send(&self, to: &str, subject: &str, html_body: String) {
        let Some(transport) = &self.transport else {
            tracing::debug!(to = %to, subject = %subject, "Email disabled, dropping message");
            return;
        };

        let message = Message::builder()
            .from(match self.from.parse() {
                Ok(mailbox) => mailbox,
                Err(err) => {
                    tracing::warn!(error = %err, "Invalid SMTP_FROM address, dropping message");
                    return;
                }
            })
            .to(match to.parse() {
                Ok(mailbox) => mailbox,
                Err(err) => {
                    tracing::warn!(error = %err, to = %to, "Invalid recipient, dropping message");
                    return;
                }
            })
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body);

        let message = match message {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to build email message");
                return;
            }
        };

        if let Err(err) = transport.send(message).await {
            tracing::warn!(error = %err, to = %to, "Failed to send email");
        }
    }

    /// Welcome email sent after a successful registration.
    pub async fn send_welcome(&self, to: &str, name: &str) {
        let body = format!(
            "<h3>Hello {name},</h3><p>Your account has been created successfully.</p>"
        );
        self.send(to, "Welcome to the helpdesk", body).await;
    }
}
