// SMTP delivery over mail-send / mail-builder.
use crate::error::{EmailError, EmailResult};
use async_trait::async_trait;
use mail_builder::MessageBuilder;
use mail_send::SmtpClientBuilder;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single outbound message.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Notification sender contract: deliver one message and report success or
/// failure. Nothing is persisted and nothing is retried here.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: OutgoingEmail) -> EmailResult<()>;
}

/// SMTP transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Implicit TLS on connect (ports like 465); STARTTLS otherwise.
    pub implicit_tls: bool,
    pub from_email: String,
    pub from_name: String,
}

impl EmailConfig {
    /// Load SMTP configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(587),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            implicit_tls: std::env::var("SMTP_IMPLICIT_TLS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            from_email: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "noreply@medibook.local".to_string()),
            from_name: std::env::var("EMAIL_FROM_NAME")
                .unwrap_or_else(|_| "MediBook".to_string()),
        }
    }
}

/// Delivers mail over SMTP. One connection per message; the flows that send
/// mail do so rarely enough that connection reuse buys nothing.
pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: OutgoingEmail) -> EmailResult<()> {
        let built = MessageBuilder::new()
            .from((self.config.from_name.as_str(), self.config.from_email.as_str()))
            .to(message.to.as_str())
            .subject(message.subject.as_str())
            .text_body(message.body.as_str());

        let mut smtp = SmtpClientBuilder::new(self.config.host.as_str(), self.config.port)
            .implicit_tls(self.config.implicit_tls);
        if let (Some(user), Some(pass)) = (&self.config.username, &self.config.password) {
            smtp = smtp.credentials((user.as_str(), pass.as_str()));
        }

        let mut client = smtp
            .connect()
            .await
            .map_err(|err| EmailError::Transport(err.to_string()))?;
        client
            .send(built)
            .await
            .map_err(|err| EmailError::Transport(err.to_string()))?;

        debug!(to = %message.to, subject = %message.subject, "email delivered");
        Ok(())
    }
}
