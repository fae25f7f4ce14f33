//! SMTP mailer (lettre)

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::ports::Mailer;
use crate::error::MailError;

/// Sends transactional mail over SMTP (STARTTLS)
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    /// Frontend base URL for building reset links
    app_base_url: String,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        port: u16,
        user: String,
        pass: String,
        from: &str,
        app_base_url: String,
    ) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(port)
            .credentials(Credentials::new(user, pass))
            .build();

        let from = from
            .parse()
            .map_err(|_| MailError::InvalidAddress(from.to_string()))?;

        Ok(Self {
            transport,
            from,
            app_base_url,
        })
    }

    fn reset_link(&self, token: &str) -> String {
        format!(
            "{}/reset-password?token={}",
            self.app_base_url.trim_end_matches('/'),
            token
        )
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_password_reset(&self, email: &str, token: &str) -> Result<(), MailError> {
        let to: Mailbox = email
            .parse()
            .map_err(|_| MailError::InvalidAddress(email.to_string()))?;

        let link = self.reset_link(token);
        let body = format!(
            "<p>We received a request to reset your VivacGo password.</p>\
             <p><a href=\"{link}\">Reset your password</a></p>\
             <p>The link expires in 15 minutes. If you did not request this, \
             you can ignore this mail.</p>"
        );

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("Reset your VivacGo password")
            .header(ContentType::TEXT_HTML)
            .body(body)
            .map_err(|e| MailError::Transport(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        tracing::info!(to = %email, "password reset mail sent");
        Ok(())
    }
}
