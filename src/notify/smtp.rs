//! ارسال ایمیل با SMTP

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use super::{Notification, Notifier};
use crate::{config::MailConfig, error::Result, utils::mask_email};

/// Notifier ایمیلی با pool اتصال SMTP
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// ساخت transport از روی تنظیمات
    ///
    /// با `use_tls` از relay (TLS) استفاده میشه، وگرنه اتصال ساده.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_email).parse()?;

        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };

        let mut builder = builder.port(config.smtp_port);
        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: Notification) -> Result<()> {
        let to: Mailbox = notification.to.parse()?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(notification.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body)?;

        self.transport.send(message).await?;

        info!(to = %mask_email(&notification.to), "Notification email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_sender_is_rejected() {
        let config = MailConfig {
            from_email: "not an address".to_string(),
            mock: false,
            ..MailConfig::default()
        };
        assert!(SmtpNotifier::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_plain_transport_builds() {
        let config = MailConfig {
            use_tls: false,
            smtp_port: 2525,
            mock: false,
            ..MailConfig::default()
        };
        assert!(SmtpNotifier::new(&config).is_ok());
    }
}
