//! Mail transports: SMTP via lettre, and a disabled stand-in.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;
use tracing::{debug, error, warn};

use super::notify::{MailTransport, OutgoingMail};
use crate::config::SmtpConfig;
use crate::error::MailError;

/// SMTP relay transport. Each send opens its own connection on a
/// blocking thread.
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn transport(config: &SmtpConfig) -> Result<SmtpTransport, MailError> {
        let relay = if config.implicit_tls() {
            SmtpTransport::relay(&config.host)
        } else {
            SmtpTransport::starttls_relay(&config.host)
        };
        let builder = relay
            .map_err(|e| MailError::Transport(format!("SMTP relay error: {e}")))?
            .port(config.port);

        let builder = if config.username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.expose_secret().to_string(),
            ))
        };
        Ok(builder.build())
    }

    fn deliver(config: &SmtpConfig, message: &Message) -> Result<(), MailError> {
        Self::transport(config)?
            .send(message)
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> bool {
        let message = match build_message(mail) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, to = %mail.to, "Could not build email");
                return false;
            }
        };

        let config = self.config.clone();
        match tokio::task::spawn_blocking(move || Self::deliver(&config, &message)).await {
            Ok(Ok(())) => {
                debug!(to = %mail.to, "Email handed to SMTP relay");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, to = %mail.to, "Email send failed");
                false
            }
            Err(e) => {
                error!(error = %e, "Email send task panicked");
                false
            }
        }
    }
}

/// Used when no SMTP relay is configured. Every send is refused.
pub struct DisabledMailer;

#[async_trait]
impl MailTransport for DisabledMailer {
    async fn send(&self, mail: &OutgoingMail) -> bool {
        warn!(to = %mail.to, subject = %mail.subject, "Mail transport not configured, email dropped");
        false
    }
}

/// Build a plain-text lettre message.
pub fn build_message(mail: &OutgoingMail) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(parse_mailbox("from", &mail.from)?)
        .to(parse_mailbox("to", &mail.to)?)
        .subject(mail.subject.as_str())
        .header(ContentType::TEXT_PLAIN);
    if let Some(reply_to) = &mail.reply_to {
        builder = builder.reply_to(parse_mailbox("reply-to", reply_to)?);
    }
    builder
        .body(mail.body.clone())
        .map_err(|e| MailError::Build(e.to_string()))
}

fn parse_mailbox(field: &str, value: &str) -> Result<Mailbox, MailError> {
    value.parse().map_err(|e: lettre::address::AddressError| MailError::InvalidAddress {
        field: field.to_string(),
        reason: format!("{value}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn mail() -> OutgoingMail {
        OutgoingMail {
            from: "Shadma Makeup Artist <hello@shadma-makeup.com>".into(),
            to: "jane@example.com".into(),
            reply_to: Some("hello@shadma-makeup.com".into()),
            subject: "Thanks".into(),
            body: "Dear Jane Doe,".into(),
        }
    }

    fn formatted(message: &Message) -> String {
        String::from_utf8(message.formatted()).unwrap()
    }

    #[test]
    fn builds_message_with_reply_to() {
        let message = build_message(&mail()).unwrap();
        let raw = formatted(&message);
        assert!(raw.contains("From: \"Shadma Makeup Artist\" <hello@shadma-makeup.com>")
            || raw.contains("From: Shadma Makeup Artist <hello@shadma-makeup.com>"));
        assert!(raw.contains("To: jane@example.com"));
        assert!(raw.contains("Reply-To: hello@shadma-makeup.com"));
        assert!(raw.contains("Subject: Thanks"));
        assert!(raw.contains("Dear Jane Doe,"));
    }

    #[test]
    fn builds_message_without_reply_to() {
        let message = build_message(&OutgoingMail {
            reply_to: None,
            ..mail()
        })
        .unwrap();
        assert!(!formatted(&message).contains("Reply-To:"));
    }

    #[test]
    fn invalid_recipient_is_rejected() {
        let err = build_message(&OutgoingMail {
            to: "not an address".into(),
            ..mail()
        })
        .unwrap_err();
        assert!(matches!(err, MailError::InvalidAddress { ref field, .. } if field == "to"));
    }

    #[tokio::test]
    async fn disabled_mailer_refuses() {
        assert!(!DisabledMailer.send(&mail()).await);
    }

    #[tokio::test]
    async fn invalid_address_reports_not_sent() {
        let mailer = SmtpMailer::new(SmtpConfig {
            host: "smtp.invalid".into(),
            port: 587,
            username: String::new(),
            password: SecretString::from(String::new()),
        });
        let mail = OutgoingMail {
            to: "broken".into(),
            ..mail()
        };
        assert!(!mailer.send(&mail).await);
    }
}
