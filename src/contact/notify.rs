//! Notification dispatcher: owner notification and visitor confirmation.
//!
//! Both messages are attempted once, in order, independently of each
//! other. Transport failures only flip the matching delivery flag.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};

use super::model::{Submission, TIMESTAMP_FORMAT};
use crate::config::BusinessProfile;

/// Characters of the visitor's message quoted back in the confirmation.
pub const MESSAGE_PREVIEW_CHARS: usize = 200;

/// A plain-text email ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Mailbox, either `addr` or `Display Name <addr>`.
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Something that can hand a message to a mail system.
///
/// Returns whether the message was accepted for delivery. Acceptance is
/// not delivery: no bounce or receipt is awaited.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> bool;
}

/// Delivery flags for one submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NotificationOutcome {
    pub owner_notified: bool,
    pub visitor_confirmed: bool,
}

/// Compose the message sent to the business inbox.
pub fn owner_notification(
    profile: &BusinessProfile,
    submission: &Submission,
    submitted_at: NaiveDateTime,
) -> OutgoingMail {
    let body = format!(
        "New contact form submission received:\n\n\
         Name: {name}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         Service: {service}\n\
         Message: {message}\n\n\
         Submitted at: {submitted_at}\n\
         ---\nThis is an automated message from your website.",
        name = submission.name(),
        email = submission.email(),
        phone = submission.phone().unwrap_or("Not provided"),
        service = submission.service().unwrap_or("Not specified"),
        message = submission.message().unwrap_or("No message"),
        submitted_at = submitted_at.format(TIMESTAMP_FORMAT),
    );

    OutgoingMail {
        from: profile.website_sender.clone(),
        to: profile.owner_email.clone(),
        reply_to: Some(submission.email().to_string()),
        subject: format!("New Contact Form Submission - {}", profile.site_name),
        body,
    }
}

/// Compose the thank-you message sent back to the visitor.
pub fn visitor_confirmation(profile: &BusinessProfile, submission: &Submission) -> OutgoingMail {
    let mut body = format!(
        "Dear {},\n\n\
         Thank you for reaching out to me! I'm excited to help you discover your most beautiful self.\n\n\
         I've received your message and will get back to you within 24 hours to discuss your beauty vision.\n\n\
         Here's what you shared:\n",
        submission.name()
    );
    if let Some(service) = submission.service() {
        body.push_str(&format!("- Service of interest: {service}\n"));
    }
    if let Some(message) = submission.message() {
        let preview: String = message.chars().take(MESSAGE_PREVIEW_CHARS).collect();
        body.push_str(&format!("- Your message: {preview}...\n"));
    }
    body.push('\n');

    if !profile.socials.is_empty() {
        body.push_str(
            "In the meantime, feel free to follow my journey on social media for beauty tips and inspiration:\n",
        );
        for (network, handle) in &profile.socials {
            body.push_str(&format!("- {network}: {handle}\n"));
        }
        body.push('\n');
    }

    body.push_str(&format!(
        "Looking forward to creating something beautiful together!\n\n\
         With beauty and grace,\n\
         {}\n{}\n{}\n\n\
         ---\nThis is an automated confirmation email.",
        profile.signature, profile.title, profile.phone
    ));

    OutgoingMail {
        from: format!("{} <{}>", profile.site_name, profile.owner_email),
        to: submission.email().to_string(),
        reply_to: Some(profile.owner_email.clone()),
        subject: format!(
            "Thank you for contacting {} - Your Beauty Journey Begins!",
            profile.signature
        ),
        body,
    }
}

/// Sends both messages for a submission through one transport.
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
    profile: BusinessProfile,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MailTransport>, profile: BusinessProfile) -> Self {
        Self { transport, profile }
    }

    /// Attempt the owner notification, then the visitor confirmation.
    pub async fn dispatch(
        &self,
        submission: &Submission,
        submitted_at: NaiveDateTime,
    ) -> NotificationOutcome {
        let owner_notified = self
            .deliver(
                "owner_notification",
                owner_notification(&self.profile, submission, submitted_at),
            )
            .await;
        let visitor_confirmed = self
            .deliver(
                "visitor_confirmation",
                visitor_confirmation(&self.profile, submission),
            )
            .await;

        NotificationOutcome {
            owner_notified,
            visitor_confirmed,
        }
    }

    async fn deliver(&self, kind: &str, mail: OutgoingMail) -> bool {
        let sent = self.transport.send(&mail).await;
        if sent {
            info!(kind, to = %mail.to, "Notification accepted by transport");
        } else {
            warn!(kind, to = %mail.to, "Notification not sent");
        }
        sent
    }
}
