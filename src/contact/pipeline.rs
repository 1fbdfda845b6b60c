//! Contact submission pipeline: sanitize, validate, record, notify.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{info, instrument};
use uuid::Uuid;

use super::model::{ContactForm, RawSubmission, Submission};
use super::notify::{MailTransport, NotificationOutcome, Notifier};
use super::recorder::{Recorder, SubmissionSink};
use crate::config::BusinessProfile;
use crate::error::ContactError;

/// Result of an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Whether the log line was written. Informational only.
    pub recorded: bool,
    pub notification: NotificationOutcome,
}

/// Sequential handler for one submission at a time per call.
pub struct ContactPipeline {
    recorder: Recorder<dyn SubmissionSink>,
    notifier: Notifier,
}

impl ContactPipeline {
    pub fn new(
        sink: Arc<dyn SubmissionSink>,
        transport: Arc<dyn MailTransport>,
        profile: BusinessProfile,
    ) -> Self {
        Self {
            recorder: Recorder::new(sink),
            notifier: Notifier::new(transport, profile),
        }
    }

    /// Process one submission using the current local time.
    pub async fn submit(&self, raw: RawSubmission) -> Result<SubmissionReceipt, ContactError> {
        self.submit_at(raw, Local::now().naive_local()).await
    }

    /// Process one submission stamped with `submitted_at`.
    ///
    /// Validation failures short-circuit before anything is written or
    /// sent. After validation, logging and both emails are best-effort.
    #[instrument(skip_all, fields(submission_id = %Uuid::new_v4()))]
    pub async fn submit_at(
        &self,
        raw: RawSubmission,
        submitted_at: NaiveDateTime,
    ) -> Result<SubmissionReceipt, ContactError> {
        let form = ContactForm::sanitized(raw);
        let submission = Submission::parse(form).map_err(|result| {
            info!(errors = result.errors.len(), "Submission rejected");
            ContactError::ValidationFailed {
                errors: result.messages(),
            }
        })?;

        let recorded = self.recorder.record(&submission, submitted_at).await;
        let notification = self.notifier.dispatch(&submission, submitted_at).await;

        info!(
            recorded,
            owner_notified = notification.owner_notified,
            visitor_confirmed = notification.visitor_confirmed,
            "Submission accepted"
        );
        Ok(SubmissionReceipt {
            recorded,
            notification,
        })
    }
}
