//! Contact form pipeline.
//!
//! A submission flows through the sanitizer and validator; an invalid one
//! short-circuits to an error response. A valid one is recorded to the
//! submission log, then the owner notification and visitor confirmation
//! are sent. Recording and both emails are best-effort and never turn an
//! accepted submission into a failure.

pub mod extract;
pub mod mailer;
pub mod model;
pub mod notify;
pub mod pipeline;
pub mod recorder;
pub mod response;
pub mod routes;
pub mod sanitize;
pub mod validate;

pub use mailer::{DisabledMailer, SmtpMailer};
pub use model::{ContactForm, RawSubmission, Submission};
pub use notify::{MailTransport, NotificationOutcome, Notifier, OutgoingMail};
pub use pipeline::{ContactPipeline, SubmissionReceipt};
pub use recorder::{FileSink, MemorySink, Recorder, SubmissionSink};
pub use response::ContactResponse;
pub use routes::{CONTACT_PATH, ContactRouteState, contact_routes};
pub use validate::{ValidationError, ValidationResult};
