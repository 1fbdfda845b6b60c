//! Response formatter: maps pipeline outcomes to JSON responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use super::pipeline::SubmissionReceipt;
use crate::error::ContactError;

/// Message returned when a submission is accepted.
pub const SUCCESS_MESSAGE: &str =
    "Thank you! Your message has been sent successfully. I'll get back to you soon.";

/// Message returned for any internal fault. The cause stays in the log.
pub const INTERNAL_FAULT_MESSAGE: &str = "Sorry, there was an error processing your request. \
     Please try again later or contact me directly.";

/// JSON body of every contact response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_sent: Option<bool>,
}

impl ContactResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            notification_sent: None,
            confirmation_sent: None,
        }
    }
}

impl From<SubmissionReceipt> for ContactResponse {
    fn from(receipt: SubmissionReceipt) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            notification_sent: Some(receipt.notification.owner_notified),
            confirmation_sent: Some(receipt.notification.visitor_confirmed),
        }
    }
}

impl IntoResponse for SubmissionReceipt {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(ContactResponse::from(self))).into_response()
    }
}

impl ContactError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ContactError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ContactError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            ContactError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller.
    pub fn public_message(&self) -> String {
        match self {
            ContactError::Internal(_) => INTERNAL_FAULT_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        if let ContactError::Internal(detail) = &self {
            error!(detail = %detail, "Contact form error");
        }
        (
            self.status_code(),
            Json(ContactResponse::failure(self.public_message())),
        )
            .into_response()
    }
}
