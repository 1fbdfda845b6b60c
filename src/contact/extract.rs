//! Request-body extractor for contact submissions.
//!
//! Browsers post the form either urlencoded or, via `FormData`, as
//! multipart. Anything else decodes to an empty submission so that
//! validation reports the missing fields. Bodies over the request body
//! limit are treated the same way.

use axum::Form;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::FormRejection;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use tracing::debug;

use super::model::RawSubmission;
use crate::error::ContactError;

/// Form fields extracted from a POST body.
#[derive(Debug)]
pub struct ContactFields(pub RawSubmission);

impl<S> FromRequest<S> for ContactFields
where
    S: Send + Sync,
{
    type Rejection = ContactError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"));

        if is_multipart {
            return match Multipart::from_request(req, state).await {
                Ok(multipart) => match read_multipart(multipart).await {
                    Ok(raw) => Ok(Self(raw)),
                    Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                        debug!(error = %e, "Multipart body over limit, treating as empty");
                        Ok(Self(RawSubmission::default()))
                    }
                    Err(e) => Err(ContactError::Internal(format!(
                        "failed to read multipart body: {e}"
                    ))),
                },
                Err(rejection) => {
                    debug!(%rejection, "Unreadable multipart body, treating as empty");
                    Ok(Self(RawSubmission::default()))
                }
            };
        }

        match Form::<RawSubmission>::from_request(req, state).await {
            Ok(Form(raw)) => Ok(Self(raw)),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                debug!(%rejection, "Form body over limit, treating as empty");
                Ok(Self(RawSubmission::default()))
            }
            Err(FormRejection::BytesRejection(rejection)) => Err(ContactError::Internal(format!(
                "failed to read request body: {rejection}"
            ))),
            Err(rejection) => {
                debug!(%rejection, "Body is not a form, treating as empty");
                Ok(Self(RawSubmission::default()))
            }
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<RawSubmission, MultipartError> {
    let mut raw = RawSubmission::default();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field.text().await?;
        raw.set(&name, value);
    }
    Ok(raw)
}
