//! Contact form data: raw request fields, sanitized form, validated submission.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::sanitize::sanitize_input;
use super::validate::{ValidationResult, validate_form};

/// Timestamp format used in the submission log and notification bodies.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fields exactly as submitted. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RawSubmission {
    /// Set a field by its form name. Unknown names are ignored.
    pub fn set(&mut self, field: &str, value: String) {
        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "service" => &mut self.service,
            "message" => &mut self.message,
            _ => return,
        };
        *slot = Some(value);
    }
}

/// Sanitized but not yet validated form. Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
}

impl ContactForm {
    /// Sanitize every raw field.
    pub fn sanitized(raw: RawSubmission) -> Self {
        let clean = |value: Option<String>| value.as_deref().map(sanitize_input).unwrap_or_default();
        Self {
            name: clean(raw.name),
            email: clean(raw.email),
            phone: clean(raw.phone),
            service: clean(raw.service),
            message: clean(raw.message),
        }
    }
}

/// A validated contact submission.
///
/// Only constructed through [`Submission::parse`], so every instance has
/// passed sanitization and validation. Fields are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    name: String,
    email: String,
    phone: String,
    service: String,
    message: String,
}

impl Submission {
    /// Validate a sanitized form, returning every failed check on error.
    pub fn parse(form: ContactForm) -> Result<Self, ValidationResult> {
        let result = validate_form(&form);
        if !result.is_valid() {
            return Err(result);
        }
        Ok(Self {
            name: form.name,
            email: form.email,
            phone: form.phone,
            service: form.service,
            message: form.message,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Phone as submitted (sanitized); `None` when not provided.
    pub fn phone(&self) -> Option<&str> {
        non_empty(&self.phone)
    }

    pub fn service(&self) -> Option<&str> {
        non_empty(&self.service)
    }

    pub fn message(&self) -> Option<&str> {
        non_empty(&self.message)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// One line of the submission log.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub timestamp: NaiveDateTime,
    pub submission: &'a Submission,
}

impl LogRecord<'_> {
    /// Render as `[YYYY-MM-DD HH:MM:SS] {json}\n`.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self.submission)?;
        Ok(format!(
            "[{}] {}\n",
            self.timestamp.format(TIMESTAMP_FORMAT),
            json
        ))
    }
}
