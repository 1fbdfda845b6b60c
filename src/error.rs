//! Error types for the contact desk.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Outcome of a contact request that did not succeed.
///
/// `MethodNotAllowed` and `ValidationFailed` are caused by the client and
/// are reported verbatim. `Internal` carries the detailed cause for the
/// operational log only; callers see a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("Method not allowed. Only POST requests are accepted.")]
    MethodNotAllowed,

    #[error("Validation failed: {}", errors.join(", "))]
    ValidationFailed { errors: Vec<String> },

    #[error("Internal fault: {0}")]
    Internal(String),
}

/// Submission log errors. Never surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outbound email errors. The transport reports these as a `false` delivery flag.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid {field} address: {reason}")]
    InvalidAddress { field: String, reason: String },

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("SMTP send failed: {0}")]
    Transport(String),
}
