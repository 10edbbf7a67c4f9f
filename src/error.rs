use crate::domain::document::UploadError;
use crate::domain::gateway::GatewayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("{field}: {reason}")]
    ValidationError { field: String, reason: String },
    #[error(transparent)]
    UploadError(#[from] UploadError),
    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),
    #[error("Unknown field `{field}` on step `{step}`")]
    UnknownField { field: String, step: String },
    #[error("A request is already in progress")]
    Busy,
    #[error("No request is in flight")]
    NotPending,
    #[error("Session is closed")]
    SessionClosed,
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Not available: {0}")]
    Unavailable(String),
}

impl WizardError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WizardError>;
