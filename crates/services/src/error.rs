/// Error type returned by collaborator services.
///
/// `Validation` is the caller's fault (bad request), `NotConfigured` and
/// `Upstream` are ours.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation { message: String },
    #[error("{message}")]
    NotConfigured { message: String },
    #[error("{context}: {message}")]
    Upstream { context: String, message: String },
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

impl ServiceError {
    #[must_use]
    pub fn validation(message: impl std::fmt::Display) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn not_configured(message: impl std::fmt::Display) -> Self {
        Self::NotConfigured {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn upstream(context: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Upstream {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        Self::upstream("vector store request failed", err)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
