//! Error kinds produced by a manifest apply.

use cfkube_storage::StorageError;
use std::fmt;
use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// A record is absent, or a Forbidden condition masked as absence.
    #[error("{resource_type} not found: {detail}")]
    NotFound {
        resource_type: String,
        detail: String,
        #[source]
        source: Option<StorageError>,
    },

    /// The request is well-formed but cannot be satisfied.
    #[error("{message}")]
    UnprocessableEntity {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Collaborator failure returned unchanged.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The store contradicted itself mid-collection.
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Manifest apply exceeded its deadline of {0:?}")]
    DeadlineExceeded(Duration),
}

/// Closed set of error kinds callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    UnprocessableEntity,
    Passthrough,
    Internal,
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::UnprocessableEntity => write!(f, "unprocessable_entity"),
            Self::Passthrough => write!(f, "passthrough"),
            Self::Internal => write!(f, "internal"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl ManifestError {
    pub fn not_found(resource_type: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            detail: detail.into(),
            source: None,
        }
    }

    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        Self::UnprocessableEntity {
            message: message.into(),
            source: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Hides the existence of records the caller may not see: `Forbidden`
    /// becomes `NotFound`, every other error passes through.
    pub fn forbidden_as_not_found(err: StorageError) -> Self {
        match err {
            StorageError::Forbidden {
                resource_type,
                message,
            } => {
                let source = StorageError::forbidden(resource_type.clone(), message.clone());
                Self::NotFound {
                    resource_type,
                    detail: message,
                    source: Some(source),
                }
            }
            other => Self::Storage(other),
        }
    }

    /// Wraps a NotFound-kind error as `UnprocessableEntity` with the given
    /// message. Other kinds are returned untouched.
    pub fn as_unprocessable_entity(self, message: impl Into<String>) -> Self {
        if self.kind() != ErrorKind::NotFound {
            return self;
        }
        Self::UnprocessableEntity {
            message: message.into(),
            source: Some(Box::new(self)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::UnprocessableEntity { .. } => ErrorKind::UnprocessableEntity,
            Self::Storage(err) if err.is_not_found() => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::Passthrough,
            Self::Internal { .. } => ErrorKind::Internal,
            Self::DeadlineExceeded(_) => ErrorKind::Cancelled,
        }
    }
}

pub type Result<T> = std::result::Result<T, ManifestError>;
