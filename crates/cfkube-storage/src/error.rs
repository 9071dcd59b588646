//! Storage error types for the repository abstraction layer.
//!
//! This module defines all error types that collaborator stores can return.

use std::fmt;

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    /// The requested record was not found.
    #[error("{resource_type} not found: {id}")]
    NotFound {
        /// The type of record that was not found.
        resource_type: String,
        /// The GUID or name that was looked up.
        id: String,
    },

    /// The caller is not allowed to see or change the record.
    #[error("Forbidden: {resource_type}: {message}")]
    Forbidden {
        /// The type of record the caller was denied.
        resource_type: String,
        /// Description of the denial.
        message: String,
    },

    /// Attempted to create a record that already exists.
    #[error("{resource_type} already exists: {id}")]
    AlreadyExists {
        /// The type of record that already exists.
        resource_type: String,
        /// The GUID or name of the existing record.
        id: String,
    },

    /// Failed to reach the storage backend.
    #[error("Connection error: {message}")]
    ConnectionError {
        /// Description of the connection error.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates a new `Forbidden` error.
    #[must_use]
    pub fn forbidden(resource_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Forbidden {
            resource_type: resource_type.into(),
            message: message.into(),
        }
    }

    /// Creates a new `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates a new `ConnectionError` error.
    #[must_use]
    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a forbidden error.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }

    /// Returns `true` if this is an already exists error.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Forbidden { .. } => ErrorCategory::Forbidden,
            Self::AlreadyExists { .. } => ErrorCategory::Conflict,
            Self::ConnectionError { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Record not found.
    NotFound,
    /// Caller lacks access.
    Forbidden,
    /// Conflict (existence).
    Conflict,
    /// Infrastructure/connection error.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::Conflict => write!(f, "conflict"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
