use thiserror::Error;

/// Core error types shared across cfkube crates
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid byte quantity {value:?}: {reason}")]
    InvalidByteQuantity { value: String, reason: String },

    #[error("Byte quantity must be positive: {0:?}")]
    NonPositiveByteQuantity(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a new InvalidByteQuantity error
    pub fn invalid_byte_quantity(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidByteQuantity {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a new NonPositiveByteQuantity error
    pub fn non_positive_byte_quantity(value: impl Into<String>) -> Self {
        Self::NonPositiveByteQuantity(value.into())
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidByteQuantity { .. } | Self::NonPositiveByteQuantity(_) => {
                ErrorCategory::Validation
            }
            Self::JsonError(_) => ErrorCategory::Serialization,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Serialization,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Serialization => write!(f, "serialization"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_quantity_errors() {
        let err = CoreError::invalid_byte_quantity("12", "missing unit");
        assert_eq!(err.to_string(), "Invalid byte quantity \"12\": missing unit");
        assert_eq!(err.category(), ErrorCategory::Validation);

        let err = CoreError::non_positive_byte_quantity("0M");
        assert_eq!(err.to_string(), "Byte quantity must be positive: \"0M\"");
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let core_err: CoreError = json_err.into();

        assert!(matches!(core_err, CoreError::JsonError(_)));
        assert_eq!(core_err.category(), ErrorCategory::Serialization);
    }

    #[test]
    fn test_error_categories_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::Serialization.to_string(), "serialization");
    }
}
