//! Error types for the fugitive core library.

/// Errors raised while building records or loading schema data.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Unit label is not one of the recognised purchase units
    #[error("Invalid unit: '{unit}' (expected Tonnes or kg)")]
    InvalidUnit {
        /// The rejected label
        unit: String,
    },

    /// Quantity is negative or not a finite number
    #[error("Invalid quantity for {field}: {value} (must be finite and non-negative)")]
    InvalidQuantity {
        /// Field carrying the bad value
        field: String,
        /// The rejected value
        value: f64,
    },

    /// Refrigerant label is not one of the DocType options
    #[error("Unknown refrigerant: '{label}'")]
    UnknownRefrigerant {
        /// The rejected label
        label: String,
    },

    /// Record or document validation error
    #[error("Validation error: {message}")]
    Validation {
        /// Field or aspect that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// DocType declaration is inconsistent
    #[error("Schema error: {message}")]
    Schema {
        /// What is wrong with the declaration
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience `Result` type alias for fugitive core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether this error is retryable.
    ///
    /// Only I/O failures are transient; every validation failure is
    /// permanent for the given input.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::InvalidUnit { .. } => false,
            Error::InvalidQuantity { .. } => false,
            Error::UnknownRefrigerant { .. } => false,
            Error::Validation { .. } => false,
            Error::Schema { .. } => false,
            Error::Config { .. } => false,
            Error::Serialization(_) => false,
            Error::Toml(_) => false,
        }
    }

    /// Creates a new invalid-unit error.
    pub fn invalid_unit<S: Into<String>>(unit: S) -> Self {
        Error::InvalidUnit { unit: unit.into() }
    }

    /// Creates a new invalid-quantity error.
    pub fn invalid_quantity<S: Into<String>>(field: S, value: f64) -> Self {
        Error::InvalidQuantity {
            field: field.into(),
            value,
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new schema error.
    pub fn schema<S: Into<String>>(message: S) -> Self {
        Error::Schema {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_unit_display() {
        let err = Error::invalid_unit("Pounds");
        assert_eq!(
            err.to_string(),
            "Invalid unit: 'Pounds' (expected Tonnes or kg)"
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_invalid_quantity_display() {
        let err = Error::invalid_quantity("amount_purchased", -1.0);
        assert_eq!(
            err.to_string(),
            "Invalid quantity for amount_purchased: -1 (must be finite and non-negative)"
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_validation_error_with_field() {
        let err = Error::validation_field("s_no", "is required");
        let Error::Validation { field, message } = err else {
            unreachable!("Expected Validation error variant");
        };
        assert_eq!(field, Some("s_no".to_string()));
        assert_eq!(message, "is required");
    }

    #[test]
    fn test_error_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }

    #[test]
    fn test_io_error_is_retryable() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_error.into();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_toml_error_not_retryable() {
        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: Error = toml_err.into();
        assert!(err.to_string().starts_with("TOML error"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_schema_error() {
        let err = Error::schema("duplicate fieldname 'gwp'");
        assert_eq!(err.to_string(), "Schema error: duplicate fieldname 'gwp'");
    }
}
