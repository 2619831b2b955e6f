//! Error types for ForgeScore

use thiserror::Error;

/// Result type alias using ForgeScore Error
pub type Result<T> = std::result::Result<T, Error>;

/// ForgeScore error types
#[derive(Error, Debug)]
pub enum Error {
    // === Vector Errors ===
    #[error("Malformed vector: {0}")]
    MalformedVector(String),

    #[error("Unknown value {value:?} for metric {code}")]
    UnknownMetricValue { code: String, value: String },

    #[error("MacroVector {0} is missing from the lookup table")]
    InvalidMacroVector(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // === Parse Errors ===
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Shorthand for an unknown code/value pair
    pub fn unknown_value(code: impl Into<String>, value: impl Into<String>) -> Self {
        Error::UnknownMetricValue {
            code: code.into(),
            value: value.into(),
        }
    }

    /// Check if this error was caused by caller input rather than a defect
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedVector(_)
                | Error::UnknownMetricValue { .. }
                | Error::Configuration(_)
                | Error::Parse(_)
        )
    }

    /// Get an error code for logging
    pub fn code(&self) -> &'static str {
        match self {
            Error::MalformedVector(_) => "MALFORMED_VECTOR",
            Error::UnknownMetricValue { .. } => "UNKNOWN_METRIC_VALUE",
            Error::InvalidMacroVector(_) => "INVALID_MACRO_VECTOR",
            Error::Configuration(_) => "CONFIG_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Parse(_) => "PARSE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::MalformedVector("x".into()).code(),
            "MALFORMED_VECTOR"
        );
        assert_eq!(
            Error::unknown_value("AV", "Q").code(),
            "UNKNOWN_METRIC_VALUE"
        );
        assert_eq!(
            Error::InvalidMacroVector("999999".into()).code(),
            "INVALID_MACRO_VECTOR"
        );
        assert_eq!(Error::Parse("5.0".into()).code(), "PARSE_ERROR");
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(Error::from(io).code(), "IO_ERROR");
    }

    #[test]
    fn test_user_errors() {
        assert!(Error::MalformedVector("AV:N".into()).is_user_error());
        assert!(Error::unknown_value("AV", "Q").is_user_error());
        assert!(!Error::InvalidMacroVector("999999".into()).is_user_error());
    }

    #[test]
    fn test_unknown_value_message() {
        let err = Error::unknown_value("AC", "Z");
        assert_eq!(err.to_string(), "Unknown value \"Z\" for metric AC");
    }
}
