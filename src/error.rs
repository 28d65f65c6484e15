//! Unified error hierarchy for GoldenPace
//!
//! Every failure the engine can report is returned as a value. Nothing in the
//! library panics or aborts the host; clamping is reported through tracing
//! diagnostics instead of errors.

use thiserror::Error;

/// Top-level error type for all GoldenPace operations
#[derive(Debug, Error)]
pub enum GoldenPaceError {
    /// Malformed duration text
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(#[from] TimeFormatError),

    /// Distance label or length outside the canonical enumeration
    #[error("Unsupported distance: {name}")]
    UnsupportedDistance { name: String },

    /// Fitness index outside [30, 85] given to a strict constructor
    #[error("Fitness index {value} is outside the supported range (30-85)")]
    OutOfRangeIndex { value: f64 },

    /// Invalid parameter passed to a calculation
    #[error("Invalid parameter {parameter}={value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Duration parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFormatError {
    /// Empty or blank input
    #[error("time is empty")]
    Empty,

    /// Neither MM:SS nor HH:MM:SS
    #[error("expected MM:SS or HH:MM:SS, got {fields} field(s) in '{input}'")]
    FieldCount { input: String, fields: usize },

    /// A field that is not a non-negative integer
    #[error("'{field}' is not a whole number in '{input}'")]
    NonNumeric { input: String, field: String },

    /// Minutes or seconds of 60 or more
    #[error("{unit} field {value} must be below 60 in '{input}'")]
    FieldOutOfRange {
        input: String,
        unit: &'static str,
        value: u64,
    },

    /// Numeric fields that add up to more seconds than a time can hold
    #[error("'{input}' is too long to be a race time")]
    TooLong { input: String },
}

/// Result type alias for GoldenPace operations
pub type Result<T> = std::result::Result<T, GoldenPaceError>;

impl GoldenPaceError {
    pub(crate) fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        GoldenPaceError::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GoldenPaceError::InvalidTimeFormat(_) => ErrorSeverity::Warning,
            GoldenPaceError::UnsupportedDistance { .. } => ErrorSeverity::Warning,
            GoldenPaceError::OutOfRangeIndex { .. } => ErrorSeverity::Warning,
            GoldenPaceError::InvalidParameter { .. } => ErrorSeverity::Warning,
            GoldenPaceError::Configuration(_) => ErrorSeverity::Error,
            GoldenPaceError::Io(_) => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            GoldenPaceError::InvalidTimeFormat(_) => {
                "Please enter a valid time format (e.g., 22:30 or 1:22:30)".to_string()
            }
            GoldenPaceError::UnsupportedDistance { name } => {
                format!("'{}' is not a supported race distance", name)
            }
            GoldenPaceError::OutOfRangeIndex { value } => {
                format!(
                    "A fitness index of {:.1} is outside the chart (30-85). Please verify your time.",
                    value
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the operation
    Error,
    /// Recoverable input problem
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = GoldenPaceError::from(TimeFormatError::Empty);
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = GoldenPaceError::Configuration("bad".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_user_messages() {
        let err = GoldenPaceError::from(TimeFormatError::FieldCount {
            input: "22".to_string(),
            fields: 1,
        });
        assert!(err.user_message().contains("22:30"));

        let err = GoldenPaceError::UnsupportedDistance {
            name: "3K".to_string(),
        };
        assert!(err.user_message().contains("3K"));

        let err = GoldenPaceError::OutOfRangeIndex { value: 91.25 };
        assert!(err.user_message().contains("91.2") || err.user_message().contains("91.3"));
    }

    #[test]
    fn test_error_display() {
        let err = TimeFormatError::FieldOutOfRange {
            input: "22:75".to_string(),
            unit: "seconds",
            value: 75,
        };
        assert_eq!(err.to_string(), "seconds field 75 must be below 60 in '22:75'");
    }
}
