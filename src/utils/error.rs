use thiserror::Error;

#[derive(Error, Debug)]
pub enum PassError {
    #[error("Unknown plan: {plan}")]
    UnknownPlan { plan: String },

    #[error("Invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Student not found: {id}")]
    StudentNotFound { id: String },

    #[error("No student is logged in")]
    NotLoggedIn,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PassError>;

impl PassError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        PassError::ValidationError {
            message: message.into(),
        }
    }

    /// Short message for terminal output.
    pub fn user_friendly_message(&self) -> String {
        match self {
            PassError::UnknownPlan { plan } => format!("'{}' is not a plan we sell", plan),
            PassError::InvalidTimestamp { value, .. } => {
                format!("'{}' is not a valid ISO-8601 timestamp", value)
            }
            PassError::ValidationError { message } => message.clone(),
            PassError::MissingField { field } => format!("Please fill in {}", field),
            PassError::AuthenticationFailed { .. } => "Invalid credentials".to_string(),
            PassError::StudentNotFound { id } => format!("No student with id {}", id),
            PassError::NotLoggedIn => "Please log in first".to_string(),
            PassError::ConfigError { .. } | PassError::InvalidConfigValueError { .. } => {
                format!("Configuration problem: {}", self)
            }
            PassError::IoError(e) => format!("File access failed: {}", e),
            PassError::SerializationError(e) => format!("Could not encode data: {}", e),
            PassError::CsvError(e) => format!("Could not write CSV: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PassError::UnknownPlan { .. } => "Use one of: monthly, quarterly, semester, yearly",
            PassError::InvalidTimestamp { .. } => "Use RFC 3339, e.g. 2026-01-31T10:00:00Z",
            PassError::ValidationError { .. } | PassError::MissingField { .. } => {
                "Check the values you entered and try again"
            }
            PassError::AuthenticationFailed { .. } => "Check the admin username and password",
            PassError::StudentNotFound { .. } => "List students to see the known ids",
            PassError::NotLoggedIn => "Log in or register a student first",
            PassError::ConfigError { .. } | PassError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and run again"
            }
            PassError::IoError(_) => "Check the file path and permissions",
            PassError::SerializationError(_) | PassError::CsvError(_) => {
                "This is likely a bug, please report it"
            }
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            PassError::UnknownPlan { .. }
            | PassError::InvalidTimestamp { .. }
            | PassError::ValidationError { .. }
            | PassError::MissingField { .. }
            | PassError::StudentNotFound { .. }
            | PassError::NotLoggedIn => 2,
            PassError::AuthenticationFailed { .. } => 4,
            PassError::ConfigError { .. } | PassError::InvalidConfigValueError { .. } => 1,
            PassError::IoError(_) | PassError::SerializationError(_) | PassError::CsvError(_) => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_class() {
        assert_eq!(
            PassError::UnknownPlan {
                plan: "weekly".to_string()
            }
            .exit_code(),
            2
        );
        assert_eq!(
            PassError::AuthenticationFailed {
                message: "bad".to_string()
            }
            .exit_code(),
            4
        );
        assert_eq!(
            PassError::ConfigError {
                message: "x".to_string()
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn test_validation_message_is_passed_through() {
        let err = PassError::validation("Passwords do not match");
        assert_eq!(err.user_friendly_message(), "Passwords do not match");
        assert_eq!(err.to_string(), "Validation error: Passwords do not match");
    }
}
