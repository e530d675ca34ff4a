/// Exit code for a missing or invalid input.
pub const EXIT_CONFIG: i32 = 1;
/// Exit code for a payload that could not be built or delivered.
pub const EXIT_DELIVERY: i32 = 2;

/// Custom error type for actions_slack_notify operations
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Need to provide {0}")]
    MissingInput(&'static str),

    #[error("Invalid {key}: {value:?} (expected success, failure or cancelled)")]
    InvalidStatus { key: &'static str, value: String },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Payload send failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Payload send failed: error on message: {status}: {body}")]
    Rejected { status: reqwest::StatusCode, body: String },
}

impl NotifyError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            NotifyError::MissingInput(_) | NotifyError::InvalidStatus { .. } => EXIT_CONFIG,
            NotifyError::InvalidPayload(_)
            | NotifyError::Serialization(_)
            | NotifyError::Http(_)
            | NotifyError::Rejected { .. } => EXIT_DELIVERY,
        }
    }
}

/// Helper type for Results that use NotifyError
pub type Result<T> = std::result::Result<T, NotifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_exit_with_one() {
        assert_eq!(NotifyError::MissingInput("SLACK_STATUS").exit_code(), 1);
        let err = NotifyError::InvalidStatus {
            key: "SLACK_STATUS",
            value: "skipped".into(),
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("SLACK_STATUS"));
        assert!(err.to_string().contains("skipped"));
    }

    #[test]
    fn rejected_delivery_exits_with_two_and_names_body() {
        let err = NotifyError::Rejected {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "server error".into(),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().ends_with(": server error"));
    }
}
