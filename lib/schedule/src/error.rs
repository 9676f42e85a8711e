//! Error types for the schedule crate.

use std::fmt;

/// Errors from fetching talks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The HTTP client could not be built.
    ClientSetup { reason: String },
    /// The request could not be sent or its body could not be read.
    RequestFailed { reason: String },
    /// The service did not answer within the configured timeout.
    Timeout,
    /// The service answered with a non-success status.
    UnexpectedStatus { status: u16 },
    /// The response body was not the expected shape.
    MalformedPayload { reason: String },
    /// The schedule has no talk at this position.
    NoTalkAt { index: u32 },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientSetup { reason } => write!(f, "failed to build schedule client: {reason}"),
            Self::RequestFailed { reason } => write!(f, "schedule request failed: {reason}"),
            Self::Timeout => write!(f, "schedule request timed out"),
            Self::UnexpectedStatus { status } => {
                write!(f, "schedule service returned status {status}")
            }
            Self::MalformedPayload { reason } => {
                write!(f, "malformed schedule payload: {reason}")
            }
            Self::NoTalkAt { index } => write!(f, "no talk at position {index}"),
        }
    }
}

impl std::error::Error for ScheduleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = ScheduleError::UnexpectedStatus { status: 503 };
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn malformed_payload_display() {
        let err = ScheduleError::MalformedPayload {
            reason: "missing field `talks`".to_string(),
        };
        assert!(err.to_string().contains("malformed"));
        assert!(err.to_string().contains("talks"));
    }
}
