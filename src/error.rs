//! Typed errors for the filtering library.
//!
//! Filter, loader and configuration code returns [`CatError`]; the command layer
//! wraps it into `anyhow::Error` with file context.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, CatError>;

#[derive(Debug, Error)]
pub enum CatError {
    /// Channel token is neither `a` nor `a-b`
    #[error("Channels input '{input}' does not specify a[-b] single[range] integer pattern")]
    ChannelFormat { input: String },

    /// Channel range whose upper end lies below its lower end
    #[error("Channels input '{input}' has upper end {upper} lower than lower end {lower}")]
    ChannelRange { input: String, lower: u32, upper: u32 },

    #[error("Unrecognised timestamp '{value}' (expected YYYY-MM-DDTHH:MM:SSZ or YYYY-MM-DDTHH:MM:SS.ffffff+HH:MM)")]
    Timestamp { value: String },

    /// A record without `start_time=` reached a time-dependent step
    #[error("Read '{read_id}' has no start_time= field in its header")]
    MissingStartTime { read_id: String },

    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },

    #[error("Could not determine a start time: no reads were found in the inputs")]
    NoStartTime,

    #[error("Malformed decision log '{}' line {line}: {reason}", path.display())]
    DecisionLog {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Read '{read_id}' has invalid quality character 0x{byte:02x}")]
    InvalidQuality { read_id: String, byte: u8 },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration file '{}': {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl CatError {
    pub(crate) fn invalid_parameter(parameter: &str, reason: impl Into<String>) -> Self {
        CatError::InvalidParameter {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_input() {
        let err = CatError::ChannelRange {
            input: "5-3".to_string(),
            lower: 5,
            upper: 3,
        };
        assert!(err.to_string().contains("'5-3'"));

        let err = CatError::DecisionLog {
            path: PathBuf::from("as.csv"),
            line: 4,
            reason: "expected at least 7 columns".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed decision log 'as.csv' line 4: expected at least 7 columns"
        );
    }
}
