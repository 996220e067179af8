//! Unified error handling for the track-metrics library.
//!
//! This module provides a consistent error type for all derivation operations,
//! replacing mixed failure patterns (Option, panic, silent NaN).

use std::fmt;

/// Unified error type for track-metrics operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackError {
    /// Malformed parameters: bad smoothing window, mismatched slice lengths,
    /// malformed plot mode strings, non-monotonic interpolation reference.
    InvalidInput { message: String },
    /// A requested column/quantity depends on an optional channel (time or
    /// elevation) that this track does not carry.
    MissingChannel { column: String, channel: String },
    /// Input too degenerate to derive anything from (fewer than 2 samples).
    DegenerateInput { message: String },
    /// A plot short-name code that does not name any known column.
    UnknownColumn { code: char },
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            TrackError::MissingChannel { column, channel } => {
                write!(
                    f,
                    "Column '{}' unavailable: track has no {} channel",
                    column, channel
                )
            }
            TrackError::DegenerateInput { message } => {
                write!(f, "Degenerate input: {}", message)
            }
            TrackError::UnknownColumn { code } => {
                write!(f, "Unknown column short name: '{}'", code)
            }
        }
    }
}

impl std::error::Error for TrackError {}

/// Result type alias for track-metrics operations.
pub type Result<T> = std::result::Result<T, TrackError>;

impl TrackError {
    /// Shorthand for an [`TrackError::InvalidInput`] with a formatted message.
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        TrackError::InvalidInput {
            message: message.into(),
        }
    }

    /// Shorthand for a [`TrackError::MissingChannel`] naming the prerequisite.
    pub(crate) fn missing(column: impl Into<String>, channel: impl Into<String>) -> Self {
        TrackError::MissingChannel {
            column: column.into(),
            channel: channel.into(),
        }
    }

    /// Shorthand for a [`TrackError::DegenerateInput`] with a formatted message.
    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        TrackError::DegenerateInput {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackError::missing("velocity (km/h)", "time");
        assert!(err.to_string().contains("velocity (km/h)"));
        assert!(err.to_string().contains("time"));
    }

    #[test]
    fn test_unknown_column_display() {
        let err = TrackError::UnknownColumn { code: 'q' };
        assert!(err.to_string().contains('q'));
    }

    #[test]
    fn test_invalid_shorthand() {
        let err = TrackError::invalid("window size 0");
        assert!(matches!(err, TrackError::InvalidInput { .. }));
        assert!(err.to_string().contains("window size 0"));
    }
}
