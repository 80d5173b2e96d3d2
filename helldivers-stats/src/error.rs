//! Error types for counter ingestion and validation.

use thiserror::Error;

/// Raised when raw counters are malformed or describe an impossible state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },
    #[error("{field} must be a whole number (got {raw:?})")]
    NotAnInteger { field: &'static str, raw: String },
    #[error("{field} ({value}) exceeds {limit_field} ({limit})")]
    ImpossibleState {
        field: &'static str,
        value: u64,
        limit_field: &'static str,
        limit: u64,
    },
    #[error("subject name must be text or a number (got {0})")]
    InvalidName(String),
    #[error("unknown counter field {0:?}")]
    UnknownField(String),
    #[error("invalid play time {input:?}: {reason}")]
    PlayTime { input: String, reason: &'static str },
    #[error("expected at least {expected} subject(s), found {found}")]
    MissingSubject { expected: usize, found: usize },
}

/// Errors raised while reading subjects from an external source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Invalid(#[from] InvalidInput),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("expected a JSON object or an array of objects")]
    JsonShape,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_field() {
        let err = InvalidInput::Negative {
            field: "deaths",
            value: -4,
        };
        assert_eq!(err.to_string(), "deaths must not be negative (got -4)");

        let err = InvalidInput::ImpossibleState {
            field: "missions_won",
            value: 12,
            limit_field: "missions_played",
            limit: 10,
        };
        assert!(err.to_string().contains("exceeds missions_played (10)"));
    }

    #[test]
    fn source_error_wraps_invalid_input_transparently() {
        let inner = InvalidInput::UnknownField("kils".to_string());
        let wrapped = SourceError::from(inner.clone());
        assert_eq!(wrapped.to_string(), inner.to_string());
    }
}
