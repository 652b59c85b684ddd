use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to reach model service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed service response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("model service returned no content")]
    EmptyResponse,

    #[error("model refused the request: {0}")]
    Refusal(String),

    #[error("response is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("response does not match schema: {}", errors.join("; "))]
    Validation { errors: Vec<String> },

    #[error("invalid schema definition: {0}")]
    Schema(String),
}

/// Coarse failure category reported by the top-level diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Service,
    Parse,
    Validation,
    Schema,
}

impl ExtractError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_)
            | Self::Status { .. }
            | Self::MalformedResponse(_)
            | Self::EmptyResponse
            | Self::Refusal(_) => FailureKind::Service,
            Self::Parse(_) => FailureKind::Parse,
            Self::Validation { .. } => FailureKind::Validation,
            Self::Schema(_) => FailureKind::Schema,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Service => "service error",
            Self::Parse => "parse error",
            Self::Validation => "validation error",
            Self::Schema => "schema error",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        let err = ExtractError::Validation {
            errors: vec!["\"age\" is a required property at /pets/0".to_string()],
        };
        assert_eq!(err.kind(), FailureKind::Validation);
        assert_eq!(err.kind().to_string(), "validation error");
        assert!(err.to_string().contains("\"age\" is a required property"));

        let err = ExtractError::Status {
            status: 404,
            message: "model 'llama3.2:latest' not found".to_string(),
        };
        assert_eq!(err.kind(), FailureKind::Service);
        assert_eq!(err.kind().to_string(), "service error");
    }
}
