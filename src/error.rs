use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReturnError {
    #[error("Malformed action segment: '{0}'")]
    MalformedSegment(String),

    #[error("Invalid action code '{code}' in segment '{segment}'")]
    InvalidActionCode { segment: String, code: String },

    #[error("Unknown action code: {0}")]
    UnknownActionCode(i64),

    #[error("Invalid action value '{value}' in segment '{segment}'")]
    InvalidActionValue { segment: String, value: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Refund value must be non-negative, got {0}")]
    NegativeRefund(f64),

    #[error("Missing assessment field: {0}")]
    MissingField(&'static str),

    #[error("Invalid grading result: {0}")]
    InvalidGrading(String),

    #[error("Assessment service reported an error: {0}")]
    Upstream(String),

    #[error("Invalid IP address: {0}")]
    InvalidIp(String),

    #[error("No product selected")]
    NoProductSelected,

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ReturnError>;
