use reqwest::Method;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{method} {path}: expected status {expected}, got {actual}: {body}")]
    UnexpectedStatus {
        method: Method,
        path: String,
        expected: u16,
        actual: u16,
        body: String,
    },

    #[error("Response has no string field `{0}`")]
    MissingField(String),

    #[error("Field `{field}`: expected {expected:?}, got {actual:?}")]
    FieldMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Cleanup of {path} failed with status {status}: {body}")]
    Cleanup {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Scenario task aborted: {0}")]
    Aborted(String),

    #[error("Step {index} ({name}) failed: {source}")]
    Step {
        index: usize,
        name: String,
        #[source]
        source: Box<HarnessError>,
    },
}

impl HarnessError {
    /// Strips step wrappers, returning the error that actually failed.
    pub fn root(&self) -> &HarnessError {
        match self {
            HarnessError::Step { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
