use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at an engine boundary (decoder, speech, aligner, diarizer,
/// token store). These carry what failed, not user guidance; remediation
/// text is added by the classifier.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{tool} not found on this system")]
    ToolMissing { tool: String },

    #[error("model file not found: {path}")]
    ModelMissing { name: String, path: PathBuf },

    #[error("could not decode audio: {0}")]
    DecodeFailed(String),

    #[error("out of memory: {0}")]
    OutOfMemory(String),

    #[error("{0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for EngineError {
    fn from(err: toml::ser::Error) -> Self {
        EngineError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Backend(err.to_string())
    }
}

/// Taxonomy class of a failed run, for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidInput,
    EnvironmentMissing,
    ResourceExhausted,
    UnclassifiedFailure,
}

/// A classified, user-facing run failure.
///
/// Produced by the error classifier; stage code never formats user-facing
/// text itself. Degraded stages (alignment, diarization) never surface here.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{tool} is required but was not found. {hint}")]
    EnvironmentMissing { tool: String, hint: String },

    #[error("the compute device ran out of memory: {detail}. {hint}")]
    ResourceExhausted { detail: String, hint: String },

    #[error("{detail}. {hint}")]
    Unclassified { detail: String, hint: String },
}

impl RunError {
    /// Which taxonomy class this failure belongs to.
    pub fn kind(&self) -> FailureKind {
        match self {
            RunError::InvalidInput(_) => FailureKind::InvalidInput,
            RunError::EnvironmentMissing { .. } => FailureKind::EnvironmentMissing,
            RunError::ResourceExhausted { .. } => FailureKind::ResourceExhausted,
            RunError::Unclassified { .. } => FailureKind::UnclassifiedFailure,
        }
    }
}
