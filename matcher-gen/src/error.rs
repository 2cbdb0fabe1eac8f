use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a generation round.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to format the generation timestamp")]
    Timestamp(#[from] time::error::Format),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// Failures of an [`EmissionSink`](crate::emit::EmissionSink).
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{0}` was already emitted")]
    AlreadyEmitted(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("the generator id must not be empty")]
    EmptyGeneratorId,

    #[error("the generator id `{0}` contains control characters")]
    InvalidGeneratorId(String),

    #[error("indent `{0}` must be one or more spaces or tabs")]
    InvalidIndent(String),
}
