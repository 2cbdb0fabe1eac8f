use matcher_gen::model::ModelError;
use matcher_gen::{ConfigError, GenerationError};

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of one invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid declaration model in {}", path.display())]
    Model {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
    #[error("invalid settings in {}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}
