use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for Loggen. Every variant is fatal to the emitter.
#[derive(Error, Debug)]
pub enum LoggenError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoggenError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoggenError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short label used in the fatal diagnostic.
    pub fn kind(&self) -> &'static str {
        match self {
            LoggenError::Config(_) => "config",
            LoggenError::Serialize(_) => "serialize",
            LoggenError::Io { .. } => "io",
        }
    }
}

impl From<figment::Error> for LoggenError {
    fn from(err: figment::Error) -> Self {
        LoggenError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LoggenError>;
