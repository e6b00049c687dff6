use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus {} has no usable structure: {message}", path.display())]
    Structure { path: PathBuf, message: String },

    #[error("corpus {} is malformed after sanitization: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl CorpusError {
    /// Rebinds an error raised while parsing in-memory markup to the file it came from.
    pub fn with_path(self, path: PathBuf) -> Self {
        match self {
            Self::Io { source, .. } => Self::Io { path, source },
            Self::Structure { message, .. } => Self::Structure { path, message },
            Self::Parse { message, .. } => Self::Parse { path, message },
        }
    }
}
