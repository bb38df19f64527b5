use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("vault root does not exist: {0}")]
    VaultNotFound(PathBuf),

    #[error("invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("entry has no content and no attachments")]
    EmptyContent,

    #[error("no daily note for {0}")]
    NotFound(String),

    #[error("line {index} is out of range (note has {line_count} lines)")]
    InvalidLineIndex { index: usize, line_count: usize },

    #[error("line {index} is not a todo line")]
    NotATodoLine { index: usize },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
