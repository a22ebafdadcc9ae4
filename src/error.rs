use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("theme index {index} is out of range (catalog has {len} themes)")]
    ThemeIndexOutOfRange { index: usize, len: usize },

    #[error("preference file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode preferences: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not determine project directories")]
    NoProjectDirs,

    #[error("automatic theme rotation needs a running tokio runtime")]
    NoRuntime,

    #[error("unknown language code `{0}`")]
    UnknownLanguage(String),
}
