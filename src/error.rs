use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The rendering backend could not be opened; nothing was laid out.
    #[error("PDF renderer unavailable: {0}")]
    RendererUnavailable(String),

    #[error("logo image: {0}")]
    Image(String),

    #[error("invalid record: {0}")]
    Json(#[from] serde_json::Error),
}
