use thiserror::Error;

#[derive(Debug, Error)]
pub enum BriefingError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
