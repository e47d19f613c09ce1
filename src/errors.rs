use thiserror::Error;

/// Errors that can occur while reading project state for reference resolution.
///
/// The resolution engine itself never surfaces these: every failure there
/// degrades to "reference stays unresolved". They show up only on the
/// I/O-facing APIs (configuration, descriptor reads, file enumeration).
#[derive(Error, Debug)]
pub enum AntoraError {
    #[error("file error: {message} (path: {path})")]
    File { message: String, path: String },

    #[error("descriptor error: {message} (path: {path})")]
    Descriptor { message: String, path: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `AntoraError`.
pub type Result<T> = std::result::Result<T, AntoraError>;
