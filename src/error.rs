use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Compressed stream is truncated or corrupt.
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// Content is not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Statistics text does not match the progress record grammar.
    #[error("Malformed statistics: {0}")]
    MalformedStatistics(String),

    /// Note record violates its format's structure.
    #[error("Malformed note record: {0}")]
    MalformedNoteRecord(String),

    /// PDF style code outside the known table.
    #[error("Unknown style code: {0:?}")]
    UnknownStyleCode(String),

    /// Book type has no note codec.
    #[error("Unsupported book type: {0}")]
    UnsupportedBookType(String),

    /// Path is not a reader file or directory.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Work was cancelled before it started.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for the application.
pub type Result<T> = std::result::Result<T, AppError>;
