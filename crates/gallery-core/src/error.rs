use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the gallery statistics crates.
#[derive(Error, Debug)]
pub enum GalleryError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A timestamp value did not match any recognised shape or format.
    #[error("Invalid timestamp format: {0}")]
    TimestampParse(String),

    /// A document was not a JSON object.
    #[error("Malformed record at index {index}: expected an object, found {found}")]
    MalformedRecord { index: usize, found: String },

    /// The requested collection does not exist in the store.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// The document store root directory does not exist.
    #[error("Store path not found: {0}")]
    StorePathNotFound(PathBuf),

    /// A document in a store file was not a JSON object.
    ///
    /// `line` is the 1-based line of a `.jsonl` file, or the 1-based position
    /// of the document in a `.json` file.
    #[error("Malformed document in {path} at line {line}: expected an object, found {found}")]
    MalformedDocument {
        path: PathBuf,
        line: usize,
        found: String,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the gallery crates.
pub type Result<T> = std::result::Result<T, GalleryError>;
