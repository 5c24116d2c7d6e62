//! Error types for kv-store
//!
//! Every store operation returns [`StoreError`]. Capacity and key problems are
//! reported before any I/O happens so a rejected write never leaves a partial
//! file behind.

use std::path::PathBuf;
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key is empty or contains characters that cannot map to a file name
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// Value is larger than the store accepts
    #[error("Value for {key} is {size} bytes, store capacity is {capacity} bytes")]
    CapacityExceeded {
        /// Key being written
        key: String,
        /// Size of the rejected value in bytes
        size: usize,
        /// Configured capacity in bytes
        capacity: usize,
    },

    /// I/O error reading a value
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O error writing a value
    #[error("Failed to write {path}: {source}")]
    Write {
        /// File that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Final rename of the temp file failed
    #[error("Failed to write value atomically: {path} - Safety copy at: {temp_path}")]
    WriteAtomic {
        /// Path to the value file
        path: PathBuf,
        /// Path to the temporary safety copy
        temp_path: PathBuf,
    },
}

/// Result type alias for kv-store operations
pub type Result<T> = std::result::Result<T, StoreError>;
