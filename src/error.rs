//! Error types for image import operations.
//!
//! Every failure is fatal to the import run; `main` turns any of these into
//! exit code 10 after printing the message to stderr.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Main error type for all import operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Local directory traversal errors
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors talking to WebHDFS
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// WebHDFS endpoint could not be parsed or joined
    #[error("Invalid WebHDFS URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The distributed filesystem answered with an error document
    #[error("Remote filesystem error ({status}) {exception}: {message}")]
    RemoteFs {
        /// HTTP status code
        status: u16,
        /// Remote exception class name
        exception: String,
        /// Remote message
        message: String,
    },

    /// Output bundle already exists and overwrite was not requested
    #[error("Bundle already exists: {} (use --force to overwrite)", path.display())]
    BundleExists {
        /// Path of the existing file
        path: PathBuf,
    },

    /// Write attempted on a bundle that is not open
    #[error("Bundle is not open for writing: {}", path.display())]
    BundleNotOpen {
        /// Bundle index path
        path: PathBuf,
    },

    /// Image bytes do not decode as the format the extension claims
    #[error("Failed to decode {format} image {source_path}: {reason}")]
    ImageDecode {
        /// Format tag derived from the extension
        format: crate::bundle::ImageFormat,
        /// Where the bytes came from
        source_path: String,
        /// Decoder message
        reason: String,
    },

    /// Bundle index references bytes outside the data file
    #[error("Corrupt bundle {}: {reason}", path.display())]
    CorruptBundle {
        /// Bundle index path
        path: PathBuf,
        /// What is wrong
        reason: String,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}
