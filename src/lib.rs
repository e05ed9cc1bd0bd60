//! Image bundle importer library
//!
//! This library provides the pieces behind the `hib_import` binary:
//! - [`source`] - local and HDFS (WebHDFS) input filesystems
//! - [`bundle`] - the bundle writer contract and its two-file implementation
//! - [`importer`] - sorted traversal that feeds images into a bundle
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundle;
pub mod cli;
pub mod error;
pub mod importer;
pub mod source;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use error::{CliError, ImportError, Result};
