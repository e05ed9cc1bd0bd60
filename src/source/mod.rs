//! Input filesystem resolution.
//!
//! An import reads from one of two places: the local filesystem or HDFS
//! (through its WebHDFS gateway). Both expose the same listing/read contract
//! through [`SourceFs`], and [`InputSource`] picks one from the command line.

mod local;
mod webhdfs;

pub use local::LocalFs;
pub use webhdfs::WebHdfs;

use crate::error::Result;

/// What a walk found at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file, candidate for import
    File,
    /// Anything that is neither a file nor a directory (dangling link, socket, missing root)
    Other,
}

/// One non-directory item produced by [`SourceFs::walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Filesystem-native path used to read the entry back
    pub path: String,
    /// Path or URI recorded as the image `source`
    pub location: String,
    /// Final path component, original case
    pub name: String,
    /// Entry classification
    pub kind: EntryKind,
}

/// Listing and reading contract for an input filesystem.
#[allow(async_fn_in_trait)]
pub trait SourceFs {
    /// Human-readable name of the filesystem (`local FS`, `HDFS`).
    fn describe(&self) -> &'static str;

    /// Lists every non-directory entry under `root`, depth-first with siblings
    /// sorted by name.
    ///
    /// A root that is a file yields just that file. A root that does not exist
    /// yields a single [`EntryKind::Other`] entry.
    async fn walk(&self, root: &str) -> Result<Vec<SourceEntry>>;

    /// Reads the full contents of a file entry.
    async fn read(&self, entry: &SourceEntry) -> Result<Vec<u8>>;

    /// How an unsupported file is named in the skip message.
    fn unsupported_label(&self, entry: &SourceEntry) -> String {
        entry.name.to_lowercase()
    }
}

/// Input filesystem selected on the command line.
#[derive(Debug)]
pub enum InputSource {
    Local(LocalFs),
    Hdfs(WebHdfs),
}

impl InputSource {
    /// Builds the input filesystem for the given runtime configuration.
    pub fn from_config(config: &crate::cli::RuntimeConfig) -> Result<Self> {
        if config.hdfs_input() {
            let hdfs = WebHdfs::new(config.webhdfs_url(), config.hdfs_user().map(String::from))?;
            Ok(Self::Hdfs(hdfs))
        } else {
            Ok(Self::Local(LocalFs::new()))
        }
    }
}

impl SourceFs for InputSource {
    fn describe(&self) -> &'static str {
        match self {
            Self::Local(fs) => fs.describe(),
            Self::Hdfs(fs) => fs.describe(),
        }
    }

    async fn walk(&self, root: &str) -> Result<Vec<SourceEntry>> {
        match self {
            Self::Local(fs) => fs.walk(root).await,
            Self::Hdfs(fs) => fs.walk(root).await,
        }
    }

    async fn read(&self, entry: &SourceEntry) -> Result<Vec<u8>> {
        match self {
            Self::Local(fs) => fs.read(entry).await,
            Self::Hdfs(fs) => fs.read(entry).await,
        }
    }

    fn unsupported_label(&self, entry: &SourceEntry) -> String {
        match self {
            Self::Local(fs) => fs.unsupported_label(entry),
            Self::Hdfs(fs) => fs.unsupported_label(entry),
        }
    }
}
