//! On-disk bundle index.

use super::{ImageFormat, ImageMetadata};
use crate::error::{ImportError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::SeekFrom;
use std::path::{Component, Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Current index layout version.
pub const INDEX_VERSION: u32 = 1;

/// One stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleEntry {
    /// Byte offset into the data file
    pub offset: u64,
    /// Encoded length in bytes
    pub length: u64,
    /// Encoding of the stored bytes
    pub format: ImageFormat,
    /// Pixel width read from the image header
    pub width: u32,
    /// Pixel height read from the image header
    pub height: u32,
    /// Hex-encoded SHA-256 of the stored bytes
    pub sha256: String,
    /// Key/value metadata supplied at import time
    pub metadata: ImageMetadata,
}

/// JSON index written next to the data file when a bundle is closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleIndex {
    /// Layout version, currently [`INDEX_VERSION`]
    pub version: u32,
    /// When the bundle was closed
    pub created_at: DateTime<Utc>,
    /// File name of the data file, relative to the index
    pub data_file: String,
    /// Stored images in insertion order
    pub images: Vec<BundleEntry>,

    #[serde(skip)]
    data_path: PathBuf,
}

impl BundleIndex {
    pub(super) fn new(data_path: PathBuf, images: Vec<BundleEntry>) -> Self {
        let data_file = data_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            version: INDEX_VERSION,
            created_at: Utc::now(),
            data_file,
            images,
            data_path,
        }
    }

    /// Loads the index stored at `index_path`.
    pub async fn load(index_path: &Path) -> Result<Self> {
        let raw = tokio::fs::read(index_path).await?;
        let mut index: Self = serde_json::from_slice(&raw)?;

        if index.version != INDEX_VERSION {
            return Err(ImportError::CorruptBundle {
                path: index_path.to_path_buf(),
                reason: format!("unsupported index version {}", index.version),
            });
        }

        // the data file must sit next to the index
        let mut components = Path::new(&index.data_file).components();
        let plain_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !plain_name {
            return Err(ImportError::CorruptBundle {
                path: index_path.to_path_buf(),
                reason: format!("data file {:?} is not a plain file name", index.data_file),
            });
        }

        let dir = index_path.parent().unwrap_or_else(|| Path::new(""));
        index.data_path = dir.join(&index.data_file);
        Ok(index)
    }

    /// Path of the data file this index points into.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Reads the encoded bytes of one entry back from the data file.
    pub async fn read_image(&self, entry: &BundleEntry) -> Result<Vec<u8>> {
        let mut file = tokio::fs::File::open(&self.data_path).await?;
        let data_len = file.metadata().await?.len();

        let end = entry.offset.checked_add(entry.length);
        if end.is_none_or(|end| end > data_len) {
            return Err(ImportError::CorruptBundle {
                path: self.data_path.clone(),
                reason: format!(
                    "entry at offset {} with length {} exceeds data file size {}",
                    entry.offset, entry.length, data_len
                ),
            });
        }

        file.seek(SeekFrom::Start(entry.offset)).await?;
        let mut bytes = vec![0u8; entry.length as usize];
        file.read_exact(&mut bytes).await?;
        Ok(bytes)
    }
}
