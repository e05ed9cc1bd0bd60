//! Two-file image bundle writer.
//!
//! Image bytes are appended to `<out>.dat` as they arrive. The index at
//! `<out>` is only written by [`BundleWriter::close`], so a bundle whose index
//! is missing was never closed.

use super::{BundleEntry, BundleIndex, BundleWriter, ImageFormat, ImageMetadata};
use crate::error::{ImportError, Result};
use sha2::{Digest, Sha256};
use std::ffi::OsString;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Returns the data file path for a bundle index path (`<out>` -> `<out>.dat`).
pub fn data_path_for(index_path: &Path) -> PathBuf {
    let mut name = OsString::from(index_path.as_os_str());
    name.push(".dat");
    PathBuf::from(name)
}

struct OpenBundle {
    data: BufWriter<File>,
    offset: u64,
    entries: Vec<BundleEntry>,
}

/// Bundle writer backed by a JSON index and a raw data file.
pub struct ImageBundle {
    index_path: PathBuf,
    data_path: PathBuf,
    open: Option<OpenBundle>,
}

impl std::fmt::Debug for ImageBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBundle")
            .field("index_path", &self.index_path)
            .field("data_path", &self.data_path)
            .field("open", &self.open.is_some())
            .finish()
    }
}

impl ImageBundle {
    /// Creates a closed bundle handle for the index at `index_path`.
    pub fn new<P: AsRef<Path>>(index_path: P) -> Self {
        let index_path = index_path.as_ref().to_path_buf();
        let data_path = data_path_for(&index_path);
        Self {
            index_path,
            data_path,
            open: None,
        }
    }

    /// Path of the JSON index.
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Path of the raw data file.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Number of images appended since the bundle was opened.
    pub fn image_count(&self) -> usize {
        self.open.as_ref().map_or(0, |o| o.entries.len())
    }
}

impl BundleWriter for ImageBundle {
    async fn open_for_write(&mut self, overwrite: bool) -> Result<()> {
        if self.open.is_some() {
            return Ok(());
        }

        for path in [&self.index_path, &self.data_path] {
            if fs::try_exists(path).await? {
                if !overwrite {
                    return Err(ImportError::BundleExists { path: path.clone() });
                }
                log::debug!("Overwriting existing bundle file {}", path.display());
            }
        }

        // A stale index must not outlive the data file it described
        match fs::remove_file(&self.index_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        if let Some(parent) = self.data_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let file = File::create(&self.data_path).await?;

        self.open = Some(OpenBundle {
            data: BufWriter::new(file),
            offset: 0,
            entries: Vec::new(),
        });
        Ok(())
    }

    async fn add_image(
        &mut self,
        bytes: &[u8],
        format: ImageFormat,
        metadata: ImageMetadata,
    ) -> Result<()> {
        let open = self.open.as_mut().ok_or_else(|| ImportError::BundleNotOpen {
            path: self.index_path.clone(),
        })?;

        let (width, height) = read_dimensions(bytes, format).map_err(|e| {
            ImportError::ImageDecode {
                format,
                source_path: metadata
                    .get(super::META_SOURCE)
                    .cloned()
                    .unwrap_or_default(),
                reason: e.to_string(),
            }
        })?;

        open.data.write_all(bytes).await?;

        let length = bytes.len() as u64;
        open.entries.push(BundleEntry {
            offset: open.offset,
            length,
            format,
            width,
            height,
            sha256: hex::encode(Sha256::digest(bytes)),
            metadata,
        });
        open.offset += length;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let Some(mut open) = self.open.take() else {
            return Ok(());
        };

        open.data.flush().await?;
        open.data.get_mut().sync_all().await?;

        let image_count = open.entries.len();
        let index = BundleIndex::new(self.data_path.clone(), open.entries);
        fs::write(&self.index_path, serde_json::to_vec_pretty(&index)?).await?;

        log::info!(
            "Closed bundle {} ({} images, {} bytes)",
            self.index_path.display(),
            image_count,
            open.offset
        );
        Ok(())
    }
}

/// Reads width and height from the image header without decoding pixels.
fn read_dimensions(bytes: &[u8], format: ImageFormat) -> image::ImageResult<(u32, u32)> {
    image::ImageReader::with_format(Cursor::new(bytes), format.into()).into_dimensions()
}
