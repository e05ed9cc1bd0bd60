//! Image bundle writing and reading.
//!
//! The importer talks to a bundle only through [`BundleWriter`]: open for
//! write, append images one at a time, close. [`ImageBundle`] is the concrete
//! writer shipped with this crate. It stores raw image bytes in `<out>.dat` and
//! a JSON index in `<out>`, which [`BundleIndex`] reads back.
//!
//! # Module Organization
//!
//! - [`format`] - [`ImageFormat`] tags and extension sniffing
//! - [`image_bundle`] - [`ImageBundle`] writer
//! - [`index`] - [`BundleIndex`] / [`BundleEntry`] on-disk index

mod format;
mod image_bundle;
mod index;

pub use format::ImageFormat;
pub use image_bundle::{ImageBundle, data_path_for};
pub use index::{BundleEntry, BundleIndex, INDEX_VERSION};

use crate::error::Result;
use std::collections::BTreeMap;

/// Per-image key/value metadata (`source`, `filename`).
pub type ImageMetadata = BTreeMap<String, String>;

/// Metadata key holding the path or URI an image was read from.
pub const META_SOURCE: &str = "source";

/// Metadata key holding the lower-cased file name.
pub const META_FILENAME: &str = "filename";

/// Open / append / close contract for an aggregate image container.
#[allow(async_fn_in_trait)]
pub trait BundleWriter {
    /// Prepares the bundle for appending.
    ///
    /// Fails if the bundle already exists and `overwrite` is false.
    async fn open_for_write(&mut self, overwrite: bool) -> Result<()>;

    /// Appends one encoded image with its metadata.
    async fn add_image(
        &mut self,
        bytes: &[u8],
        format: ImageFormat,
        metadata: ImageMetadata,
    ) -> Result<()>;

    /// Flushes everything to disk. Closing an already closed bundle is a no-op.
    async fn close(&mut self) -> Result<()>;
}
