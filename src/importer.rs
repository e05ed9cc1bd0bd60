//! Import orchestration.
//!
//! This module provides the [`Importer`] that walks an input tree and feeds
//! every supported image into a [`BundleWriter`].
//!
//! # Overview
//!
//! The importer:
//! 1. Opens the bundle for writing
//! 2. Walks the input root in sorted depth-first order
//! 3. Classifies each entry by extension
//! 4. Reads and appends images, reports everything it skips
//! 5. Closes the bundle, even when a step above failed
//!
//! # Example
//!
//! ```no_run
//! use hib_import::bundle::ImageBundle;
//! use hib_import::cli::OutputManager;
//! use hib_import::importer::Importer;
//! use hib_import::source::LocalFs;
//!
//! # async fn example() -> hib_import::Result<()> {
//! let fs = LocalFs::new();
//! let output = OutputManager::new(false);
//! let mut bundle = ImageBundle::new("photos.hib");
//!
//! let summary = Importer::new(&fs, &output)
//!     .import("./photos", &mut bundle, false)
//!     .await?;
//! println!("{} added, {} skipped", summary.added(), summary.skipped());
//! # Ok(())
//! # }
//! ```

use crate::bundle::{BundleWriter, ImageFormat, ImageMetadata, META_FILENAME, META_SOURCE};
use crate::cli::OutputManager;
use crate::error::Result;
use crate::source::{EntryKind, SourceEntry, SourceFs};

/// Why an entry was not imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Extension is not `.jpg`, `.jpeg` or `.png`
    UnsupportedFormat,
    /// Entry is neither a file nor a directory
    NotAFile,
}

/// What happened to one walked entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Added {
        location: String,
        format: ImageFormat,
    },
    Skipped {
        location: String,
        reason: SkipReason,
    },
}

/// Result of a completed import, in walk order.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub outcomes: Vec<ImportOutcome>,
}

impl ImportSummary {
    /// Number of images written to the bundle.
    pub fn added(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ImportOutcome::Added { .. }))
            .count()
    }

    /// Number of entries skipped.
    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.added()
    }
}

/// Walks an input filesystem and appends its images to a bundle.
pub struct Importer<'a, F> {
    fs: &'a F,
    output: &'a OutputManager,
}

impl<'a, F: SourceFs> Importer<'a, F> {
    pub fn new(fs: &'a F, output: &'a OutputManager) -> Self {
        Self { fs, output }
    }

    /// Opens `bundle`, imports everything under `root`, and closes it.
    ///
    /// The bundle is closed whether or not the walk succeeds; the first error
    /// encountered is the one returned.
    pub async fn import<W: BundleWriter>(
        &self,
        root: &str,
        bundle: &mut W,
        overwrite: bool,
    ) -> Result<ImportSummary> {
        let result = match bundle.open_for_write(overwrite).await {
            Ok(()) => self.add_tree(root, bundle).await,
            Err(e) => Err(e),
        };
        let closed = bundle.close().await;

        let summary = result?;
        closed?;
        Ok(summary)
    }

    async fn add_tree<W: BundleWriter>(&self, root: &str, bundle: &mut W) -> Result<ImportSummary> {
        let entries = self.fs.walk(root).await?;
        if entries.is_empty() {
            log::warn!(
                "Did not find any files in the {} directory [{}]",
                self.fs.describe(),
                root
            );
        }

        let mut summary = ImportSummary::default();
        for entry in &entries {
            let outcome = self.add_entry(entry, bundle).await?;
            summary.outcomes.push(outcome);
        }
        Ok(summary)
    }

    async fn add_entry<W: BundleWriter>(
        &self,
        entry: &SourceEntry,
        bundle: &mut W,
    ) -> Result<ImportOutcome> {
        if entry.kind == EntryKind::Other {
            self.output.progress(&format!(
                " ** error: not supported - {} is not a file or directory.",
                entry.location
            ))?;
            return Ok(ImportOutcome::Skipped {
                location: entry.location.clone(),
                reason: SkipReason::NotAFile,
            });
        }

        let file_name = entry.name.to_lowercase();
        let Some(format) = ImageFormat::from_file_name(&file_name) else {
            log::debug!("Skipping {} (unsupported extension)", entry.location);
            self.output.progress(&format!(
                " ** error: not supported - {}",
                self.fs.unsupported_label(entry)
            ))?;
            return Ok(ImportOutcome::Skipped {
                location: entry.location.clone(),
                reason: SkipReason::UnsupportedFormat,
            });
        };

        let bytes = self.fs.read(entry).await?;
        let metadata = ImageMetadata::from([
            (META_SOURCE.to_string(), entry.location.clone()),
            (META_FILENAME.to_string(), file_name.clone()),
        ]);
        bundle.add_image(&bytes, format, metadata).await?;

        log::debug!("Added {} ({}, {} bytes)", entry.location, format, bytes.len());
        self.output.progress(&format!(" ** added: {file_name}"))?;

        Ok(ImportOutcome::Added {
            location: entry.location.clone(),
            format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{BundleIndex, ImageBundle};
    use crate::error::ImportError;
    use crate::source::LocalFs;
    use crate::test_support::write_image;
    use tempfile::TempDir;

    /// Records every call instead of writing anything.
    #[derive(Default)]
    struct RecordingWriter {
        opened_with: Option<bool>,
        added: Vec<(ImageFormat, ImageMetadata, usize)>,
        closed: bool,
    }

    impl BundleWriter for RecordingWriter {
        async fn open_for_write(&mut self, overwrite: bool) -> Result<()> {
            self.opened_with = Some(overwrite);
            Ok(())
        }

        async fn add_image(
            &mut self,
            bytes: &[u8],
            format: ImageFormat,
            metadata: ImageMetadata,
        ) -> Result<()> {
            self.added.push((format, metadata, bytes.len()));
            Ok(())
        }

        async fn close(&mut self) -> Result<()> {
            self.closed = true;
            Ok(())
        }
    }

    struct BrokenFs;

    impl SourceFs for BrokenFs {
        fn describe(&self) -> &'static str {
            "broken"
        }

        async fn walk(&self, _root: &str) -> Result<Vec<SourceEntry>> {
            Err(std::io::Error::other("listing failed").into())
        }

        async fn read(&self, _entry: &SourceEntry) -> Result<Vec<u8>> {
            unreachable!("walk never yields entries")
        }
    }

    fn fixture_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_image(&root.join("b/Second.JPEG"), ImageFormat::Jpeg);
        write_image(&root.join("a.png"), ImageFormat::Png);
        write_image(&root.join("b/first.jpg"), ImageFormat::Jpeg);
        std::fs::write(root.join("b/notes.txt"), b"not an image").unwrap();
        std::fs::write(root.join("c"), b"no extension").unwrap();
        dir
    }

    #[tokio::test]
    async fn passes_each_image_once_in_sorted_order() {
        let dir = fixture_tree();
        let root = dir.path().to_str().unwrap();
        let output = OutputManager::new(true);
        let mut writer = RecordingWriter::default();

        let summary = Importer::new(&LocalFs::new(), &output)
            .import(root, &mut writer, true)
            .await
            .unwrap();

        assert_eq!(writer.opened_with, Some(true));
        assert!(writer.closed);

        let added: Vec<(ImageFormat, &str)> = writer
            .added
            .iter()
            .map(|(format, meta, _)| (*format, meta[META_FILENAME].as_str()))
            .collect();
        // siblings sort byte-wise, so upper case names come first
        assert_eq!(
            added,
            [
                (ImageFormat::Png, "a.png"),
                (ImageFormat::Jpeg, "second.jpeg"),
                (ImageFormat::Jpeg, "first.jpg"),
            ]
        );
        assert!(writer.added[1].1[META_SOURCE].ends_with("b/Second.JPEG"));

        assert_eq!(summary.added(), 3);
        assert_eq!(summary.skipped(), 2);
        assert!(summary.outcomes.iter().any(|o| matches!(
            o,
            ImportOutcome::Skipped { location, reason: SkipReason::UnsupportedFormat }
                if location.ends_with("notes.txt")
        )));
    }

    #[tokio::test]
    async fn missing_root_produces_empty_bundle() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("missing");
        let output = OutputManager::new(true);
        let mut writer = RecordingWriter::default();

        let summary = Importer::new(&LocalFs::new(), &output)
            .import(root.to_str().unwrap(), &mut writer, false)
            .await
            .unwrap();

        assert!(writer.added.is_empty());
        assert!(writer.closed);
        assert_eq!(
            summary.outcomes,
            [ImportOutcome::Skipped {
                location: root.to_string_lossy().into_owned(),
                reason: SkipReason::NotAFile,
            }]
        );
    }

    #[tokio::test]
    async fn closes_bundle_when_walk_fails() {
        let output = OutputManager::new(true);
        let mut writer = RecordingWriter::default();

        let err = Importer::new(&BrokenFs, &output)
            .import("/anywhere", &mut writer, false)
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::Io(_)));
        assert!(writer.closed);
    }

    #[tokio::test]
    async fn writes_a_readable_bundle() {
        let dir = fixture_tree();
        let out = TempDir::new().unwrap();
        let index_path = out.path().join("photos.hib");
        let output = OutputManager::new(true);
        let mut bundle = ImageBundle::new(&index_path);

        Importer::new(&LocalFs::new(), &output)
            .import(dir.path().to_str().unwrap(), &mut bundle, false)
            .await
            .unwrap();

        let index = BundleIndex::load(&index_path).await.unwrap();
        let names: Vec<&str> = index
            .images
            .iter()
            .map(|e| e.metadata[META_FILENAME].as_str())
            .collect();
        assert_eq!(names, ["a.png", "second.jpeg", "first.jpg"]);

        let original = std::fs::read(dir.path().join("a.png")).unwrap();
        assert_eq!(index.read_image(&index.images[0]).await.unwrap(), original);
    }

    #[tokio::test]
    async fn existing_bundle_aborts_before_walking() {
        let dir = fixture_tree();
        let out = TempDir::new().unwrap();
        let index_path = out.path().join("photos.hib");
        std::fs::write(&index_path, b"keep").unwrap();
        let output = OutputManager::new(true);
        let mut bundle = ImageBundle::new(&index_path);

        let err = Importer::new(&LocalFs::new(), &output)
            .import(dir.path().to_str().unwrap(), &mut bundle, false)
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::BundleExists { .. }));
        assert_eq!(std::fs::read(&index_path).unwrap(), b"keep");
    }
}
