//! Image format tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Image encodings a bundle accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG (`.jpg`, `.jpeg`)
    Jpeg,
    /// PNG (`.png`)
    Png,
}

impl ImageFormat {
    /// Classifies a file by its extension, ignoring case.
    ///
    /// Returns `None` for any other extension and for names without one.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, suffix) = name.rsplit_once('.')?;
        match suffix.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => write!(f, "JPEG"),
            Self::Png => write!(f, "PNG"),
        }
    }
}

impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_extension_case_insensitively() {
        assert_eq!(ImageFormat::from_file_name("a.jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_file_name("B.JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_file_name("c.Png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_file_name("archive.png.gz"), None);
    }

    #[test]
    fn rejects_names_without_a_supported_extension() {
        assert_eq!(ImageFormat::from_file_name("README"), None);
        assert_eq!(ImageFormat::from_file_name("photo.gif"), None);
        assert_eq!(ImageFormat::from_file_name("jpg"), None);
    }
}
