//! Fixtures shared by unit tests.

use crate::bundle::{ImageFormat, ImageMetadata, META_FILENAME, META_SOURCE};
use std::io::Cursor;
use std::path::Path;

/// Encodes a solid-colour image of the given size.
pub fn encoded_image(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 10]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format.into()).unwrap();
    out.into_inner()
}

/// Writes an encoded image to `path`, creating parent directories.
pub fn write_image(path: &Path, format: ImageFormat) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, encoded_image(format, 2, 2)).unwrap();
}

pub fn metadata(source: &str, filename: &str) -> ImageMetadata {
    ImageMetadata::from([
        (META_SOURCE.to_string(), source.to_string()),
        (META_FILENAME.to_string(), filename.to_string()),
    ])
}
