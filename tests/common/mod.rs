//! Shared fixtures for binary tests

use std::io::Cursor;
use std::path::Path;

use assert_cmd::Command;

/// Write a small real image in the given format, creating parent directories
pub fn write_image(path: &Path, format: image::ImageFormat) {
    let img = image::RgbImage::from_pixel(4, 3, image::Rgb([10, 120, 240]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, format).unwrap();

    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes.into_inner()).unwrap();
}

/// Importer binary with logging disabled and no HDFS settings leaking in
pub fn importer() -> Command {
    let mut cmd = Command::cargo_bin("hib_import").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("HIB_IMPORT_WEBHDFS_URL")
        .env_remove("HADOOP_USER_NAME");
    cmd
}
