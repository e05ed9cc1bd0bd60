//! hib_import - import a directory tree of images into an image bundle.
//!
//! Walks a local or HDFS directory and appends every JPEG/PNG it finds to a
//! single bundle file. Exits 0 on success, 1 on usage errors and 10 when the
//! import fails.

use hib_import::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            cli::FAILURE_EXIT_CODE
        }
    };

    process::exit(exit_code);
}
