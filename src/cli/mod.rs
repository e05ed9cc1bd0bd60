//! Command line interface for the image bundle importer.

mod args;
mod output;

pub use args::{Args, DEFAULT_WEBHDFS_URL, RuntimeConfig};
pub use output::OutputManager;

use crate::bundle::{ImageBundle, data_path_for};
use crate::error::Result;
use crate::importer::Importer;
use crate::source::{InputSource, SourceFs};
use clap::Parser;
use clap::error::ErrorKind;

/// Exit code for malformed command lines.
pub const USAGE_EXIT_CODE: i32 = 1;

/// Exit code for any failure once the import has started.
pub const FAILURE_EXIT_CODE: i32 = 10;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    match Args::try_parse() {
        Ok(args) => run_with(args).await,
        Err(e) => Ok(usage_exit_code(&e)),
    }
}

/// Runs an import for already parsed arguments
pub async fn run_with(args: Args) -> Result<i32> {
    let config = RuntimeConfig::from(&args);
    let output = config.output();

    if let Err(reason) = args.validate() {
        output.error(&reason)?;
        return Ok(USAGE_EXIT_CODE);
    }

    let source = InputSource::from_config(&config)?;
    let data_path = data_path_for(config.output_hib());

    output.progress(&format!("Input image directory: {}", config.image_dir()))?;
    output.progress(&format!("Input FS: {}", source.describe()))?;
    output.progress(&format!("Output HIB: {}", config.output_hib().display()))?;
    output.progress(&format!("Overwrite HIB if it exists: {}", config.overwrite()))?;

    let mut bundle = ImageBundle::new(config.output_hib());
    let summary = Importer::new(&source, output)
        .import(config.image_dir(), &mut bundle, config.overwrite())
        .await?;

    log::info!(
        "Imported {} images from {} ({} skipped)",
        summary.added(),
        config.image_dir(),
        summary.skipped()
    );
    if summary.added() == 0 {
        output.warn(&format!(
            "No images were added to {}",
            config.output_hib().display()
        ))?;
    }

    output.success(&format!(
        "Created: {} and {}",
        config.output_hib().display(),
        data_path.display()
    ))?;
    Ok(0)
}

/// Prints a clap error or help text and picks the matching exit code.
fn usage_exit_code(err: &clap::Error) -> i32 {
    let _ = err.print();
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => USAGE_EXIT_CODE,
    }
}
