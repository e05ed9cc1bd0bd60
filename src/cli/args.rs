//! Command line argument parsing and validation.
//!
//! `-h` belongs to `--hdfs-input`, so help is only reachable as `--help`.

use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

/// Default WebHDFS endpoint of a single-node Hadoop 3 cluster.
pub const DEFAULT_WEBHDFS_URL: &str = "http://localhost:9870";

/// Import a directory of JPEG/PNG images into an image bundle
#[derive(Parser, Debug)]
#[command(
    name = "hib_import",
    version,
    disable_help_flag = true,
    override_usage = "hib_import [options] <image directory> <output HIB>",
    about = "Import a directory of JPEG/PNG images into an image bundle",
    long_about = "Walks <image directory> (local or on HDFS) in sorted order and appends every \
.jpg, .jpeg and .png file to the bundle at <output HIB>. Other files are reported and skipped.

Writes two files: <output HIB> (JSON index) and <output HIB>.dat (image data).

Exit codes: 0 success, 1 usage error, 10 import failure."
)]
pub struct Args {
    /// Directory (or single file) to import
    #[arg(value_name = "IMAGE_DIR")]
    pub image_dir: String,

    /// Path of the bundle index to create
    #[arg(value_name = "OUTPUT_HIB")]
    pub output_hib: PathBuf,

    /// Force overwrite if output HIB already exists
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Assume input directory is on HDFS
    #[arg(short = 'h', long)]
    pub hdfs_input: bool,

    /// WebHDFS endpoint of the namenode (used with --hdfs-input)
    #[arg(
        long,
        value_name = "URL",
        env = "HIB_IMPORT_WEBHDFS_URL",
        default_value = DEFAULT_WEBHDFS_URL
    )]
    pub webhdfs_url: String,

    /// HDFS user name sent as `user.name`, defaults to the login user (used with --hdfs-input)
    #[arg(long, value_name = "USER", env = "HADOOP_USER_NAME")]
    pub hdfs_user: Option<String>,

    /// Only print the summary line and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl Args {
    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.image_dir.is_empty() {
            return Err("Image directory cannot be empty".to_string());
        }
        if self.output_hib.as_os_str().is_empty() {
            return Err("Output HIB path cannot be empty".to_string());
        }
        if self.output_hib.is_dir() {
            return Err(format!(
                "Output HIB must be a file path, {} is a directory",
                self.output_hib.display()
            ));
        }
        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    image_dir: String,
    output_hib: PathBuf,
    overwrite: bool,
    hdfs_input: bool,
    webhdfs_url: String,
    hdfs_user: Option<String>,
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            image_dir: args.image_dir.clone(),
            output_hib: args.output_hib.clone(),
            overwrite: args.force,
            hdfs_input: args.hdfs_input,
            webhdfs_url: args.webhdfs_url.clone(),
            hdfs_user: args.hdfs_user.clone(),
            output: super::OutputManager::new(args.quiet),
        }
    }
}

impl RuntimeConfig {
    pub fn image_dir(&self) -> &str {
        &self.image_dir
    }

    pub fn output_hib(&self) -> &Path {
        &self.output_hib
    }

    /// Whether an existing bundle may be replaced
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn hdfs_input(&self) -> bool {
        self.hdfs_input
    }

    pub fn webhdfs_url(&self) -> &str {
        &self.webhdfs_url
    }

    pub fn hdfs_user(&self) -> Option<&str> {
        self.hdfs_user.as_deref()
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}
