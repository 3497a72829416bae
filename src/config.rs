//! Configuration for the jpeg-walker command line tool.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `JPEG_WALKER_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use jpeg_walker::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//! config.validate()?;
//! ```
//!
//! # Environment Variables
//!
//! - `JPEG_WALKER_TAGS` - Tag dictionary JSON file (default: bundled Exif 2.3 table)
//! - `JPEG_WALKER_FORMAT` - Output format, `text` or `json` (default: text)
//! - `JPEG_WALKER_MAX_IFD_DEPTH` - Deepest IFD nesting decoded (default: 16)

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::exif::DEFAULT_MAX_IFD_DEPTH;

// =============================================================================
// Default Values
// =============================================================================

/// Largest accepted `--max-ifd-depth`.
pub const MAX_IFD_DEPTH_LIMIT: usize = 64;

/// File extensions picked up when a directory is given.
pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

// =============================================================================
// CLI Arguments
// =============================================================================

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Segment table followed by per-IFD tag listings
    Text,
    /// Pretty-printed JSON array, one object per file
    Json,
}

/// jpeg-walker - Walk JPEG marker segments and decode Exif metadata.
///
/// Lists every marker segment with its offset, length and type, then
/// decodes JFIF and Exif headers into readable tag/value pairs.
#[derive(Parser, Debug, Clone)]
#[command(name = "jpeg-walker")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// JPEG files or directories to walk.
    ///
    /// Directories are listed non-recursively for .jpg and .jpeg files.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Tag dictionary JSON file.
    ///
    /// If not specified, uses the bundled Exif 2.3 table.
    #[arg(long, env = "JPEG_WALKER_TAGS")]
    pub tags: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "JPEG_WALKER_FORMAT")]
    pub format: OutputFormat,

    /// Deepest IFD nesting level that is decoded (1-64).
    #[arg(long, default_value_t = DEFAULT_MAX_IFD_DEPTH, env = "JPEG_WALKER_MAX_IFD_DEPTH")]
    pub max_ifd_depth: usize,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.paths.is_empty() {
            return Err("At least one input path is required".to_string());
        }

        if self.max_ifd_depth == 0 || self.max_ifd_depth > MAX_IFD_DEPTH_LIMIT {
            return Err(format!(
                "max_ifd_depth must be between 1 and {}",
                MAX_IFD_DEPTH_LIMIT
            ));
        }

        if let Some(tags) = &self.tags {
            if tags.as_os_str().is_empty() {
                return Err(
                    "Tag dictionary path is empty. Set --tags or JPEG_WALKER_TAGS, or omit it"
                        .to_string(),
                );
            }
        }

        Ok(())
    }
}

/// Whether a path has a JPEG file extension (case-insensitive).
pub fn has_jpeg_extension(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            JPEG_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

// =============================================================================
// Tests
// =============================================================================
