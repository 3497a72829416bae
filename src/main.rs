//! jpeg-walker - Walk JPEG marker segments and decode Exif metadata.
//!
//! This binary loads the tag dictionary, walks every input file and prints
//! a text or JSON report.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jpeg_walker::{
    config::{has_jpeg_extension, Config, OutputFormat},
    render::{render_json, render_text, FileReport},
    ExifDecoder, SegmentTree, TagDictionary,
};

fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    // The dictionary is loaded once, before any file is touched
    let dictionary = match load_dictionary(&config) {
        Ok(dictionary) => dictionary,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let decoder = ExifDecoder::new(&dictionary).with_max_depth(config.max_ifd_depth);

    let files = collect_inputs(&config.paths);
    if files.is_empty() {
        error!("No JPEG files found in the given paths");
        return ExitCode::FAILURE;
    }

    let mut walked = Vec::with_capacity(files.len());
    for path in &files {
        match fs::read(path) {
            Ok(data) => {
                debug!(path = %path.display(), bytes = data.len(), "Walking file");
                let tree = SegmentTree::build_with(&data, &decoder);
                walked.push((path.display().to_string(), tree));
            }
            Err(e) => warn!(path = %path.display(), "Failed to read file: {}", e),
        }
    }

    if walked.is_empty() {
        error!("None of the {} input file(s) could be read", files.len());
        return ExitCode::FAILURE;
    }

    let reports: Vec<FileReport<'_>> = walked
        .iter()
        .map(|(path, tree)| FileReport::new(path, tree))
        .collect();

    match config.format {
        OutputFormat::Text => {
            for (i, report) in reports.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print!("{}", render_text(report));
            }
        }
        OutputFormat::Json => match render_json(&reports) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so JSON output on stdout stays parseable.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "jpeg_walker=debug"
    } else {
        "jpeg_walker=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_dictionary(config: &Config) -> Result<TagDictionary, jpeg_walker::DictionaryError> {
    let dictionary = match &config.tags {
        Some(path) => TagDictionary::load(path)?,
        None => TagDictionary::bundled()?,
    };
    info!(tags = dictionary.len(), "Tag dictionary ready");
    Ok(dictionary)
}

/// Expand the input paths into a list of files.
///
/// Files are taken as given; directories contribute their `.jpg`/`.jpeg`
/// entries, sorted by name.
fn collect_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            match list_jpegs(path) {
                Ok(mut found) => {
                    debug!(dir = %path.display(), files = found.len(), "Listed directory");
                    found.sort();
                    files.append(&mut found);
                }
                Err(e) => warn!(dir = %path.display(), "Failed to list directory: {}", e),
            }
        } else {
            files.push(path.clone());
        }
    }

    files
}

fn list_jpegs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_jpeg_extension(&path) {
            found.push(path);
        }
    }
    Ok(found)
}
