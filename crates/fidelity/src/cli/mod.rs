//! Command implementations and the helpers they share.

pub mod analyze;
pub mod config;
pub mod trust;

use clap::ValueEnum;
use fidelity_core::output::OutputFormat as CoreOutputFormat;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Report formats accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object, or an array for several images
    Json,
    /// One JSON object per line
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// The CLI flag when given, else the `[output] format` setting.
pub fn resolve_format(
    flag: Option<OutputFormat>,
    config: &fidelity_core::Config,
) -> anyhow::Result<CoreOutputFormat> {
    match flag {
        Some(format) => Ok(format.into()),
        None => config
            .output
            .format
            .parse()
            .map_err(|e: String| anyhow::anyhow!("Invalid [output] format: {e}")),
    }
}

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}

/// Buffered writer to the given file, or stdout when `None`.
pub fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let path = expand_path(path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = File::create(&path).map_err(|e| {
                anyhow::anyhow!("Cannot create output file {}: {e}", path.display())
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}
