//! Report serialization (JSON / JSON Lines) and one-line summaries.

use serde::Serialize;
use std::io::{self, Write};
use std::str::FromStr;

use crate::types::AnalysisReport;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// A single object, or an array when several reports are written together
    #[default]
    Json,
    /// One compact object per line
    JsonLines,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Ok(Self::JsonLines),
            other => Err(format!("unknown output format '{other}' (expected json or jsonl)")),
        }
    }
}

/// Serializes reports to any [`Write`] sink.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects [`OutputFormat::Json`].
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Write one item followed by a newline.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        self.emit(item)?;
        self.items_written += 1;
        Ok(())
    }

    /// Write a batch: JSON gets an array (a bare object for a single item),
    /// JSON Lines gets one line per item.
    pub fn write_batch<T: Serialize>(&mut self, items: &[T]) -> io::Result<()> {
        match (self.format, items) {
            (OutputFormat::Json, [single]) => self.write(single),
            (OutputFormat::Json, _) => {
                self.emit(&items)?;
                self.items_written += items.len();
                Ok(())
            }
            (OutputFormat::JsonLines, _) => items.iter().try_for_each(|item| self.write(item)),
        }
    }

    fn emit<T: Serialize + ?Sized>(&mut self, item: &T) -> io::Result<()> {
        if self.pretty && self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }

    pub fn items_written(&self) -> usize {
        self.items_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Human-readable one-liner, e.g.
/// `face.png 640x480 fidelity=0.512 [sharpness=0.412 ...]`.
pub fn summary_line(report: &AnalysisReport) -> String {
    let mut line = format!(
        "{} {}x{} fidelity={:.3} [{}]",
        report.file_name, report.width, report.height, report.fidelity_score, report.metrics
    );
    if let Some(trust) = &report.trust {
        line.push_str(&format!(" trust={:.3}", trust.trust_score));
    }
    line
}
