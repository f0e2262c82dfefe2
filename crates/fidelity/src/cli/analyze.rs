//! The `fidelity analyze` command.

use clap::Args;
use fidelity_core::output::summary_line;
use fidelity_core::{AnalysisReport, Config, ImageProcessor, OutputWriter};
use std::path::PathBuf;
use std::time::Instant;

use super::{open_output, resolve_format, OutputFormat};

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Image file or directory of captures
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to the `[output] format` setting)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Run the estimators one after another instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Leave estimator diagnostics out of the reports
    #[arg(long)]
    pub no_diagnostics: bool,
}

/// Counts from one `analyze` run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AnalyzeSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Execute the analyze command with the configuration loaded at startup.
pub async fn execute(args: AnalyzeArgs, config: Config) -> anyhow::Result<()> {
    let summary = run(&args, config).await?;
    if summary.succeeded == 0 && summary.failed > 0 {
        anyhow::bail!("All {} image(s) failed to analyze", summary.failed);
    }
    Ok(())
}

/// Analyze every image under `args.input` with the given configuration.
pub async fn run(args: &AnalyzeArgs, mut config: Config) -> anyhow::Result<AnalyzeSummary> {
    if !args.input.exists() {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            args.input
        );
    }
    if args.sequential {
        config.analysis.parallel = false;
    }
    if args.no_diagnostics {
        config.output.include_diagnostics = false;
    }
    let format = resolve_format(args.format, &config)?;

    let processor = ImageProcessor::new(&config);
    let files = processor.discover(&args.input);
    if files.is_empty() {
        tracing::warn!("No supported image files found at {:?}", args.input);
        return Ok(AnalyzeSummary::default());
    }
    tracing::info!(
        "Analyzing {} image(s) ({} estimators)",
        files.len(),
        if config.analysis.parallel {
            "parallel"
        } else {
            "sequential"
        }
    );

    let start = Instant::now();
    let mut summary = AnalyzeSummary::default();
    let mut reports: Vec<AnalysisReport> = Vec::with_capacity(files.len());
    for file in &files {
        match processor.process(&file.path).await {
            Ok(report) => {
                tracing::info!("{}", summary_line(&report));
                summary.succeeded += 1;
                reports.push(report);
            }
            Err(e) => {
                summary.failed += 1;
                tracing::error!("Failed: {:?} - {}", file.path, e);
            }
        }
    }

    let mut writer = OutputWriter::new(
        open_output(args.output.as_deref())?,
        format,
        config.output.pretty,
    );
    writer.write_batch(&reports)?;
    writer.flush()?;

    tracing::info!(
        "Done in {:.2?}: {} succeeded, {} failed",
        start.elapsed(),
        summary.succeeded,
        summary.failed
    );
    Ok(summary)
}
