//! The `fidelity trust` command: score a capture, then submit it.

use clap::Args;
use fidelity_core::output::summary_line;
use fidelity_core::{
    AnalysisReport, Config, HttpTrustClient, ImageProcessor, OutputWriter, TrustRequest,
    TrustService,
};
use std::path::PathBuf;

use super::{open_output, resolve_format, OutputFormat};

/// Arguments for the `trust` command.
#[derive(Args, Debug)]
pub struct TrustArgs {
    /// Capture image to score
    #[arg(required = true)]
    pub image: PathBuf,

    /// Identity the capture belongs to
    #[arg(short, long)]
    pub identity: String,

    /// Agreement rate to submit (defaults to `[trust] agreement_rate`)
    #[arg(long)]
    pub agreement_rate: Option<f64>,

    /// Witness score to submit (defaults to `[trust] witness_score`)
    #[arg(long)]
    pub witness_score: Option<f64>,

    /// Trust service base URL (defaults to `[trust] endpoint`)
    #[arg(long, env = "FIDELITY_TRUST_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to the `[output] format` setting)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Execute the trust command.
pub async fn execute(args: TrustArgs, config: Config) -> anyhow::Result<()> {
    let config = apply_overrides(&args, config);
    let client = HttpTrustClient::new(&config.trust);
    run(&args, &config, &client).await?;
    Ok(())
}

/// Fold CLI overrides into the `[trust]` section.
fn apply_overrides(args: &TrustArgs, mut config: Config) -> Config {
    if let Some(rate) = args.agreement_rate {
        config.trust.agreement_rate = rate;
    }
    if let Some(score) = args.witness_score {
        config.trust.witness_score = score;
    }
    if let Some(endpoint) = &args.endpoint {
        config.trust.endpoint = endpoint.clone();
    }
    config
}

/// Score `args.image`, submit it through `service` and write the report
/// with the service response attached.
pub async fn run(
    args: &TrustArgs,
    config: &Config,
    service: &dyn TrustService,
) -> anyhow::Result<AnalysisReport> {
    let format = resolve_format(args.format, config)?;
    let processor = ImageProcessor::new(config);
    let mut report = processor.process(&args.image).await?;

    let request = TrustRequest::new(
        args.identity.as_str(),
        config.trust.agreement_rate,
        report.fidelity_score,
        config.trust.witness_score,
    )?;
    tracing::info!(
        "Submitting fidelity {:.3} for {} via {}",
        request.biometric_fidelity,
        request.identity_id,
        service.name()
    );
    let response = service.compute_trust(&request).await?;
    report.trust = Some(response);
    tracing::info!("{}", summary_line(&report));

    let mut writer = OutputWriter::new(
        open_output(args.output.as_deref())?,
        format,
        config.output.pretty,
    );
    writer.write(&report)?;
    writer.flush()?;
    Ok(report)
}
