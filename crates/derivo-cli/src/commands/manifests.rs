//! Derivative download CLI command.

use std::path::PathBuf;

use clap::Args;

use derivo_core::error::AppError;
use derivo_core::types::{DerivativeUrn, Urn};
use derivo_derivative::Translator;

/// Arguments for the manifests command
#[derive(Debug, Args)]
pub struct ManifestsArgs {
    /// URN of the translated design
    pub urn: String,

    /// Derivative identifiers to download
    #[arg(required = true)]
    pub derivatives: Vec<String>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

/// Execute the manifests command
pub async fn execute(args: &ManifestsArgs, translator: &Translator) -> Result<(), AppError> {
    let urn = Urn::new(args.urn.clone());
    let derivatives: Vec<DerivativeUrn> = args
        .derivatives
        .iter()
        .map(|d| DerivativeUrn::new(d.clone()))
        .collect();

    tokio::fs::create_dir_all(&args.output).await?;

    let report = translator
        .fetch_manifests(&urn, &derivatives, &args.output)
        .await
        .map_err(AppError::from)?;

    for path in &report.saved {
        println!("saved {}", path.display());
    }
    for failure in &report.failures {
        println!("failed {}: {}", failure.derivative, failure.error);
    }

    if report.is_complete() {
        Ok(())
    } else {
        Err(AppError::retrieval(format!(
            "{} of {} derivative downloads failed",
            report.failures.len(),
            derivatives.len()
        )))
    }
}
