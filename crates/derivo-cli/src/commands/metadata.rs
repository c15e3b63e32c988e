//! Metadata report CLI command.

use std::path::PathBuf;

use clap::Args;

use derivo_core::error::AppError;
use derivo_core::types::DerivativeUrn;
use derivo_derivative::Translator;

/// Arguments for the metadata command
#[derive(Debug, Args)]
pub struct MetadataArgs {
    /// Derivative identifier to aggregate metadata for
    pub derivative: String,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the metadata command
pub async fn execute(args: &MetadataArgs, translator: &Translator) -> Result<(), AppError> {
    let report = translator
        .extract_metadata(&DerivativeUrn::new(args.derivative.clone()))
        .await
        .map_err(AppError::from)?;

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, report.to_text()).await?;
            println!(
                "Wrote metadata for {} views to {}",
                report.sections.len(),
                path.display()
            );
        }
        None => println!("{}", report.to_text()),
    }
    Ok(())
}
