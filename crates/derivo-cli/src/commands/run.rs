//! Full-pipeline CLI command.

use std::path::PathBuf;

use clap::Args;
use tokio_util::sync::CancellationToken;

use derivo_core::error::AppError;
use derivo_derivative::Translator;

use crate::output::ConsoleSink;

/// Arguments for the run command
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path to the design file to translate
    pub file: PathBuf,

    /// Print the metadata summary without writing metadata.txt
    #[arg(long)]
    pub skip_metadata_file: bool,
}

/// Execute the run command
pub async fn execute(
    args: &RunArgs,
    translator: &Translator,
    cancel: &CancellationToken,
) -> Result<(), AppError> {
    println!("Uploading {}...", args.file.display());

    let outcome = translator.run(&args.file, &ConsoleSink, cancel).await?;

    println!("URN: {}", outcome.urn);
    println!(
        "Derivatives: {} ({} saved, {} failed)",
        outcome.derivatives.len(),
        outcome.retrieval.saved.len(),
        outcome.retrieval.failures.len()
    );
    for failure in &outcome.retrieval.failures {
        println!("  failed: {}: {}", failure.derivative, failure.error);
    }
    println!("Thumbnail: {}", outcome.thumbnail.display());

    if let Some(report) = &outcome.metadata {
        if args.skip_metadata_file {
            println!("Metadata report: {} views", report.sections.len());
        } else {
            let path = outcome.output_dir.join("metadata.txt");
            tokio::fs::write(&path, report.to_text()).await?;
            println!(
                "Metadata report: {} ({} views)",
                path.display(),
                report.sections.len()
            );
        }
    }

    println!("Output files were saved to {}", outcome.output_dir.display());
    Ok(())
}
