//! Thumbnail download CLI command.

use std::path::PathBuf;

use clap::Args;

use derivo_core::error::AppError;
use derivo_core::types::Urn;
use derivo_derivative::Translator;

/// Arguments for the thumbnail command
#[derive(Debug, Args)]
pub struct ThumbnailArgs {
    /// URN of the translated design
    pub urn: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

/// Execute the thumbnail command
pub async fn execute(args: &ThumbnailArgs, translator: &Translator) -> Result<(), AppError> {
    tokio::fs::create_dir_all(&args.output).await?;

    let path = translator
        .fetch_thumbnail(&Urn::new(args.urn.clone()), &args.output)
        .await
        .map_err(AppError::from)?;
    println!("{}", path.display());
    Ok(())
}
