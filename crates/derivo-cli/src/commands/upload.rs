//! Upload CLI command.

use std::path::PathBuf;

use clap::Args;

use derivo_core::error::AppError;
use derivo_derivative::Translator;

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Path to the file to upload
    pub file: PathBuf,
}

/// Execute the upload command
pub async fn execute(args: &UploadArgs, translator: &Translator) -> Result<(), AppError> {
    let urn = translator
        .upload(&args.file)
        .await
        .map_err(AppError::from)?;
    println!("{urn}");
    Ok(())
}
