//! Translation CLI command: submit and poll one job.

use clap::Args;
use tokio_util::sync::CancellationToken;

use derivo_core::error::AppError;
use derivo_core::types::Urn;
use derivo_derivative::Translator;

use crate::output::ConsoleSink;

/// Arguments for the translate command
#[derive(Debug, Args)]
pub struct TranslateArgs {
    /// URN of an uploaded design
    pub urn: String,
}

/// Execute the translate command
pub async fn execute(
    args: &TranslateArgs,
    translator: &Translator,
    cancel: &CancellationToken,
) -> Result<(), AppError> {
    let urn = Urn::new(args.urn.clone());
    let outcome = translator
        .translate(&urn, &ConsoleSink, cancel)
        .await
        .map_err(AppError::from)?;

    for derivative in &outcome.derivatives {
        println!("{derivative}");
    }
    Ok(())
}
